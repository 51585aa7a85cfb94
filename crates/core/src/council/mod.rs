//! Council name resolution.
//!
//! Resolves a free-text council name or region against the static list of
//! ModernGov councils, with a deterministic confidence model.

mod matcher;
pub mod similarity;
mod types;

pub use matcher::CouncilMatcher;
pub use types::*;

use thiserror::Error;

/// Errors loading the council reference list.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("Failed to parse council reference data: {0}")]
    Parse(String),

    #[error("Invalid council entry at index {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}
