//! Response normalization.
//!
//! ModernGov installs answer the same operation with different XML layouts.
//! Each operation family has a parser that classifies the document into one
//! of its known shapes and maps it onto the canonical records in [`types`].
//! A well-formed document in an unknown shape means "no data" and yields an
//! empty list; only unusable bodies are errors.

mod calendar;
mod committees;
mod councillors;
mod elections;
mod meetings;
mod parish;
mod representatives;
pub mod types;
mod webcasts;
pub mod xml;

pub use calendar::parse_calendar_events;
pub use committees::parse_committees;
pub use councillors::parse_wards;
pub use elections::parse_election_results;
pub use meetings::{parse_meeting, parse_meetings};
pub use parish::parse_parish_councils;
pub use representatives::parse_representatives;
pub use types::*;
pub use webcasts::parse_webcast_meetings;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use crate::client::transport::excerpt;
use xml::XmlNode;

/// Errors turning a response body into records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Malformed response ({reason}): {excerpt}")]
    MalformedResponse { reason: String, excerpt: String },

    #[error("Invalid XML ({message}): {excerpt}")]
    Xml { message: String, excerpt: String },
}

impl NormalizeError {
    fn malformed(reason: &str, body: &str) -> Self {
        Self::MalformedResponse {
            reason: reason.to_string(),
            excerpt: excerpt(body),
        }
    }

    /// Leading portion of the offending body.
    pub fn excerpt(&self) -> &str {
        match self {
            Self::MalformedResponse { excerpt, .. } | Self::Xml { excerpt, .. } => excerpt,
        }
    }
}

static ERROR_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title>[^<]*error[^<]*</title>").unwrap());

/// Reject bodies that cannot be a ModernGov XML document.
///
/// Fails on an empty body, a body that does not start with a tag, and HTML
/// pages (a doctype/html root after any prolog, or an error title plus the
/// word "Error").
pub fn check_body(raw: &str) -> Result<&str, NormalizeError> {
    let body = raw.trim_start_matches('\u{feff}').trim();

    if body.is_empty() {
        return Err(NormalizeError::malformed("empty body", raw));
    }
    if !body.starts_with('<') {
        return Err(NormalizeError::malformed("body is not XML", body));
    }

    let head: String = skip_prolog(body)
        .chars()
        .take(32)
        .collect::<String>()
        .to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        return Err(NormalizeError::malformed("HTML page instead of XML", body));
    }
    if ERROR_TITLE.is_match(body) && body.contains("Error") {
        return Err(NormalizeError::malformed("server error page", body));
    }

    Ok(body)
}

/// Skip XML declarations, processing instructions and comments.
fn skip_prolog(mut body: &str) -> &str {
    loop {
        body = body.trim_start();
        let close = if body.starts_with("<?") {
            "?>"
        } else if body.starts_with("<!--") {
            "-->"
        } else {
            return body;
        };
        match body.find(close) {
            Some(end) => body = &body[end + close.len()..],
            None => return body,
        }
    }
}

/// Validate and parse a body into its root element.
///
/// A `<string>` wrapper is unwrapped and its payload goes through the same
/// checks as a bare body.
pub(crate) fn parse_body(raw: &str) -> Result<XmlNode, NormalizeError> {
    let root = xml::parse_element(check_body(raw)?)?;
    let root = match root.wrapped_payload() {
        Some(payload) => xml::parse_element(check_body(payload)?)?,
        None => root,
    };

    if root.is("html") {
        return Err(NormalizeError::malformed("HTML page instead of XML", raw));
    }
    Ok(root)
}
