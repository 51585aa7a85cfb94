//! Council reference records and match results.

use serde::{Deserialize, Serialize};

/// Minimum score for an exact-confidence match.
pub const MIN_SCORE_EXACT: f64 = 0.95;
/// Minimum score for a high-confidence match.
pub const MIN_SCORE_HIGH: f64 = 0.8;
/// Minimum score for a medium-confidence match.
pub const MIN_SCORE_MEDIUM: f64 = 0.6;
/// Floor used by the "low" preset when filtering matches.
pub const MIN_SCORE_LOW: f64 = 0.3;

/// A council running a ModernGov installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CouncilRecord {
    /// Display name, e.g. "Leeds City Council".
    pub name: String,
    /// Site URL of the council's ModernGov install.
    pub url: String,
    /// Region, e.g. "Yorkshire and Humber".
    pub region: String,
    /// Council type, e.g. "Metropolitan", "London Borough".
    #[serde(rename = "type")]
    pub council_type: String,
}

/// Confidence tier derived from a similarity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    Low,
    Medium,
    High,
    Exact,
}

impl MatchConfidence {
    /// Tier for a score. Thresholds are inclusive lower bounds.
    pub fn from_score(score: f64) -> Self {
        if score >= MIN_SCORE_EXACT {
            Self::Exact
        } else if score >= MIN_SCORE_HIGH {
            Self::High
        } else if score >= MIN_SCORE_MEDIUM {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Minimum score preset for filtering at this confidence.
    pub fn min_score(self) -> f64 {
        match self {
            Self::Exact => MIN_SCORE_EXACT,
            Self::High => MIN_SCORE_HIGH,
            Self::Medium => MIN_SCORE_MEDIUM,
            Self::Low => MIN_SCORE_LOW,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for MatchConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown confidence level: {}", other)),
        }
    }
}

/// A scored council for a free-text query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub council: CouncilRecord,
    pub score: f64,
    pub confidence: MatchConfidence,
}

impl MatchResult {
    pub fn new(council: CouncilRecord, score: f64) -> Self {
        Self {
            council,
            score,
            confidence: MatchConfidence::from_score(score),
        }
    }
}
