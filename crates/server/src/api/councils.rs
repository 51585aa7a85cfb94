//! Council lookup API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use moderngov_core::{
    council::MIN_SCORE_LOW, CouncilRecord, MatchConfidence, MatchResult,
};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    /// `exact`, `high`, `medium`, `low`, or a score in [0, 1].
    #[serde(default)]
    pub min_confidence: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionParams {
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Deserialize)]
pub struct TypeParams {
    #[serde(default, rename = "type")]
    pub council_type: String,
}

#[derive(Debug, Serialize)]
pub struct CouncilsResponse {
    pub count: usize,
    pub councils: Vec<CouncilRecord>,
}

impl From<Vec<CouncilRecord>> for CouncilsResponse {
    fn from(councils: Vec<CouncilRecord>) -> Self {
        Self {
            count: councils.len(),
            councils,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub query: String,
    pub min_score: f64,
    pub count: usize,
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Serialize)]
pub struct BestMatchResponse {
    pub query: String,
    #[serde(rename = "match")]
    pub best: Option<MatchResult>,
}

#[derive(Debug, Serialize)]
pub struct ValuesResponse {
    pub values: Vec<String>,
}

/// Parse a confidence floor given by name or as a number.
pub fn parse_min_score(value: Option<&str>) -> Result<f64, ApiError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(MIN_SCORE_LOW);
    };
    if let Ok(confidence) = value.parse::<MatchConfidence>() {
        return Ok(confidence.min_score());
    }
    match value.parse::<f64>() {
        Ok(score) if (0.0..=1.0).contains(&score) => Ok(score),
        _ => Err(ApiError::bad_request(format!(
            "min_confidence must be exact, high, medium, low or a number in [0, 1], got '{}'",
            value
        ))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/councils
pub async fn list_councils(State(state): State<Arc<AppState>>) -> Json<CouncilsResponse> {
    Json(state.matcher().all().to_vec().into())
}

/// GET /api/v1/councils/search?query=&min_confidence=
pub async fn search_councils(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let min_score = parse_min_score(params.min_confidence.as_deref())?;
    let matches = state.matcher().find_matches(&params.query, min_score);

    Ok(Json(MatchesResponse {
        query: params.query,
        min_score,
        count: matches.len(),
        matches,
    }))
}

/// GET /api/v1/councils/best?query=
pub async fn best_match(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<BestMatchResponse> {
    let best = state.matcher().find_best_match(&params.query);
    Json(BestMatchResponse {
        query: params.query,
        best,
    })
}

/// GET /api/v1/councils/region?region=
pub async fn by_region(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegionParams>,
) -> Json<CouncilsResponse> {
    Json(state.matcher().find_by_region(&params.region).into())
}

/// GET /api/v1/councils/type?type=
pub async fn by_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TypeParams>,
) -> Json<CouncilsResponse> {
    Json(state.matcher().find_by_type(&params.council_type).into())
}

/// GET /api/v1/councils/regions
pub async fn list_regions(State(state): State<Arc<AppState>>) -> Json<ValuesResponse> {
    Json(ValuesResponse {
        values: state.matcher().regions(),
    })
}

/// GET /api/v1/councils/types
pub async fn list_types(State(state): State<Arc<AppState>>) -> Json<ValuesResponse> {
    Json(ValuesResponse {
        values: state.matcher().types(),
    })
}
