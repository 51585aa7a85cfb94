//! ModernGov operation API handlers.
//!
//! One route per client operation. The target site is given either as
//! `site_url` or as a `council` name resolved through the council matcher.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use moderngov_core::{
    client::OriginStatus, CalendarEvent, Committee, Councillor, DateBounds, ElectionResult,
    MatchConfidence, Meeting, Operation, ParishCouncil, RepresentativeInfo, Ward, WebcastMeeting,
};

use super::error::ApiError;
use crate::state::AppState;

/// Rendered in place of councillor fields the site left empty.
pub const UNKNOWN: &str = "Unknown";

/// Lowest confidence at which a council name selects a site.
const COUNCIL_NAME_CONFIDENCE: MatchConfidence = MatchConfidence::Medium;

// ============================================================================
// Request/Response types
// ============================================================================

/// Query parameters shared by every operation route.
#[derive(Debug, Default, Deserialize)]
pub struct OperationParams {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub council: Option<String>,
    pub ward_id: Option<u32>,
    pub postcode: Option<String>,
    pub committee_id: Option<u32>,
    pub meeting_id: Option<u32>,
    pub election_id: Option<u32>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub mps: Option<bool>,
}

impl OperationParams {
    fn bounds(&self) -> DateBounds {
        DateBounds::new(self.from_date.as_deref(), self.to_date.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct OperationResponse<T> {
    pub operation: &'static str,
    pub site_url: String,
    pub count: usize,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct MeetingResponse {
    pub operation: &'static str,
    pub site_url: String,
    pub meeting: Meeting,
}

#[derive(Debug, Serialize)]
pub struct RateLimitsResponse {
    pub min_interval_ms: u64,
    pub origins: Vec<OriginStatus>,
}

/// Councillor with empty optional fields spelled out.
#[derive(Debug, Serialize)]
pub struct CouncillorView {
    pub id: u32,
    pub display_name: String,
    pub party: String,
    pub group: String,
    pub district: String,
    pub representing: String,
    pub small_photo_url: String,
    pub large_photo_url: String,
    pub additional_info: String,
    pub key_posts: String,
}

fn or_unknown(value: String) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

impl From<Councillor> for CouncillorView {
    fn from(c: Councillor) -> Self {
        Self {
            id: c.id,
            display_name: c.display_name,
            party: or_unknown(c.party),
            group: or_unknown(c.group),
            district: or_unknown(c.district),
            representing: or_unknown(c.representing),
            small_photo_url: or_unknown(c.small_photo_url),
            large_photo_url: or_unknown(c.large_photo_url),
            additional_info: or_unknown(c.additional_info),
            key_posts: or_unknown(c.key_posts),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WardView {
    pub title: String,
    pub councillor_count: u32,
    pub councillors: Vec<CouncillorView>,
}

impl From<Ward> for WardView {
    fn from(ward: Ward) -> Self {
        Self {
            title: ward.title,
            councillor_count: ward.councillor_count,
            councillors: ward.councillors.into_iter().map(Into::into).collect(),
        }
    }
}

type OperationResult<T> = Result<Json<OperationResponse<T>>, ApiError>;

fn respond<T, R: Into<T>>(operation: Operation, site_url: String, records: Vec<R>) -> Json<OperationResponse<T>> {
    let results: Vec<T> = records.into_iter().map(Into::into).collect();
    Json(OperationResponse {
        operation: operation.as_str(),
        site_url,
        count: results.len(),
        results,
    })
}

/// Pick the target site: an explicit URL wins over a council name.
fn target_site(state: &AppState, params: &OperationParams) -> Result<String, ApiError> {
    if let Some(url) = params.site_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(url.to_string());
    }

    let Some(name) = params.council.as_deref().filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::bad_request("site_url or council is required"));
    };

    match state.matcher().find_best_match(name) {
        Some(m) if m.confidence >= COUNCIL_NAME_CONFIDENCE => Ok(m.council.url),
        Some(m) => Err(ApiError::not_found(format!(
            "no confident match for council '{}' (closest: {}, score {:.2})",
            name, m.council.name, m.score
        ))),
        None => Err(ApiError::not_found(format!("no council matches '{}'", name))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/moderngov/councillors-by-ward
pub async fn councillors_by_ward(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<WardView> {
    let site = target_site(&state, &params)?;
    let wards = state.client().councillors_by_ward(&site).await?;
    Ok(respond(Operation::CouncillorsByWard, site, wards))
}

/// GET /api/v1/moderngov/councillors-by-ward-id?ward_id=
pub async fn councillors_by_ward_id(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<WardView> {
    let site = target_site(&state, &params)?;
    let wards = state
        .client()
        .councillors_by_ward_id(&site, params.ward_id)
        .await?;
    Ok(respond(Operation::CouncillorsByWardId, site, wards))
}

/// GET /api/v1/moderngov/councillors-by-postcode?postcode=
pub async fn councillors_by_postcode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<WardView> {
    let site = target_site(&state, &params)?;
    let wards = state
        .client()
        .councillors_by_postcode(&site, params.postcode.as_deref())
        .await?;
    Ok(respond(Operation::CouncillorsByPostcode, site, wards))
}

/// GET /api/v1/moderngov/committees
pub async fn committees(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<Committee> {
    let site = target_site(&state, &params)?;
    let committees = state.client().committees(&site).await?;
    Ok(respond(Operation::Committees, site, committees))
}

/// GET /api/v1/moderngov/meetings?committee_id=&from_date=&to_date=
pub async fn meetings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<Meeting> {
    let site = target_site(&state, &params)?;
    let meetings = state
        .client()
        .meetings(&site, params.committee_id, &params.bounds())
        .await?;
    Ok(respond(Operation::Meetings, site, meetings))
}

/// GET /api/v1/moderngov/meeting?meeting_id=
pub async fn meeting(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> Result<Json<MeetingResponse>, ApiError> {
    let site = target_site(&state, &params)?;
    let meeting = state
        .client()
        .meeting(&site, params.meeting_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "meeting {} not found on {}",
                params.meeting_id.unwrap_or_default(),
                site
            ))
        })?;

    Ok(Json(MeetingResponse {
        operation: Operation::Meeting.as_str(),
        site_url: site,
        meeting,
    }))
}

/// GET /api/v1/moderngov/meetings-by-date?committee_id=&from_date=&to_date=
pub async fn meetings_by_date(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<Meeting> {
    let site = target_site(&state, &params)?;
    let meetings = state
        .client()
        .meetings_by_date(&site, params.committee_id, &params.bounds())
        .await?;
    Ok(respond(Operation::MeetingsByDate, site, meetings))
}

/// GET /api/v1/moderngov/calendar-events?from_date=&to_date=
pub async fn calendar_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<CalendarEvent> {
    let site = target_site(&state, &params)?;
    let events = state
        .client()
        .calendar_events(&site, &params.bounds())
        .await?;
    Ok(respond(Operation::CalendarEvents, site, events))
}

/// GET /api/v1/moderngov/parish-councils
pub async fn parish_councils(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<ParishCouncil> {
    let site = target_site(&state, &params)?;
    let parishes = state.client().parish_councils(&site).await?;
    Ok(respond(Operation::ParishCouncils, site, parishes))
}

/// GET /api/v1/moderngov/election-results?election_id=
pub async fn election_results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<ElectionResult> {
    let site = target_site(&state, &params)?;
    let results = state
        .client()
        .election_results(&site, params.election_id)
        .await?;
    Ok(respond(Operation::ElectionResults, site, results))
}

/// GET /api/v1/moderngov/webcast-meetings?from_date=&to_date=
pub async fn webcast_meetings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<WebcastMeeting> {
    let site = target_site(&state, &params)?;
    let webcasts = state
        .client()
        .webcast_meetings(&site, &params.bounds())
        .await?;
    Ok(respond(Operation::WebcastMeetings, site, webcasts))
}

/// GET /api/v1/moderngov/representatives-and-wards?mps=
pub async fn representatives_and_wards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<RepresentativeInfo> {
    let site = target_site(&state, &params)?;
    let reps = state
        .client()
        .representatives_and_wards(&site, params.mps)
        .await?;
    Ok(respond(Operation::RepresentativesAndWards, site, reps))
}

/// GET /api/v1/moderngov/representatives-by-postcode?postcode=&mps=
pub async fn representatives_by_postcode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OperationParams>,
) -> OperationResult<RepresentativeInfo> {
    let site = target_site(&state, &params)?;
    let reps = state
        .client()
        .representatives_by_postcode(&site, params.postcode.as_deref(), params.mps)
        .await?;
    Ok(respond(Operation::RepresentativesByPostcode, site, reps))
}

/// GET /api/v1/moderngov/rate-limits
pub async fn rate_limits(State(state): State<Arc<AppState>>) -> Json<RateLimitsResponse> {
    let limiter = state.client().rate_limiter();
    Json(RateLimitsResponse {
        min_interval_ms: limiter.min_interval().as_millis() as u64,
        origins: limiter.all_status().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_councillor_fields_become_unknown() {
        let view = CouncillorView::from(Councillor {
            id: 4,
            display_name: "Cllr A".to_string(),
            party: "Labour".to_string(),
            group: "  ".to_string(),
            ..Councillor::default()
        });
        assert_eq!(view.display_name, "Cllr A");
        assert_eq!(view.party, "Labour");
        assert_eq!(view.group, UNKNOWN);
        assert_eq!(view.district, UNKNOWN);
        assert_eq!(view.key_posts, UNKNOWN);
    }

    #[test]
    fn test_ward_view_keeps_count() {
        let ward = Ward::new("Armley".to_string(), vec![Councillor::default()]);
        let view = WardView::from(ward);
        assert_eq!(view.councillor_count, 1);
        assert_eq!(view.councillors[0].party, UNKNOWN);
    }
}
