//! ModernGov API client.
//!
//! One method per upstream operation. Each call validates its input, waits
//! for the site's origin to become available, resolves the service
//! endpoint, fills in the parameters live servers require, and normalizes
//! the response into canonical records.

pub mod endpoint;
pub mod policy;
pub mod rate_limiter;
pub mod transport;

pub use endpoint::{
    origin_of, parse_site_url, EndpointResolver, Resolution, ResolveError, ResolvedEndpoint,
    ResolverConfig,
};
pub use policy::{DateBounds, DateRange};
pub use rate_limiter::{OriginRateLimiter, OriginStatus};
pub use transport::{HttpTransport, Transport, TransportError, TransportRequest};

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::metrics::{UPSTREAM_DURATION, UPSTREAM_REQUESTS};
use crate::normalize::{
    self, CalendarEvent, Committee, ElectionResult, Meeting, NormalizeError, ParishCouncil,
    RepresentativeInfo, Ward, WebcastMeeting,
};
use policy::InvalidDate;

/// Upstream operations, named as the service's WSDL names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CouncillorsByWard,
    CouncillorsByWardId,
    CouncillorsByPostcode,
    Committees,
    Meetings,
    Meeting,
    MeetingsByDate,
    CalendarEvents,
    ParishCouncils,
    ElectionResults,
    WebcastMeetings,
    RepresentativesAndWards,
    RepresentativesByPostcode,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::CouncillorsByWard,
        Operation::CouncillorsByWardId,
        Operation::CouncillorsByPostcode,
        Operation::Committees,
        Operation::Meetings,
        Operation::Meeting,
        Operation::MeetingsByDate,
        Operation::CalendarEvents,
        Operation::ParishCouncils,
        Operation::ElectionResults,
        Operation::WebcastMeetings,
        Operation::RepresentativesAndWards,
        Operation::RepresentativesByPostcode,
    ];

    /// Path segment appended to the service base.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CouncillorsByWard => "GetCouncillorsByWard",
            Operation::CouncillorsByWardId => "GetCouncillorsByWardId",
            Operation::CouncillorsByPostcode => "GetCouncillorsByPostcode",
            Operation::Committees => "GetCommittees",
            Operation::Meetings => "GetMeetings",
            Operation::Meeting => "GetMeeting",
            Operation::MeetingsByDate => "GetMeetingsByDate",
            Operation::CalendarEvents => "GetCalendarEvents",
            Operation::ParishCouncils => "GetParishCouncils",
            Operation::ElectionResults => "GetElectionResults",
            Operation::WebcastMeetings => "GetWebcastMeetings",
            Operation::RepresentativesAndWards => "GetRepresentativesAndWards",
            Operation::RepresentativesByPostcode => "GetRepresentativesByPostcode",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a client operation.
///
/// Every variant names the operation; all but the parameter errors name the
/// site as well. Nothing is retried here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("{operation}: invalid site URL '{site_url}': {reason}")]
    InvalidUrl {
        operation: Operation,
        site_url: String,
        reason: String,
    },

    #[error("{operation}: missing required parameter '{parameter}'")]
    MissingParameter {
        operation: Operation,
        site_url: String,
        parameter: &'static str,
    },

    #[error("{operation}: invalid value '{value}' for '{parameter}' (expected YYYY-MM-DD)")]
    InvalidParameter {
        operation: Operation,
        site_url: String,
        parameter: &'static str,
        value: String,
    },

    #[error("{operation} on {site_url} failed: {source}")]
    Transport {
        operation: Operation,
        site_url: String,
        #[source]
        source: TransportError,
    },

    #[error("{operation} on {site_url} returned an unusable response: {source}")]
    Normalization {
        operation: Operation,
        site_url: String,
        #[source]
        source: NormalizeError,
    },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::InvalidUrl { operation, .. }
            | Self::MissingParameter { operation, .. }
            | Self::InvalidParameter { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Normalization { operation, .. } => *operation,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }
}

/// Validated call context: the site as given plus its rate-limit key.
struct Site<'a> {
    operation: Operation,
    url: &'a str,
    origin: String,
}

impl Site<'_> {
    fn missing(&self, parameter: &'static str) -> ClientError {
        ClientError::MissingParameter {
            operation: self.operation,
            site_url: self.url.to_string(),
            parameter,
        }
    }

    fn required<T: Copy>(&self, value: Option<T>, parameter: &'static str) -> Result<T, ClientError> {
        value.ok_or_else(|| self.missing(parameter))
    }

    fn postcode(&self, postcode: Option<&str>) -> Result<String, ClientError> {
        postcode
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .ok_or_else(|| self.missing("sPostcode"))
    }

    fn dates(&self, bounds: &DateBounds, today: NaiveDate) -> Result<DateRange, ClientError> {
        DateRange::resolve(bounds, today).map_err(|InvalidDate { parameter, value }| {
            ClientError::InvalidParameter {
                operation: self.operation,
                site_url: self.url.to_string(),
                parameter,
                value,
            }
        })
    }
}

/// Client for ModernGov sites.
///
/// Cheap to share behind an `Arc`; the rate limiter is the only mutable
/// state and is shared by every call made through this client.
pub struct ModernGovClient {
    transport: Arc<dyn Transport>,
    resolver: EndpointResolver,
    rate_limiter: Arc<OriginRateLimiter>,
    fallback_committee_id: u32,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl ModernGovClient {
    /// Client backed by [`HttpTransport`].
    pub fn new(config: &ClientConfig, resolver: ResolverConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(
            Duration::from_secs(u64::from(config.timeout_secs)),
            &config.user_agent,
        )?;
        Ok(Self::with_transport(Arc::new(transport), config, resolver))
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: &ClientConfig,
        resolver: ResolverConfig,
    ) -> Self {
        Self {
            transport,
            resolver: EndpointResolver::new(resolver),
            rate_limiter: Arc::new(OriginRateLimiter::new(Duration::from_millis(
                config.rate_limit_ms,
            ))),
            fallback_committee_id: config.fallback_committee_id,
            today: local_today,
        }
    }

    /// Replace the clock used for default date ranges.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn rate_limiter(&self) -> &OriginRateLimiter {
        &self.rate_limiter
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    pub fn fallback_committee_id(&self) -> u32 {
        self.fallback_committee_id
    }

    // =========================================================================
    // Councillors
    // =========================================================================

    /// All councillors, grouped by ward.
    pub async fn councillors_by_ward(&self, site_url: &str) -> Result<Vec<Ward>, ClientError> {
        let site = self.site(Operation::CouncillorsByWard, site_url)?;
        self.execute(&site, Vec::new(), normalize::parse_wards).await
    }

    pub async fn councillors_by_ward_id(
        &self,
        site_url: &str,
        ward_id: Option<u32>,
    ) -> Result<Vec<Ward>, ClientError> {
        let site = self.site(Operation::CouncillorsByWardId, site_url)?;
        let ward_id = site.required(ward_id, "lWardId")?;
        let params = vec![("lWardId", ward_id.to_string())];
        self.execute(&site, params, normalize::parse_wards).await
    }

    pub async fn councillors_by_postcode(
        &self,
        site_url: &str,
        postcode: Option<&str>,
    ) -> Result<Vec<Ward>, ClientError> {
        let site = self.site(Operation::CouncillorsByPostcode, site_url)?;
        let params = vec![("sPostcode", site.postcode(postcode)?)];
        self.execute(&site, params, normalize::parse_wards).await
    }

    // =========================================================================
    // Committees and meetings
    // =========================================================================

    pub async fn committees(&self, site_url: &str) -> Result<Vec<Committee>, ClientError> {
        let site = self.site(Operation::Committees, site_url)?;
        self.execute(&site, Vec::new(), normalize::parse_committees)
            .await
    }

    /// Meetings of one committee within a date range.
    pub async fn meetings(
        &self,
        site_url: &str,
        committee_id: Option<u32>,
        bounds: &DateBounds,
    ) -> Result<Vec<Meeting>, ClientError> {
        let site = self.site(Operation::Meetings, site_url)?;
        let committee_id = site.required(committee_id, "lCommitteeId")?;
        let range = site.dates(bounds, (self.today)())?;
        let params = vec![
            ("lCommitteeId", committee_id.to_string()),
            ("sFromDate", range.from_param()),
            ("sToDate", range.to_param()),
        ];
        self.execute(&site, params, normalize::parse_meetings).await
    }

    /// A single meeting, `None` when the site returns no meeting record.
    pub async fn meeting(
        &self,
        site_url: &str,
        meeting_id: Option<u32>,
    ) -> Result<Option<Meeting>, ClientError> {
        let site = self.site(Operation::Meeting, site_url)?;
        let meeting_id = site.required(meeting_id, "lMeetingId")?;
        let params = vec![("lMeetingId", meeting_id.to_string())];
        self.execute(&site, params, normalize::parse_meeting).await
    }

    /// Meetings within a date range, oldest first.
    ///
    /// Without a committee the configured fallback committee is sent.
    pub async fn meetings_by_date(
        &self,
        site_url: &str,
        committee_id: Option<u32>,
        bounds: &DateBounds,
    ) -> Result<Vec<Meeting>, ClientError> {
        let site = self.site(Operation::MeetingsByDate, site_url)?;
        let range = site.dates(bounds, (self.today)())?;
        let committee_id = committee_id.unwrap_or_else(|| {
            debug!(
                operation = %site.operation,
                committee_id = self.fallback_committee_id,
                "No committee given, using fallback committee"
            );
            self.fallback_committee_id
        });
        let params = vec![
            ("lCommitteeId", committee_id.to_string()),
            ("sFromDate", range.from_param()),
            ("sToDate", range.to_param()),
            ("bIsAscendingDateOrder", policy::flag(policy::ASCENDING_DATE_ORDER)),
        ];
        self.execute(&site, params, normalize::parse_meetings).await
    }

    pub async fn calendar_events(
        &self,
        site_url: &str,
        bounds: &DateBounds,
    ) -> Result<Vec<CalendarEvent>, ClientError> {
        let site = self.site(Operation::CalendarEvents, site_url)?;
        let range = site.dates(bounds, (self.today)())?;
        let params = vec![
            ("sFromDate", range.from_param()),
            ("sToDate", range.to_param()),
            ("bGlobalCalendar", policy::flag(policy::GLOBAL_CALENDAR)),
            ("lUserId", policy::ANONYMOUS_USER_ID.to_string()),
        ];
        self.execute(&site, params, normalize::parse_calendar_events)
            .await
    }

    // =========================================================================
    // Other data
    // =========================================================================

    pub async fn parish_councils(&self, site_url: &str) -> Result<Vec<ParishCouncil>, ClientError> {
        let site = self.site(Operation::ParishCouncils, site_url)?;
        self.execute(&site, Vec::new(), normalize::parse_parish_councils)
            .await
    }

    /// Results for one election, one record per candidate.
    pub async fn election_results(
        &self,
        site_url: &str,
        election_id: Option<u32>,
    ) -> Result<Vec<ElectionResult>, ClientError> {
        let site = self.site(Operation::ElectionResults, site_url)?;
        let election_id = site.required(election_id, "lElectionId")?;
        let params = vec![("lElectionId", election_id.to_string())];
        self.execute(&site, params, normalize::parse_election_results)
            .await
    }

    pub async fn webcast_meetings(
        &self,
        site_url: &str,
        bounds: &DateBounds,
    ) -> Result<Vec<WebcastMeeting>, ClientError> {
        let site = self.site(Operation::WebcastMeetings, site_url)?;
        let range = site.dates(bounds, (self.today)())?;
        let params = vec![
            ("sFromDate", range.from_param()),
            ("sToDate", range.to_param()),
        ];
        self.execute(&site, params, normalize::parse_webcast_meetings)
            .await
    }

    /// Councillors (or MPs) with their wards (or constituencies).
    pub async fn representatives_and_wards(
        &self,
        site_url: &str,
        mps: Option<bool>,
    ) -> Result<Vec<RepresentativeInfo>, ClientError> {
        let site = self.site(Operation::RepresentativesAndWards, site_url)?;
        let params = vec![("bIsMPs", policy::flag(mps.unwrap_or(policy::DEFAULT_IS_MPS)))];
        self.execute(&site, params, normalize::parse_representatives)
            .await
    }

    pub async fn representatives_by_postcode(
        &self,
        site_url: &str,
        postcode: Option<&str>,
        mps: Option<bool>,
    ) -> Result<Vec<RepresentativeInfo>, ClientError> {
        let site = self.site(Operation::RepresentativesByPostcode, site_url)?;
        let params = vec![
            ("sPostcode", site.postcode(postcode)?),
            ("bIsMPs", policy::flag(mps.unwrap_or(policy::DEFAULT_IS_MPS))),
        ];
        self.execute(&site, params, normalize::parse_representatives)
            .await
    }

    // =========================================================================
    // Request flow
    // =========================================================================

    fn site<'a>(&self, operation: Operation, site_url: &'a str) -> Result<Site<'a>, ClientError> {
        let origin = origin_of(site_url).map_err(|e| invalid_url(operation, site_url, e))?;
        Ok(Site {
            operation,
            url: site_url,
            origin,
        })
    }

    async fn execute<T>(
        &self,
        site: &Site<'_>,
        params: Vec<(&'static str, String)>,
        parse: fn(&str) -> Result<T, NormalizeError>,
    ) -> Result<T, ClientError> {
        let operation = site.operation;
        let op_name = operation.as_str();

        self.rate_limiter.await_turn(&site.origin).await;

        let endpoint = self
            .resolver
            .resolve(site.url, op_name)
            .map_err(|e| invalid_url(operation, site.url, e))?;

        let request = params
            .into_iter()
            .fold(TransportRequest::new(endpoint.url), |req, (name, value)| {
                req.param(name, value)
            });

        let timer = UPSTREAM_DURATION
            .with_label_values(&[op_name])
            .start_timer();

        debug!(
            operation = op_name,
            origin = %site.origin,
            url = %request.display_url(),
            "Sending request"
        );

        let body = match self.transport.get(&request).await {
            Ok(body) => body,
            Err(e) => {
                timer.observe_duration();
                UPSTREAM_REQUESTS
                    .with_label_values(&[op_name, "transport_error"])
                    .inc();
                warn!(operation = op_name, url = %request.display_url(), error = %e, "Transport failed");
                return Err(ClientError::Transport {
                    operation,
                    site_url: site.url.to_string(),
                    source: e,
                });
            }
        };

        let result = parse(&body);
        timer.observe_duration();

        match result {
            Ok(records) => {
                UPSTREAM_REQUESTS
                    .with_label_values(&[op_name, "success"])
                    .inc();
                Ok(records)
            }
            Err(e) => {
                UPSTREAM_REQUESTS
                    .with_label_values(&[op_name, "normalization_error"])
                    .inc();
                warn!(
                    operation = op_name,
                    url = %request.display_url(),
                    error = %e,
                    "Could not normalize response"
                );
                Err(ClientError::Normalization {
                    operation,
                    site_url: site.url.to_string(),
                    source: e,
                })
            }
        }
    }
}

fn invalid_url(operation: Operation, site_url: &str, e: ResolveError) -> ClientError {
    let ResolveError::InvalidUrl { reason, .. } = e;
    ClientError::InvalidUrl {
        operation,
        site_url: site_url.to_string(),
        reason,
    }
}
