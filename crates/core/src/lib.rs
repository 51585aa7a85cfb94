pub mod client;
pub mod config;
pub mod council;
pub mod metrics;
pub mod normalize;
pub mod testing;

pub use client::{
    ClientError, DateBounds, DateRange, EndpointResolver, HttpTransport, ModernGovClient,
    Operation, OriginRateLimiter, ResolverConfig, Transport, TransportError, TransportRequest,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, ClientConfig,
    Config, ConfigError, SanitizedConfig, ServerConfig,
};
pub use council::{
    CouncilMatcher, CouncilRecord, MatchConfidence, MatchResult, ReferenceDataError,
};
pub use normalize::{
    CalendarEvent, Committee, Councillor, ElectionResult, Meeting, NormalizeError, ParishCouncil,
    RepresentativeInfo, Ward, WebcastMeeting,
};
