//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upstream ModernGov requests (counts, latency)
//! - Rate limiter waits
//! - Endpoint resolution fallbacks
//! - Council name matching

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Upstream Requests
// =============================================================================

/// Upstream requests total by operation and result.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moderngov_upstream_requests_total",
            "Total requests sent to ModernGov services",
        ),
        &["operation", "result"], // "success", "transport_error", "normalization_error"
    )
    .unwrap()
});

/// Upstream request duration in seconds (transport and parsing).
pub static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moderngov_upstream_request_duration_seconds",
            "Duration of ModernGov requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Rate Limiting and Resolution
// =============================================================================

/// Time spent waiting for an origin's rate limit.
pub static RATE_LIMIT_WAIT: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moderngov_rate_limit_wait_seconds",
            "Time requests spent waiting on the per-origin rate limit",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0]),
        &[],
    )
    .unwrap()
});

/// Endpoint resolutions that discarded the site path.
pub static ENDPOINT_FALLBACKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "moderngov_endpoint_fallbacks_total",
        "Endpoint resolutions that fell back to the host root",
    )
    .unwrap()
});

// =============================================================================
// Council Matching
// =============================================================================

/// Best match scores.
pub static COUNCIL_MATCH_SCORE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moderngov_council_match_score",
            "Distribution of best council match scores",
        )
        .buckets(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 1.0]),
        &[],
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(UPSTREAM_REQUESTS.clone()),
        Box::new(UPSTREAM_DURATION.clone()),
        Box::new(RATE_LIMIT_WAIT.clone()),
        Box::new(ENDPOINT_FALLBACKS.clone()),
        Box::new(COUNCIL_MATCH_SCORE.clone()),
    ]
}
