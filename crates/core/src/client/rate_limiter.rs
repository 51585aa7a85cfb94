//! Per-origin minimum-interval rate limiter.
//!
//! ModernGov installs are small council servers; hammering one with
//! back-to-back requests gets the caller blocked. Each origin gets its own
//! gate so a slow council never delays requests to another.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::metrics::RATE_LIMIT_WAIT;

/// Default minimum interval between requests to the same origin.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Last granted request time for one origin.
type OriginGate = Arc<Mutex<Option<Instant>>>;

/// Rate limit status for an origin.
#[derive(Debug, Clone, Serialize)]
pub struct OriginStatus {
    pub origin: String,
    /// Time until the next request would be admitted without waiting.
    pub next_available_in_ms: Option<u64>,
}

/// Admission gate enforcing a minimum interval per origin.
///
/// The map lock is only held long enough to look up or insert a gate. The
/// gate's own mutex is held across the wait, so concurrent callers for the
/// same origin queue up and each one reads the timestamp left by the caller
/// before it.
pub struct OriginRateLimiter {
    min_interval: Duration,
    gates: RwLock<HashMap<String, OriginGate>>,
}

impl OriginRateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            gates: RwLock::new(HashMap::new()),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request to `origin` may be sent, then record it.
    pub async fn await_turn(&self, origin: &str) {
        let gate = self.gate(origin).await;
        let mut last = gate.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(origin = origin, wait_ms = wait_time.as_millis() as u64, "Rate limit: waiting");
                RATE_LIMIT_WAIT
                    .with_label_values(&[])
                    .observe(wait_time.as_secs_f64());
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Status for every origin seen so far.
    pub async fn all_status(&self) -> Vec<OriginStatus> {
        let gates: Vec<(String, OriginGate)> = {
            let map = self.gates.read().await;
            map.iter()
                .map(|(origin, gate)| (origin.clone(), Arc::clone(gate)))
                .collect()
        };

        let mut statuses = Vec::with_capacity(gates.len());
        for (origin, gate) in gates {
            // A held gate means a caller is sleeping out the interval.
            let next_available_in_ms = match gate.try_lock() {
                Ok(last) => last.and_then(|t| {
                    let elapsed = t.elapsed();
                    (elapsed < self.min_interval)
                        .then(|| (self.min_interval - elapsed).as_millis() as u64)
                }),
                Err(_) => Some(self.min_interval.as_millis() as u64),
            };
            statuses.push(OriginStatus {
                origin,
                next_available_in_ms,
            });
        }
        statuses.sort_by(|a, b| a.origin.cmp(&b.origin));
        statuses
    }

    /// Number of distinct origins tracked.
    pub async fn origin_count(&self) -> usize {
        self.gates.read().await.len()
    }

    async fn gate(&self, origin: &str) -> OriginGate {
        if let Some(gate) = self.gates.read().await.get(origin) {
            return Arc::clone(gate);
        }

        let mut gates = self.gates.write().await;
        Arc::clone(
            gates
                .entry(origin.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }
}

impl Default for OriginRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
