use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::client::policy::FALLBACK_COMMITTEE_ID;
use crate::client::ResolverConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Upstream client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum interval between requests to the same origin.
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
    /// Committee sent by meetings-by-date when the caller gives none.
    #[serde(default = "default_fallback_committee_id")]
    pub fallback_committee_id: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            rate_limit_ms: default_rate_limit_ms(),
            fallback_committee_id: default_fallback_committee_id(),
        }
    }
}

fn default_timeout_secs() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("moderngov/{}", env!("CARGO_PKG_VERSION"))
}

fn default_rate_limit_ms() -> u64 {
    1000
}

fn default_fallback_committee_id() -> u32 {
    FALLBACK_COMMITTEE_ID
}

/// Config summary for API responses (override targets reduced to hosts)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub resolver: SanitizedResolverConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedResolverConfig {
    pub service_script: String,
    pub known_subpaths: Vec<String>,
    /// Hosts with an explicit service base, sorted.
    pub overridden_hosts: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let mut overridden_hosts: Vec<String> =
            config.resolver.overrides.keys().cloned().collect();
        overridden_hosts.sort();

        Self {
            server: config.server.clone(),
            client: config.client.clone(),
            resolver: SanitizedResolverConfig {
                service_script: config.resolver.service_script.clone(),
                known_subpaths: config.resolver.known_subpaths.clone(),
                overridden_hosts,
            },
        }
    }
}
