//! Service endpoint resolution.
//!
//! Councils publish their ModernGov site in many forms: the bare host, the
//! WSDL link, a sub-path install, or a deep link into some page. Resolution
//! is best-effort, so every rule lives in [`ResolverConfig`] and per-host
//! overrides bypass the heuristic entirely.

use std::collections::HashMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::ENDPOINT_FALLBACKS;

/// Errors resolving a site URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid site URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Rules for turning a site URL into a service base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Service script name on the council host.
    #[serde(default = "default_service_script")]
    pub service_script: String,
    /// Path segments that host a ModernGov install below the site root.
    #[serde(default = "default_known_subpaths")]
    pub known_subpaths: Vec<String>,
    /// Host -> explicit service base URL.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_service_script() -> String {
    "mgWebService.asmx".to_string()
}

fn default_known_subpaths() -> Vec<String> {
    ["moderngov", "modgov", "mgov", "democracy", "committees", "councillors"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            service_script: default_service_script(),
            known_subpaths: default_known_subpaths(),
            overrides: HashMap::new(),
        }
    }
}

/// Which resolution rule produced a service base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Configured override for the host.
    Override,
    /// Path already named the service script.
    ExplicitScript,
    /// Path ended in a known install segment.
    KnownSubpath,
    /// Rebuilt from scheme and host alone.
    OriginFallback,
}

/// A resolved operation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub url: Url,
    pub resolution: Resolution,
}

/// Derives `{service base}/{operation}` from loosely specified site URLs.
#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
    config: ResolverConfig,
}

impl EndpointResolver {
    /// Override keys are matched against the lowercased site host.
    pub fn new(mut config: ResolverConfig) -> Self {
        config.overrides = config
            .overrides
            .into_iter()
            .map(|(host, base)| (host.trim().to_lowercase(), base))
            .collect();
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the endpoint URL for `operation` on the site at `site_url`.
    pub fn resolve(&self, site_url: &str, operation: &str) -> Result<ResolvedEndpoint, ResolveError> {
        let site = parse_site_url(site_url)?;
        let (base, resolution) = self.service_base(&site)?;

        let url = Url::parse(&format!("{}/{}", base, operation)).map_err(|e| {
            ResolveError::InvalidUrl {
                url: site_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(site = site_url, url = %url, resolution = ?resolution, "Resolved endpoint");
        Ok(ResolvedEndpoint { url, resolution })
    }

    fn service_base(&self, site: &Url) -> Result<(String, Resolution), ResolveError> {
        let host = site.host_str().unwrap_or_default().to_lowercase();
        if let Some(base) = self.config.overrides.get(&host) {
            return Ok((base.trim_end_matches('/').to_string(), Resolution::Override));
        }

        let origin = site.origin().ascii_serialization();
        let script = self.config.service_script.as_str();
        let segments: Vec<&str> = site
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        if let Some(pos) = segments
            .iter()
            .position(|seg| seg.eq_ignore_ascii_case(script))
        {
            let path = segments[..=pos].join("/");
            return Ok((format!("{}/{}", origin, path), Resolution::ExplicitScript));
        }

        if let Some(last) = segments.last() {
            let known = self
                .config
                .known_subpaths
                .iter()
                .any(|sub| sub.eq_ignore_ascii_case(last));
            if known {
                let path = segments.join("/");
                return Ok((
                    format!("{}/{}/{}", origin, path, script),
                    Resolution::KnownSubpath,
                ));
            }
        }

        if !segments.is_empty() {
            warn!(
                site = %site,
                discarded_path = %segments.join("/"),
                "Site path not recognised, falling back to host root"
            );
            ENDPOINT_FALLBACKS.inc();
        }
        Ok((format!("{}/{}", origin, script), Resolution::OriginFallback))
    }
}

/// Parse a site URL, dropping a `?WSDL` query and any fragment.
pub fn parse_site_url(site_url: &str) -> Result<Url, ResolveError> {
    let invalid = |reason: String| ResolveError::InvalidUrl {
        url: site_url.to_string(),
        reason,
    };

    let mut url = Url::parse(site_url.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    if url
        .query()
        .is_some_and(|q| q.eq_ignore_ascii_case("wsdl"))
    {
        url.set_query(None);
    }
    url.set_fragment(None);

    Ok(url)
}

/// Rate-limiting key for a site URL: scheme, host and port.
pub fn origin_of(site_url: &str) -> Result<String, ResolveError> {
    Ok(parse_site_url(site_url)?.origin().ascii_serialization())
}
