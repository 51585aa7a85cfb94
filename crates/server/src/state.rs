use std::sync::Arc;

use moderngov_core::{Config, CouncilMatcher, ModernGovClient, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    client: Arc<ModernGovClient>,
    matcher: Arc<CouncilMatcher>,
}

impl AppState {
    pub fn new(config: Config, client: Arc<ModernGovClient>, matcher: Arc<CouncilMatcher>) -> Self {
        Self {
            config,
            client,
            matcher,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn client(&self) -> &ModernGovClient {
        self.client.as_ref()
    }

    pub fn matcher(&self) -> &CouncilMatcher {
        self.matcher.as_ref()
    }
}
