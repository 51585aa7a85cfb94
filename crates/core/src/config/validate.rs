use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Client timeout, rate limit and fallback committee are positive
/// - Resolver has a service script and every override is an absolute http(s) URL
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    // Client validation
    if config.client.timeout_secs == 0 {
        return Err(invalid("client.timeout_secs must be greater than 0"));
    }
    if config.client.rate_limit_ms == 0 {
        return Err(invalid("client.rate_limit_ms must be greater than 0"));
    }
    if config.client.fallback_committee_id == 0 {
        return Err(invalid("client.fallback_committee_id must be greater than 0"));
    }

    // Resolver validation
    let script = config.resolver.service_script.trim();
    if script.is_empty() || script.contains('/') {
        return Err(invalid(
            "resolver.service_script must be a single non-empty path segment",
        ));
    }
    for (host, base) in &config.resolver.overrides {
        let valid = Url::parse(base)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .unwrap_or(false);
        if !valid {
            return Err(ConfigError::ValidationError(format!(
                "resolver.overrides.\"{}\" is not an absolute http(s) URL: {}",
                host, base
            )));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ServerConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_client_limits() {
        for client in [
            ClientConfig {
                timeout_secs: 0,
                ..ClientConfig::default()
            },
            ClientConfig {
                rate_limit_ms: 0,
                ..ClientConfig::default()
            },
            ClientConfig {
                fallback_committee_id: 0,
                ..ClientConfig::default()
            },
        ] {
            let config = Config {
                client,
                ..Config::default()
            };
            assert!(validate_config(&config).is_err());
        }
    }

    #[test]
    fn test_validate_service_script() {
        let mut config = Config::default();
        config.resolver.service_script = "  ".to_string();
        assert!(validate_config(&config).is_err());

        config.resolver.service_script = "mg/mgWebService.asmx".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_overrides() {
        let mut config = Config::default();
        config.resolver.overrides.insert(
            "democracy.example.gov.uk".to_string(),
            "https://mg.example.gov.uk/mgWebService.asmx".to_string(),
        );
        assert!(validate_config(&config).is_ok());

        config
            .resolver
            .overrides
            .insert("other.gov.uk".to_string(), "mgWebService.asmx".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("other.gov.uk"));
    }
}
