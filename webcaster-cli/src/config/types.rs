use serde::{Deserialize, Serialize};
use webcaster_core::{AuthConfig, UpstreamConfig};
use webcaster_server::ServerConfig;

/// Shown instead of secrets when printing configuration
pub const REDACTED: &str = "********";

/// Complete relay configuration; every section may be omitted
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GatekeeperConfig {
    /// Origins allowed to connect; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl RelayConfig {
    /// Copy safe to print, with the upstream password masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.upstream.password.is_empty() {
            config.upstream.password = REDACTED.to_string();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = RelayConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7443);
        assert!(config.auth.url.is_empty());
        assert_eq!(config.auth.timeout_secs, 10);
        assert_eq!(config.upstream.port, 8000);
        assert_eq!(config.upstream.reconnect_delay_ms, 500);
        assert!(!config.upstream.chunked_framing);
        assert!(config.gatekeeper.allowed_origins.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.upstream, UpstreamConfig::default());
    }

    #[test]
    fn test_full_file_parsing() {
        let toml_str = r#"
[server]
host = "127.0.0.1"
port = 9443

[auth]
url = "https://radio.example/api/auth"
timeout_secs = 3

[upstream]
host = "icecast.internal"
port = 8001
password = "hackme"
ice_name = "Morning Show"
ice_public = false
chunked_framing = true

[gatekeeper]
allowed_origins = ["https://studio.radio.example"]
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.server.addr(), "127.0.0.1:9443");
        assert_eq!(config.auth.url, "https://radio.example/api/auth");
        assert_eq!(config.auth.timeout_secs, 3);
        assert_eq!(config.upstream.address(), "icecast.internal:8001");
        assert_eq!(config.upstream.user, "source");
        assert_eq!(config.upstream.ice_name, "Morning Show");
        assert!(!config.upstream.ice_public);
        assert!(config.upstream.chunked_framing);
        assert_eq!(
            config.gatekeeper.allowed_origins,
            vec!["https://studio.radio.example".to_string()]
        );
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: RelayConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_redacted_masks_password() {
        let mut config = RelayConfig::default();
        config.upstream.password = "hackme".to_string();

        let shown = toml::to_string_pretty(&config.redacted()).unwrap();

        assert!(!shown.contains("hackme"));
        assert!(shown.contains(REDACTED));
        assert_eq!(config.upstream.password, "hackme");
    }

    #[test]
    fn test_redacted_leaves_empty_password() {
        let config = RelayConfig::default().redacted();
        assert!(config.upstream.password.is_empty());
    }
}
