//! Configuration for the upstream Icecast connection

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Upstream server address, source credentials and stream metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Source user for HTTP basic auth
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Sent as `Ice-Name`
    #[serde(default = "default_ice_name")]
    pub ice_name: String,

    /// Sent as `Ice-Public: 1` or `Ice-Public: 0`
    #[serde(default = "default_ice_public")]
    pub ice_public: bool,

    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Fixed wait between a lost connection and the next attempt
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Frame payloads as HTTP/1.1 chunks to match the declared
    /// `Transfer-Encoding: chunked`. Off by default: bytes go out raw.
    #[serde(default)]
    pub chunked_framing: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_user() -> String {
    "source".to_string()
}

fn default_ice_name() -> String {
    "Beep Boop".to_string()
}

fn default_ice_public() -> bool {
    true
}

fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    500
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            ice_name: default_ice_name(),
            ice_public: default_ice_public(),
            content_type: default_content_type(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            chunked_framing: false,
        }
    }
}

impl UpstreamConfig {
    /// Create a config for the given server with default metadata
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// `host:port`, as used for the `Host` header
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base64 of `user:password` for the `Authorization` header
    pub fn basic_credentials(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.user, self.password))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
