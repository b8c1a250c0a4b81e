//! HTTP authenticator backed by the external validation service

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, warn};

use super::{AuthConfig, AuthError, AuthOutcome, Authenticator};
use crate::USER_AGENT;
use crate::mount::MountId;

/// Posts credentials to the configured endpoint; only `202 Accepted` authorizes
pub struct HttpAuthenticator {
    config: AuthConfig,
    http_client: reqwest::Client,
}

impl HttpAuthenticator {
    /// Create an authenticator with the given configuration
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(AuthError::Client)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn request(&self, mount: &MountId, password: &str) -> Result<(), AuthError> {
        let form = [("auth", password), ("mount", mount.without_separator())];

        let response = self
            .http_client
            .post(&self.config.url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AuthError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn authenticate(&self, mount: &MountId, password: &str) -> AuthOutcome {
        match self.request(mount, password).await {
            Ok(()) => {
                info!(mount = %mount, "Authentication successful");
                AuthOutcome::Authorized
            }
            Err(AuthError::Rejected { status, body }) => {
                warn!(mount = %mount, status, body = %body, "Authentication failed");
                AuthOutcome::Denied
            }
            Err(e) => {
                warn!(mount = %mount, error = %e, "Authentication failed");
                AuthOutcome::Denied
            }
        }
    }
}
