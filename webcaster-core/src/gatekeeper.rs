//! Admission checks for inbound broadcaster connections
//!
//! The gatekeeper runs before a session exists. It never mutates the
//! registry: a mount is only reserved once its session authenticates.

use std::sync::Arc;

use tracing::info;

use crate::error::RejectionError;
use crate::mount::MountId;
use crate::registry::SessionRegistry;

/// Subprotocol a broadcaster must request
pub const WEBCAST_PROTOCOL: &str = "webcast";

/// Decides which `Origin` values may open a session
pub trait OriginPolicy: Send + Sync {
    /// Returns true if a connection from `origin` may proceed
    fn is_allowed(&self, origin: Option<&str>) -> bool;
}

/// Accepts every origin
///
/// This is the default and it is not safe for public deployments; configure
/// [`AllowedOrigins`] or supply another policy there.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAnyOrigin;

impl OriginPolicy for AllowAnyOrigin {
    fn is_allowed(&self, _origin: Option<&str>) -> bool {
        true
    }
}

/// Accepts only origins from a fixed list (exact match)
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }
}

impl OriginPolicy for AllowedOrigins {
    fn is_allowed(&self, origin: Option<&str>) -> bool {
        origin.is_some_and(|origin| self.origins.iter().any(|allowed| allowed == origin))
    }
}

/// Validates connection attributes against policy and the registry
#[derive(Clone)]
pub struct Gatekeeper {
    registry: SessionRegistry,
    origin_policy: Arc<dyn OriginPolicy>,
}

impl Gatekeeper {
    /// Create a gatekeeper that accepts any origin
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            registry,
            origin_policy: Arc::new(AllowAnyOrigin),
        }
    }

    /// Replace the origin policy
    #[must_use]
    pub fn with_origin_policy(mut self, policy: impl OriginPolicy + 'static) -> Self {
        self.origin_policy = Arc::new(policy);
        self
    }

    /// Check origin, subprotocol and mount availability, in that order
    pub fn validate<'a>(
        &self,
        origin: Option<&str>,
        requested_protocols: impl IntoIterator<Item = &'a str>,
        mount: &MountId,
    ) -> Result<(), RejectionError> {
        if !self.origin_policy.is_allowed(origin) {
            info!(mount = %mount, origin = ?origin, "Connection from origin rejected");
            return Err(RejectionError::OriginNotAllowed {
                origin: origin.map(str::to_string),
            });
        }

        if !requested_protocols
            .into_iter()
            .any(|protocol| protocol == WEBCAST_PROTOCOL)
        {
            info!(mount = %mount, "Connection for non-webcast subprotocol rejected");
            return Err(RejectionError::UnsupportedSubprotocol);
        }

        if self.registry.is_active(mount) {
            info!(mount = %mount, "Connection rejected, mount already connected");
            return Err(RejectionError::MountInUse {
                mount: mount.clone(),
            });
        }

        Ok(())
    }
}
