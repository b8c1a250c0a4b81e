//! Error types for webcaster-core

use http::StatusCode;
use thiserror::Error;

use crate::mount::MountId;

/// Reasons an inbound connection is refused before a session exists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionError {
    #[error("origin not allowed")]
    OriginNotAllowed { origin: Option<String> },

    #[error("unsupported subprotocol")]
    UnsupportedSubprotocol,

    #[error("mount already in use")]
    MountInUse { mount: MountId },
}

impl RejectionError {
    /// HTTP status sent back on the refused upgrade request
    pub fn status(&self) -> StatusCode {
        match self {
            Self::OriginNotAllowed { .. } => StatusCode::FORBIDDEN,
            Self::UnsupportedSubprotocol => StatusCode::METHOD_NOT_ALLOWED,
            Self::MountInUse { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// Failures of a single upstream connection cycle
///
/// None of these reach the broadcaster: the relay logs them and reconnects.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("failed to connect to upstream: {0}")]
    Connect(#[source] std::io::Error),

    #[error("failed to write to upstream: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to read from upstream: {0}")]
    Read(#[source] std::io::Error),

    #[error("upstream closed the connection")]
    Closed,

    #[error("upstream stopped accepting data during shutdown")]
    Stalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_statuses() {
        assert_eq!(
            RejectionError::OriginNotAllowed { origin: None }.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RejectionError::UnsupportedSubprotocol.status().as_u16(),
            405
        );
        assert_eq!(
            RejectionError::MountInUse {
                mount: MountId::new("/show1")
            }
            .status()
            .as_u16(),
            429
        );
    }

    #[test]
    fn rejection_reasons_display_correctly() {
        assert_eq!(
            RejectionError::UnsupportedSubprotocol.to_string(),
            "unsupported subprotocol"
        );
        let error = RejectionError::MountInUse {
            mount: MountId::new("/show1"),
        };
        assert_eq!(error.to_string(), "mount already in use");
    }

    #[test]
    fn upstream_error_connect_displays_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = UpstreamError::Connect(io_error);
        assert!(error.to_string().contains("failed to connect to upstream"));
        assert!(error.to_string().contains("refused"));
    }

    #[test]
    fn upstream_error_closed_displays_correctly() {
        assert_eq!(
            UpstreamError::Closed.to_string(),
            "upstream closed the connection"
        );
    }
}
