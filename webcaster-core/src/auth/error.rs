//! Authentication error types

use thiserror::Error;

/// Why an authentication attempt did not succeed
///
/// These never leave the authenticator: they are logged and folded into
/// [`AuthOutcome::Denied`](super::AuthOutcome::Denied).
#[derive(Debug, Error)]
pub enum AuthError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network failure or timeout talking to the auth service
    #[error("authentication request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The auth service answered with something other than 202
    #[error("authentication rejected with HTTP {status}")]
    Rejected { status: u16, body: String },
}
