//! Broadcaster authentication against an external HTTP service

mod authenticator;
mod config;
mod error;
mod service;
pub mod mock;

pub use authenticator::{AuthOutcome, Authenticator};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::HttpAuthenticator;
