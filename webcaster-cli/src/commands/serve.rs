//! Serve command: run the relay in the foreground
//!
//! Loads the config file, applies command line overrides and serves until
//! Ctrl-C.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use tracing::{info, warn};
use webcaster_core::{AllowedOrigins, HttpAuthenticator};
use webcaster_server::{AppState, RelayServer, ServerConfig};

use crate::config::{ConfigLoader, RelayConfig};

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,
}

impl ServeArgs {
    fn apply(&self, server: &mut ServerConfig) {
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ConfigLoader::load(config_path)?;
    args.apply(&mut config.server);

    let server = build_server(config)?;
    info!(
        "Starting webcaster relay on {}, upstream {}",
        server.config().addr(),
        server.state().upstream.address()
    );

    server.run(shutdown_signal()).await?;
    Ok(())
}

fn build_server(config: RelayConfig) -> Result<RelayServer> {
    if !config.auth.is_valid() {
        bail!("auth.url must be set in the config file");
    }

    let authenticator = HttpAuthenticator::new(config.auth)?;
    let mut state = AppState::new(Arc::new(authenticator), config.upstream);
    if !config.gatekeeper.allowed_origins.is_empty() {
        info!(
            "Accepting broadcasters from {} origin(s)",
            config.gatekeeper.allowed_origins.len()
        );
        state = state.with_origin_policy(AllowedOrigins::new(config.gatekeeper.allowed_origins));
    } else {
        warn!("No allowed_origins configured, accepting broadcasters from any origin");
    }

    Ok(RelayServer::new(config.server, Arc::new(state)))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
