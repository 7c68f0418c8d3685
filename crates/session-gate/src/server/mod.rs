//! HTTP server.
//!
//! State shared by handlers is built once at startup and never mutated;
//! everything per-user travels in the session cookie.

pub mod guard;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::provider::{GoogleProvider, IdentityProvider};
use crate::session::SessionCodec;

pub use guard::{Access, AccessGuard, RequireSession};
pub use routes::create_router;

/// Shared state for HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    pub authenticator: Authenticator,
    pub guard: AccessGuard,
    /// Landing page served at `/`.
    pub index_file: PathBuf,
}

impl AppState {
    /// Build handler state around an identity provider.
    pub fn new(config: &Config, provider: Arc<dyn IdentityProvider>) -> anyhow::Result<Self> {
        let codec = SessionCodec::from_config(config)?;

        Ok(Self {
            authenticator: Authenticator::new(provider, codec.clone()),
            guard: AccessGuard::new(codec),
            index_file: config.index_file(),
        })
    }

    /// Build handler state with the Google provider.
    pub fn google(config: &Config) -> anyhow::Result<Self> {
        let provider = GoogleProvider::new(config)?;
        Self::new(config, Arc::new(provider))
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns error if the state cannot be built or the listener fails.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::google(&config)?);
    let router = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!(
        public_url = %config.public_url,
        index = %config.index_file().display(),
        "HTTP server listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
