//! Session Gate
//!
//! A small web server that signs users in with Google through the OAuth 2.0
//! authorization-code flow, keeps the session in a signed cookie, and guards
//! a protected resource behind that session.
//!
//! # Features
//!
//! - **Stateless sessions**: the cookie is the session store; no server-side table
//! - **Key rotation**: cookies signed with any configured key are accepted, new ones use the first
//! - **Fixed lifetime**: sessions expire 24 hours after issuance
//!
//! # Example
//!
//! ```no_run
//! use session_gate::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(
//!         Some("client-id".into()),
//!         Some("client-secret".into()),
//!         Some("current-cookie-key".into()),
//!         Some("previous-cookie-key".into()),
//!     )?;
//!
//!     server::serve(config).await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod provider;
pub mod server;
pub mod session;

pub use auth::{AuthState, Authenticator};
pub use config::Config;
pub use error::{AuthError, ConfigError};
pub use session::{Session, SessionCodec};
