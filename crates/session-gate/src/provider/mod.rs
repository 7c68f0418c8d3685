//! Identity provider clients.
//!
//! A provider knows two things: where to send the browser to sign in, and
//! how to turn the authorization code it hands back into an identity.

mod google;

pub use google::GoogleProvider;

use url::Url;

use crate::error::AuthResult;

/// Profile data returned by the provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    /// Stable subject identifier.
    pub id: String,

    /// Email address, when the `email` scope was granted.
    pub email: Option<String>,

    /// Display name, when the provider shares one.
    pub display_name: Option<String>,
}

/// Trait for authorization-code identity providers.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logs (e.g., "google").
    fn name(&self) -> &'static str;

    /// Authorization endpoint URL requesting the given scopes.
    fn authorization_url(&self, scopes: &[&str]) -> Url;

    /// Exchange an authorization code for the signed-in user's identity.
    async fn exchange_code(&self, code: &str) -> AuthResult<IdentityClaim>;
}
