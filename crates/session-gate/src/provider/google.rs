//! Google OAuth 2.0 client.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{IdentityClaim, IdentityProvider};
use crate::config::Config;
use crate::error::{AuthError, AuthResult};

/// Token endpoint response (only the fields we read).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// Userinfo endpoint response.
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    /// OpenID subject; the legacy v2 endpoint calls it `id`.
    #[serde(default, alias = "id")]
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<GoogleProfile> for IdentityClaim {
    fn from(profile: GoogleProfile) -> Self {
        Self { id: profile.sub, email: profile.email, display_name: profile.name }
    }
}

/// Google sign-in via the authorization-code grant.
#[derive(Clone)]
pub struct GoogleProvider {
    /// HTTP client with timeouts applied.
    client: Client,

    client_id: String,
    client_secret: String,

    /// Callback URL registered with Google.
    redirect_url: Url,

    authorization_url: Url,
    token_url: String,
    userinfo_url: String,
}

impl GoogleProvider {
    /// Create a provider client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the authorization URL is malformed or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            authorization_url: Url::parse(&config.authorization_url)?,
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        })
    }

    async fn request_token(&self, code: &str) -> AuthResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::rejected(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_profile(&self, access_token: &str) -> AuthResult<GoogleProfile> {
        let response = self.client.get(&self.userinfo_url).bearer_auth(access_token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::rejected(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn authorization_url(&self, scopes: &[&str]) -> Url {
        let mut url = self.authorization_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.redirect_url.as_str())
            .append_pair("scope", &scopes.join(" "))
            .append_pair("client_id", &self.client_id);
        url
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<IdentityClaim> {
        let token = self.request_token(code).await?;
        tracing::debug!(token_type = ?token.token_type, "Exchanged authorization code");

        let profile = self.fetch_profile(&token.access_token).await?;
        if profile.sub.is_empty() {
            return Err(AuthError::MissingIdentity);
        }

        let claim = IdentityClaim::from(profile);
        tracing::info!(provider = "google", id = %claim.id, "Received provider profile");
        Ok(claim)
    }
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("client_id", &self.client_id)
            .field("redirect_url", &self.redirect_url.as_str())
            .finish()
    }
}
