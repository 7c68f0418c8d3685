//! Configuration for the session-gate server.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Google OAuth 2.0 endpoints and client constants.
pub mod google {
    use std::time::Duration;

    /// Authorization endpoint the browser is redirected to.
    pub const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

    /// Token endpoint for the code exchange.
    pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

    /// OpenID userinfo endpoint.
    pub const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

    /// Path the provider redirects back to.
    pub const CALLBACK_PATH: &str = "/auth/google/callback";

    /// Scopes requested at sign-in.
    pub const SCOPES: &[&str] = &["email"];

    /// Request timeout for the exchange calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Session cookie constants.
pub mod session {
    use std::time::Duration;

    /// Cookie name.
    pub const COOKIE_NAME: &str = "session";

    /// Session lifetime (24 hours from issuance).
    pub const TTL: Duration = Duration::from_secs(24 * 60 * 60);
}

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default externally visible base URL.
pub const DEFAULT_PUBLIC_URL: &str = "https://localhost:3000";

/// Default directory holding `index.html`.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Server configuration.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct Config {
    /// OAuth client ID issued by Google.
    pub client_id: String,

    /// OAuth client secret issued by Google.
    pub client_secret: String,

    /// Cookie signing secrets, current key first.
    pub cookie_keys: Vec<String>,

    /// Externally visible base URL (used for the callback redirect URI).
    pub public_url: Url,

    /// Absolute callback URL registered with the provider.
    pub redirect_url: Url,

    /// Listening port.
    pub port: u16,

    /// Directory served for the landing page.
    pub public_dir: PathBuf,

    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,

    /// Provider authorization endpoint (overridable for mock servers).
    pub authorization_url: String,

    /// Provider token endpoint.
    pub token_url: String,

    /// Provider userinfo endpoint.
    pub userinfo_url: String,

    /// Request timeout for provider calls.
    pub request_timeout: Duration,

    /// Connection timeout for provider calls.
    pub connect_timeout: Duration,

    /// Session lifetime.
    pub session_ttl: Duration,
}

impl Config {
    /// Create a configuration from the provider credentials and cookie keys.
    ///
    /// Fails when a credential or the current cookie key is absent or blank,
    /// so a misconfigured process stops before it accepts a request.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        current_key: Option<String>,
        previous_key: Option<String>,
    ) -> ConfigResult<Self> {
        let client_id = required("CLIENT_ID", client_id)?;
        let client_secret = required("CLIENT_SECRET", client_secret)?;
        let mut cookie_keys = vec![required("COOKIE_KEY_1", current_key)?];
        if let Some(previous) = previous_key.filter(|k| !k.trim().is_empty()) {
            cookie_keys.push(previous);
        }

        let public_url = parse_public_url(DEFAULT_PUBLIC_URL)?;
        let redirect_url = callback_url(&public_url)?;

        Ok(Self {
            client_id,
            client_secret,
            cookie_keys,
            public_url,
            redirect_url,
            port: DEFAULT_PORT,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            secure_cookies: true,
            authorization_url: google::AUTHORIZATION_URL.to_string(),
            token_url: google::TOKEN_URL.to_string(),
            userinfo_url: google::USERINFO_URL.to_string(),
            request_timeout: google::REQUEST_TIMEOUT,
            connect_timeout: google::CONNECT_TIMEOUT,
            session_ttl: session::TTL,
        })
    }

    /// Create a test configuration with provider endpoints on a mock server.
    #[must_use]
    pub fn for_testing(provider_base: &str) -> Self {
        let public_url = Url::parse("http://localhost:3000").expect("valid test URL");
        let redirect_url = public_url.join(google::CALLBACK_PATH).expect("valid callback path");

        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            cookie_keys: vec!["test-key-current".to_string(), "test-key-previous".to_string()],
            public_url,
            redirect_url,
            port: 0,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            secure_cookies: false,
            authorization_url: format!("{}/o/oauth2/v2/auth", provider_base),
            token_url: format!("{}/token", provider_base),
            userinfo_url: format!("{}/userinfo", provider_base),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            session_ttl: session::TTL,
        }
    }

    /// Override the externally visible base URL.
    pub fn with_public_url(mut self, public_url: &str) -> ConfigResult<Self> {
        self.public_url = parse_public_url(public_url)?;
        self.redirect_url = callback_url(&self.public_url)?;
        Ok(self)
    }

    /// Override the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the landing page directory.
    #[must_use]
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// Toggle the `Secure` cookie attribute (disable only behind plain-HTTP dev setups).
    #[must_use]
    pub const fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Path of the landing page file.
    #[must_use]
    pub fn index_file(&self) -> PathBuf {
        self.public_dir.join("index.html")
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("cookie_keys", &self.cookie_keys.len())
            .field("public_url", &self.public_url.as_str())
            .field("port", &self.port)
            .field("public_dir", &self.public_dir)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

fn required(name: &'static str, value: Option<String>) -> ConfigResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_public_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid("PUBLIC_URL", e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid("PUBLIC_URL", format!("unsupported scheme '{other}'"))),
    }
}

fn callback_url(public_url: &Url) -> ConfigResult<Url> {
    public_url
        .join(google::CALLBACK_PATH)
        .map_err(|e| ConfigError::invalid("PUBLIC_URL", e.to_string()))
}
