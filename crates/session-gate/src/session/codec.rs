//! Signed cookie encoding for sessions.
//!
//! Wire format: `BASE64(HMAC-SHA256) || BASE64URL(JSON {"id", "iat"})`, the
//! signature produced by the `cookie` crate's signed jar. Encoding always
//! signs with the current key; decoding accepts any configured key so cookies
//! issued before a key rotation stay valid until they expire.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use cookie::{Cookie, CookieJar, Key, SameSite};
use sha2::{Digest, Sha512};

use super::Session;
use crate::config::{Config, session::COOKIE_NAME};
use crate::error::{ConfigError, ConfigResult};

/// Encodes sessions into tamper-evident cookie values and back.
#[derive(Clone)]
pub struct SessionCodec {
    current: Key,
    retired: Vec<Key>,
    ttl: Duration,
    secure: bool,
}

impl SessionCodec {
    /// Build a codec from signing secrets, current secret first.
    pub fn new<S: AsRef<str>>(secrets: &[S], ttl: Duration) -> ConfigResult<Self> {
        let mut keys = secrets.iter().map(|s| derive_key(s.as_ref()));
        let current = keys.next().ok_or(ConfigError::Missing("COOKIE_KEY_1"))?;

        Ok(Self { current, retired: keys.collect(), ttl, secure: true })
    }

    /// Build the codec described by a server configuration.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let codec = Self::new(config.cookie_keys.as_slice(), config.session_ttl)?;
        Ok(codec.with_secure(config.secure_cookies))
    }

    /// Set the `Secure` attribute on issued cookies.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Session lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode a session into a signed cookie value using the current key.
    #[must_use]
    pub fn encode(&self, session: &Session) -> String {
        let payload = serde_json::to_vec(session).unwrap_or_default();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.current)
            .add(Cookie::new(COOKIE_NAME, URL_SAFE_NO_PAD.encode(payload)));

        jar.get(COOKIE_NAME).map(|c| c.value().to_owned()).unwrap_or_default()
    }

    /// Decode the incoming cookie value, if any.
    ///
    /// `None` means "anonymous": no cookie, bad signature, garbled payload
    /// or an expired session all end up here.
    #[must_use]
    pub fn decode(&self, value: Option<&str>) -> Option<Session> {
        self.decode_at(value?, Utc::now())
    }

    /// Decode a cookie value, checking expiry against `now`.
    #[must_use]
    pub fn decode_at(&self, value: &str, now: DateTime<Utc>) -> Option<Session> {
        let Some(payload) = self.verify(value) else {
            tracing::debug!("Session cookie failed signature check");
            return None;
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let session: Session = serde_json::from_slice(&bytes).ok()?;

        if session.is_expired_at(now, self.ttl) {
            tracing::debug!(issued_at = %session.issued_at(), "Session cookie expired");
            return None;
        }

        Some(session)
    }

    /// `Set-Cookie` carrying an encoded session.
    #[must_use]
    pub fn session_cookie(&self, value: String) -> Cookie<'static> {
        let max_age = time::Duration::try_from(self.ttl).unwrap_or(time::Duration::DAY);

        Cookie::build((COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .build()
    }

    /// `Set-Cookie` that makes the browser drop the session.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .build()
    }

    /// Return the unsigned payload if any configured key verifies it.
    fn verify(&self, value: &str) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(COOKIE_NAME, value.to_owned()));

        std::iter::once(&self.current)
            .chain(&self.retired)
            .find_map(|key| jar.signed(key).get(COOKIE_NAME))
            .map(|c| c.value().to_owned())
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("keys", &(1 + self.retired.len()))
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish()
    }
}

/// Stretch an arbitrary-length secret into the 64 bytes `Key` requires.
fn derive_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}
