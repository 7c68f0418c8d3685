//! Sign-in state machine.
//!
//! ```text
//! Anonymous --initiate--> PendingProviderRedirect
//! PendingProviderRedirect --callback ok--> Authenticated   (cookie set, -> /)
//! PendingProviderRedirect --callback err--> Anonymous      (no cookie, -> /failure)
//! Authenticated --logout--> Anonymous                      (cookie cleared, -> /)
//! ```
//!
//! The state is rebuilt from the incoming cookie on every request; there is
//! no server-side session table.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::google::SCOPES;
use crate::error::{AuthError, AuthResult};
use crate::provider::IdentityProvider;
use crate::session::{Session, SessionCodec};

/// Where the browser lands after sign-in or sign-out.
pub const HOME_PATH: &str = "/";

/// Where the browser lands after a failed sign-in.
pub const FAILURE_PATH: &str = "/failure";

/// Authentication state of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No valid session cookie.
    Anonymous,
    /// Browser has been sent to the provider and has not come back yet.
    PendingProviderRedirect,
    /// Valid, unexpired session.
    Authenticated(Session),
}

/// What to do with the session cookie on the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    /// Leave whatever the browser holds.
    Unchanged,
    /// Store a freshly encoded session.
    Set(String),
    /// Expire the session cookie.
    Clear,
}

/// Outcome of a state-machine step: new state, redirect target and cookie change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State of the request after the step.
    pub state: AuthState,
    /// Redirect target for the browser.
    pub location: String,
    /// Change to the session cookie.
    pub cookie: CookieUpdate,
}

/// Query parameters the provider appends to the callback URL.
///
/// Anything else on the query string, such as an echoed `state`, is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Set when the user or provider refused the request.
    pub error: Option<String>,
}

impl CallbackParams {
    /// Callback carrying just an authorization code.
    #[must_use]
    pub fn with_code(code: impl Into<String>) -> Self {
        Self { code: Some(code.into()), ..Self::default() }
    }

    /// The authorization code, or why there is none.
    fn authorization_code(&self) -> AuthResult<&str> {
        if let Some(ref error) = self.error {
            return Err(AuthError::ProviderDenied(error.clone()));
        }
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AuthError::MissingCode),
        }
    }
}

/// Drives the sign-in handshake and session lifecycle.
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    codec: SessionCodec,
}

impl Authenticator {
    /// Create an authenticator over a provider and a session codec.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, codec: SessionCodec) -> Self {
        Self { provider, codec }
    }

    /// Session codec used for cookies.
    #[must_use]
    pub const fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Reconstruct the state of a request from its session cookie.
    #[must_use]
    pub fn current(&self, cookie: Option<&str>) -> AuthState {
        self.codec.decode(cookie).map_or(AuthState::Anonymous, AuthState::Authenticated)
    }

    /// Begin sign-in: send the browser to the provider. Nothing is stored.
    #[must_use]
    pub fn initiate(&self) -> Transition {
        let url = self.provider.authorization_url(SCOPES);
        tracing::debug!(provider = self.provider.name(), "Redirecting to provider");

        Transition {
            state: AuthState::PendingProviderRedirect,
            location: url.into(),
            cookie: CookieUpdate::Unchanged,
        }
    }

    /// Finish sign-in from the provider's callback.
    ///
    /// Any failure, including a callback without a code, ends at the failure
    /// page with the cookie untouched. Failures are not retried.
    pub async fn complete(&self, params: &CallbackParams) -> Transition {
        match self.establish(params).await {
            Ok(session) => {
                tracing::info!(provider = self.provider.name(), id = %session.id(), "Signed in");
                Transition {
                    cookie: CookieUpdate::Set(self.codec.encode(&session)),
                    state: AuthState::Authenticated(session),
                    location: HOME_PATH.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    provider_fault = e.is_provider_fault(),
                    "Sign-in failed"
                );
                Transition {
                    state: AuthState::Anonymous,
                    location: FAILURE_PATH.to_string(),
                    cookie: CookieUpdate::Unchanged,
                }
            }
        }
    }

    /// Sign out: expire the cookie and go home.
    #[must_use]
    pub fn logout(&self) -> Transition {
        Transition {
            state: AuthState::Anonymous,
            location: HOME_PATH.to_string(),
            cookie: CookieUpdate::Clear,
        }
    }

    async fn establish(&self, params: &CallbackParams) -> AuthResult<Session> {
        let code = params.authorization_code()?;
        let claim = self.provider.exchange_code(code).await?;

        // Profile attributes stay out of the cookie.
        Ok(Session::new(claim.id))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("provider", &self.provider.name())
            .field("codec", &self.codec)
            .finish()
    }
}
