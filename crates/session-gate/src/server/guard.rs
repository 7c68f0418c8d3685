//! Access guard for protected routes.
//!
//! "Has a valid session" is the whole authorization model: no roles, no
//! per-user permissions.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::AppState;
use crate::config::session::COOKIE_NAME;
use crate::session::{Session, SessionCodec};

/// Message returned to anonymous callers of a guarded route.
pub const LOGIN_REQUIRED: &str = "You must log in!";

/// Guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Valid, unexpired session.
    Allow(Session),
    /// Missing, forged or expired cookie.
    Deny,
}

/// Decides whether a request carries a valid session.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    codec: SessionCodec,
}

impl AccessGuard {
    #[must_use]
    pub const fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    /// Allow iff the session cookie decodes to a valid, unexpired session.
    #[must_use]
    pub fn check(&self, jar: &CookieJar) -> Access {
        let value = jar.get(COOKIE_NAME).map(|c| c.value().to_owned());
        self.codec.decode(value.as_deref()).map_or(Access::Deny, Access::Allow)
    }
}

/// Extractor for handlers that require a signed-in user.
///
/// Runs the guard before the handler; on deny the handler is never called
/// and the caller gets [`Unauthorized`].
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        match state.guard.check(&jar) {
            Access::Allow(session) => Ok(Self(session)),
            Access::Deny => {
                tracing::debug!(path = %parts.uri.path(), "Rejected anonymous request");
                Err(Unauthorized)
            }
        }
    }
}

/// 401 with a JSON error body.
#[derive(Debug, Clone, Copy)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": LOGIN_REQUIRED
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;
    use crate::config::session::TTL;

    fn guard() -> (AccessGuard, SessionCodec) {
        let codec = SessionCodec::new(&["k"], TTL).unwrap();
        (AccessGuard::new(codec.clone()), codec)
    }

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_allows_valid_session() {
        let (guard, codec) = guard();
        let session = Session::new("user-1");
        let jar = jar_with(&format!("session={}", codec.encode(&session)));

        assert_eq!(guard.check(&jar), Access::Allow(session));
    }

    #[test]
    fn test_denies_missing_or_forged_cookie() {
        let (guard, _) = guard();
        assert_eq!(guard.check(&CookieJar::new()), Access::Deny);
        assert_eq!(guard.check(&jar_with("session=forged")), Access::Deny);
        assert_eq!(guard.check(&jar_with("other=value")), Access::Deny);
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let response = Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "You must log in!"}));
    }
}
