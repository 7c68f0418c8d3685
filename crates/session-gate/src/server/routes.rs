//! HTTP routes.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::guard::RequireSession;
use crate::auth::{CallbackParams, CookieUpdate, Transition};
use crate::session::SessionCodec;

/// Body of the protected resource.
pub const SECRET_MESSAGE: &str = "Your personal secret value is 42";

/// Body of the failure page.
pub const FAILURE_MESSAGE: &str = "Failed to log in!";

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(&state.index_file);

    Router::new()
        .route("/auth/google", get(handle_login))
        .route("/auth/google/callback", get(handle_callback))
        .route("/auth/logout", get(handle_logout))
        .route("/secret", get(handle_secret))
        .route("/failure", get(handle_failure))
        .route_service("/", index)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /auth/google`
async fn handle_login(State(state): State<Arc<AppState>>) -> Response {
    let transition = state.authenticator.initiate();
    redirect(transition, state.authenticator.codec())
}

/// `GET /auth/google/callback`
///
/// A query string that does not parse is handled like a callback without a code.
async fn handle_callback(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    tracing::info!("Provider called back");

    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::debug!(error = %e, "Malformed callback query");
            CallbackParams::default()
        }
    };

    let transition = state.authenticator.complete(&params).await;
    redirect(transition, state.authenticator.codec())
}

/// `GET /auth/logout`
async fn handle_logout(State(state): State<Arc<AppState>>) -> Response {
    let transition = state.authenticator.logout();
    redirect(transition, state.authenticator.codec())
}

/// `GET /secret`
async fn handle_secret(RequireSession(session): RequireSession) -> &'static str {
    tracing::debug!(id = %session.id(), "Serving protected resource");
    SECRET_MESSAGE
}

/// `GET /failure`
async fn handle_failure() -> &'static str {
    FAILURE_MESSAGE
}

/// Turn a state-machine transition into a `302 Found` with any cookie change.
fn redirect(transition: Transition, codec: &SessionCodec) -> Response {
    let jar = match transition.cookie {
        CookieUpdate::Unchanged => CookieJar::new(),
        CookieUpdate::Set(value) => CookieJar::new().add(codec.session_cookie(value)),
        CookieUpdate::Clear => CookieJar::new().add(codec.removal_cookie()),
    };

    (StatusCode::FOUND, jar, [(header::LOCATION, transition.location)]).into_response()
}
