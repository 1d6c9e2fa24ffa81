//! services/api/src/web/middleware.rs
//!
//! The access gate: resolves the session token to a user before any
//! registry handler runs.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;
use crate::web::{extract_token, port_error_response};
use documind_core::domain::User;
use documind_core::ports::SessionStore;

/// The user resolved by [`require_auth`], available to handlers via
/// `Extension<CurrentUser>`. Handlers must take the scoping user id from
/// here and nowhere else; client-supplied user ids are never trusted.
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Middleware that validates the session token and resolves the current
/// user.
///
/// Missing tokens, unknown tokens, and expired tokens are all rejected with
/// the same 401; the distinction is not observable from outside.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = extract_token(req.headers())
        .ok_or((StatusCode::UNAUTHORIZED, "not authenticated".to_string()))?
        .to_string();

    let user = state.store.validate_session(&token).await.map_err(|e| {
        debug!("session validation rejected: {e}");
        port_error_response(&e)
    })?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
