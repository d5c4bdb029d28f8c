//! Middleware for protecting authenticated routes.
//!
//! [`require_session`] validates the bearer token of each request and, on
//! success, inserts the [`SessionUser`] into the request extensions where
//! handlers pick it up with `Extension<SessionUser>`. Role checks happen in
//! the handlers against `services::access` policies.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::errors::AuthError;
use super::models::SessionUser;
use crate::errors::ApiError;
use crate::state::SharedState;

pub async fn require_session(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req).ok_or(AuthError::MissingToken)?;
    let user: SessionUser = state.tokens.verify(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Extract bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
