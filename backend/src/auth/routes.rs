//! Defines the HTTP routes specifically for authentication.
//!
//! `/login` is public; `/session` sits behind the session middleware.
//! Account creation lives under the admin router.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::{login, session};
use super::middleware::require_session;
use crate::state::SharedState;

pub fn auth_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/session", get(session))
        .route_layer(from_fn_with_state(state, require_session))
        .route("/login", post(login))
}
