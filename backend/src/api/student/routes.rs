//! Defines the HTTP routes for student profiles.

use axum::{middleware::from_fn_with_state, routing::get, Router};

use super::handlers::{profile, profile_by_id};
use crate::auth::require_session;
use crate::state::SharedState;

pub fn student_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/me", get(profile))
        .route("/{id}", get(profile_by_id))
        .route_layer(from_fn_with_state(state, require_session))
}
