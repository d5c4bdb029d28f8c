//! Defines the HTTP routes for administration.
//!
//! Every route requires a session; handlers check the dashboard policy.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::{complaint_stats, list_students, list_users};
use crate::auth::{handlers::signup, require_session};
use crate::state::SharedState;

pub fn admin_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/users", get(list_users))
        .route("/complaints/stats", get(complaint_stats))
        .route("/signup", post(signup))
        .route_layer(from_fn_with_state(state, require_session))
}
