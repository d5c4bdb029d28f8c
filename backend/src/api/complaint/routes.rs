//! Defines the HTTP routes for complaints.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, post},
    Router,
};

use super::handlers::{create_complaint, delete_complaint};
use crate::auth::require_session;
use crate::state::SharedState;

pub fn complaint_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/", post(create_complaint))
        .route("/{id}", delete(delete_complaint))
        .route_layer(from_fn_with_state(state, require_session))
}
