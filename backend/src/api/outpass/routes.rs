//! Defines the HTTP routes for hostel outpasses.
//!
//! `PUT /{id}` is the warden's decision, `PATCH /{id}` the watchman's gate log.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};

use super::handlers::{approve_outpass, create_outpass, list_outpasses, record_gate, student_outpasses};
use crate::auth::require_session;
use crate::state::SharedState;

pub fn outpass_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/", get(list_outpasses).post(create_outpass))
        .route("/student/{id}", get(student_outpasses))
        .route("/{id}", put(approve_outpass).patch(record_gate))
        .route_layer(from_fn_with_state(state, require_session))
}
