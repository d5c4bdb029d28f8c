//! Defines the HTTP routes for attendance records.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use super::handlers::{create_attendance, delete_attendance, student_attendance, update_attendance};
use crate::auth::require_session;
use crate::state::SharedState;

pub fn attendance_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/", post(create_attendance))
        .route("/{id}", put(update_attendance).delete(delete_attendance))
        .route("/student/{id}", get(student_attendance))
        .route_layer(from_fn_with_state(state, require_session))
}
