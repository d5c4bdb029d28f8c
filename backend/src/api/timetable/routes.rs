//! Defines the HTTP routes for timetables.
//!
//! Lookup is registered after the session layer and stays public.

use axum::{middleware::from_fn_with_state, routing::{get, post}, Router};

use super::handlers::{create_timetable, find_timetable, update_timetable};
use crate::auth::require_session;
use crate::state::SharedState;

pub fn timetable_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/", post(create_timetable).put(update_timetable))
        .route_layer(from_fn_with_state(state, require_session))
        .route("/", get(find_timetable))
}
