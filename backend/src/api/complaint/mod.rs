//! Module for disciplinary complaint endpoints.

pub mod handlers;
pub mod routes;
