//! Module for monthly attendance endpoints.

pub mod handlers;
pub mod routes;
