//! Module for administration endpoints: student and user listings, complaint
//! statistics and account registration.

pub mod handlers;
pub mod routes;
