//! Module for hostel outpass endpoints.
//!
//! Hostelers request an outpass, wardens approve it, and watchmen record
//! when the student leaves and returns.

pub mod handlers;
pub mod routes;
