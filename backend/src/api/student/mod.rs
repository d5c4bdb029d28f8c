//! Module for student profile endpoints.
//!
//! A student reads their own profile and complaint history; staff with
//! access to student records can read anyone's.

pub mod handlers;
pub mod routes;
