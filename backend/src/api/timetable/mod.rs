//! Module for class timetable endpoints.
//!
//! A timetable is identified by department, year and semester and holds a
//! weekly grid of subjects. Lookup is public; editing is for admins.

pub mod handlers;
pub mod routes;
