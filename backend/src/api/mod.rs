//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the portal's API domains:
//! student profiles, administration, complaints, hostel outpasses, attendance
//! and timetables. Login and session routes live in `auth`.

pub mod admin;
pub mod attendance;
pub mod complaint;
pub mod outpass;
pub mod student;
pub mod timetable;
