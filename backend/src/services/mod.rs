//! Module for core business logic services.
//!
//! This module encapsulates logic that is independent of HTTP and storage:
//! dashboard access policies, outpass filtering and complaint aggregation.

pub mod access;
pub mod complaint_stats;
pub mod outpass_filter;
