//! Data structures for authentication-related entities.
//!
//! This module defines the session token claims, the session user handed to
//! handlers, and the request/response bodies of login and signup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Gender, Role, StudentType, User};
use crate::services::access::DashboardView;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub student_type: StudentType,
    pub department: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated user attached to a request by the session middleware.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub student_type: StudentType,
    pub department: String,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            gender: claims.gender,
            student_type: claims.student_type,
            department: claims.department,
        }
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            gender: user.gender,
            student_type: user.student_type,
            department: user.department.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
    pub home: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub home: &'static str,
    pub dashboards: Vec<DashboardView>,
}

/// One account in a signup request. Every field is required; they are
/// optional here so a missing one can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "type")]
    pub student_type: Option<String>,
}

/// Signup accepts a single account or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignupPayload {
    Many(Vec<SignupRequest>),
    One(SignupRequest),
}

impl SignupPayload {
    pub fn into_vec(self) -> Vec<SignupRequest> {
        match self {
            SignupPayload::Many(requests) => requests,
            SignupPayload::One(request) => vec![request],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub count: u64,
}
