//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, session
//! inspection and account registration, validate input, and call into
//! `auth::service` for the core logic.

use axum::{extract::State, http::StatusCode, Extension};
use tracing::info;

use super::models::{LoginRequest, LoginResponse, SessionResponse, SessionUser, SignupPayload, SignupResponse};
use super::service;
use crate::errors::{ApiError, ApiResult};
use crate::extract::Json;
use crate::services::access::{accessible_dashboards, home_for, Dashboard};
use crate::state::SharedState;

pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email.trim().to_string(), password)
        }
        _ => return Err(ApiError::bad_request("Please enter both email and password.")),
    };

    let user = service::authenticate(&state.pool, &email, &password).await?;
    let (token, expires_at) = state.tokens.issue(&user)?;
    info!(user = %user.email, role = %user.role, "Signed in");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        home: home_for(user.role),
        user: SessionUser::from(&user),
    }))
}

pub async fn session(Extension(user): Extension<SessionUser>) -> Json<SessionResponse> {
    Json(SessionResponse {
        home: home_for(user.role),
        dashboards: accessible_dashboards(&user),
        user,
    })
}

/// Creates one or many accounts. Restricted to the admin dashboard.
pub async fn signup(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SignupPayload>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    Dashboard::Admin.authorize(&user)?;

    let requests = payload.into_vec();
    let count = service::register_users(&state.pool, &requests, state.config.bcrypt_cost).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Users inserted successfully",
            count,
        }),
    ))
}
