//! Handler functions for hostel outpasses.

use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::auth::SessionUser;
use crate::database::{
    models::{GateUpdate, NewOutpass, Outpass, OutpassListing},
    queries,
};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};
use crate::services::access::{Dashboard, OUTPASS_STAFF};
use crate::services::outpass_filter::OutpassQuery;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateOutpassRequest {
    pub reason: Option<String>,
    pub village: Option<String>,
    pub phone_number: Option<String>,
    pub photo: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApprovalRequest {
    pub approved: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GateRequest {
    pub checked_out_at: Option<DateTime<Utc>>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub returned: Option<bool>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn create_outpass(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateOutpassRequest>,
) -> ApiResult<(StatusCode, Json<Outpass>)> {
    Dashboard::HostelRequest.authorize(&user)?;

    let (Some(reason), Some(village), Some(phone_number), Some(photo), Some(duration)) = (
        filled(payload.reason),
        filled(payload.village),
        filled(payload.phone_number),
        filled(payload.photo),
        filled(payload.duration),
    ) else {
        return Err(ApiError::bad_request("Fill all the required forms"));
    };

    let outpass = queries::insert_outpass(
        &state.pool,
        &NewOutpass {
            student_id: user.id.clone(),
            reason,
            village,
            phone_number,
            photo,
            duration,
        },
    )
    .await?;

    info!(student = %user.email, "Outpass {} requested", outpass.id);
    Ok((StatusCode::CREATED, Json(outpass)))
}

pub async fn list_outpasses(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<OutpassQuery>,
) -> ApiResult<Json<Vec<OutpassListing>>> {
    OUTPASS_STAFF.authorize(&user)?;

    let listings = queries::list_outpasses(&state.pool).await?;
    Ok(Json(query.apply(listings)))
}

pub async fn student_outpasses(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<Vec<Outpass>>> {
    OUTPASS_STAFF.authorize_self_or(&user, &student_id)?;
    Ok(Json(queries::outpasses_for_student(&state.pool, &student_id).await?))
}

/// Warden decision. The approver's name is recorded either way.
pub async fn approve_outpass(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ApprovalRequest>,
) -> ApiResult<Json<Outpass>> {
    Dashboard::Warden.authorize(&user)?;

    let approved = payload.approved.unwrap_or(false);
    let outpass = queries::set_outpass_approval(&state.pool, id, approved, &user.name)
        .await?
        .ok_or_else(|| ApiError::not_found("Outpass not found"))?;

    info!(warden = %user.email, approved, "Outpass {id} reviewed");
    Ok(Json(outpass))
}

/// Watchman records departure, arrival or return of an approved outpass.
pub async fn record_gate(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
    Json(payload): Json<GateRequest>,
) -> ApiResult<Json<Outpass>> {
    Dashboard::Watchman.authorize(&user)?;

    let current = queries::find_outpass(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Outpass not found"))?;
    if !current.approved {
        return Err(ApiError::bad_request("Outpass has not been approved"));
    }

    let update = GateUpdate {
        checked_out_at: payload.checked_out_at,
        checked_in_at: payload.checked_in_at,
        returned: payload.returned,
    };
    let outpass = queries::record_gate_movement(&state.pool, id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Outpass not found"))?;

    info!(watchman = %user.email, returned = outpass.returned, "Outpass {id} gate update");
    Ok(Json(outpass))
}
