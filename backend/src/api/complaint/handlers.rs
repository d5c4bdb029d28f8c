//! Handler functions for disciplinary complaints.
//!
//! Admins file complaints against students, capped per student; the
//! super-user may remove them.

use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::SessionUser;
use crate::database::{
    models::{Complaint, PLACEHOLDER_PHOTO},
    queries,
};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path};
use crate::services::access::Dashboard;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub student_id: Option<String>,
    pub reason: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintCreated {
    pub message: &'static str,
    pub complaint: Complaint,
}

#[derive(Debug, Serialize)]
pub struct ComplaintDeleted {
    pub success: bool,
    pub deleted_complaint: Complaint,
}

pub async fn create_complaint(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateComplaintRequest>,
) -> ApiResult<(StatusCode, Json<ComplaintCreated>)> {
    Dashboard::Admin.authorize(&user)?;

    let student_id = payload.student_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let reason = payload.reason.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let (Some(student_id), Some(reason)) = (student_id, reason) else {
        return Err(ApiError::bad_request("student_id and reason are required"));
    };

    if queries::find_user_by_id(&state.pool, student_id).await?.is_none() {
        return Err(ApiError::not_found("Student not found"));
    }

    let photo = payload
        .photo
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(PLACEHOLDER_PHOTO);

    let complaint = queries::insert_complaint_capped(&state.pool, student_id, reason, photo)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request("You have reached max complaints, please contact the principal.")
        })?;

    info!(student = %student_id, by = %user.email, "Complaint {} filed", complaint.id);

    Ok((
        StatusCode::CREATED,
        Json(ComplaintCreated {
            message: "Complaint created successfully",
            complaint,
        }),
    ))
}

pub async fn delete_complaint(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ComplaintDeleted>> {
    Dashboard::Super.authorize(&user)?;

    let deleted = queries::delete_complaint(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Complaint not found"))?;

    info!(by = %user.email, "Complaint {id} deleted");

    Ok(Json(ComplaintDeleted {
        success: true,
        deleted_complaint: deleted,
    }))
}
