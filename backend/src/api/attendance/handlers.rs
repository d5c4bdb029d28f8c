//! Handler functions for monthly attendance records.
//!
//! Admins record one percentage per student per month; students read their
//! own records.

use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;
use crate::database::{models::Attendance, queries};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path};
use crate::services::access::{Dashboard, ATTENDANCE_READERS};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateAttendanceRequest {
    pub student_id: Option<String>,
    pub month: Option<String>,
    pub percentage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub month: Option<String>,
    pub percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AttendanceSaved {
    pub message: &'static str,
    pub attendance: Attendance,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

fn check_percentage(percentage: f64) -> ApiResult<f64> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        Ok(percentage)
    } else {
        Err(ApiError::bad_request("percentage must be between 0 and 100"))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn create_attendance(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateAttendanceRequest>,
) -> ApiResult<(StatusCode, Json<AttendanceSaved>)> {
    Dashboard::Attendance.authorize(&user)?;

    let (Some(student_id), Some(month), Some(percentage)) = (
        non_blank(payload.student_id.as_deref()),
        non_blank(payload.month.as_deref()),
        payload.percentage,
    ) else {
        return Err(ApiError::bad_request("student_id, month and percentage are required"));
    };
    let percentage = check_percentage(percentage)?;

    if queries::find_user_by_id(&state.pool, student_id).await?.is_none() {
        return Err(ApiError::not_found("Student not found"));
    }

    let attendance = queries::insert_attendance(&state.pool, student_id, month, percentage).await?;

    Ok((
        StatusCode::CREATED,
        Json(AttendanceSaved {
            message: "Attendance created successfully",
            attendance,
        }),
    ))
}

pub async fn update_attendance(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAttendanceRequest>,
) -> ApiResult<Json<AttendanceSaved>> {
    Dashboard::Attendance.authorize(&user)?;

    let percentage = payload.percentage.map(check_percentage).transpose()?;
    let month = non_blank(payload.month.as_deref());

    let attendance = queries::update_attendance(&state.pool, id, month, percentage)
        .await?
        .ok_or_else(|| ApiError::not_found("Attendance not found"))?;

    Ok(Json(AttendanceSaved {
        message: "Attendance updated successfully",
        attendance,
    }))
}

pub async fn delete_attendance(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    Dashboard::Attendance.authorize(&user)?;

    if !queries::delete_attendance(&state.pool, id).await? {
        return Err(ApiError::not_found("Attendance not found"));
    }

    Ok(Json(Message {
        message: "Attendance deleted successfully",
    }))
}

pub async fn student_attendance(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<Vec<Attendance>>> {
    ATTENDANCE_READERS.authorize_self_or(&user, &student_id)?;

    let records = queries::attendance_for_student(&state.pool, &student_id).await?;
    if records.is_empty() {
        return Err(ApiError::not_found("No attendance found"));
    }
    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_percentage_bounds() {
        assert_eq!(check_percentage(0.0).unwrap(), 0.0);
        assert_eq!(check_percentage(100.0).unwrap(), 100.0);
        assert!(check_percentage(100.5).is_err());
        assert!(check_percentage(-1.0).is_err());
        assert!(check_percentage(f64::NAN).is_err());
    }
}
