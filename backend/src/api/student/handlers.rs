//! Handler functions for student profile endpoints.

use axum::{extract::State, Extension};
use sqlx::SqlitePool;

use crate::auth::SessionUser;
use crate::database::{
    models::{ProfileWithComplaints, UserProfile},
    queries,
};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path};
use crate::services::access::STUDENT_RECORDS;
use crate::state::SharedState;

async fn load_profile(pool: &SqlitePool, id: &str) -> ApiResult<ProfileWithComplaints> {
    let user = queries::find_user_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;
    let complaints = queries::complaints_for_student(pool, id).await?;

    Ok(ProfileWithComplaints {
        profile: UserProfile::from(user),
        complaints,
    })
}

pub async fn profile(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<ProfileWithComplaints>> {
    Ok(Json(load_profile(&state.pool, &user.id).await?))
}

pub async fn profile_by_id(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProfileWithComplaints>> {
    STUDENT_RECORDS.authorize_self_or(&user, &id)?;
    Ok(Json(load_profile(&state.pool, &id).await?))
}
