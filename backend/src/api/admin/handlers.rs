//! Handler functions for administration endpoints.
//!
//! Listings back the admin, attendance and users dashboards; the statistics
//! endpoint feeds the complaint charts of the users dashboard.

use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::auth::SessionUser;
use crate::database::{
    models::{ProfileWithComplaints, StudentSummary, UserProfile},
    queries,
};
use crate::errors::ApiResult;
use crate::extract::{Json, Query};
use crate::services::access::Dashboard;
use crate::services::complaint_stats::{self, ComplaintStats, StatsQuery};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    pub email: Option<String>,
}

pub async fn list_students(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<Vec<StudentSummary>>> {
    Dashboard::Admin.authorize(&user)?;
    Ok(Json(queries::list_students(&state.pool).await?))
}

pub async fn list_users(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Query(search): Query<UserSearch>,
) -> ApiResult<Json<Vec<ProfileWithComplaints>>> {
    Dashboard::Users.authorize(&user)?;

    let email = search.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let users = queries::list_users(&state.pool, email).await?;
    let mut complaints = queries::complaints_by_student(&state.pool).await?;

    let users = users
        .into_iter()
        .map(|u| ProfileWithComplaints {
            complaints: complaints.remove(&u.id).unwrap_or_default(),
            profile: UserProfile::from(u),
        })
        .collect();

    Ok(Json(users))
}

pub async fn complaint_stats(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<ComplaintStats>> {
    Dashboard::Users.authorize(&user)?;

    let records = queries::complaints_with_department(&state.pool).await?;
    Ok(Json(complaint_stats::aggregate(&records, &query)))
}
