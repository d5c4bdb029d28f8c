//! Handler functions for class timetables.

use axum::{
    extract::State,
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::SessionUser;
use crate::database::{
    models::{PeriodGrid, Timetable, TimetableKey},
    queries,
};
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::services::access::Dashboard;
use crate::state::SharedState;

/// Monday to Friday.
pub const DAYS_PER_WEEK: usize = 5;
/// Teaching slots from 08:45 to 16:30.
pub const SLOTS_PER_DAY: usize = 9;

#[derive(Debug, Default, Deserialize)]
pub struct TimetableQuery {
    pub department: Option<String>,
    pub year: Option<i64>,
    pub semester: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TimetableRequest {
    pub department: Option<String>,
    pub year: Option<i64>,
    pub semester: Option<i64>,
    pub periods: Option<PeriodGrid>,
}

#[derive(Debug, Serialize)]
pub struct TimetableSaved {
    pub message: &'static str,
    pub timetable: Timetable,
}

fn timetable_key(department: Option<String>, year: Option<i64>, semester: Option<i64>) -> ApiResult<TimetableKey> {
    let department = department.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    let (Some(department), Some(year), Some(semester)) = (department, year, semester) else {
        return Err(ApiError::bad_request("Missing department, year, or semester"));
    };

    if !(1..=4).contains(&year) {
        return Err(ApiError::bad_request("year must be between 1 and 4"));
    }
    if !(1..=8).contains(&semester) {
        return Err(ApiError::bad_request("semester must be between 1 and 8"));
    }

    Ok(TimetableKey {
        department,
        year,
        semester,
    })
}

fn check_grid(periods: Option<PeriodGrid>) -> ApiResult<PeriodGrid> {
    let periods = periods.ok_or_else(|| ApiError::bad_request("periods are required"))?;

    if periods.len() != DAYS_PER_WEEK || periods.iter().any(|day| day.len() != SLOTS_PER_DAY) {
        return Err(ApiError::bad_request(format!(
            "periods must have {DAYS_PER_WEEK} days of {SLOTS_PER_DAY} slots"
        )));
    }
    Ok(periods)
}

pub async fn find_timetable(
    State(state): State<SharedState>,
    Query(query): Query<TimetableQuery>,
) -> ApiResult<Json<Timetable>> {
    let key = timetable_key(query.department, query.year, query.semester)?;

    let timetable = queries::find_timetable(&state.pool, &key)
        .await?
        .ok_or_else(|| ApiError::not_found("No timetable found for selected filters"))?;
    Ok(Json(timetable))
}

pub async fn create_timetable(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<TimetableRequest>,
) -> ApiResult<(StatusCode, Json<TimetableSaved>)> {
    Dashboard::Timetable.authorize(&user)?;

    let key = timetable_key(payload.department, payload.year, payload.semester)?;
    let periods = check_grid(payload.periods)?;

    let timetable = queries::insert_timetable(&state.pool, &key, &periods)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Timetable already exists for this department, year and semester".to_string())
        })?;

    info!(by = %user.email, "Timetable created for {} year {} semester {}", key.department, key.year, key.semester);

    Ok((
        StatusCode::CREATED,
        Json(TimetableSaved {
            message: "Created successfully",
            timetable,
        }),
    ))
}

pub async fn update_timetable(
    State(state): State<SharedState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<TimetableRequest>,
) -> ApiResult<Json<TimetableSaved>> {
    Dashboard::Timetable.authorize(&user)?;

    let key = timetable_key(payload.department, payload.year, payload.semester)?;
    let periods = check_grid(payload.periods)?;

    let timetable = queries::update_timetable(&state.pool, &key, &periods)
        .await?
        .ok_or_else(|| ApiError::not_found("Timetable not found"))?;

    Ok(Json(TimetableSaved {
        message: "Updated successfully",
        timetable,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(days: usize, slots: usize) -> PeriodGrid {
        vec![vec![String::new(); slots]; days]
    }

    #[test]
    fn test_timetable_key_requires_all_parts() {
        let err = timetable_key(Some("CSE".into()), Some(1), None).unwrap_err();
        assert_eq!(err.to_string(), "Missing department, year, or semester");
        assert!(timetable_key(Some("  ".into()), Some(1), Some(1)).is_err());
    }

    #[test]
    fn test_timetable_key_ranges() {
        assert!(timetable_key(Some("CSE".into()), Some(4), Some(8)).is_ok());
        assert!(timetable_key(Some("CSE".into()), Some(5), Some(1)).is_err());
        assert!(timetable_key(Some("CSE".into()), Some(1), Some(0)).is_err());
    }

    #[test]
    fn test_check_grid_shape() {
        assert!(check_grid(Some(grid(5, 9))).is_ok());
        assert!(check_grid(Some(grid(6, 9))).is_err());
        assert!(check_grid(Some(grid(5, 8))).is_err());
        assert!(check_grid(None).is_err());
    }
}
