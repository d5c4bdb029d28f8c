//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations, providing reusable
//! functions for interacting with the database and abstracting the query logic
//! from higher-level services and API handlers.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{types::Json, SqlitePool};
use uuid::Uuid;

use super::models::{
    Attendance, Complaint, ComplaintWithDepartment, GateUpdate, NewOutpass, NewUser, Outpass,
    OutpassListing, PeriodGrid, StudentSummary, Timetable, TimetableKey, User,
};

/// Maximum number of complaints a single student may accumulate.
pub const MAX_COMPLAINTS_PER_STUDENT: i64 = 5;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Inserts users in one transaction, skipping emails that already exist.
/// Returns the number of rows actually inserted.
pub async fn insert_users(pool: &SqlitePool, users: &[NewUser]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for user in users {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, hashed_password, role, gender, student_type, department, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.role)
        .bind(user.gender)
        .bind(user.student_type)
        .bind(&user.department)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_students(pool: &SqlitePool) -> Result<Vec<StudentSummary>, sqlx::Error> {
    sqlx::query_as::<_, StudentSummary>(
        "SELECT id, name, email, department FROM users WHERE role = 'STUDENT' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Lists users newest first, optionally keeping only emails that contain
/// `email_filter` (case-insensitive).
pub async fn list_users(pool: &SqlitePool, email_filter: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
    match email_filter {
        Some(needle) => {
            sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE instr(lower(email), lower(?)) > 0 ORDER BY created_at DESC",
            )
            .bind(needle)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        }
    }
}

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

pub async fn complaints_for_student(pool: &SqlitePool, student_id: &str) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(
        "SELECT * FROM complaints WHERE student_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// All complaints grouped by student id, newest first within each group.
pub async fn complaints_by_student(pool: &SqlitePool) -> Result<HashMap<String, Vec<Complaint>>, sqlx::Error> {
    let complaints = sqlx::query_as::<_, Complaint>(
        "SELECT * FROM complaints ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<String, Vec<Complaint>> = HashMap::new();
    for complaint in complaints {
        grouped
            .entry(complaint.student_id.clone())
            .or_default()
            .push(complaint);
    }
    Ok(grouped)
}

pub async fn complaints_with_department(pool: &SqlitePool) -> Result<Vec<ComplaintWithDepartment>, sqlx::Error> {
    sqlx::query_as::<_, ComplaintWithDepartment>(
        "SELECT c.*, u.department FROM complaints c JOIN users u ON u.id = c.student_id
         ORDER BY c.created_at",
    )
    .fetch_all(pool)
    .await
}

/// Files a complaint unless the student already holds the maximum.
/// Returns `None` when the cap is reached.
///
/// The count and the insert run as one statement so concurrent writers take
/// the write lock up front.
pub async fn insert_complaint_capped(
    pool: &SqlitePool,
    student_id: &str,
    reason: &str,
    photo: &str,
) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(
        "INSERT INTO complaints (student_id, reason, photo, created_at)
         SELECT ?, ?, ?, ?
         WHERE (SELECT COUNT(*) FROM complaints WHERE student_id = ?) < ?
         RETURNING *",
    )
    .bind(student_id)
    .bind(reason)
    .bind(photo)
    .bind(Utc::now())
    .bind(student_id)
    .bind(MAX_COMPLAINTS_PER_STUDENT)
    .fetch_optional(pool)
    .await
}

pub async fn delete_complaint(pool: &SqlitePool, id: i64) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>("DELETE FROM complaints WHERE id = ? RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}

// ---------------------------------------------------------------------------
// Outpasses
// ---------------------------------------------------------------------------

pub async fn insert_outpass(pool: &SqlitePool, outpass: &NewOutpass) -> Result<Outpass, sqlx::Error> {
    sqlx::query_as::<_, Outpass>(
        "INSERT INTO outpasses (student_id, reason, village, phone_number, photo, duration, approved, returned, created_at)
         VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?)
         RETURNING *",
    )
    .bind(&outpass.student_id)
    .bind(&outpass.reason)
    .bind(&outpass.village)
    .bind(&outpass.phone_number)
    .bind(&outpass.photo)
    .bind(&outpass.duration)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn find_outpass(pool: &SqlitePool, id: i64) -> Result<Option<Outpass>, sqlx::Error> {
    sqlx::query_as::<_, Outpass>("SELECT * FROM outpasses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_outpasses(pool: &SqlitePool) -> Result<Vec<OutpassListing>, sqlx::Error> {
    sqlx::query_as::<_, OutpassListing>(
        "SELECT o.*, u.name, u.email, u.department
         FROM outpasses o JOIN users u ON u.id = o.student_id
         ORDER BY o.created_at DESC, o.id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn outpasses_for_student(pool: &SqlitePool, student_id: &str) -> Result<Vec<Outpass>, sqlx::Error> {
    sqlx::query_as::<_, Outpass>(
        "SELECT * FROM outpasses WHERE student_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub async fn set_outpass_approval(
    pool: &SqlitePool,
    id: i64,
    approved: bool,
    approved_by: &str,
) -> Result<Option<Outpass>, sqlx::Error> {
    sqlx::query_as::<_, Outpass>(
        "UPDATE outpasses SET approved = ?, approved_by = ? WHERE id = ? RETURNING *",
    )
    .bind(approved)
    .bind(approved_by)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn record_gate_movement(
    pool: &SqlitePool,
    id: i64,
    update: &GateUpdate,
) -> Result<Option<Outpass>, sqlx::Error> {
    sqlx::query_as::<_, Outpass>(
        "UPDATE outpasses SET
             checked_out_at = COALESCE(?, checked_out_at),
             checked_in_at = COALESCE(?, checked_in_at),
             returned = COALESCE(?, returned)
         WHERE id = ?
         RETURNING *",
    )
    .bind(update.checked_out_at)
    .bind(update.checked_in_at)
    .bind(update.returned)
    .bind(id)
    .fetch_optional(pool)
    .await
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

pub async fn insert_attendance(
    pool: &SqlitePool,
    student_id: &str,
    month: &str,
    percentage: f64,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "INSERT INTO attendance (student_id, month, percentage, created_at) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(student_id)
    .bind(month)
    .bind(percentage)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn update_attendance(
    pool: &SqlitePool,
    id: i64,
    month: Option<&str>,
    percentage: Option<f64>,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "UPDATE attendance SET month = COALESCE(?, month), percentage = COALESCE(?, percentage)
         WHERE id = ? RETURNING *",
    )
    .bind(month)
    .bind(percentage)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was removed.
pub async fn delete_attendance(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn attendance_for_student(pool: &SqlitePool, student_id: &str) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE student_id = ? ORDER BY created_at, id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

// ---------------------------------------------------------------------------
// Timetables
// ---------------------------------------------------------------------------

pub async fn find_timetable(pool: &SqlitePool, key: &TimetableKey) -> Result<Option<Timetable>, sqlx::Error> {
    sqlx::query_as::<_, Timetable>(
        "SELECT * FROM timetables WHERE department = ? AND year = ? AND semester = ?",
    )
    .bind(&key.department)
    .bind(key.year)
    .bind(key.semester)
    .fetch_optional(pool)
    .await
}

/// Creates a timetable; `None` if one already exists for `key`.
pub async fn insert_timetable(
    pool: &SqlitePool,
    key: &TimetableKey,
    periods: &PeriodGrid,
) -> Result<Option<Timetable>, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Timetable>(
        "INSERT INTO timetables (department, year, semester, periods, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT (department, year, semester) DO NOTHING
         RETURNING *",
    )
    .bind(&key.department)
    .bind(key.year)
    .bind(key.semester)
    .bind(Json(periods))
    .bind(now)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn update_timetable(
    pool: &SqlitePool,
    key: &TimetableKey,
    periods: &PeriodGrid,
) -> Result<Option<Timetable>, sqlx::Error> {
    sqlx::query_as::<_, Timetable>(
        "UPDATE timetables SET periods = ?, updated_at = ?
         WHERE department = ? AND year = ? AND semester = ?
         RETURNING *",
    )
    .bind(Json(periods))
    .bind(Utc::now())
    .bind(&key.department)
    .bind(key.year)
    .bind(key.semester)
    .fetch_optional(pool)
    .await
}
