//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Types that leave the API are `Serialize`; the full
//! [`User`] row is not, since it carries the password hash.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use thiserror::Error;

/// Placeholder image stored for complaints filed without a photo.
pub const PLACEHOLDER_PHOTO: &str = "https://via.placeholder.com/320x240.png?text=No+Photo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Admin,
    Warden,
    Watchman,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Residence type of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentType {
    Hosteler,
    DayScholar,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Admin => "ADMIN",
            Role::Warden => "WARDEN",
            Role::Watchman => "WATCHMAN",
            Role::Super => "SUPER",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "ADMIN" => Ok(Role::Admin),
            "WARDEN" => Ok(Role::Warden),
            "WATCHMAN" => Ok(Role::Watchman),
            "SUPER" => Ok(Role::Super),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            _ => Err(UnknownVariant {
                kind: "gender",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for StudentType {
    type Err = UnknownVariant;

    /// Accepts `day-scholar` as well as `DAY_SCHOLAR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_uppercase().as_str() {
            "HOSTELER" => Ok(StudentType::Hosteler),
            "DAY_SCHOLAR" => Ok(StudentType::DayScholar),
            _ => Err(UnknownVariant {
                kind: "type",
                value: s.to_string(),
            }),
        }
    }
}

/// A full `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
    pub gender: Gender,
    pub student_type: StudentType,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub student_type: StudentType,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            gender: user.gender,
            student_type: user.student_type,
            department: user.department,
            created_at: user.created_at,
        }
    }
}

/// A user about to be inserted, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
    pub gender: Gender,
    pub student_type: StudentType,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Complaint {
    pub id: i64,
    pub student_id: String,
    pub reason: String,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ComplaintWithDepartment {
    #[sqlx(flatten)]
    pub complaint: Complaint,
    pub department: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileWithComplaints {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Outpass {
    pub id: i64,
    pub student_id: String,
    pub reason: String,
    pub village: String,
    pub phone_number: String,
    pub photo: String,
    pub duration: String,
    pub approved: bool,
    pub returned: bool,
    pub approved_by: Option<String>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OutpassStudent {
    pub name: String,
    pub email: String,
    pub department: String,
}

/// An outpass joined with the student who requested it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OutpassListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub outpass: Outpass,
    #[sqlx(flatten)]
    pub student: OutpassStudent,
}

#[derive(Debug, Clone)]
pub struct NewOutpass {
    pub student_id: String,
    pub reason: String,
    pub village: String,
    pub phone_number: String,
    pub photo: String,
    pub duration: String,
}

/// Gate movements recorded by a watchman. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct GateUpdate {
    pub checked_out_at: Option<DateTime<Utc>>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub returned: Option<bool>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub student_id: String,
    pub month: String,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// Weekly grid: one row per teaching day, one cell per slot.
pub type PeriodGrid = Vec<Vec<String>>;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Timetable {
    pub id: i64,
    pub department: String,
    pub year: i64,
    pub semester: i64,
    pub periods: Json<PeriodGrid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Natural key of a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableKey {
    pub department: String,
    pub year: i64,
    pub semester: i64,
}
