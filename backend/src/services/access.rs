//! Role, gender and residence-type allow-lists for the portal's dashboards.
//!
//! Every dashboard is guarded by an [`AccessPolicy`]. Handlers check the
//! policy of the dashboard whose operation they implement, so the API
//! enforces the same gates the portal pages do.

use serde::Serialize;

use crate::auth::models::SessionUser;
use crate::database::models::{Gender, Role, StudentType};
use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub roles: &'static [Role],
    pub genders: Option<&'static [Gender]>,
    pub types: Option<&'static [StudentType]>,
}

impl AccessPolicy {
    pub const fn roles(roles: &'static [Role]) -> Self {
        Self {
            roles,
            genders: None,
            types: None,
        }
    }

    pub const fn with_genders(self, genders: &'static [Gender]) -> Self {
        Self {
            genders: Some(genders),
            ..self
        }
    }

    pub const fn with_types(self, types: &'static [StudentType]) -> Self {
        Self {
            types: Some(types),
            ..self
        }
    }

    /// Role must be listed; gender and type only when the policy restricts them.
    pub fn permits(&self, user: &SessionUser) -> bool {
        self.roles.contains(&user.role)
            && self.genders.map_or(true, |g| g.contains(&user.gender))
            && self.types.map_or(true, |t| t.contains(&user.student_type))
    }

    pub fn authorize(&self, user: &SessionUser) -> ApiResult<()> {
        if self.permits(user) {
            Ok(())
        } else {
            tracing::debug!(user = %user.email, role = %user.role, "access denied");
            Err(ApiError::Forbidden)
        }
    }

    /// Lets a student act on their own records, everyone else goes through the policy.
    pub fn authorize_self_or(&self, user: &SessionUser, student_id: &str) -> ApiResult<()> {
        if user.id == student_id {
            return Ok(());
        }
        self.authorize(user)
    }
}

const ANY_GENDER: &[Gender] = &[Gender::Male, Gender::Female];

/// Staff allowed to read any student's records.
pub const STUDENT_RECORDS: AccessPolicy = AccessPolicy::roles(&[Role::Admin, Role::Super, Role::Warden]);

/// Staff allowed to see every outpass.
pub const OUTPASS_STAFF: AccessPolicy =
    AccessPolicy::roles(&[Role::Admin, Role::Warden, Role::Watchman, Role::Super]);

/// Staff allowed to read a student's attendance.
pub const ATTENDANCE_READERS: AccessPolicy = AccessPolicy::roles(&[Role::Admin, Role::Super]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Student,
    Admin,
    Attendance,
    Timetable,
    Users,
    HostelRequest,
    HostelDetails,
    Warden,
    Watchman,
    Super,
}

impl Dashboard {
    pub const ALL: [Dashboard; 10] = [
        Dashboard::Student,
        Dashboard::Admin,
        Dashboard::Attendance,
        Dashboard::Timetable,
        Dashboard::Users,
        Dashboard::HostelRequest,
        Dashboard::HostelDetails,
        Dashboard::Warden,
        Dashboard::Watchman,
        Dashboard::Super,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Dashboard::Student => "/student",
            Dashboard::Admin => "/admin",
            Dashboard::Attendance => "/attendance",
            Dashboard::Timetable => "/timetable",
            Dashboard::Users => "/users",
            Dashboard::HostelRequest => "/hostel-request",
            Dashboard::HostelDetails => "/all-details",
            Dashboard::Warden => "/warden",
            Dashboard::Watchman => "/watchman",
            Dashboard::Super => "/super",
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        match self {
            Dashboard::Student => AccessPolicy::roles(&[Role::Student]).with_genders(ANY_GENDER),
            Dashboard::Admin => AccessPolicy::roles(&[Role::Admin, Role::Super]).with_genders(ANY_GENDER),
            Dashboard::Attendance => AccessPolicy::roles(&[Role::Admin]),
            Dashboard::Timetable => AccessPolicy::roles(&[Role::Admin]),
            Dashboard::Users => AccessPolicy::roles(&[Role::Admin, Role::Super]),
            Dashboard::HostelRequest => {
                AccessPolicy::roles(&[Role::Student]).with_types(&[StudentType::Hosteler])
            }
            Dashboard::HostelDetails => AccessPolicy::roles(&[Role::Admin, Role::Warden]),
            Dashboard::Warden => AccessPolicy::roles(&[Role::Warden]).with_types(&[StudentType::Hosteler]),
            Dashboard::Watchman => AccessPolicy::roles(&[Role::Watchman]).with_genders(&[Gender::Male]),
            Dashboard::Super => AccessPolicy::roles(&[Role::Super]),
        }
    }

    pub fn authorize(&self, user: &SessionUser) -> ApiResult<()> {
        self.policy().authorize(user)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub name: Dashboard,
    pub path: &'static str,
}

/// Landing page after login.
pub fn home_for(role: Role) -> &'static str {
    match role {
        Role::Student => Dashboard::Student.path(),
        Role::Admin => Dashboard::Admin.path(),
        Role::Warden => Dashboard::Warden.path(),
        Role::Watchman => Dashboard::Watchman.path(),
        Role::Super => Dashboard::Super.path(),
    }
}

pub fn accessible_dashboards(user: &SessionUser) -> Vec<DashboardView> {
    Dashboard::ALL
        .iter()
        .filter(|d| d.policy().permits(user))
        .map(|d| DashboardView {
            name: *d,
            path: d.path(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, gender: Gender, student_type: StudentType) -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            name: "Test".to_string(),
            email: "test@campus.edu".to_string(),
            role,
            gender,
            student_type,
            department: "CSE".to_string(),
        }
    }

    #[test]
    fn test_role_only_policy_ignores_gender_and_type() {
        let admin = user(Role::Admin, Gender::Female, StudentType::DayScholar);
        assert!(Dashboard::Attendance.policy().permits(&admin));
        assert!(!Dashboard::Super.policy().permits(&admin));
    }

    #[test]
    fn test_watchman_must_be_male() {
        let male = user(Role::Watchman, Gender::Male, StudentType::DayScholar);
        let female = user(Role::Watchman, Gender::Female, StudentType::DayScholar);
        assert!(Dashboard::Watchman.authorize(&male).is_ok());
        assert!(matches!(
            Dashboard::Watchman.authorize(&female),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_hostel_request_needs_hosteler_student() {
        let hosteler = user(Role::Student, Gender::Male, StudentType::Hosteler);
        let scholar = user(Role::Student, Gender::Male, StudentType::DayScholar);
        assert!(Dashboard::HostelRequest.policy().permits(&hosteler));
        assert!(!Dashboard::HostelRequest.policy().permits(&scholar));
    }

    #[test]
    fn test_self_access_bypasses_policy() {
        let student = user(Role::Student, Gender::Female, StudentType::Hosteler);
        assert!(STUDENT_RECORDS.authorize_self_or(&student, "u1").is_ok());
        assert!(STUDENT_RECORDS.authorize_self_or(&student, "someone-else").is_err());
    }

    #[test]
    fn test_home_for_each_role() {
        assert_eq!(home_for(Role::Student), "/student");
        assert_eq!(home_for(Role::Admin), "/admin");
        assert_eq!(home_for(Role::Warden), "/warden");
        assert_eq!(home_for(Role::Watchman), "/watchman");
        assert_eq!(home_for(Role::Super), "/super");
    }

    #[test]
    fn test_accessible_dashboards_for_super() {
        let sup = user(Role::Super, Gender::Male, StudentType::DayScholar);
        let names: Vec<Dashboard> = accessible_dashboards(&sup).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec![Dashboard::Admin, Dashboard::Users, Dashboard::Super]);
    }
}
