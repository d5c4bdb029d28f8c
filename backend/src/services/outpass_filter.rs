//! Server-side filtering of outpass listings.
//!
//! Wardens narrow the list by student name, department, reason and request
//! date; watchmen only need approved outpasses whose student has not yet
//! returned. All filters are optional and combine with AND.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::models::OutpassListing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    All,
    Approved,
    Pending,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutpassQuery {
    pub status: Option<ApprovalStatus>,
    /// Approved and not yet returned.
    pub awaiting_return: Option<bool>,
    /// Case-insensitive substring of the student's name.
    pub search: Option<String>,
    pub department: Option<String>,
    /// Case-insensitive substring of the outpass reason.
    pub reason: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl OutpassQuery {
    pub fn matches(&self, listing: &OutpassListing) -> bool {
        let outpass = &listing.outpass;

        let status_ok = match self.status.unwrap_or_default() {
            ApprovalStatus::All => true,
            ApprovalStatus::Approved => outpass.approved,
            ApprovalStatus::Pending => !outpass.approved,
        };

        let awaiting_ok = match self.awaiting_return {
            Some(true) => outpass.approved && !outpass.returned,
            _ => true,
        };

        let search_ok = non_blank(&self.search).map_or(true, |s| contains_ignore_case(&listing.student.name, s));
        let department_ok = non_blank(&self.department).map_or(true, |d| listing.student.department == d);
        let reason_ok = non_blank(&self.reason).map_or(true, |r| contains_ignore_case(&outpass.reason, r));

        let day = outpass.created_at.date_naive();
        let from_ok = self.from.map_or(true, |from| day >= from);
        let to_ok = self.to.map_or(true, |to| day <= to);

        status_ok && awaiting_ok && search_ok && department_ok && reason_ok && from_ok && to_ok
    }

    pub fn apply(&self, listings: Vec<OutpassListing>) -> Vec<OutpassListing> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Outpass, OutpassStudent};
    use chrono::{TimeZone, Utc};

    fn listing(id: i64, name: &str, department: &str, reason: &str, approved: bool, returned: bool, day: u32) -> OutpassListing {
        OutpassListing {
            outpass: Outpass {
                id,
                student_id: format!("s{id}"),
                reason: reason.to_string(),
                village: "Nellore".to_string(),
                phone_number: "9000000000".to_string(),
                photo: "photo".to_string(),
                duration: "2 days".to_string(),
                approved,
                returned,
                approved_by: None,
                checked_out_at: None,
                checked_in_at: None,
                created_at: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
            },
            student: OutpassStudent {
                name: name.to_string(),
                email: format!("{}@campus.edu", name.to_lowercase()),
                department: department.to_string(),
            },
        }
    }

    fn sample() -> Vec<OutpassListing> {
        vec![
            listing(1, "Anil", "CSE", "Family function", true, false, 1),
            listing(2, "Bhavya", "ECE", "Medical", false, false, 5),
            listing(3, "Charan", "CSE", "Festival", true, true, 10),
        ]
    }

    fn ids(listings: &[OutpassListing]) -> Vec<i64> {
        listings.iter().map(|l| l.outpass.id).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        assert_eq!(ids(&OutpassQuery::default().apply(sample())), vec![1, 2, 3]);
    }

    #[test]
    fn test_status_filters() {
        let pending = OutpassQuery {
            status: Some(ApprovalStatus::Pending),
            ..Default::default()
        };
        assert_eq!(ids(&pending.apply(sample())), vec![2]);

        let approved = OutpassQuery {
            status: Some(ApprovalStatus::Approved),
            ..Default::default()
        };
        assert_eq!(ids(&approved.apply(sample())), vec![1, 3]);
    }

    #[test]
    fn test_awaiting_return_for_watchman() {
        let query = OutpassQuery {
            awaiting_return: Some(true),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec![1]);
    }

    #[test]
    fn test_text_filters_are_case_insensitive() {
        let query = OutpassQuery {
            search: Some("CHAR".to_string()),
            reason: Some("fest".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec![3]);

        let by_department = OutpassQuery {
            department: Some("CSE".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_department.apply(sample())), vec![1, 3]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let query = OutpassQuery {
            from: NaiveDate::from_ymd_opt(2025, 3, 5),
            to: NaiveDate::from_ymd_opt(2025, 3, 10),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec![2, 3]);

        let open_start = OutpassQuery {
            to: NaiveDate::from_ymd_opt(2025, 3, 5),
            ..Default::default()
        };
        assert_eq!(ids(&open_start.apply(sample())), vec![1, 2]);
    }
}
