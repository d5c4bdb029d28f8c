//! Logic for aggregating complaint records into per-day and per-reason counts.
//!
//! Date window rule: with only `from` or only `to` set, the window is that
//! single day; with both set, it is the inclusive range between them.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::ComplaintWithDepartment;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub department: Option<String>,
    /// Exact reason to count.
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintStats {
    pub total: usize,
    pub per_day: Vec<DayCount>,
    pub by_reason: Vec<ReasonCount>,
}

pub fn in_window(day: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (None, None) => true,
        (Some(only), None) | (None, Some(only)) => day == only,
        (Some(from), Some(to)) => from <= day && day <= to,
    }
}

pub fn aggregate(records: &[ComplaintWithDepartment], query: &StatsQuery) -> ComplaintStats {
    let department = query.department.as_deref().filter(|d| !d.trim().is_empty());
    let reason = query.reason.as_deref().filter(|r| !r.trim().is_empty());

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut by_reason: HashMap<&str, usize> = HashMap::new();
    let mut total = 0;

    for record in records {
        let complaint = &record.complaint;
        let day = complaint.created_at.date_naive();

        if !in_window(day, query.from, query.to)
            || department.is_some_and(|d| record.department != d)
            || reason.is_some_and(|r| complaint.reason != r)
        {
            continue;
        }

        total += 1;
        *per_day.entry(day).or_default() += 1;
        *by_reason.entry(complaint.reason.as_str()).or_default() += 1;
    }

    let mut by_reason: Vec<ReasonCount> = by_reason
        .into_iter()
        .map(|(reason, count)| ReasonCount {
            reason: reason.to_string(),
            count,
        })
        .collect();
    by_reason.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));

    ComplaintStats {
        total,
        per_day: per_day
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect(),
        by_reason,
    }
}
