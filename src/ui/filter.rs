use chrono::NaiveDate;

use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Client-side predicates over the fetched list; empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
    /// Inclusive range on the start date.
    pub start_between: Option<(NaiveDate, NaiveDate)>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.employee_id.as_deref().is_none_or(str::is_empty)
            && self.status.is_none()
            && self.start_between.is_none()
    }

    pub fn matches(&self, leave: &LeaveRequest) -> bool {
        let employee_ok = match self.employee_id.as_deref() {
            Some(id) if !id.is_empty() => leave.employee_id == id,
            _ => true,
        };
        let status_ok = self.status.is_none_or(|s| leave.status == s);
        let range_ok = self
            .start_between
            .is_none_or(|(from, to)| leave.start_date >= from && leave.start_date <= to);

        employee_ok && status_ok && range_ok
    }

    pub fn apply<'a>(&self, rows: &'a [LeaveRequest]) -> Vec<&'a LeaveRequest> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}
