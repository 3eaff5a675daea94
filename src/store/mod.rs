//! Storage seam for leave requests and the employee directory.
//!
//! [`MySqlStore`] backs production; [`MemoryStore`] serves local runs and tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Read predicate for the leave request collection.
///
/// `owner` is the authorization predicate derived from the caller's scope;
/// the remaining fields are caller-supplied filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveQuery {
    pub owner: Option<String>,
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
    pub start_from: Option<NaiveDate>,
    pub start_to: Option<NaiveDate>,
    pub limit: u64,
    pub offset: u64,
}

impl LeaveQuery {
    pub fn matches(&self, leave: &LeaveRequest) -> bool {
        self.owner.as_deref().is_none_or(|o| leave.employee_id == o)
            && self.employee_id.as_deref().is_none_or(|e| leave.employee_id == e)
            && self.status.is_none_or(|s| leave.status == s)
            && self.start_from.is_none_or(|d| leave.start_date >= d)
            && self.start_to.is_none_or(|d| leave.start_date <= d)
    }
}

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    /// First employee (by ID) whose first name contains `fragment`, case-sensitive.
    async fn find_employee_by_name_fragment(&self, fragment: &str) -> Result<Option<Employee>>;

    /// Atomically advances the leave request sequence and returns the new value.
    async fn next_sequence_value(&self) -> Result<u64>;

    /// Highest numeric suffix among IDs shaped `LVR_<digits>`.
    async fn max_leave_number(&self) -> Result<Option<u64>>;

    async fn insert_leave(&self, leave: &LeaveRequest) -> Result<()>;

    /// Page of matching rows plus the total count of matching rows.
    async fn list_leaves(&self, query: &LeaveQuery) -> Result<(Vec<LeaveRequest>, i64)>;

    async fn get_leave(&self, id: &str, owner: Option<&str>) -> Result<Option<LeaveRequest>>;

    /// Replaces dates, reason, type and status in one write, only while the
    /// stored status still equals `expected`; returns affected rows.
    async fn update_leave(&self, leave: &LeaveRequest, expected: LeaveStatus) -> Result<u64>;

    /// Compare-and-set on the status column; returns affected rows.
    async fn update_status(&self, id: &str, from: LeaveStatus, to: LeaveStatus) -> Result<u64>;

    async fn delete_leave(&self, id: &str, owner: Option<&str>) -> Result<u64>;

    async fn employee_exists(&self, id: &str) -> Result<bool>;
}
