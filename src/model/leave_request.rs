use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum LeaveStatus {
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Pending,
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Approved,
    #[serde(rename = "R")]
    #[strum(serialize = "R")]
    Rejected,
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    Cancelled,
}

impl LeaveStatus {
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Cancelled => "Cancelled",
        }
    }

    /// Only pending requests move, and only to a final state.
    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        *self == LeaveStatus::Pending && next != LeaveStatus::Pending
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum LeaveType {
    #[serde(rename = "AL")]
    #[strum(serialize = "AL")]
    Annual,
    #[serde(rename = "SL")]
    #[strum(serialize = "SL")]
    Sick,
    #[serde(rename = "CL")]
    #[strum(serialize = "CL")]
    Casual,
}

impl LeaveType {
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Annual => "Annual Leave",
            LeaveType::Sick => "Sick Leave",
            LeaveType::Casual => "Casual Leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "ID": "LVR_001",
    "employee_ID": "E001",
    "startDate": "2024-01-01",
    "endDate": "2024-01-02",
    "reason": "trip",
    "status_code": "P",
    "type_code": "AL"
}))]
pub struct LeaveRequest {
    #[serde(rename = "ID")]
    #[schema(example = "LVR_001")]
    pub id: String,

    #[serde(rename = "employee_ID")]
    #[schema(example = "E001")]
    pub employee_id: String,

    #[serde(rename = "startDate")]
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[serde(rename = "endDate")]
    #[schema(example = "2024-01-02", format = "date", value_type = String)]
    pub end_date: NaiveDate,

    #[schema(example = "trip")]
    pub reason: String,

    #[serde(rename = "status_code")]
    pub status: LeaveStatus,

    #[serde(rename = "type_code")]
    pub leave_type: LeaveType,
}

/// Raw `leave_requests` row; codes are stored as plain strings.
#[derive(Debug, sqlx::FromRow)]
pub struct LeaveRow {
    pub id: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status_code: String,
    pub type_code: String,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = anyhow::Error;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = row
            .status_code
            .parse()
            .map_err(|_| {
                anyhow::anyhow!("unknown status code {:?} on {}", row.status_code, row.id)
            })?;
        let leave_type = row
            .type_code
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown type code {:?} on {}", row.type_code, row.id))?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            leave_type,
        })
    }
}
