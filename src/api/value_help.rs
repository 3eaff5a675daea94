use crate::model::leave_request::{LeaveStatus, LeaveType};
use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CodeListEntry {
    #[schema(example = "AL")]
    pub code: String,
    #[schema(example = "Annual Leave")]
    pub name: String,
}

pub fn leave_type_codes() -> Vec<CodeListEntry> {
    LeaveType::iter()
        .map(|t| CodeListEntry {
            code: t.code().to_string(),
            name: t.label().to_string(),
        })
        .collect()
}

pub fn leave_status_codes() -> Vec<CodeListEntry> {
    LeaveStatus::iter()
        .map(|s| CodeListEntry {
            code: s.code().to_string(),
            name: s.label().to_string(),
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/odata/v4/employee/LeaveTypes",
    responses((status = 200, description = "Leave type codes", body = [CodeListEntry])),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_types() -> impl Responder {
    HttpResponse::Ok().json(leave_type_codes())
}

#[utoipa::path(
    get,
    path = "/odata/v4/employee/LeaveStatuses",
    responses((status = 200, description = "Leave status codes", body = [CodeListEntry])),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_statuses() -> impl Responder {
    HttpResponse::Ok().json(leave_status_codes())
}
