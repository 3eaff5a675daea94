use crate::{
    auth::auth::AuthUser,
    error::{ApiError, ApiResult},
    model::leave_request::{LeaveRequest, LeaveStatus, LeaveType},
    service::{
        access::{AccessScope, resolve_scope},
        directory::owner_for_create,
        id_generator::next_leave_id,
    },
    store::{LeaveQuery, LeaveRepository},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Ignored, the service assigns the ID
    #[serde(rename = "ID", default)]
    #[schema(nullable = true)]
    pub id: Option<String>,
    /// Honored only for admins acting without the employee role
    #[serde(rename = "employee_ID", default)]
    #[schema(example = "E001", nullable = true)]
    pub employee_id: Option<String>,
    #[serde(rename = "startDate")]
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    #[schema(example = "2024-01-02", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default)]
    #[schema(example = "trip")]
    pub reason: String,
    /// Ignored, new requests start pending
    #[serde(rename = "status_code", default)]
    pub status: Option<LeaveStatus>,
    #[serde(rename = "type_code")]
    pub leave_type: LeaveType,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[serde(rename = "startDate")]
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    #[schema(example = "2024-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "type_code")]
    pub leave_type: LeaveType,
    /// A value different from the stored one is handled as a status change
    #[serde(rename = "status_code", default)]
    pub status: Option<LeaveStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct PatchLeaveStatus {
    #[serde(rename = "status_code")]
    pub status: LeaveStatus,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[serde(rename = "employee_ID")]
    #[schema(example = "E001")]
    pub employee_id: Option<String>,
    /// Filter by status code (P, A, R, C)
    #[serde(rename = "status_code")]
    pub status: Option<LeaveStatus>,
    /// Start date lower bound, inclusive
    pub start_from: Option<NaiveDate>,
    /// Start date upper bound, inclusive
    pub start_to: Option<NaiveDate>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    /// Pagination per page number
    pub per_page: Option<u64>,
}

fn validate_leave(start: NaiveDate, end: NaiveDate, reason: &str) -> ApiResult<()> {
    if start > end {
        return Err(ApiError::BadRequest(
            "startDate cannot be after endDate".into(),
        ));
    }
    if reason.trim().is_empty() {
        return Err(ApiError::BadRequest("reason is required".into()));
    }
    Ok(())
}

/// Checks a status change against the lifecycle and the caller's roles.
///
/// Approve and reject need a manager or admin; the owning employee may cancel.
pub fn authorize_status_change(
    auth: &AuthUser,
    scope: &AccessScope,
    current: &LeaveRequest,
    next: LeaveStatus,
) -> ApiResult<()> {
    if next == LeaveStatus::Pending {
        return Err(ApiError::BadRequest(
            "status_code must be one of A, R or C".into(),
        ));
    }
    if !current.status.can_transition_to(next) {
        return Err(ApiError::Conflict(
            "Only pending requests can be approved or rejected".into(),
        ));
    }
    let is_owner = scope.owner() == Some(current.employee_id.as_str());
    if next == LeaveStatus::Cancelled && is_owner {
        return Ok(());
    }
    auth.require_elevated()
}

async fn visible_leave(
    repo: &dyn LeaveRepository,
    scope: &AccessScope,
    leave_id: &str,
) -> ApiResult<LeaveRequest> {
    if scope.is_nothing() {
        return Err(ApiError::NotFound("Leave request not found".into()));
    }
    repo.get_leave(leave_id, scope.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Leave request not found".into()))
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/odata/v4/employee/LeaveRequests",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created", body = LeaveRequest),
        (status = 400, description = "Bad request or unknown employee_ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile for caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    payload: web::Json<CreateLeave>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    validate_leave(payload.start_date, payload.end_date, &payload.reason)?;

    let repo = repo.get_ref();
    let employee_id = owner_for_create(repo, &auth, payload.employee_id.as_deref()).await?;

    if let Some(supplied) = payload.id.as_deref() {
        debug!(supplied, "Discarding caller supplied ID");
    }
    let id = next_leave_id(repo).await;

    let leave = LeaveRequest {
        id,
        employee_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: payload.reason,
        status: LeaveStatus::Pending,
        leave_type: payload.leave_type,
    };

    repo.insert_leave(&leave).await?;
    info!(
        id = %leave.id,
        employee_id = %leave.employee_id,
        caller = %auth.caller_id,
        "Leave request created"
    );

    Ok(HttpResponse::Created().json(leave))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/odata/v4/employee/LeaveRequests",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list visible to the caller",
            body = LeaveListResponse),
        (status = 400, description = "Bad filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    query: web::Query<LeaveFilter>,
) -> ApiResult<HttpResponse> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| ApiError::BadRequest("page is out of range".into()))?;

    let repo = repo.get_ref();
    let scope = resolve_scope(repo, &auth).await;
    debug!(caller = %auth.caller_id, scope = ?scope, "Reading leave requests");

    let (data, total) = if scope.is_nothing() {
        (Vec::new(), 0)
    } else {
        let filter = query.into_inner();
        let leave_query = LeaveQuery {
            owner: scope.owner().map(str::to_string),
            employee_id: filter.employee_id.filter(|e| !e.is_empty()),
            status: filter.status,
            start_from: filter.start_from,
            start_to: filter.start_to,
            limit: per_page,
            offset,
        };
        repo.list_leaves(&leave_query).await?
    };

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/odata/v4/employee/LeaveRequests/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found or not visible",
            body = Object, example = json!({
            "error": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let leave_id = path.into_inner();
    let repo = repo.get_ref();
    let scope = resolve_scope(repo, &auth).await;

    let leave = visible_leave(repo, &scope, &leave_id).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Full update
========================= */
#[utoipa::path(
    put,
    path = "/odata/v4/employee/LeaveRequests/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to update")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave request updated", body = LeaveRequest),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Status change not permitted"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    path: web::Path<String>,
    payload: web::Json<UpdateLeave>,
) -> ApiResult<HttpResponse> {
    let leave_id = path.into_inner();
    let payload = payload.into_inner();
    validate_leave(payload.start_date, payload.end_date, &payload.reason)?;

    let repo = repo.get_ref();
    let scope = resolve_scope(repo, &auth).await;
    let current = visible_leave(repo, &scope, &leave_id).await?;

    let status_change = payload.status.filter(|s| *s != current.status);
    if let Some(next) = status_change {
        authorize_status_change(&auth, &scope, &current, next)?;
    }

    // ID and owner always come from the stored row
    let updated = LeaveRequest {
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: payload.reason,
        leave_type: payload.leave_type,
        status: status_change.unwrap_or(current.status),
        ..current.clone()
    };

    // compare-and-set against the status read above
    if repo.update_leave(&updated, current.status).await? == 0 {
        return Err(ApiError::Conflict(
            "Leave request not found or already processed".into(),
        ));
    }

    info!(
        id = %leave_id,
        caller = %auth.caller_id,
        status = updated.status.code(),
        "Leave request updated"
    );
    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Status-only update
========================= */
#[utoipa::path(
    patch,
    path = "/odata/v4/employee/LeaveRequests/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request")
    ),
    request_body = PatchLeaveStatus,
    responses(
        (status = 200, description = "Status changed", body = LeaveRequest),
        (status = 400, description = "Invalid target status"),
        (status = 403, description = "Manager/Admin only"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed",
            body = Object, example = json!({
            "error": "Only pending requests can be approved or rejected"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn patch_leave_status(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    path: web::Path<String>,
    payload: web::Json<PatchLeaveStatus>,
) -> ApiResult<HttpResponse> {
    let leave_id = path.into_inner();
    let next = payload.status;

    let repo = repo.get_ref();
    let scope = resolve_scope(repo, &auth).await;
    let current = visible_leave(repo, &scope, &leave_id).await?;

    authorize_status_change(&auth, &scope, &current, next)?;

    if repo.update_status(&leave_id, LeaveStatus::Pending, next).await? == 0 {
        return Err(ApiError::Conflict(
            "Leave request not found or already processed".into(),
        ));
    }

    info!(
        id = %leave_id,
        caller = %auth.caller_id,
        status = next.code(),
        "Leave request status changed"
    );
    Ok(HttpResponse::Ok().json(LeaveRequest {
        status: next,
        ..current
    }))
}

#[utoipa::path(
    delete,
    path = "/odata/v4/employee/LeaveRequests/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "error": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    repo: web::Data<dyn LeaveRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let leave_id = path.into_inner();
    let repo = repo.get_ref();
    let scope = resolve_scope(repo, &auth).await;

    if scope.is_nothing() || repo.delete_leave(&leave_id, scope.owner()).await? == 0 {
        return Err(ApiError::NotFound("Leave request not found".into()));
    }

    info!(id = %leave_id, caller = %auth.caller_id, "Leave request deleted");
    Ok(HttpResponse::NoContent().finish())
}
