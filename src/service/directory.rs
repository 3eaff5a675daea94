//! Caller → employee resolution.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::auth::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::store::LeaveRepository;

pub const DEFAULT_ADMIN_EMPLOYEE_ID: &str = "A001";

/// Used when no employee's first name contains the caller identifier.
static FALLBACK_EMPLOYEE_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("employee", "E001"),
        ("manager", "E002"),
        ("admin", DEFAULT_ADMIN_EMPLOYEE_ID),
    ])
});

pub fn fallback_employee_id(caller_id: &str) -> Option<&'static str> {
    FALLBACK_EMPLOYEE_IDS.get(caller_id).copied()
}

/// Resolves the caller to an employee ID: first name substring match, then the
/// static table. Store failures are logged and fall through to the table.
pub async fn resolve_employee_id(repo: &dyn LeaveRepository, caller_id: &str) -> Option<String> {
    if !caller_id.is_empty() {
        match repo.find_employee_by_name_fragment(caller_id).await {
            Ok(Some(employee)) => {
                debug!(caller = caller_id, employee_id = %employee.id, "Employee found by name");
                return Some(employee.id);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, caller = caller_id, "Employee lookup failed"),
        }
    }

    let fallback = fallback_employee_id(caller_id).map(str::to_string);
    debug!(caller = caller_id, employee_id = ?fallback, "Using default employee mapping");
    fallback
}

/// Owner stamped on a new leave request. Admins acting without the employee
/// role may file on behalf of any existing employee, defaulting to the admin
/// record.
pub async fn owner_for_create(
    repo: &dyn LeaveRepository,
    user: &AuthUser,
    supplied: Option<&str>,
) -> ApiResult<String> {
    if user.caps.is_admin_only() {
        let Some(id) = supplied.filter(|s| !s.is_empty()) else {
            return Ok(DEFAULT_ADMIN_EMPLOYEE_ID.to_string());
        };
        if !repo.employee_exists(id).await? {
            return Err(ApiError::BadRequest(format!("Unknown employee_ID {id}")));
        }
        return Ok(id.to_string());
    }
    resolve_employee_id(repo, &user.caller_id)
        .await
        .ok_or_else(|| ApiError::Forbidden("No employee profile".into()))
}
