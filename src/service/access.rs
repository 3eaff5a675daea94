//! Row visibility for leave request reads and writes.

use tracing::warn;

use crate::auth::auth::AuthUser;
use crate::service::directory::resolve_employee_id;
use crate::store::LeaveRepository;

/// Rows the caller may see, pushed into the store query as an owner predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    All,
    Own(String),
    Nothing,
}

impl AccessScope {
    /// `None` means unrestricted.
    pub fn owner(&self) -> Option<&str> {
        match self {
            AccessScope::Own(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, AccessScope::Nothing)
    }
}

/// Admins and managers see every row, whatever other roles they hold;
/// everyone else sees the rows of the employee they resolve to.
pub async fn resolve_scope(repo: &dyn LeaveRepository, user: &AuthUser) -> AccessScope {
    if user.caps.is_elevated() {
        return AccessScope::All;
    }

    match resolve_employee_id(repo, &user.caller_id).await {
        Some(id) => AccessScope::Own(id),
        None => {
            warn!(caller = %user.caller_id, "No employee record for caller, hiding all rows");
            AccessScope::Nothing
        }
    }
}
