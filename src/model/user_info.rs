use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::{Capabilities, Role};

/// Role summary returned by the `userInfo` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "manager",
    "roles": ["manager", "employee"],
    "isAdmin": false,
    "isManager": true,
    "isEmployee": true
}))]
pub struct UserInfo {
    pub id: String,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<Role>,
    pub is_admin: bool,
    pub is_manager: bool,
    pub is_employee: bool,
}

impl UserInfo {
    pub fn new(id: &str, caps: &Capabilities) -> Self {
        UserInfo {
            id: id.to_string(),
            roles: caps.roles(),
            is_admin: caps.admin,
            is_manager: caps.manager,
            is_employee: caps.employee,
        }
    }

    /// Label shown next to "Logged in as:"; manager wins over admin over employee.
    pub fn display_role(&self) -> &str {
        if self.is_manager {
            "manager"
        } else if self.is_admin {
            "admin"
        } else if self.is_employee {
            "employee"
        } else {
            &self.id
        }
    }

    pub fn has_manager_access(&self) -> bool {
        self.is_manager || self.roles.contains(&Role::Manager)
    }
}
