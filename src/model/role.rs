use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn from_claim(claim: &str) -> Option<Self> {
        claim.parse().ok()
    }
}

/// Role flags of the caller, resolved once from the token claims.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Capabilities {
    pub admin: bool,
    pub manager: bool,
    pub employee: bool,
}

impl Capabilities {
    /// Unknown claims are ignored.
    pub fn from_claims<S: AsRef<str>>(claims: &[S]) -> Self {
        let mut caps = Capabilities::default();
        for role in claims.iter().filter_map(|c| Role::from_claim(c.as_ref())) {
            match role {
                Role::Admin => caps.admin = true,
                Role::Manager => caps.manager = true,
                Role::Employee => caps.employee = true,
            }
        }
        caps
    }

    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::Manager => self.manager,
            Role::Employee => self.employee,
        }
    }

    /// Admin acting purely as administrator, not on behalf of an employee record.
    pub fn is_admin_only(&self) -> bool {
        self.admin && !self.employee
    }

    /// Manager or admin.
    pub fn is_elevated(&self) -> bool {
        self.admin || self.manager
    }

    /// Roles held, always in admin, manager, employee order.
    pub fn roles(&self) -> Vec<Role> {
        [Role::Admin, Role::Manager, Role::Employee]
            .into_iter()
            .filter(|r| self.has(*r))
            .collect()
    }
}
