use serde::{Deserialize, Serialize};

/// Claims carried by the platform-issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identifier, matched against employee first names.
    pub sub: String,
    /// Role claims, e.g. `["employee"]` or `["manager", "employee"]`.
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
    pub jti: String,
}
