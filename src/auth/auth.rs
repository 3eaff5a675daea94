use crate::error::ApiError;
use crate::model::role::Capabilities;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub caller_id: String,
    pub caps: Capabilities,
}

impl AuthUser {
    pub fn new(caller_id: impl Into<String>, roles: &[String]) -> Self {
        AuthUser {
            caller_id: caller_id.into(),
            caps: Capabilities::from_claims(roles),
        }
    }

    pub fn require_elevated(&self) -> Result<(), ApiError> {
        if self.caps.is_elevated() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Manager/Admin only".into()))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Reads the caller resolved by `auth_middleware`.
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing token".into())),
        )
    }
}
