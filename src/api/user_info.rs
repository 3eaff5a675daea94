use crate::{auth::auth::AuthUser, model::user_info::UserInfo};
use actix_web::{HttpResponse, Responder};
use tracing::debug;

/// Role summary for the logged-in caller
#[utoipa::path(
    post,
    path = "/odata/v4/employee/userInfo",
    responses(
        (status = 200, description = "Role summary of the caller", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn user_info(auth: AuthUser) -> impl Responder {
    let info = UserInfo::new(&auth.caller_id, &auth.caps);
    debug!(caller = %info.id, roles = ?info.roles, "User info requested");
    HttpResponse::Ok().json(info)
}
