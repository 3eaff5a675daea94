use crate::{
    api::{aqi, leave_request, user_info, value_help},
    auth::middleware::auth_middleware,
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// Malformed bodies and query strings answer with the same JSON shape as handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let rate_limited = config.rate_protected_per_min > 0;
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.app_data(json_config()).app_data(query_config());

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Condition::new(rate_limited, protected_limiter)) // rate limiting
            .service(web::resource("/userInfo").route(web::post().to(user_info::user_info)))
            .service(web::resource("/aqi").route(web::get().to(aqi::current_aqi)))
            .service(web::resource("/LeaveTypes").route(web::get().to(value_help::leave_types)))
            .service(
                web::resource("/LeaveStatuses").route(web::get().to(value_help::leave_statuses)),
            )
            .service(
                web::scope("/LeaveRequests")
                    // /LeaveRequests
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /LeaveRequests/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::update_leave))
                            .route(web::patch().to(leave_request::patch_leave_status))
                            .route(web::delete().to(leave_request::delete_leave)),
                    ),
            ),
    );
}

// API REQUEST
//  └─ Authorization: Bearer <platform token: sub + roles>
//       ├─ rate limit (per peer IP)
//       ├─ auth_middleware → AuthUser in request extensions
//       └─ handler → AccessScope → LeaveRepository
