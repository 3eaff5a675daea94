use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web::Data};
use chrono::NaiveDate;
use serde_json::{Value, json};

use leave_service::aqi::WeatherApiClient;
use leave_service::auth::jwt::generate_access_token;
use leave_service::config::Config;
use leave_service::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use leave_service::routes;
use leave_service::store::{LeaveRepository, MemoryStore};

const SECRET: &str = "integration-secret";
const BASE: &str = "/odata/v4/employee";

fn leave(id: &str, employee: &str, status: LeaveStatus) -> LeaveRequest {
    LeaveRequest {
        id: id.into(),
        employee_id: employee.into(),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        reason: "seeded".into(),
        status,
        leave_type: LeaveType::Casual,
    }
}

fn seeded_store() -> Arc<dyn LeaveRepository> {
    let store = MemoryStore::with_demo_employees();
    store
        .seed_leaves(vec![
            leave("LVR_001", "E001", LeaveStatus::Pending),
            leave("LVR_002", "E002", LeaveStatus::Pending),
            leave("LVR_003", "E001", LeaveStatus::Approved),
        ])
        .unwrap();
    Arc::new(store)
}

fn bearer(caller: &str, roles: &[&str]) -> (&'static str, String) {
    let token = generate_access_token(caller, roles, SECRET, 3600).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! app {
    ($repo:expr) => {{
        let config = Config::for_memory(SECRET);
        let weather = WeatherApiClient::new(config.weather_api_url.clone(), None);
        test::init_service(
            App::new()
                .app_data(Data::new(config.clone()))
                .app_data(Data::from($repo))
                .app_data(Data::new(weather))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

fn ids(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ID"].as_str().unwrap())
        .collect()
}

#[actix_web::test]
async fn employee_creates_pending_request_for_own_profile() {
    let app = app!(seeded_store());

    let req = test::TestRequest::post()
        .uri(&format!("{BASE}/LeaveRequests"))
        .insert_header(bearer("employee", &["employee"]))
        .set_json(json!({
            "ID": "LVR_999",
            "employee_ID": "E002",
            "startDate": "2024-07-01",
            "endDate": "2024-07-03",
            "reason": "vacation",
            "status_code": "A",
            "type_code": "AL"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_ID"], "E001");
    assert_eq!(body["status_code"], "P");
    assert_eq!(body["ID"], "LVR_004");
}

#[actix_web::test]
async fn admin_sees_everyone_and_employee_sees_own_rows() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests"))
        .insert_header(bearer("admin", &["admin"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
    assert_eq!(ids(&body), ["LVR_001", "LVR_002", "LVR_003"]);

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body), ["LVR_001", "LVR_003"]);

    // explicit filter for someone else still stays inside the caller's rows
    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests?employee_ID=E002"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn caller_is_matched_to_employee_by_first_name() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests?status_code=P"))
        .insert_header(bearer("Jane", &["employee"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body), ["LVR_002"]);
}

#[actix_web::test]
async fn employee_cannot_approve_but_manager_can_once() {
    let app = app!(seeded_store());
    let uri = format!("{BASE}/LeaveRequests/LVR_001");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer("employee", &["employee"]))
        .set_json(json!({ "status_code": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Manager/Admin only");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer("manager", &["manager", "employee"]))
        .set_json(json!({ "status_code": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], "A");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer("manager", &["manager"]))
        .set_json(json!({ "status_code": "R" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn owner_may_cancel_pending_request() {
    let app = app!(seeded_store());

    let req = test::TestRequest::patch()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("employee", &["employee"]))
        .set_json(json!({ "status_code": "C" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status_code"], "C");

    let req = test::TestRequest::patch()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("manager", &["manager"]))
        .set_json(json!({ "status_code": "P" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_keeps_identity_and_delete_respects_ownership() {
    let app = app!(seeded_store());

    let req = test::TestRequest::put()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("employee", &["employee"]))
        .set_json(json!({
            "ID": "LVR_777",
            "employee_ID": "E002",
            "startDate": "2024-04-05",
            "endDate": "2024-04-06",
            "reason": "moved",
            "status_code": "P",
            "type_code": "SL"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ID"], "LVR_001");
    assert_eq!(body["employee_ID"], "E001");
    assert_eq!(body["type_code"], "SL");

    let req = test::TestRequest::delete()
        .uri(&format!("{BASE}/LeaveRequests/LVR_002"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("admin", &["admin"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rejects_inverted_dates() {
    let app = app!(seeded_store());

    let req = test::TestRequest::post()
        .uri(&format!("{BASE}/LeaveRequests"))
        .insert_header(bearer("employee", &["employee"]))
        .set_json(json!({
            "startDate": "2024-07-03",
            "endDate": "2024-07-01",
            "reason": "oops",
            "type_code": "AL"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn user_info_without_roles_reports_no_flags() {
    let app = app!(seeded_store());

    let req = test::TestRequest::post()
        .uri(&format!("{BASE}/userInfo"))
        .insert_header(bearer("alice", &[]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({
            "id": "alice",
            "roles": [],
            "isAdmin": false,
            "isManager": false,
            "isEmployee": false
        })
    );
}

#[actix_web::test]
async fn aqi_without_key_is_unavailable() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/aqi?city=Pune"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["available"], false);
}

#[actix_web::test]
async fn value_help_lists_codes() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveTypes"))
        .insert_header(bearer("employee", &["employee"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["code"], "AL");
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

fn put_body(reason: &str, status: &str) -> Value {
    json!({
        "startDate": "2024-04-01",
        "endDate": "2024-04-03",
        "reason": reason,
        "status_code": status,
        "type_code": "AL"
    })
}

#[actix_web::test]
async fn huge_page_number_is_rejected_not_overflowed() {
    let app = app!(seeded_store());

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests?page=18446744073709551615&per_page=100"))
        .insert_header(bearer("admin", &["admin"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // single-row pages reach the last page number without overflow and echo it back
    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests?page=18446744073709551615&per_page=1"))
        .insert_header(bearer("admin", &["admin"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], u64::MAX);
    assert_eq!(body["per_page"], 1);
    assert_eq!(body["total"], 3);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn admin_holding_employee_role_still_sees_and_approves_all() {
    let app = app!(seeded_store());
    let admin = bearer("admin", &["admin", "employee"]);

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests"))
        .insert_header(admin.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);

    let req = test::TestRequest::patch()
        .uri(&format!("{BASE}/LeaveRequests/LVR_002"))
        .insert_header(admin)
        .set_json(json!({ "status_code": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_ID"], "E002");
    assert_eq!(body["status_code"], "A");
}

#[actix_web::test]
async fn put_with_status_change_follows_patch_rules() {
    let app = app!(seeded_store());

    let req = test::TestRequest::put()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("employee", &["employee"]))
        .set_json(put_body("self approval", "A"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("manager", &["manager"]))
        .set_json(put_body("overlaps release", "R"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status_code"], "R");
    assert_eq!(body["reason"], "overlaps release");
    assert_eq!(body["endDate"], "2024-04-03");

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests/LVR_001"))
        .insert_header(bearer("admin", &["admin"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status_code"], "R");
    assert_eq!(body["type_code"], "AL");
}

#[actix_web::test]
async fn put_status_change_on_processed_row_changes_nothing() {
    let app = app!(seeded_store());

    let req = test::TestRequest::put()
        .uri(&format!("{BASE}/LeaveRequests/LVR_003"))
        .insert_header(bearer("manager", &["manager"]))
        .set_json(put_body("too late", "R"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("{BASE}/LeaveRequests/LVR_003"))
        .insert_header(bearer("manager", &["manager"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status_code"], "A");
    assert_eq!(body["reason"], "seeded");
    assert_eq!(body["endDate"], "2024-04-02");
}

#[actix_web::test]
async fn admin_files_on_behalf_of_existing_employees_only() {
    let app = app!(seeded_store());
    let create = |employee: Option<&str>| {
        let mut body = json!({
            "startDate": "2024-08-01",
            "endDate": "2024-08-02",
            "reason": "conference",
            "type_code": "CL"
        });
        if let Some(id) = employee {
            body["employee_ID"] = json!(id);
        }
        test::TestRequest::post()
            .uri(&format!("{BASE}/LeaveRequests"))
            .insert_header(bearer("admin", &["admin"]))
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(&app, create(Some("E002"))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_ID"], "E002");

    let body: Value = test::call_and_read_body_json(&app, create(None)).await;
    assert_eq!(body["employee_ID"], "A001");

    let resp = test::call_service(&app, create(Some("E999"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unknown employee_ID E999");
}
