//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::Utc;
use leavebook_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, Argon2Scheme, api_router};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = ApiState::new(Arc::new(store), Arc::new(Argon2Scheme));
  Router::new().nest("/api", api_router(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

fn staff_body(id: &str) -> Value {
  json!({
    "id": id,
    "name": format!("Staff {id}"),
    "email": format!("{id}@university.edu"),
    "department": "Physics",
    "position": "Lecturer",
    "password": "hunter2",
    "totalLeave": 20,
  })
}

fn leave_body(staff_id: &str, days: i64) -> Value {
  json!({
    "staffId": staff_id,
    "type": "Annual Leave",
    "startDate": "2026-03-02",
    "endDate": "2026-03-06",
    "days": days,
    "reason": "holiday",
  })
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_staff_then_duplicate_returns_existing() {
  let app = app().await;

  let (status, created) = send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["id"], "s1");
  assert_eq!(created["totalLeave"], 20);
  assert!(created.get("password").is_none());
  assert!(created.get("passwordHash").is_none());

  let mut dup = staff_body("s1");
  dup["department"] = json!("History");
  let (status, existing) = send(&app, "POST", "/api/staff", Some(dup)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(existing["department"], "Physics");

  let (_, all) = send(&app, "GET", "/api/staff", None).await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_staff_missing_fields_is_400() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/api/staff",
    Some(json!({ "name": "Nobody", "email": "n@university.edu" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("department"));
}

#[tokio::test]
async fn malformed_json_is_400_with_error_body() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/staff")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_read_body_is_400_with_error_body() {
  let app = app().await;
  let req = Request::builder()
    .method("PUT")
    .uri("/api/notifications/any/read")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"read\": "))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_staff_is_404() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/api/staff/ghost", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("ghost"));

  let (status, _) = send(&app, "GET", "/api/staff/ghost/stats", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, "DELETE", "/api/staff/ghost", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_staff_merges_fields() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, updated) = send(
    &app,
    "PUT",
    "/api/staff/s1",
    Some(json!({ "position": "Professor", "totalLeave": 25 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["position"], "Professor");
  assert_eq!(updated["totalLeave"], 25);
  assert_eq!(updated["name"], "Staff s1");

  let (status, _) = send(&app, "PUT", "/api/staff/s1", Some(json!({ "totalLeave": -1 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_staff_cascades() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;
  send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 2))).await;

  let (status, body) = send(&app, "DELETE", "/api/staff/s1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "success": true }));

  let (_, requests) = send(&app, "GET", "/api/leave-requests", None).await;
  assert_eq!(requests, json!([]));
  let (_, inbox) = send(&app, "GET", "/api/notifications?staffId=s1", None).await;
  assert_eq!(inbox, json!([]));
}

// ─── Leave requests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn leave_request_lifecycle() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, created) = send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 5))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["status"], "Pending");
  assert_eq!(created["type"], "Annual Leave");
  let today = Utc::now().date_naive().to_string();
  assert_eq!(created["appliedDate"], today.as_str());
  let id = created["id"].as_i64().unwrap();

  let (_, listed) = send(&app, "GET", "/api/leave-requests?staffId=s1", None).await;
  assert_eq!(listed[0]["staffName"], "Staff s1");
  assert_eq!(listed[0]["department"], "Physics");

  let (status, approved) = send(
    &app,
    "PUT",
    &format!("/api/leave-requests/{id}/status"),
    Some(json!({ "status": "Approved", "approvedBy": "admin-1" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(approved["status"], "Approved");
  assert_eq!(approved["approvedBy"], "admin-1");
  assert_eq!(approved["approvedDate"], today.as_str());

  let (_, stats) = send(&app, "GET", "/api/staff/s1/stats", None).await;
  assert_eq!(
    stats,
    json!({ "totalLeave": 20, "usedLeave": 5, "pendingLeave": 0, "remainingLeave": 15 })
  );

  let (status, _) = send(
    &app,
    "PUT",
    &format!("/api/leave-requests/{id}/status"),
    Some(json!({ "status": "Rejected", "rejectedReason": "too late" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, fetched) = send(&app, "GET", &format!("/api/leave-requests/{id}"), None).await;
  assert_eq!(fetched, approved);
}

#[tokio::test]
async fn pending_is_not_a_decision() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;
  let (_, created) = send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 1))).await;
  let id = created["id"].as_i64().unwrap();

  let (status, _) = send(
    &app,
    "PUT",
    &format!("/api/leave-requests/{id}/status"),
    Some(json!({ "status": "Pending" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    "PUT",
    "/api/leave-requests/9999/status",
    Some(json!({ "status": "Approved" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leave_request_errors() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, _) = send(&app, "POST", "/api/leave-requests", Some(leave_body("ghost", 1))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 0))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let mut inverted = leave_body("s1", 1);
  inverted["endDate"] = json!("2026-03-01");
  let (status, _) = send(&app, "POST", "/api/leave-requests", Some(inverted)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let mut unknown_type = leave_body("s1", 1);
  unknown_type["type"] = json!("Gardening Leave");
  let (status, _) = send(&app, "POST", "/api/leave-requests", Some(unknown_type)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 21))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("insufficient"));

  let (status, _) = send(&app, "GET", "/api/leave-requests/9999", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_carry_display_fields() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;
  send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 2))).await;

  let (status, _) = send(&app, "GET", "/api/notifications", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, inbox) = send(&app, "GET", "/api/notifications?staffId=s1", None).await;
  assert_eq!(status, StatusCode::OK);
  let first = &inbox[0];
  assert_eq!(first["type"], "leave");
  assert_eq!(first["title"], "Leave Update");
  assert_eq!(first["link"], "/leave-history");
  assert_eq!(first["relativeTime"], "just now");
  assert_eq!(first["read"], false);
}

#[tokio::test]
async fn notification_read_and_delete() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, created) = send(
    &app,
    "POST",
    "/api/notifications",
    Some(json!({ "staffId": "s1", "type": "alert", "message": "Policy changed" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["title"], "Alert");
  let id = created["id"].as_str().unwrap().to_owned();
  send(
    &app,
    "POST",
    "/api/notifications",
    Some(json!({ "staffId": "s1", "message": "Welcome" })),
  )
  .await;

  let (status, body) = send(&app, "PUT", &format!("/api/notifications/{id}/read"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "success": true }));

  let (status, _) = send(&app, "PUT", "/api/notifications/missing/read", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(
    &app,
    "PUT",
    "/api/notifications/read-all",
    Some(json!({ "staffId": "s1" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "updated": 1 }));

  let (status, _) = send(&app, "PUT", "/api/notifications/read-all", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(&app, "DELETE", &format!("/api/notifications/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&app, "DELETE", &format!("/api/notifications/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_for_unknown_staff_is_404() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/api/notifications",
    Some(json!({ "staffId": "ghost", "message": "hi" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_default_then_partial_save() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, _) = send(&app, "GET", "/api/settings", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, defaults) = send(&app, "GET", "/api/settings?staffId=s1", None).await;
  assert_eq!(
    defaults,
    json!({
      "staffId": "s1",
      "emailNotifications": true,
      "pushNotifications": true,
      "leaveReminders": true,
      "approvalUpdates": true,
    })
  );

  let (status, saved) = send(
    &app,
    "POST",
    "/api/settings",
    Some(json!({ "staffId": "s1", "leaveReminders": false })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(saved["leaveReminders"], false);
  assert_eq!(saved["emailNotifications"], true);

  let (_, fetched) = send(&app, "GET", "/api/settings?staffId=s1", None).await;
  assert_eq!(fetched, saved);

  let (status, _) = send(
    &app,
    "POST",
    "/api/settings",
    Some(json!({ "staffId": "ghost", "leaveReminders": false })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Admin settings & login ──────────────────────────────────────────────────

#[tokio::test]
async fn admin_settings_update_and_reset() {
  let app = app().await;

  let (_, defaults) = send(&app, "GET", "/api/admin/settings", None).await;
  assert_eq!(defaults["institutionName"], "University");
  assert_eq!(defaults["maxConsecutiveDays"], 30);

  let (status, saved) = send(
    &app,
    "POST",
    "/api/admin/settings",
    Some(json!({ "institutionName": "Northfield", "adminPassword": "s3cret" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(saved["institutionName"], "Northfield");
  assert!(saved.get("adminPassword").is_none());
  assert!(saved.get("adminPasswordHash").is_none());

  let (status, _) = send(
    &app,
    "POST",
    "/api/admin/settings",
    Some(json!({ "maxConsecutiveDays": 0 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, reset) = send(&app, "POST", "/api/admin/settings/reset", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(reset["institutionName"], "University");

  // Credentials survive the reset.
  let (status, _) = send(
    &app,
    "POST",
    "/api/auth/login",
    Some(json!({ "email": "admin@university.edu", "password": "s3cret", "role": "admin" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn staff_login() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;

  let (status, body) = send(
    &app,
    "POST",
    "/api/auth/login",
    Some(json!({ "email": "s1@university.edu", "password": "hunter2", "role": "staff" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(
    body["user"],
    json!({
      "id": "s1",
      "name": "Staff s1",
      "email": "s1@university.edu",
      "role": "staff",
      "department": "Physics",
    })
  );

  for attempt in [
    json!({ "email": "s1@university.edu", "password": "wrong", "role": "staff" }),
    json!({ "email": "nobody@university.edu", "password": "hunter2", "role": "staff" }),
    json!({ "email": "s1@university.edu", "password": "hunter2", "role": "dean" }),
    json!({ "email": "s1@university.edu", "password": "hunter2", "role": "admin" }),
  ] {
    let (status, body) = send(&app, "POST", "/api/auth/login", Some(attempt)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid credentials" }));
  }
}

#[tokio::test]
async fn admin_login_needs_a_password() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/api/auth/login",
    Some(json!({ "email": "admin@university.edu", "password": "", "role": "admin" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_respond_with_aggregates() {
  let app = app().await;
  send(&app, "POST", "/api/staff", Some(staff_body("s1"))).await;
  let mut other = staff_body("s2");
  other["department"] = json!("Law");
  send(&app, "POST", "/api/staff", Some(other)).await;
  send(&app, "POST", "/api/leave-requests", Some(leave_body("s1", 5))).await;

  let (status, stats) = send(&app, "GET", "/api/leave-stats", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stats["totalApplications"], 1);
  assert_eq!(stats["pendingApproval"], 1);

  let (_, monthly) = send(&app, "GET", "/api/reports/monthly?year=2026", None).await;
  let months = monthly.as_array().unwrap();
  assert_eq!(months.len(), 12);
  assert_eq!(months[2]["pending"], 1);

  let (_, types) = send(&app, "GET", "/api/reports/leave-types?department=Physics", None).await;
  assert_eq!(types, json!([{ "type": "Annual Leave", "count": 1 }]));

  let (_, depts) = send(&app, "GET", "/api/reports/departments", None).await;
  assert_eq!(depts[0]["department"], "Law");
  assert_eq!(depts[0]["approvalRate"], 0.0);
  assert_eq!(depts[1]["totalRequests"], 1);

  let (_, top) = send(&app, "GET", "/api/reports/top-requesters?limit=1", None).await;
  assert_eq!(top[0]["staffId"], "s1");
  assert_eq!(top[0]["totalDays"], 5);

  let (status, body) = send(&app, "GET", "/api/reports/leave-types?from=March", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}
