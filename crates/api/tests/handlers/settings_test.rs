use axum::http::StatusCode;
use mockall::predicate::eq;
use serde_json::{json, Value};

use crate::test_utils::{bearer, TestContext, ADMIN_TOKEN, STAFF_TOKEN};

#[tokio::test]
async fn test_business_hours_default_when_unset() {
    let server = TestContext::new().with_default_hours().server();

    let response = server.get("/api/settings/business-hours").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "start": "08:00", "end": "16:00", "durationMinutes": 480 }));
}

#[tokio::test]
async fn test_unparseable_setting_falls_back_to_default() {
    let server = TestContext::new()
        .with_business_hours(Some("half past six"), Some("18:00"))
        .server();

    let response = server.get("/api/settings/business-hours").await;

    response.assert_json(&json!({ "start": "08:00", "end": "18:00", "durationMinutes": 600 }));
}

#[tokio::test]
async fn test_admin_updates_business_hours() {
    let mut ctx = TestContext::new();
    ctx.settings_repo
        .expect_put_business_hours()
        .with(eq("07:30".to_string()), eq("17:00".to_string()))
        .times(1)
        .returning(|_, _| Ok(()));
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&json!({ "start": "07:30", "end": "17:00" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "start": "07:30", "end": "17:00", "durationMinutes": 570 }));
}

#[tokio::test]
async fn test_inverted_business_hours_are_rejected() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_put_business_hours().never();
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&json!({ "start": "17:00", "end": "09:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_staff_cannot_update_business_hours() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_put_business_hours().never();
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&json!({ "start": "07:00", "end": "15:00" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_failed_business_hours_write_is_server_error() {
    let mut ctx = TestContext::new();
    ctx.settings_repo
        .expect_put_business_hours()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("transaction rolled back")));
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&json!({ "start": "07:00", "end": "15:00" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "message": "Internal server error" }));
}

#[tokio::test]
async fn test_malformed_business_hours_body_is_json_bad_request() {
    let mut ctx = TestContext::new();
    ctx.settings_repo.expect_put_business_hours().never();
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put("/api/settings/business-hours")
        .add_header(name, value)
        .json(&json!({ "start": "7 o'clock", "end": "15:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().starts_with("Validation error:"));
}
