use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use washbay_core::models::booking::{BookingEventKind, BookingResponse, BookingStatus};
use washbay_db::models::DbBooking;

use crate::test_utils::{bearer, booking_row, test_date, TestContext, ADMIN_TOKEN, STAFF_TOKEN};

fn booking_request(time: &str, duration: u32) -> Value {
    json!({
        "customerName": "Grace Hopper",
        "customerEmail": "grace@example.com",
        "customerPhone": null,
        "vehicle": "Ford Transit",
        "serviceName": "Exterior wash",
        "scheduledAt": format!("2025-06-02T{}:00", time),
        "durationMinutes": duration,
        "notes": null
    })
}

fn stored(booking: washbay_db::models::NewBooking) -> DbBooking {
    let now = Utc::now();
    DbBooking {
        id: Uuid::new_v4(),
        customer_name: booking.customer_name,
        customer_email: booking.customer_email,
        customer_phone: booking.customer_phone,
        vehicle: booking.vehicle,
        service_name: booking.service_name,
        scheduled_at: booking.scheduled_at,
        duration_minutes: booking.duration_minutes as i32,
        status: BookingStatus::Pending.as_str().to_string(),
        notes: booking.notes,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_create_booking_in_free_slot() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .with(eq(test_date()))
        .returning(|_| Ok(vec![booking_row(10, 0, 60, BookingStatus::Confirmed)]));
    ctx.booking_repo
        .expect_create_booking()
        .withf(|booking| booking.duration_minutes == 120 && booking.vehicle == "Ford Transit")
        .times(1)
        .returning(|booking| Ok(stored(booking)));
    let mut subscription = ctx.events.add();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&booking_request("11:00", 120))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: BookingResponse = response.json();
    assert_eq!(body.status, BookingStatus::Pending);
    assert_eq!(body.customer_name, "Grace Hopper");

    let event = subscription.recv().await.unwrap();
    assert_eq!(event.kind, BookingEventKind::BookingCreated);
    assert_eq!(event.booking_id, body.id);
    assert_eq!(event.date, test_date());
}

#[tokio::test]
async fn test_create_booking_overlapping_existing_job_conflicts() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| Ok(vec![booking_row(10, 0, 60, BookingStatus::Confirmed)]));
    ctx.booking_repo.expect_create_booking().never();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&booking_request("09:30", 60))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("09:30-10:30"));
}

#[tokio::test]
async fn test_create_booking_after_closing_conflicts() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| Ok(vec![]));
    ctx.booking_repo.expect_create_booking().never();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&booking_request("15:30", 60))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_booking_with_zero_duration_is_invalid() {
    let mut ctx = TestContext::new();
    ctx.booking_repo.expect_create_booking().never();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&booking_request("09:00", 0))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_cannot_read_bookings() {
    let server = TestContext::new().server();

    let response = server.get(&format!("/api/bookings/{}", Uuid::new_v4())).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_reads_booking() {
    let row = booking_row(9, 0, 45, BookingStatus::Confirmed);
    let id = row.id;
    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(row.clone())));
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .get(&format!("/api/bookings/{}", id))
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: BookingResponse = response.json();
    assert_eq!(body.id, id);
    assert_eq!(body.duration_minutes, 45);
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(|_| Ok(None));
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .get(&format!("/api/bookings/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_staff_lists_all_bookings_of_day() {
    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_bookings_for_date()
        .with(eq(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()))
        .returning(|_| {
            Ok(vec![
                booking_row(8, 0, 30, BookingStatus::Cancelled),
                booking_row(9, 0, 60, BookingStatus::Confirmed),
            ])
        });
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .get("/api/bookings")
        .add_query_param("date", "2025-06-02")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["date"], json!("2025-06-02"));
    assert_eq!(body["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(body["bookings"][0]["status"], json!("CANCELLED"));
}

#[tokio::test]
async fn test_update_status_publishes_event() {
    let row = booking_row(9, 0, 60, BookingStatus::Pending);
    let id = row.id;
    let mut updated = row.clone();
    updated.status = BookingStatus::Confirmed.as_str().to_string();

    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(row.clone())));
    ctx.booking_repo
        .expect_update_booking_status()
        .with(eq(id), eq(BookingStatus::Confirmed))
        .times(1)
        .returning(move |_, _| Ok(Some(updated.clone())));
    let mut subscription = ctx.events.add();
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .put(&format!("/api/bookings/{}/status", id))
        .add_header(name, value)
        .json(&json!({ "status": "CONFIRMED" }))
        .await;

    response.assert_status_ok();
    let event = subscription.recv().await.unwrap();
    assert_eq!(event.kind, BookingEventKind::BookingStatusChanged);
    assert_eq!(event.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_terminal_booking_cannot_change() {
    let row = booking_row(9, 0, 60, BookingStatus::Completed);
    let id = row.id;
    let mut ctx = TestContext::new();
    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |_| Ok(Some(row.clone())));
    ctx.booking_repo.expect_update_booking_status().never();
    let server = ctx.server();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = server
        .put(&format!("/api/bookings/{}/status", id))
        .add_header(name, value)
        .json(&json!({ "status": "PENDING" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_customer_cannot_update_status() {
    let server = TestContext::new().server();

    let response = server
        .put(&format!("/api/bookings/{}/status", Uuid::new_v4()))
        .json(&json!({ "status": "CANCELLED" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_cannot_stream_events() {
    let ctx = TestContext::new();
    let events = ctx.events.clone();
    let server = ctx.server();

    let response = server.get("/api/events/bookings").await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(events.is_empty());
}

fn assert_validation_message(response: &axum_test::TestResponse, fragment: &str) {
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Validation error:"), "{}", message);
    assert!(message.contains(fragment), "{}", message);
}

#[tokio::test]
async fn test_create_booking_with_missing_field_is_json_bad_request() {
    let mut ctx = TestContext::new();
    ctx.booking_repo.expect_create_booking().never();
    let server = ctx.server();

    let response = server
        .post("/api/bookings")
        .json(&json!({ "customerName": "Grace Hopper" }))
        .await;

    assert_validation_message(&response, "vehicle");
}

#[tokio::test]
async fn test_unknown_status_is_json_bad_request() {
    let mut ctx = TestContext::new();
    ctx.booking_repo.expect_update_booking_status().never();
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .put(&format!("/api/bookings/{}/status", Uuid::new_v4()))
        .add_header(name, value)
        .json(&json!({ "status": "DONE" }))
        .await;

    assert_validation_message(&response, "DONE");
}

#[tokio::test]
async fn test_malformed_booking_id_is_json_bad_request() {
    let mut ctx = TestContext::new();
    ctx.booking_repo.expect_get_booking_by_id().never();
    let server = ctx.server();
    let (name, value) = bearer(STAFF_TOKEN);

    let response = server
        .put("/api/bookings/not-a-uuid/status")
        .add_header(name, value)
        .json(&json!({ "status": "CONFIRMED" }))
        .await;

    assert_validation_message(&response, "UUID");
}
