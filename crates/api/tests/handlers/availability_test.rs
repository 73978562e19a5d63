use axum::http::StatusCode;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use washbay_core::models::{availability::AvailabilityResponse, booking::BookingStatus};

use crate::test_utils::{bearer, booking_row, test_date, TestContext};

#[tokio::test]
async fn test_missing_date_is_rejected() {
    let server = TestContext::new().server();

    let response = server.get("/api/availability").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_blank_date_is_rejected() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "  ")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let server = TestContext::new().server();

    for date in ["2025-13", "2025-06-xx", "2025-02-30", "02/06/2025"] {
        let response = server
            .get("/api/availability")
            .add_query_param("date", date)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_empty_day_uses_default_hours() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .with(eq(test_date()))
        .times(1)
        .returning(|_| Ok(vec![]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "date": "2025-06-02",
        "hasBookings": false,
        "maxAvailableMinutes": 480,
        "availableSlots": [
            { "start": "08:00", "end": "16:00", "durationMinutes": 480 }
        ],
        "bookedSlots": []
    }));
}

#[tokio::test]
async fn test_single_booking_splits_the_day() {
    let mut ctx = TestContext::new().with_business_hours(Some("08:00"), Some("16:00"));
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| Ok(vec![booking_row(10, 0, 60, BookingStatus::Confirmed)]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();
    assert!(body.has_bookings);
    assert_eq!(body.max_available_minutes, 300);
    assert_eq!(
        body.available_slots
            .iter()
            .map(|s| (s.start.as_str(), s.end.as_str(), s.duration_minutes))
            .collect::<Vec<_>>(),
        vec![("08:00", "10:00", 120), ("11:00", "16:00", 300)]
    );
    assert_eq!(body.booked_slots[0].start_minutes, 600);
    assert_eq!(body.booked_slots[0].end, "11:00");
}

#[tokio::test]
async fn test_two_bookings_report_configured_working_hours() {
    let mut ctx = TestContext::new().with_business_hours(Some("08:00"), Some("16:00"));
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| {
            Ok(vec![
                booking_row(9, 0, 90, BookingStatus::Confirmed),
                booking_row(13, 0, 30, BookingStatus::Pending),
            ])
        });
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["maxAvailableMinutes"], json!(150));
    assert_eq!(
        body["availableSlots"],
        json!([
            { "start": "08:00", "end": "09:00", "durationMinutes": 60 },
            { "start": "10:30", "end": "13:00", "durationMinutes": 150 },
            { "start": "13:30", "end": "16:00", "durationMinutes": 150 }
        ])
    );
    assert_eq!(body["workingHours"], json!({ "start": "08:00", "end": "16:00" }));
}

#[tokio::test]
async fn test_custom_hours_are_used() {
    let mut ctx = TestContext::new().with_business_hours(Some("07:00"), Some("19:30"));
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| Ok(vec![]));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    let body: AvailabilityResponse = response.json();
    assert_eq!(body.max_available_minutes, 750);
    assert_eq!(body.available_slots[0].start, "07:00");
    assert_eq!(body.available_slots[0].end, "19:30");
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .returning(|_| Err(eyre::eyre!("connection refused")));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "message": "Internal server error" }));
}

#[tokio::test]
async fn test_settings_failure_is_a_server_error() {
    let mut ctx = TestContext::new();
    ctx.settings_repo
        .expect_get_setting()
        .returning(|_| Err(eyre::eyre!("settings table missing")));
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let server = TestContext::new().server();
    let (name, value) = bearer("not-a-real-token");

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_repeated_requests_agree() {
    let mut ctx = TestContext::new().with_default_hours();
    ctx.booking_repo
        .expect_get_active_bookings_for_date()
        .times(2)
        .returning(|_| Ok(vec![booking_row(12, 15, 45, BookingStatus::Confirmed)]));
    let server = ctx.server();

    let first: Value = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await
        .json();
    let second: Value = server
        .get("/api/availability")
        .add_query_param("date", "2025-06-02")
        .await
        .json();

    assert_eq!(first, second);
}
