use axum::{body::to_bytes, http::StatusCode};
use rstest::rstest;
use serde_json::Value;
use washbay_api::middleware::error_handling::{map_error, AppError};
use washbay_core::errors::WashError;

async fn message_of(error: WashError) -> (StatusCode, String) {
    let response = map_error(error);
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body["message"].as_str().unwrap().to_string())
}

#[rstest]
#[case(WashError::NotFound("Booking".into()), StatusCode::NOT_FOUND)]
#[case(WashError::Validation("Invalid input".into()), StatusCode::BAD_REQUEST)]
#[case(WashError::Authentication("Invalid token".into()), StatusCode::UNAUTHORIZED)]
#[case(WashError::Authorization("Not authorized".into()), StatusCode::FORBIDDEN)]
#[case(WashError::Conflict("Slot taken".into()), StatusCode::CONFLICT)]
#[case(WashError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: WashError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_client_errors_carry_their_message() {
    let (status, message) = message_of(WashError::Validation("date is required".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Validation error: date is required");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, message) =
        message_of(WashError::Database(eyre::eyre!("password authentication failed"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Internal server error");
}

#[test]
fn test_eyre_report_becomes_database_error() {
    let error: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(error.0, WashError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
