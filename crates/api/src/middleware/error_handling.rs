//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and `{ "message": ... }` JSON
//! bodies. Server-side failures are logged with their full chain and answered
//! with a generic message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use washbay_core::errors::WashError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use washbay_api::middleware::error_handling::AppError;
/// use washbay_core::errors::WashError;
///
/// async fn handler(date: Option<String>) -> Result<Json<String>, AppError> {
///     let date = date.ok_or_else(|| WashError::Validation("date is required".into()))?;
///     Ok(Json(date))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub WashError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WashError::NotFound(_) => StatusCode::NOT_FOUND,
            WashError::Validation(_) => StatusCode::BAD_REQUEST,
            WashError::Authentication(_) => StatusCode::UNAUTHORIZED,
            WashError::Authorization(_) => StatusCode::FORBIDDEN,
            WashError::Conflict(_) => StatusCode::CONFLICT,
            WashError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WashError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(%status, error = %self.0, "Request rejected");
            self.0.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<WashError> for AppError {
    fn from(err: WashError) -> Self {
        AppError(err)
    }
}

/// Wraps eyre errors from the store layer as database failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(WashError::Database(err))
    }
}

// Malformed request input is a client error, whatever part of the request it came from
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(WashError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(WashError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(WashError::Validation(rejection.body_text()))
    }
}

/// Maps a WashError to an HTTP response
pub fn map_error(err: WashError) -> Response {
    AppError(err).into_response()
}
