//! Request extractors whose rejections are answered through [`AppError`].
//!
//! Axum's own `Json`, `Path` and `Query` reply with plain-text bodies and
//! 415/422 statuses. These wrappers turn every malformed input into a
//! `400 {"message": ...}` like the rest of the API.

use axum::extract::{FromRequest, FromRequestParts};

use super::error_handling::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
