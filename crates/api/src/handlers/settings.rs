use axum::{extract::State, Json};
use std::sync::Arc;
use washbay_core::{
    access::Capability,
    availability::{BusinessHours, ClockTime, DEFAULT_CLOSING, DEFAULT_OPENING},
    errors::WashError,
    models::settings::{BusinessHoursRequest, BusinessHoursResponse, SettingKey},
};
use washbay_db::store::SettingsStore;

use crate::{
    middleware::{auth::Caller, error_handling::AppError, extract::ApiJson},
    ApiState,
};

/// Reads the configured business hours, substituting defaults for absent or unusable rows.
pub async fn load_business_hours(store: &dyn SettingsStore) -> Result<BusinessHours, WashError> {
    let start = store.get_setting(SettingKey::BusinessHoursStart).await?;
    let end = store.get_setting(SettingKey::BusinessHoursEnd).await?;

    Ok(resolve_business_hours(start.as_deref(), end.as_deref()))
}

fn resolve_business_hours(start: Option<&str>, end: Option<&str>) -> BusinessHours {
    let start = setting_or_default(SettingKey::BusinessHoursStart, start, DEFAULT_OPENING);
    let end = setting_or_default(SettingKey::BusinessHoursEnd, end, DEFAULT_CLOSING);

    BusinessHours::new(start, end).unwrap_or_else(|e| {
        tracing::warn!("Configured business hours are unusable, using defaults: {}", e);
        BusinessHours::default()
    })
}

fn setting_or_default(key: SettingKey, value: Option<&str>, default: ClockTime) -> ClockTime {
    match value.map(ClockTime::parse) {
        Some(Ok(time)) => time,
        Some(Err(e)) => {
            tracing::warn!("Ignoring setting {}: {}", key.as_str(), e);
            default
        }
        None => default,
    }
}

fn to_response(hours: BusinessHours) -> BusinessHoursResponse {
    BusinessHoursResponse {
        start: hours.start(),
        end: hours.end(),
        duration_minutes: hours.duration_minutes(),
    }
}

#[axum::debug_handler]
pub async fn get_business_hours(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<BusinessHoursResponse>, AppError> {
    let hours = load_business_hours(state.settings.as_ref()).await?;
    Ok(Json(to_response(hours)))
}

#[axum::debug_handler]
pub async fn update_business_hours(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<BusinessHoursRequest>,
) -> Result<Json<BusinessHoursResponse>, AppError> {
    caller.require(Capability::ManageSettings)?;

    let hours = BusinessHours::new(payload.start, payload.end)?;

    state
        .settings
        .put_business_hours(hours.start().to_string(), hours.end().to_string())
        .await?;

    tracing::info!("Business hours updated to {} - {}", hours.start(), hours.end());
    Ok(Json(to_response(hours)))
}
