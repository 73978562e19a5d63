//! # Availability Handlers
//!
//! Tells the booking screen how much of a day is still free. The handler
//! performs two independent reads (business hours, active bookings) and runs
//! the calculator from `washbay_core::availability` over that snapshot. The
//! answer is advisory: nothing is reserved, and booking creation repeats the
//! check on its own.

use axum::{extract::State, Json};
use chrono::NaiveDate;
use std::sync::Arc;
use washbay_core::{
    access::Capability,
    availability::{compute_availability, parse_booking_date, BookedInterval, BusinessHours, DayAvailability},
    errors::WashError,
    models::{
        availability::{AvailabilityResponse, DateQuery},
        booking::Booking,
    },
};

use crate::{
    handlers::settings::load_business_hours,
    middleware::{auth::Caller, error_handling::AppError, extract::ApiQuery},
    ApiState,
};

/// Returns the free slots of a day
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?date=2025-06-02
/// ```
///
/// # Errors
///
/// * `WashError::Validation` - `date` is missing or not `YYYY-MM-DD`
/// * `WashError::Database` - settings or bookings could not be read
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    caller.require(Capability::ViewAvailability)?;

    let date_param = required_date(query)?;
    let date = parse_booking_date(&date_param)?;

    let (hours, day) = day_availability(&state, date).await?;
    tracing::debug!(
        "Availability for {}: {} free slots, largest {} minutes",
        date,
        day.free.len(),
        day.max_available_minutes
    );

    Ok(Json(AvailabilityResponse::new(date_param, &hours, &day)))
}

/// Extracts the raw `date` query value, rejecting a missing or blank one.
pub(crate) fn required_date(query: DateQuery) -> Result<String, WashError> {
    query
        .date
        .filter(|date| !date.trim().is_empty())
        .ok_or_else(|| WashError::Validation("Missing required query parameter 'date'".to_string()))
}

/// Reads the business hours and active bookings of `date` and computes its free time.
pub(crate) async fn day_availability(
    state: &ApiState,
    date: NaiveDate,
) -> Result<(BusinessHours, DayAvailability), WashError> {
    let hours = load_business_hours(state.settings.as_ref()).await?;

    let booked = state
        .bookings
        .get_active_bookings_for_date(date)
        .await?
        .into_iter()
        .map(|row| {
            let booking = Booking::try_from(row)?;
            Ok(BookedInterval::from_schedule(booking.scheduled_at, booking.duration_minutes))
        })
        .collect::<Result<Vec<_>, eyre::Report>>()?;

    Ok((hours, compute_availability(&hours, booked)))
}
