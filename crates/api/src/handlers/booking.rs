use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{stream, Stream};
use std::sync::Arc;
use uuid::Uuid;
use washbay_core::{
    access::Capability,
    availability::{format_minutes, parse_booking_date, BookedInterval},
    errors::WashError,
    models::{
        availability::DateQuery,
        booking::{
            Booking, BookingEvent, BookingEventKind, BookingListResponse, BookingResponse,
            CreateBookingRequest, UpdateBookingStatusRequest,
        },
    },
};
use washbay_db::models::NewBooking;

use crate::{
    handlers::availability::{day_availability, required_date},
    middleware::{
        auth::Caller,
        error_handling::AppError,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    ApiState,
};

const MINUTES_PER_DAY: u32 = 24 * 60;

fn required_text(field: &str, value: &str) -> Result<String, WashError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WashError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_new_booking(payload: CreateBookingRequest) -> Result<NewBooking, WashError> {
    if payload.duration_minutes == 0 || payload.duration_minutes > MINUTES_PER_DAY {
        return Err(WashError::Validation(format!(
            "durationMinutes must be between 1 and {}",
            MINUTES_PER_DAY
        )));
    }

    Ok(NewBooking {
        customer_name: required_text("customerName", &payload.customer_name)?,
        customer_email: optional_text(payload.customer_email),
        customer_phone: optional_text(payload.customer_phone),
        vehicle: required_text("vehicle", &payload.vehicle)?,
        service_name: required_text("serviceName", &payload.service_name)?,
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        notes: optional_text(payload.notes),
    })
}

fn publish(state: &ApiState, kind: BookingEventKind, booking: &Booking) {
    state.events.broadcast(&BookingEvent {
        kind,
        booking_id: booking.id,
        date: booking.scheduled_at.date(),
        status: booking.status,
    });
}

/// Books a job if it fits entirely inside one free slot of its day.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    caller.require(Capability::CreateBooking)?;

    let new_booking = validate_new_booking(payload)?;
    let requested = BookedInterval::from_schedule(new_booking.scheduled_at, new_booking.duration_minutes);

    let (_, day) = day_availability(&state, new_booking.scheduled_at.date()).await?;
    if !day.fits(requested.start_minutes, requested.duration_minutes) {
        return Err(AppError(WashError::Conflict(format!(
            "{} {}-{} is not available",
            new_booking.scheduled_at.date(),
            format_minutes(requested.start_minutes),
            format_minutes(requested.end_minutes()),
        ))));
    }

    let row = state.bookings.create_booking(new_booking).await?;
    let booking = Booking::try_from(row)?;

    tracing::info!(
        "Created booking {} on {} for {} minutes",
        booking.id,
        booking.scheduled_at,
        booking.duration_minutes
    );
    publish(&state, BookingEventKind::BookingCreated, &booking);

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    caller.require(Capability::ViewBookings)?;

    let row = state
        .bookings
        .get_booking_by_id(id)
        .await?
        .ok_or_else(|| WashError::NotFound(format!("Booking with ID {} not found", id)))?;

    Ok(Json(BookingResponse::from(Booking::try_from(row)?)))
}

/// Lists every booking of a day, cancelled and no-show ones included.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    caller.require(Capability::ViewBookings)?;

    let date = parse_booking_date(&required_date(query)?)?;
    let bookings = state
        .bookings
        .get_bookings_for_date(date)
        .await?
        .into_iter()
        .map(|row| Booking::try_from(row).map(BookingResponse::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(BookingListResponse { date, bookings }))
}

#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    caller.require(Capability::ManageBookings)?;

    let not_found = || WashError::NotFound(format!("Booking with ID {} not found", id));

    let current = state
        .bookings
        .get_booking_by_id(id)
        .await?
        .ok_or_else(not_found)?;
    let current = Booking::try_from(current)?;

    if !current.status.can_transition_to(payload.status) {
        return Err(AppError(WashError::Conflict(format!(
            "Booking {} is {} and can no longer change to {}",
            id, current.status, payload.status
        ))));
    }

    let row = state
        .bookings
        .update_booking_status(id, payload.status)
        .await?
        .ok_or_else(not_found)?;
    let booking = Booking::try_from(row)?;

    tracing::info!("Booking {} moved from {} to {}", id, current.status, booking.status);
    publish(&state, BookingEventKind::BookingStatusChanged, &booking);

    Ok(Json(BookingResponse::from(booking)))
}

/// Streams booking events to a staff screen as Server-Sent Events.
#[axum::debug_handler]
pub async fn stream_booking_events(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    caller.require(Capability::StreamEvents)?;

    let subscription = state.events.add();
    tracing::info!(connection = %subscription.id(), "Event stream opened");

    let events = stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.recv().await?;
        let frame = Event::default().event(event.kind.as_str()).json_data(&event);
        Some((frame, subscription))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
