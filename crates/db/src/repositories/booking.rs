use crate::models::{DbBooking, NewBooking};
use chrono::{NaiveDate, Utc};
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use uuid::Uuid;
use washbay_core::models::booking::BookingStatus;

const BOOKING_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, vehicle, \
     service_name, scheduled_at, duration_minutes, status, notes, created_at, updated_at";

pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let duration_minutes = i32::try_from(booking.duration_minutes)
        .map_err(|_| eyre!("Booking duration {} is too large", booking.duration_minutes))?;

    tracing::debug!(
        "Creating booking: id={}, scheduled_at={}, duration={}",
        id, booking.scheduled_at, booking.duration_minutes
    );

    let query = format!(
        r#"
        INSERT INTO bookings (id, customer_name, customer_email, customer_phone, vehicle,
            service_name, scheduled_at, duration_minutes, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let db_booking = sqlx::query_as::<_, DbBooking>(&query)
        .bind(id)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(&booking.vehicle)
        .bind(&booking.service_name)
        .bind(booking.scheduled_at)
        .bind(duration_minutes)
        .bind(BookingStatus::Pending.as_str())
        .bind(&booking.notes)
        .bind(now)
        .fetch_one(pool)
        .await?;

    Ok(db_booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");

    let db_booking = sqlx::query_as::<_, DbBooking>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(db_booking)
}

/// Every booking on `date` regardless of status, earliest first.
pub async fn get_bookings_for_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Vec<DbBooking>> {
    let query = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE scheduled_at >= $1::date AND scheduled_at < ($1::date + 1)
        ORDER BY scheduled_at ASC
        "#
    );

    let bookings = sqlx::query_as::<_, DbBooking>(&query)
        .bind(date)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Bookings on `date` that still hold time on the calendar, earliest first.
pub async fn get_active_bookings_for_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Vec<DbBooking>> {
    let released: Vec<String> = BookingStatus::RELEASED
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    let query = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE scheduled_at >= $1::date AND scheduled_at < ($1::date + 1)
          AND status <> ALL($2)
        ORDER BY scheduled_at ASC
        "#
    );

    let bookings = sqlx::query_as::<_, DbBooking>(&query)
        .bind(date)
        .bind(released)
        .fetch_all(pool)
        .await?;

    tracing::debug!("Found {} active bookings on {}", bookings.len(), date);
    Ok(bookings)
}

pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<Option<DbBooking>> {
    let query = format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    );

    let db_booking = sqlx::query_as::<_, DbBooking>(&query)
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    Ok(db_booking)
}
