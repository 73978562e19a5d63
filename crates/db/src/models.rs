use chrono::{DateTime, NaiveDateTime, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use washbay_core::models::booking::{Booking, BookingStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle: String,
    pub service_name: String,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting a booking. Id, status and timestamps are set by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle: String,
    pub service_name: String,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| eyre!("Booking {} has an unreadable status: {}", row.id, e))?;
        let duration_minutes = u32::try_from(row.duration_minutes)
            .map_err(|_| eyre!("Booking {} has a negative duration", row.id))?;

        Ok(Booking {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            vehicle: row.vehicle,
            service_name: row.service_name,
            scheduled_at: row.scheduled_at,
            duration_minutes,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
