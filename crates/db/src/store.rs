//! Store traits the API depends on, with the PostgreSQL implementation.
//!
//! Handlers hold `Arc<dyn BookingStore>` and `Arc<dyn SettingsStore>` so that
//! tests can swap in the mocks from [`crate::mock`].

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use uuid::Uuid;
use washbay_core::models::{booking::BookingStatus, settings::SettingKey};

use crate::{
    models::{DbBooking, NewBooking},
    repositories, DbPool,
};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, booking: NewBooking) -> Result<DbBooking>;

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>>;

    async fn get_bookings_for_date(&self, date: NaiveDate) -> Result<Vec<DbBooking>>;

    /// Bookings that occupy time on `date`, ordered by scheduled time ascending.
    async fn get_active_bookings_for_date(&self, date: NaiveDate) -> Result<Vec<DbBooking>>;

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<DbBooking>>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: SettingKey) -> Result<Option<String>>;

    /// Replaces both business-hours rows in one transaction.
    async fn put_business_hours(&self, start: String, end: String) -> Result<()>;
}

/// PostgreSQL-backed store delegating to the repository functions.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn create_booking(&self, booking: NewBooking) -> Result<DbBooking> {
        repositories::booking::create_booking(&self.pool, &booking).await
    }

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>> {
        repositories::booking::get_booking_by_id(&self.pool, id).await
    }

    async fn get_bookings_for_date(&self, date: NaiveDate) -> Result<Vec<DbBooking>> {
        repositories::booking::get_bookings_for_date(&self.pool, date).await
    }

    async fn get_active_bookings_for_date(&self, date: NaiveDate) -> Result<Vec<DbBooking>> {
        repositories::booking::get_active_bookings_for_date(&self.pool, date).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<DbBooking>> {
        repositories::booking::update_booking_status(&self.pool, id, status).await
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_setting(&self, key: SettingKey) -> Result<Option<String>> {
        let setting = repositories::settings::get_setting(&self.pool, key.as_str()).await?;
        Ok(setting.map(|s| s.value))
    }

    async fn put_business_hours(&self, start: String, end: String) -> Result<()> {
        repositories::settings::upsert_settings(
            &self.pool,
            &[
                (SettingKey::BusinessHoursStart.as_str(), start.as_str()),
                (SettingKey::BusinessHoursEnd.as_str(), end.as_str()),
            ],
        )
        .await?;
        Ok(())
    }
}
