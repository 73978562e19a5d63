use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;
use washbay_core::models::{booking::BookingStatus, settings::SettingKey};

use crate::{
    models::{DbBooking, NewBooking},
    store::{BookingStore, SettingsStore},
};

// Mock stores for testing
mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingStore for BookingRepo {
        async fn create_booking(&self, booking: NewBooking) -> eyre::Result<DbBooking>;

        async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;

        async fn get_bookings_for_date(&self, date: NaiveDate) -> eyre::Result<Vec<DbBooking>>;

        async fn get_active_bookings_for_date(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbBooking>>;

        async fn update_booking_status(
            &self,
            id: Uuid,
            status: BookingStatus,
        ) -> eyre::Result<Option<DbBooking>>;
    }
}

mock! {
    pub SettingsRepo {}

    #[async_trait]
    impl SettingsStore for SettingsRepo {
        async fn get_setting(&self, key: SettingKey) -> eyre::Result<Option<String>>;

        async fn put_business_hours(&self, start: String, end: String) -> eyre::Result<()>;
    }
}
