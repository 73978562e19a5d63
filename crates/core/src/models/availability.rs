use serde::{Deserialize, Serialize};

use crate::availability::{
    format_minutes, BookedInterval, BusinessHours, DayAvailability, FreeInterval,
};

/// Query string carrying a `YYYY-MM-DD` date. Absence is reported by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub start: String,
    pub end: String,
    pub duration_minutes: u32,
}

impl From<&FreeInterval> for AvailableSlot {
    fn from(interval: &FreeInterval) -> Self {
        Self {
            start: format_minutes(interval.start_minutes),
            end: format_minutes(interval.end_minutes),
            duration_minutes: interval.duration_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    pub start: String,
    pub end: String,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub duration_minutes: u32,
}

impl From<&BookedInterval> for BookedSlot {
    fn from(interval: &BookedInterval) -> Self {
        Self {
            start: format_minutes(interval.start_minutes),
            end: format_minutes(interval.end_minutes()),
            start_minutes: interval.start_minutes,
            end_minutes: interval.end_minutes(),
            duration_minutes: interval.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub date: String,
    pub has_bookings: bool,
    pub max_available_minutes: u32,
    pub available_slots: Vec<AvailableSlot>,
    pub booked_slots: Vec<BookedSlot>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub working_hours: Option<WorkingHours>,
}

impl AvailabilityResponse {
    /// Builds the response for `date`, echoing the date string as requested.
    ///
    /// `workingHours` is only reported when the day has bookings and always
    /// reflects the configured business hours.
    pub fn new(date: impl Into<String>, hours: &BusinessHours, day: &DayAvailability) -> Self {
        let has_bookings = day.has_bookings();
        Self {
            date: date.into(),
            has_bookings,
            max_available_minutes: day.max_available_minutes,
            available_slots: day.free.iter().map(AvailableSlot::from).collect(),
            booked_slots: day.booked.iter().map(BookedSlot::from).collect(),
            working_hours: has_bookings.then(|| WorkingHours {
                start: hours.start().to_string(),
                end: hours.end().to_string(),
            }),
        }
    }
}
