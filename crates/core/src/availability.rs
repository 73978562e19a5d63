//! # Availability Calculator
//!
//! Computes the free time left in a working day once the day's bookings are
//! taken out of the configured business hours.
//!
//! Everything is reduced to minute offsets from midnight:
//!
//! 1. Business hours become `[work_start, work_end)`
//! 2. Every active booking becomes `[start, start + duration)`
//! 3. Bookings are walked in the order supplied by the caller, emitting the
//!    gap in front of each one and advancing a cursor past its end
//! 4. Whatever is left between the cursor and `work_end` is the trailing gap
//!
//! Bookings are neither sorted nor merged here. Callers pass them in
//! ascending scheduled order, which is how the booking store returns them.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{WashError, WashResult};

/// Default opening time used when no business hours are configured.
pub const DEFAULT_OPENING: ClockTime = ClockTime { hour: 8, minute: 0 };
/// Default closing time used when no business hours are configured.
pub const DEFAULT_CLOSING: ClockTime = ClockTime { hour: 16, minute: 0 };

/// A time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> WashResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(WashError::Validation(format!(
                "Invalid time of day {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parses an `HH:MM` string. Single-digit hours such as `8:30` are accepted.
    pub fn parse(value: &str) -> WashResult<Self> {
        let invalid = || WashError::Validation(format!("Invalid time '{}', expected HH:MM", value));

        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        if !is_ascii_digits(hour) || minute.len() != 2 || !is_ascii_digits(minute) {
            return Err(invalid());
        }

        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = WashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = WashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// The daily window in which jobs may be scheduled. Always non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    start: ClockTime,
    end: ClockTime,
}

impl BusinessHours {
    /// Builds business hours, rejecting windows that are empty or inverted.
    pub fn new(start: ClockTime, end: ClockTime) -> WashResult<Self> {
        if start >= end {
            return Err(WashError::Validation(format!(
                "Business hours must start before they end ({} - {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn start_minutes(&self) -> u32 {
        self.start.minutes_since_midnight()
    }

    pub fn end_minutes(&self) -> u32 {
        self.end.minutes_since_midnight()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes() - self.start_minutes()
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start: DEFAULT_OPENING,
            end: DEFAULT_CLOSING,
        }
    }
}

/// Time occupied by one active booking, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub start_minutes: u32,
    pub duration_minutes: u32,
}

impl BookedInterval {
    pub fn new(start_minutes: u32, duration_minutes: u32) -> Self {
        Self {
            start_minutes,
            duration_minutes,
        }
    }

    /// Derives the interval from a booking's scheduled date-time. Seconds are ignored.
    pub fn from_schedule(scheduled_at: NaiveDateTime, duration_minutes: u32) -> Self {
        Self::new(scheduled_at.hour() * 60 + scheduled_at.minute(), duration_minutes)
    }

    pub fn end_minutes(&self) -> u32 {
        self.start_minutes + self.duration_minutes
    }
}

/// An unoccupied span of the working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeInterval {
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl FreeInterval {
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes - self.start_minutes
    }

    /// Whether a job of `duration_minutes` starting at `start_minutes` fits entirely inside.
    pub fn contains(&self, start_minutes: u32, duration_minutes: u32) -> bool {
        self.start_minutes <= start_minutes
            && start_minutes + duration_minutes <= self.end_minutes
    }
}

/// Result of running the calculator over one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub free: Vec<FreeInterval>,
    pub booked: Vec<BookedInterval>,
    pub max_available_minutes: u32,
}

impl DayAvailability {
    pub fn has_bookings(&self) -> bool {
        !self.booked.is_empty()
    }

    pub fn total_free_minutes(&self) -> u32 {
        self.free.iter().map(FreeInterval::duration_minutes).sum()
    }

    /// Whether a new job can be placed without touching an existing booking.
    pub fn fits(&self, start_minutes: u32, duration_minutes: u32) -> bool {
        self.free
            .iter()
            .any(|slot| slot.contains(start_minutes, duration_minutes))
    }
}

/// Subtracts booked intervals from business hours.
///
/// `booked` is walked in the order given. Overlapping or out-of-order
/// intervals are not merged; the cursor only ever moves forward, so a
/// booking that ends before the cursor contributes nothing.
pub fn compute_availability(hours: &BusinessHours, booked: Vec<BookedInterval>) -> DayAvailability {
    let work_start = hours.start_minutes();
    let work_end = hours.end_minutes();

    if booked.is_empty() {
        return DayAvailability {
            free: vec![FreeInterval {
                start_minutes: work_start,
                end_minutes: work_end,
            }],
            booked,
            max_available_minutes: work_end - work_start,
        };
    }

    let mut free = Vec::with_capacity(booked.len() + 1);
    let mut cursor = work_start;

    for interval in &booked {
        if cursor < interval.start_minutes {
            free.push(FreeInterval {
                start_minutes: cursor,
                end_minutes: interval.start_minutes,
            });
        }
        cursor = cursor.max(interval.end_minutes());
    }

    if cursor < work_end {
        free.push(FreeInterval {
            start_minutes: cursor,
            end_minutes: work_end,
        });
    }

    let max_available_minutes = free
        .iter()
        .map(FreeInterval::duration_minutes)
        .max()
        .unwrap_or(0);

    DayAvailability {
        free,
        booked,
        max_available_minutes,
    }
}

/// Parses a `YYYY-MM-DD` date as sent by booking clients.
///
/// The value must have exactly three dash-separated numeric segments that
/// form a real calendar date.
pub fn parse_booking_date(value: &str) -> WashResult<NaiveDate> {
    let segments: Vec<&str> = value.trim().split('-').collect();
    if segments.len() != 3 || !segments.iter().all(|s| is_ascii_digits(s)) {
        return Err(WashError::Validation(format!(
            "Invalid date '{}'. Expected format YYYY-MM-DD",
            value
        )));
    }

    let out_of_range = || WashError::Validation(format!("Invalid calendar date '{}'", value));
    let year = segments[0].parse::<i32>().map_err(|_| out_of_range())?;
    let month = segments[1].parse::<u32>().map_err(|_| out_of_range())?;
    let day = segments[2].parse::<u32>().map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
}

/// Formats minutes since midnight as `HH:MM`. Hours are not wrapped at 24.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
