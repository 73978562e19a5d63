use serde::{Deserialize, Serialize};

use crate::availability::ClockTime;

/// Keys of the settings rows the backend reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BusinessHoursStart,
    BusinessHoursEnd,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::BusinessHoursStart => "business_hours_start",
            SettingKey::BusinessHoursEnd => "business_hours_end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursRequest {
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHoursResponse {
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: u32,
}
