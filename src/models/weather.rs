use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::DISPLAY_DATE_FORMAT;
use crate::clients::darksky::DailyForecast;

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub forecast: String,
    pub time: String,
}

impl Weather {
    #[must_use]
    pub fn from_daily(day: &DailyForecast) -> Self {
        Self {
            forecast: day.summary.clone().unwrap_or_default(),
            time: format_epoch_day(day.time),
        }
    }
}

/// Render unix epoch seconds as a UTC display date. Out-of-range values map to "".
#[must_use]
pub fn format_epoch_day(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|t| t.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
