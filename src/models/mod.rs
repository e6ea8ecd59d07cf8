//! Record shapes for every cached category plus the pure normalizers that
//! turn a provider element into a record.

pub mod event;
pub mod location;
pub mod movie;
pub mod review;
pub mod trail;
pub mod weather;

pub use event::Event;
pub use location::{Location, NewLocation};
pub use movie::Movie;
pub use review::Review;
pub use trail::Trail;
pub use weather::Weather;

use serde::{Deserialize, Serialize};

/// `strftime` layout for human-readable dates, e.g. `Mon Jan 01 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// A persisted category row: the normalized record plus its cache bookkeeping.
///
/// The record's fields are flattened so the JSON shape matches the table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<R> {
    pub id: i32,
    pub location_id: i32,
    /// Wall-clock save time in epoch milliseconds.
    pub created_at: i64,
    #[serde(flatten)]
    pub record: R,
}

/// Take the characters in `start..end`, clamped to the string length.
pub(crate) fn char_slice(value: &str, start: usize, end: usize) -> String {
    value
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_slice_clamps() {
        assert_eq!(char_slice("2018-07-21 20:58:44", 0, 10), "2018-07-21");
        assert_eq!(char_slice("2018-07-21 20:58:44", 11, 19), "20:58:44");
        assert_eq!(char_slice("short", 11, 19), "");
    }

    #[test]
    fn cached_row_flattens_record() {
        let row = Cached {
            id: 3,
            location_id: 42,
            created_at: 1_700_000_000_000,
            record: Weather {
                forecast: "Clear".to_string(),
                time: "Mon Jan 01 2024".to_string(),
            },
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["location_id"], 42);
        assert_eq!(json["forecast"], "Clear");
        assert_eq!(json["time"], "Mon Jan 01 2024");
        assert!(json.get("record").is_none());
    }
}
