use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{DISPLAY_DATE_FORMAT, char_slice};
use crate::clients::eventbrite::EventbriteEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: String,
}

impl Event {
    #[must_use]
    pub fn from_eventbrite(event: &EventbriteEvent) -> Self {
        Self {
            link: event.url.clone(),
            name: event.name.text.clone(),
            event_date: format_local_date(&event.start.local),
            summary: event.summary.clone().unwrap_or_default(),
        }
    }
}

/// Truncate an ISO local timestamp to a display date. Anything that does not
/// parse keeps its leading `YYYY-MM-DD` part.
#[must_use]
pub fn format_local_date(local: &str) -> String {
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S").map_or_else(
        |_| char_slice(local, 0, 10),
        |t| t.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::eventbrite::{EventStart, TextField};

    #[test]
    fn local_timestamp_is_truncated_to_date() {
        assert_eq!(format_local_date("2024-05-04T19:00:00"), "Sat May 04 2024");
    }

    #[test]
    fn unparseable_timestamp_keeps_date_prefix() {
        assert_eq!(format_local_date("2024-05-04 evening"), "2024-05-04");
        assert_eq!(format_local_date(""), "");
    }

    #[test]
    fn from_eventbrite_maps_fields() {
        let raw = EventbriteEvent {
            url: "https://www.eventbrite.com/e/1".to_string(),
            name: TextField {
                text: "Night Market".to_string(),
            },
            summary: None,
            start: EventStart {
                local: "2024-05-04T19:00:00".to_string(),
            },
        };

        let event = Event::from_eventbrite(&raw);
        assert_eq!(event.link, "https://www.eventbrite.com/e/1");
        assert_eq!(event.name, "Night Market");
        assert_eq!(event.summary, "");
        assert_eq!(event, Event::from_eventbrite(&raw));
    }
}
