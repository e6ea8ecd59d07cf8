use reqwest::Client;
use serde::Deserialize;

use super::{Provider, ProviderError, get_json, require_key, trim_base};
use crate::models::event::Event;

const SERVICE: &str = "Eventbrite";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    events: Vec<EventbriteEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventbriteEvent {
    pub url: String,
    pub name: TextField,
    pub summary: Option<String>,
    pub start: EventStart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextField {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventStart {
    /// Local start time without offset, e.g. `2024-05-04T19:00:00`.
    pub local: String,
}

#[derive(Clone)]
pub struct EventbriteClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EventbriteClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key,
        }
    }

    pub async fn search_near(&self, address: &str) -> Result<Vec<EventbriteEvent>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/v3/events/search?location.address={}&token={}",
            self.base_url,
            urlencoding::encode(address),
            urlencoding::encode(key)
        );

        let response: SearchResponse = get_json(SERVICE, self.client.get(&url)).await?;
        Ok(response.events)
    }
}

#[async_trait::async_trait]
impl Provider for EventbriteClient {
    /// Formatted address of the location.
    type Params = String;
    type Record = Event;

    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch(&self, params: &String) -> Result<Vec<Event>, ProviderError> {
        let events = self.search_near(params).await?;
        Ok(events.iter().map(Event::from_eventbrite).collect())
    }
}
