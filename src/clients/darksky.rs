use reqwest::Client;
use serde::Deserialize;

use super::{Provider, ProviderError, get_json, require_key, trim_base};
use crate::domain::Coordinates;
use crate::models::weather::Weather;

const SERVICE: &str = "Dark Sky";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub data: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    /// Unix epoch seconds at the start of the day.
    pub time: i64,
    pub summary: Option<String>,
}

/// Daily forecast client (Dark Sky wire format).
#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DarkSkyClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key,
        }
    }

    pub async fn daily_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<DailyForecast>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, key, coordinates.latitude, coordinates.longitude
        );

        let response: ForecastResponse = get_json(SERVICE, self.client.get(&url)).await?;
        Ok(response.daily.data)
    }
}

#[async_trait::async_trait]
impl Provider for DarkSkyClient {
    type Params = Coordinates;
    type Record = Weather;

    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch(&self, params: &Coordinates) -> Result<Vec<Weather>, ProviderError> {
        let days = self.daily_forecast(*params).await?;
        Ok(days.iter().map(Weather::from_daily).collect())
    }
}
