use reqwest::Client;
use serde::Deserialize;

use super::{Provider, ProviderError, get_json, require_key, trim_base};
use crate::domain::Coordinates;
use crate::models::trail::Trail;

const SERVICE: &str = "Hiking Project";

/// Search radius around the location, in miles.
const MAX_DISTANCE_MILES: u32 = 10;

#[derive(Debug, Deserialize)]
struct TrailsResponse {
    #[serde(default)]
    trails: Vec<RawTrail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrail {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub star_votes: i32,
    #[serde(default)]
    pub summary: String,
    pub url: String,
    #[serde(default)]
    pub condition_status: String,
    /// `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub condition_date: String,
}

#[derive(Clone)]
pub struct HikingProjectClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HikingProjectClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key,
        }
    }

    pub async fn trails_near(&self, coordinates: Coordinates) -> Result<Vec<RawTrail>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/data/get-trails?lat={}&lon={}&maxDistance={}&key={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            MAX_DISTANCE_MILES,
            urlencoding::encode(key)
        );

        let response: TrailsResponse = get_json(SERVICE, self.client.get(&url)).await?;
        Ok(response.trails)
    }
}

#[async_trait::async_trait]
impl Provider for HikingProjectClient {
    type Params = Coordinates;
    type Record = Trail;

    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch(&self, params: &Coordinates) -> Result<Vec<Trail>, ProviderError> {
        let trails = self.trails_near(*params).await?;
        Ok(trails.iter().map(Trail::from_raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_splits_condition_timestamp() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/get-trails"))
            .and(query_param("lat", "47.6"))
            .and(query_param("lon", "-122.3"))
            .and(query_param("maxDistance", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "trails": [{
                    "id": 7_011_192,
                    "name": "Rattlesnake Ledge",
                    "location": "North Bend, Washington",
                    "length": 5.3,
                    "stars": 4.4,
                    "starVotes": 87,
                    "summary": "A popular climb to a rocky viewpoint.",
                    "url": "https://www.hikingproject.com/trail/7011192",
                    "conditionStatus": "All Clear",
                    "conditionDetails": "Dry",
                    "conditionDate": "2018-07-21 20:58:44"
                }],
                "success": 1
            })))
            .mount(&mock_server)
            .await;

        let client = HikingProjectClient::new(
            Client::new(),
            &mock_server.uri(),
            Some("hp-key".into()),
        );
        let trails = client
            .fetch(&Coordinates::new(47.6, -122.3))
            .await
            .unwrap();

        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].star_votes, 87);
        assert_eq!(trails[0].conditions, "All Clear");
        assert_eq!(trails[0].condition_date, "2018-07-21");
        assert_eq!(trails[0].condition_time, "20:58:44");
    }
}
