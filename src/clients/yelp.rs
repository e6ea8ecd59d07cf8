use reqwest::Client;
use serde::Deserialize;

use super::{Provider, ProviderError, get_json, require_key, trim_base};
use crate::models::review::Review;

const SERVICE: &str = "Yelp";

#[derive(Debug, Deserialize)]
struct BusinessSearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub url: String,
}

/// Business review search (Yelp Fusion wire format, bearer auth).
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl YelpClient {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key,
        }
    }

    pub async fn search_businesses(&self, location: &str) -> Result<Vec<Business>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/v3/businesses/search?location={}",
            self.base_url,
            urlencoding::encode(location)
        );

        let response: BusinessSearchResponse =
            get_json(SERVICE, self.client.get(&url).bearer_auth(key)).await?;
        Ok(response.businesses)
    }
}

#[async_trait::async_trait]
impl Provider for YelpClient {
    /// Free-text search query of the location.
    type Params = String;
    type Record = Review;

    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch(&self, params: &String) -> Result<Vec<Review>, ProviderError> {
        let businesses = self.search_businesses(params).await?;
        Ok(businesses.iter().map(Review::from_business).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/search"))
            .and(query_param("location", "seattle"))
            .and(header("Authorization", "Bearer yelp-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "businesses": [{
                    "id": "abc",
                    "name": "Pike Place Chowder",
                    "image_url": "https://s3-media.fl.yelpcdn.com/bphoto/x/o.jpg",
                    "price": "$$",
                    "rating": 4.5,
                    "url": "https://www.yelp.com/biz/pike-place-chowder"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = YelpClient::new(Client::new(), &mock_server.uri(), Some("yelp-key".into()));
        let reviews = client.fetch(&"seattle".to_string()).await.unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].name, "Pike Place Chowder");
        assert_eq!(reviews[0].price.as_deref(), Some("$$"));
        assert!((reviews[0].rating - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unauthorized_is_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": "TOKEN_INVALID"}
            })))
            .mount(&mock_server)
            .await;

        let client = YelpClient::new(Client::new(), &mock_server.uri(), Some("bad".into()));
        let err = client.fetch(&"seattle".to_string()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
    }
}
