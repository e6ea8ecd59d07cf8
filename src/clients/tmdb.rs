use reqwest::Client;
use serde::Deserialize;

use super::{Provider, ProviderError, get_json, require_key, trim_base};
use crate::models::movie::Movie;

const SERVICE: &str = "TMDB";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieResult {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i32,
    /// Relative path such as `/abc123.jpg`, resolved against the image base URL.
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    pub release_date: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    #[must_use]
    pub fn new(
        client: Client,
        base_url: &str,
        image_base_url: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            image_base_url: trim_base(image_base_url),
            api_key,
        }
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieResult>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/3/search/movie?api_key={}&query={}",
            self.base_url,
            urlencoding::encode(key),
            urlencoding::encode(query)
        );

        let response: SearchResponse = get_json(SERVICE, self.client.get(&url)).await?;
        Ok(response.results)
    }
}

#[async_trait::async_trait]
impl Provider for TmdbClient {
    /// Free-text search query of the location.
    type Params = String;
    type Record = Movie;

    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch(&self, params: &String) -> Result<Vec<Movie>, ProviderError> {
        let results = self.search_movies(params).await?;
        Ok(results
            .iter()
            .map(|r| Movie::from_result(r, &self.image_base_url))
            .collect())
    }
}
