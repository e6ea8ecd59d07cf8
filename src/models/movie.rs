use serde::{Deserialize, Serialize};

use crate::clients::tmdb::MovieResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub total_votes: i32,
    pub image_url: Option<String>,
    pub popularity: f64,
    pub released_on: String,
}

impl Movie {
    /// `image_base_url` must not end with a slash; poster paths start with one.
    #[must_use]
    pub fn from_result(result: &MovieResult, image_base_url: &str) -> Self {
        Self {
            title: result.title.clone(),
            overview: result.overview.clone(),
            average_votes: result.vote_average,
            total_votes: result.vote_count,
            image_url: result
                .poster_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| format!("{image_base_url}{p}")),
            popularity: result.popularity,
            released_on: result.release_date.clone().unwrap_or_default(),
        }
    }
}
