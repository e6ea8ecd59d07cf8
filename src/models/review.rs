use serde::{Deserialize, Serialize};

use crate::clients::yelp::Business;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

impl Review {
    #[must_use]
    pub fn from_business(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            image_url: business.image_url.clone(),
            price: business.price.clone(),
            rating: business.rating,
            url: business.url.clone(),
        }
    }
}
