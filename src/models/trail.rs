use serde::{Deserialize, Serialize};

use super::char_slice;
use crate::clients::hiking::RawTrail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub name: String,
    pub location: String,
    pub length: f64,
    pub stars: f64,
    pub star_votes: i32,
    pub summary: String,
    pub trail_url: String,
    pub conditions: String,
    pub condition_date: String,
    pub condition_time: String,
}

impl Trail {
    #[must_use]
    pub fn from_raw(raw: &RawTrail) -> Self {
        Self {
            name: raw.name.clone(),
            location: raw.location.clone(),
            length: raw.length,
            stars: raw.stars,
            star_votes: raw.star_votes,
            summary: raw.summary.clone(),
            trail_url: raw.url.clone(),
            conditions: raw.condition_status.clone(),
            condition_date: char_slice(&raw.condition_date, 0, 10),
            condition_time: char_slice(&raw.condition_date, 11, 19),
        }
    }
}
