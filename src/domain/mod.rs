//! Domain primitives shared by the cache layer, the stores and the handlers.
//!
//! Every provider-backed data set is a [`Category`]. A category owns one table,
//! one provider and one freshness threshold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider-backed data set cached per location.
///
/// # Examples
///
/// ```rust
/// use city_explorer::domain::Category;
///
/// assert_eq!(Category::Weather.as_str(), "weather");
/// assert_eq!(Category::Reviews.to_string(), "reviews");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weather,
    Events,
    Reviews,
    Movies,
    Trails,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Weather,
        Self::Events,
        Self::Reviews,
        Self::Movies,
        Self::Trails,
    ];

    /// Short lowercase name, used for metric labels and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Events => "events",
            Self::Reviews => "reviews",
            Self::Movies => "movies",
            Self::Trails => "trails",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_are_distinct() {
        let mut names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Movies).unwrap();
        assert_eq!(json, "\"movies\"");
    }

    #[test]
    fn coordinates_validation() {
        assert!(Coordinates::new(47.6062, -122.3321).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }
}
