use serde::{Deserialize, Serialize};

use crate::clients::geocode::GeocodeResult;

/// A geocoded place, keyed by the caller's original search text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A location that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewLocation {
    #[must_use]
    pub fn from_geocode(search_query: &str, result: &GeocodeResult) -> Self {
        Self {
            search_query: search_query.to_string(),
            formatted_query: result.formatted_address.clone(),
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
        }
    }

    #[must_use]
    pub fn with_id(self, id: i32) -> Location {
        Location {
            id,
            search_query: self.search_query,
            formatted_query: self.formatted_query,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::geocode::{Geometry, LatLng};

    fn seattle() -> GeocodeResult {
        GeocodeResult {
            formatted_address: "Seattle, WA, USA".to_string(),
            geometry: Geometry {
                location: LatLng {
                    lat: 47.606_209_5,
                    lng: -122.332_070_8,
                },
            },
        }
    }

    #[test]
    fn from_geocode_keeps_original_query() {
        let location = NewLocation::from_geocode("seattle", &seattle());
        assert_eq!(location.search_query, "seattle");
        assert_eq!(location.formatted_query, "Seattle, WA, USA");
        assert!((location.longitude + 122.332_070_8).abs() < f64::EPSILON);
    }

    #[test]
    fn from_geocode_is_deterministic() {
        let result = seattle();
        assert_eq!(
            NewLocation::from_geocode("seattle", &result),
            NewLocation::from_geocode("seattle", &result)
        );
    }

    #[test]
    fn with_id_attaches_generated_id() {
        let location = NewLocation::from_geocode("seattle", &seattle()).with_id(42);
        assert_eq!(location.id, 42);
        assert_eq!(location.search_query, "seattle");
    }
}
