// src/models/place.rs
// DOCUMENTATION: Core data structures for the places proxy
// PURPOSE: Defines serialization/deserialization models for the API surface

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A normalized place returned to the frontend
/// DOCUMENTATION: Flattened view of an upstream Geoapify feature
/// `id` is unique within a single response only, not globally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Upstream place identifier, or a synthesized one when absent
    pub id: String,

    /// Display name - defaults to "Unnamed Location"
    pub name: String,

    /// Human-readable address - defaults to "Address not available"
    pub location: String,

    /// Last segment of the first upstream category (e.g. "hotel"), or "general"
    #[serde(rename = "type")]
    pub type_field: String,
}

/// Inbound query parameters for all category endpoints
/// DOCUMENTATION: Exactly one of (`lat` and `lng`) or `location` must be
/// present; coordinates arrive as decimal strings and are parsed server-side
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesQuery {
    /// Free-text place name (e.g. "Paris")
    pub location: Option<String>,

    /// Latitude as a decimal string
    pub lat: Option<String>,

    /// Longitude as a decimal string
    pub lng: Option<String>,
}

/// A resolved coordinate pair
/// DOCUMENTATION: Validated latitude/longitude used for the upstream search
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_serializes_type_field_as_type() {
        let place = Place {
            id: "abc".to_string(),
            name: "Hotel du Nord".to_string(),
            location: "102 Quai de Jemmapes, Paris".to_string(),
            type_field: "hotel".to_string(),
        };

        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["type"], "hotel");
        assert!(json.get("type_field").is_none());
    }

    #[test]
    fn test_coordinates_validation_bounds() {
        assert!(Coordinates { lat: 48.8566, lng: 2.3522 }.validate().is_ok());
        assert!(Coordinates { lat: -90.0, lng: 180.0 }.validate().is_ok());
        assert!(Coordinates { lat: 91.0, lng: 2.3522 }.validate().is_err());
        assert!(Coordinates { lat: 48.8566, lng: 200.0 }.validate().is_err());
    }
}
