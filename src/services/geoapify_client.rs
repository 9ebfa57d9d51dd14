// src/services/geoapify_client.rs
// DOCUMENTATION: Geoapify API client
// PURPOSE: Handle communication with Geoapify geocoding and places endpoints

use crate::errors::PlacesError;
use crate::models::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// Timeout applied to every outbound Geoapify call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Search radius around the resolved coordinate, in meters
const SEARCH_RADIUS_METERS: u32 = 10_000;

/// Maximum number of places requested per search
const RESULT_LIMIT: u32 = 50;

/// Geoapify API client
/// DOCUMENTATION: Handles authentication and API calls to Geoapify
pub struct GeoapifyClient {
    /// HTTP client for making requests
    client: Client,
    /// Geoapify API key
    api_key: String,
    /// Base URL for the places search endpoint
    places_url: String,
    /// Base URL for the forward geocoding endpoint
    geocode_url: String,
}

/// Response from the Geoapify forward geocoder
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeFeature {
    pub properties: GeocodeProperties,
}

/// Geocoder feature properties (only the fields we consume)
#[derive(Debug, Deserialize)]
pub struct GeocodeProperties {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Response from the Geoapify places search
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub features: Vec<PlaceFeature>,
}

/// Individual place feature from the Geoapify places API
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceFeature {
    pub properties: PlaceProperties,
}

/// Place feature properties (only the fields we consume)
/// DOCUMENTATION: Every field is optional upstream; normalization supplies
/// placeholders for missing names and addresses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceProperties {
    /// Stable upstream identifier, absent for some data sources
    pub place_id: Option<String>,
    pub name: Option<String>,
    /// Full formatted address
    pub formatted: Option<String>,
    /// Short address line, fallback when `formatted` is absent
    pub address_line1: Option<String>,
    /// Dotted category taxonomy, e.g. "accommodation.hotel"
    pub categories: Option<Vec<String>>,
}

impl GeoapifyClient {
    /// Create new Geoapify API client
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            places_url: "https://api.geoapify.com/v2/places".to_string(),
            geocode_url: "https://api.geoapify.com/v1/geocode/search".to_string(),
        }
    }

    /// Resolve a free-text city/place name to coordinates
    /// DOCUMENTATION: Asks the geocoder for its single best match; zero
    /// matches is a GeocodingFailed error
    pub async fn geocode_city(&self, city: &str) -> Result<Coordinates, PlacesError> {
        let params = [
            ("text", city),
            ("apiKey", self.api_key.as_str()),
            ("limit", "1"),
        ];

        log::debug!("Geoapify geocode lookup: text={}", city);

        let response = self
            .client
            .get(&self.geocode_url)
            .query(&params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Geoapify geocoder error {}: {}", status, body);
            return Err(PlacesError::GeocodingFailed(format!(
                "geocoder returned {}",
                status
            )));
        }

        let api_response: GeocodeResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Geoapify geocoder response: {}", e);
            PlacesError::GeocodingFailed(format!("parse error: {}", e))
        })?;

        let coords = api_response
            .features
            .first()
            .and_then(|f| match (f.properties.lat, f.properties.lon) {
                (Some(lat), Some(lon)) => Some(Coordinates { lat, lng: lon }),
                _ => None,
            })
            .ok_or_else(|| {
                PlacesError::GeocodingFailed(format!("no coordinates found for city: {}", city))
            })?;

        log::info!(
            "Geocoded {} to: lat={}, lng={}",
            city,
            coords.lat,
            coords.lng
        );
        Ok(coords)
    }

    /// Search for places around a coordinate
    /// DOCUMENTATION: 10 km circular filter, fixed result limit, category
    /// filter string from the dispatching endpoint. Returns raw upstream
    /// features; normalization happens in the place service.
    pub async fn search_places(
        &self,
        coords: Coordinates,
        categories: &str,
    ) -> Result<Vec<PlaceFeature>, PlacesError> {
        debug_assert!(coords.validate().is_ok());

        let filter = format!(
            "circle:{},{},{}",
            coords.lng, coords.lat, SEARCH_RADIUS_METERS
        );
        let limit = RESULT_LIMIT.to_string();
        let params = [
            ("apiKey", self.api_key.as_str()),
            ("limit", limit.as_str()),
            ("filter", filter.as_str()),
            ("categories", categories),
        ];

        log::debug!(
            "Geoapify places search: lat={}, lng={}, categories={}",
            coords.lat,
            coords.lng,
            categories
        );

        let response = self
            .client
            .get(&self.places_url)
            .query(&params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Geoapify places API error {}: {}", status, body);
            return Err(PlacesError::Upstream(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: PlacesResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Geoapify places response: {}", e);
            PlacesError::Upstream(format!("parse error: {}", e))
        })?;

        log::info!(
            "Geoapify places search returned {} results",
            api_response.features.len()
        );
        Ok(api_response.features)
    }
}

/// Map a reqwest transport failure to the error taxonomy
/// DOCUMENTATION: Timeouts get their own variant so they stay distinguishable
/// from other upstream failures; everything else is an upstream error
fn map_transport_error(e: reqwest::Error) -> PlacesError {
    if e.is_timeout() {
        log::error!("Geoapify request timed out: {}", e);
        PlacesError::Timeout
    } else {
        log::error!("Geoapify request failed: {}", e);
        PlacesError::Upstream(format!("request failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parsing() {
        let raw = r#"{
            "features": [
                { "properties": { "lat": 48.8566, "lon": 2.3522, "formatted": "Paris, France" } }
            ]
        }"#;

        let parsed: GeocodeResponse = serde_json::from_str(raw).unwrap();
        let props = &parsed.features[0].properties;
        assert_eq!(props.lat, Some(48.8566));
        assert_eq!(props.lon, Some(2.3522));
    }

    #[test]
    fn test_places_response_parsing_with_sparse_properties() {
        let raw = r#"{
            "features": [
                {
                    "properties": {
                        "place_id": "51abc",
                        "name": "Le Meurice",
                        "formatted": "228 Rue de Rivoli, 75001 Paris",
                        "categories": ["accommodation.hotel", "building"]
                    }
                },
                { "properties": {} }
            ]
        }"#;

        let parsed: PlacesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.features.len(), 2);
        assert_eq!(
            parsed.features[0].properties.place_id.as_deref(),
            Some("51abc")
        );
        assert!(parsed.features[1].properties.name.is_none());
        assert!(parsed.features[1].properties.categories.is_none());
    }
}
