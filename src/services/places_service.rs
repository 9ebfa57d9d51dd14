// src/services/places_service.rs
// DOCUMENTATION: Orchestration of the places pipeline
// PURPOSE: Resolve coordinates, consult the cache, fetch and normalize
// upstream results

use crate::errors::PlacesError;
use crate::models::{Coordinates, Place, PlacesQuery};
use crate::services::geoapify_client::{GeoapifyClient, PlaceFeature};
use crate::services::PlacesCache;
use std::collections::HashSet;
use validator::Validate;

/// Error message for requests carrying neither a location nor coordinates
pub const MISSING_PARAMS_MSG: &str =
    "Missing required parameters: either location or lat/lng coordinates";

pub struct PlaceService;

impl PlaceService {
    /// Parse and validate raw coordinate strings
    /// DOCUMENTATION: Rejects malformed decimals and out-of-range values.
    /// Never touches the network.
    pub fn parse_coordinates(lat: &str, lng: &str) -> Result<Coordinates, PlacesError> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| PlacesError::InvalidInput("Invalid coordinates format".to_string()))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| PlacesError::InvalidInput("Invalid coordinates format".to_string()))?;

        let coords = Coordinates { lat, lng };
        coords
            .validate()
            .map_err(|_| PlacesError::InvalidInput("Coordinates out of range".to_string()))?;

        Ok(coords)
    }

    /// Resolve a query to a coordinate pair
    /// DOCUMENTATION: Exactly one resolution path executes per call: numeric
    /// coordinates are validated locally, otherwise a present `location` is
    /// geocoded, otherwise the request is rejected
    pub async fn resolve_coordinates(
        client: &GeoapifyClient,
        query: &PlacesQuery,
    ) -> Result<Coordinates, PlacesError> {
        match (&query.lat, &query.lng, &query.location) {
            (Some(lat), Some(lng), _) => Self::parse_coordinates(lat, lng),
            (_, _, Some(location)) => client.geocode_city(location).await,
            _ => Err(PlacesError::InvalidInput(MISSING_PARAMS_MSG.to_string())),
        }
    }

    /// Fetch normalized places for a query and category filter
    /// DOCUMENTATION: The single orchestration path behind every category
    /// endpoint. Cache hits skip the upstream call entirely; misses fetch,
    /// normalize, store, and return. No retries: a failed call fails once.
    pub async fn fetch_places(
        client: &GeoapifyClient,
        cache: &PlacesCache,
        query: &PlacesQuery,
        categories: &str,
    ) -> Result<Vec<Place>, PlacesError> {
        let coords = Self::resolve_coordinates(client, query).await?;

        let cache_key = PlacesCache::generate_key(coords.lat, coords.lng, categories);
        if let Some(cached) = cache.get(&cache_key).await {
            log::info!("Returning cached places for {}", cache_key);
            return Ok(cached);
        }

        log::info!(
            "Fetching places for lat={}, lng={}, categories={}",
            coords.lat,
            coords.lng,
            categories
        );

        let features = client.search_places(coords, categories).await?;
        let results = Self::map_features(features);

        cache.set(cache_key, results.clone()).await;
        Ok(results)
    }

    /// Normalize upstream features into Place records
    /// DOCUMENTATION: Supplies placeholders for missing names/addresses,
    /// derives `type` from the first dotted category, and keeps ids unique
    /// within this response: missing ids are synthesized from the current
    /// timestamp and index, colliding ids get the index appended
    fn map_features(features: Vec<PlaceFeature>) -> Vec<Place> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut seen_ids = HashSet::new();

        features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let props = feature.properties;

                let mut id = props
                    .place_id
                    .unwrap_or_else(|| format!("geoapify-{}-{}", timestamp, index));
                if seen_ids.contains(&id) {
                    id = format!("{}-{}", id, index);
                }
                seen_ids.insert(id.clone());

                let type_field = props
                    .categories
                    .as_ref()
                    .and_then(|c| c.first())
                    .and_then(|c| c.split('.').last())
                    .filter(|segment| !segment.is_empty())
                    .unwrap_or("general")
                    .to_string();

                Place {
                    id,
                    name: props.name.unwrap_or_else(|| "Unnamed Location".to_string()),
                    location: props
                        .formatted
                        .or(props.address_line1)
                        .unwrap_or_else(|| "Address not available".to_string()),
                    type_field,
                }
            })
            .collect()
    }
}
