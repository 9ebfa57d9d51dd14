// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Error enum for all failures in the places pipeline
/// Each variant maps to an HTTP status code and JSON response
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No results found")]
    NoResults,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),
}

/// Convert PlacesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
/// Internal detail for 500-level failures is logged, never sent to the client
impl ResponseError for PlacesError {
    fn error_response(&self) -> HttpResponse {
        match self {
            PlacesError::InvalidInput(message) => {
                HttpResponse::BadRequest().json(json!({ "error": message }))
            }
            PlacesError::NoResults => {
                HttpResponse::NotFound().json(json!({ "message": "No results found" }))
            }
            PlacesError::Timeout | PlacesError::GeocodingFailed(_) | PlacesError::Upstream(_) => {
                log::error!("Internal error while fetching places: {}", self);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "An internal server error occurred" }))
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlacesError::NoResults => StatusCode::NOT_FOUND,
            PlacesError::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::GeocodingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_invalid_input_maps_to_400() {
        let err = PlacesError::InvalidInput(
            "Missing required parameters: either location or lat/lng coordinates".to_string(),
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "Missing required parameters: either location or lat/lng coordinates"
        );
    }

    #[actix_rt::test]
    async fn test_no_results_maps_to_404() {
        let err = PlacesError::NoResults;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "No results found");
    }

    #[actix_rt::test]
    async fn test_timeout_is_distinct_but_responds_generic_500() {
        let err = PlacesError::Timeout;
        assert_eq!(err.to_string(), "Request timed out. Please try again.");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // No internal detail leaks into the response body
        assert_eq!(json["error"], "An internal server error occurred");
    }

    #[actix_rt::test]
    async fn test_upstream_detail_never_leaks() {
        let err = PlacesError::Upstream("API key rejected by Geoapify".to_string());
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("Geoapify"));
        assert!(text.contains("An internal server error occurred"));
    }
}
