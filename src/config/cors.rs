// src/config/cors.rs
// DOCUMENTATION: CORS policy for the places API
// PURPOSE: Restrict browser access to allow-listed frontend origins

use crate::config::Config;
use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware from configuration
/// DOCUMENTATION: Only GET/OPTIONS are exposed. Outside production every
/// origin is admitted; in production the configured allow-list decides.
/// Requests without an Origin header (curl, mobile apps) bypass CORS checks.
pub fn cors_middleware(config: &Config) -> Cors {
    let allowed_origins = config.allowed_origins.clone();
    let is_production = config.environment == "production";

    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            if !is_production {
                return true;
            }
            origin
                .to_str()
                .map(|o| allowed_origins.iter().any(|allowed| allowed == o))
                .unwrap_or(false)
        })
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(86400)
}
