// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, shared state, and start HTTP server

mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use middleware::{start_limiter_cleanup_task, FixedWindowLimiter, RateLimit};
use services::{start_cleanup_task, GeoapifyClient, PlacesCache};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Cached places expire this many seconds after insertion
const CACHE_TTL_SECONDS: u64 = 900;

/// Interval between background sweeps of expired cache entries
const CACHE_SWEEP_INTERVAL_SECONDS: u64 = 120;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting tripscout-places service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize cache for Geoapify responses
    let cache = Arc::new(PlacesCache::new(CACHE_TTL_SECONDS));
    log::info!("Initialized places cache (TTL: {}s)", CACHE_TTL_SECONDS);

    // Start background cleanup task
    start_cleanup_task(cache.clone(), CACHE_SWEEP_INTERVAL_SECONDS);
    log::info!(
        "Started cache cleanup task (interval: {}s)",
        CACHE_SWEEP_INTERVAL_SECONDS
    );

    // 5. Initialize Geoapify client (shared across workers)
    let geoapify_client = web::Data::new(GeoapifyClient::new(config.geoapify_api_key.clone()));

    // 6. Initialize fixed-window rate limiter for the /api scope
    let limiter = Arc::new(FixedWindowLimiter::new(
        Duration::from_millis(config.rate_limit_window_ms),
        config.rate_limit_max_requests,
    ));
    start_limiter_cleanup_task(limiter.clone(), (config.rate_limit_window_ms / 1000).max(1));
    log::info!(
        "Rate limiting: {} requests per {}ms window",
        config.rate_limit_max_requests,
        config.rate_limit_window_ms
    );

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (cache and upstream client)
            .app_data(web::Data::new(cache.clone()))
            .app_data(geoapify_client.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(config::cors_middleware(&config_clone))
            // Routes
            .service(
                web::scope("/api")
                    .wrap(RateLimit::new(limiter.clone()))
                    .configure(handlers::places_config),
            )
            .configure(handlers::health_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
