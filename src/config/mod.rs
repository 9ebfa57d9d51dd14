// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod cors;
pub mod env;

pub use cors::cors_middleware;
pub use env::Config;
