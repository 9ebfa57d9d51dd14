// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod geoapify_client;
pub mod places_service;

pub use cache::*;
pub use geoapify_client::GeoapifyClient;
pub use places_service::*;
