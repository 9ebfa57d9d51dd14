// src/middleware/mod.rs
// DOCUMENTATION: Middleware module organization
// PURPOSE: Re-export middleware components

pub mod rate_limit;

pub use rate_limit::*;
