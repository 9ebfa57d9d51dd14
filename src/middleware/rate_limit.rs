// src/middleware/rate_limit.rs
// DOCUMENTATION: Fixed-window rate limiting middleware
// PURPOSE: Bound request volume per client IP across the /api scope

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use serde_json::json;
use std::collections::HashMap;
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Per-client window state
#[derive(Debug, Clone)]
struct WindowEntry {
    request_count: u32,
    window_start: Instant,
}

impl WindowEntry {
    fn new() -> Self {
        Self {
            request_count: 0,
            window_start: Instant::now(),
        }
    }
}

/// Fixed-window request limiter keyed by client id
/// DOCUMENTATION: Counts requests per client within a fixed window; the
/// window resets only when it elapses, not on each request (no sliding)
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    entries: RwLock<HashMap<String, WindowEntry>>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Check whether a request should be admitted
    /// DOCUMENTATION: Returns Err with the remaining window duration when the
    /// client has exhausted its budget. A poisoned lock admits the request.
    pub fn check_request(&self, client_id: &str) -> Result<(), Duration> {
        let Ok(mut entries) = self.entries.write() else {
            log::warn!("Rate limiter lock poisoned, allowing request");
            return Ok(());
        };
        let entry = entries
            .entry(client_id.to_string())
            .or_insert_with(WindowEntry::new);

        if entry.window_start.elapsed() > self.window {
            entry.request_count = 0;
            entry.window_start = Instant::now();
        }

        if entry.request_count >= self.max_requests {
            let remaining = self.window.saturating_sub(entry.window_start.elapsed());
            return Err(remaining);
        }

        entry.request_count += 1;
        Ok(())
    }

    /// Drop entries whose window has long elapsed
    pub fn cleanup(&self) {
        let Ok(mut entries) = self.entries.write() else {
            log::warn!("Rate limiter lock poisoned, skipping cleanup");
            return;
        };
        let window = self.window;
        entries.retain(|_, entry| entry.window_start.elapsed() < window * 2);
    }
}

/// Start background cleanup task for stale client entries
pub fn start_limiter_cleanup_task(limiter: Arc<FixedWindowLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}

/// Actix middleware wrapping a shared FixedWindowLimiter
pub struct RateLimit {
    limiter: Arc<FixedWindowLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<FixedWindowLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<FixedWindowLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_id = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        match self.limiter.check_request(&client_id) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(retry_after) => {
                log::warn!("Rate limit exceeded for client {}", client_id);
                let (request, _payload) = req.into_parts();
                let response = HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, retry_after.as_secs().to_string()))
                    .json(json!({ "error": "Too many requests, please try again later" }))
                    .map_into_right_body();
                Box::pin(async move { Ok(ServiceResponse::new(request, response)) })
            }
        }
    }
}
