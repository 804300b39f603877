// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based rate limiting layer for Alloy RPC transports.
//!
//! This module implements an even-spacing request pacer as a Tower `Layer`
//! that can be composed with Alloy's transport system. Each request reserves
//! the next available time slot; slots are one pacing interval apart, so
//! requests never exceed the configured rate.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tower::Layer;

/// A Tower layer that paces requests to a fixed rate.
///
/// # Example
///
/// ```rust,ignore
/// use semioconnect::transport::RateLimitLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// // At most 10 requests per second
/// let client = ClientBuilder::default()
///     .layer(RateLimitLayer::per_second(10))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    pacer: Arc<Mutex<Pacer>>,
}

impl RateLimitLayer {
    /// Creates a pacer allowing `requests` per second, evenly spaced.
    #[must_use]
    pub fn per_second(requests: u32) -> Self {
        let interval = Duration::from_secs(1) / requests.max(1);
        Self::with_min_delay(interval)
    }

    /// Creates a pacer enforcing a minimum delay between consecutive requests.
    #[must_use]
    pub fn with_min_delay(delay: Duration) -> Self {
        Self {
            pacer: Arc::new(Mutex::new(Pacer::new(delay))),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            service,
            pacer: self.pacer.clone(),
        }
    }
}

/// Reserves evenly spaced time slots for requests.
#[derive(Debug)]
struct Pacer {
    interval: Duration,
    next_slot: Instant,
}

impl Pacer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Instant::now(),
        }
    }

    /// Reserve the next slot, returning when the caller may proceed.
    fn reserve(&mut self) -> Instant {
        let now = Instant::now();
        let slot = self.next_slot.max(now);
        self.next_slot = slot + self.interval;
        slot
    }
}

/// A Tower service that delays each request until its reserved slot.
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
    service: S,
    pacer: Arc<Mutex<Pacer>>,
}

impl<S, Request> tower::Service<Request> for RateLimitService<S>
where
    S: tower::Service<Request> + Clone + Send + 'static,
    S::Future: Send,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let pacer = self.pacer.clone();
        let mut service = self.service.clone();

        Box::pin(async move {
            let slot = {
                let mut pacer = pacer.lock().await;
                pacer.reserve()
            };
            tokio::time::sleep_until(slot).await;
            service.call(request).await
        })
    }
}
