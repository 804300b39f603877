// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport-level connections and the connection cache
//!
//! A [`Connection`] owns one alloy RPC client handle for one endpoint URL,
//! constructed with one set of [`EndpointOptions`]. The transport is chosen
//! from the URL scheme at construction time: `http(s)` endpoints build
//! lazily, `ws(s)` endpoints perform the WebSocket handshake. Unrecognized
//! schemes are a creation failure.
//!
//! The [`ConnectionCache`] guarantees at most one live connection per
//! [`EndpointSignature`] within its lifetime, even when multiple tasks race
//! to the first access. A single async mutex guards the miss path of the
//! whole key space; the hit path only takes a read lock on the map. The
//! creation mutex is held across the full construction, including the
//! WebSocket handshake await, so concurrent waiters only ever observe the
//! winner's fully constructed value.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use alloy_provider::WsConnect;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::config::EndpointOptions;
use crate::errors::ConnectError;
use crate::transport::RateLimitLayer;

/// The transport family of a connection, chosen from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// `http://` or `https://` endpoint
    Http,
    /// `ws://` or `wss://` endpoint
    WebSocket,
}

impl TransportKind {
    /// Determine the transport for a URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::UnsupportedScheme`] for any scheme other than
    /// `http(s)` or `ws(s)`.
    pub fn from_url(url: &Url) -> Result<Self, ConnectError> {
        match url.scheme() {
            "http" | "https" => Ok(TransportKind::Http),
            "ws" | "wss" => Ok(TransportKind::WebSocket),
            other => Err(ConnectError::UnsupportedScheme {
                scheme: other.to_string(),
                url: url.to_string(),
            }),
        }
    }

    /// Human-readable transport name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransportKind::Http => "http",
            TransportKind::WebSocket => "websocket",
        }
    }
}

/// Cache key identifying one connection target: a URL plus the canonical
/// serialization of its construction options.
///
/// Two requests with the same URL but different options map to different
/// entries; identical URL and options (including both being default) map to
/// the same entry. Options serialize deterministically (fixed field order),
/// so the serialization is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointSignature(String);

impl EndpointSignature {
    /// Derive the signature for a URL and options pair.
    #[must_use]
    pub fn new(url: &str, options: &EndpointOptions) -> Self {
        let options = serde_json::to_string(options).unwrap_or_default();
        Self(format!("{url}.{options}"))
    }
}

impl fmt::Display for EndpointSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live transport-level link to one provider endpoint.
///
/// Owned exclusively by the [`ConnectionCache`] entry that created it;
/// mutable only by creation and by [`Connection::close`].
#[derive(Debug)]
pub struct Connection {
    url: Url,
    kind: TransportKind,
    client: RpcClient,
}

impl Connection {
    /// Open a connection to `url` with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, its scheme has no matching
    /// transport, or the WebSocket handshake fails.
    pub(crate) async fn open(url: &str, options: &EndpointOptions) -> Result<Self, ConnectError> {
        let parsed: Url = url.parse().map_err(|e| ConnectError::InvalidUrl {
            url: url.to_string(),
            source: e,
        })?;
        let kind = TransportKind::from_url(&parsed)?;

        let client = match kind {
            TransportKind::Http => build_http_client(parsed.clone(), options),
            TransportKind::WebSocket => build_ws_client(url, options).await?,
        };

        Ok(Self {
            url: parsed,
            kind,
            client,
        })
    }

    /// The endpoint URL this connection targets.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The transport family of this connection.
    #[must_use]
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// The underlying RPC client handle.
    #[must_use]
    pub fn rpc_client(&self) -> &RpcClient {
        &self.client
    }

    /// Close the transport.
    ///
    /// Both transport families release their resources when the last handle
    /// drops, so closing only logs today. Kept fallible for transports whose
    /// teardown can report errors.
    pub(crate) fn close(&self) -> Result<(), ConnectError> {
        debug!(url = %self.url, transport = self.kind.name(), "closing connection");
        Ok(())
    }
}

/// Build an HTTP RPC client, composing the pacing layer when options ask
/// for it.
fn build_http_client(url: Url, options: &EndpointOptions) -> RpcClient {
    match (options.rate_limit_per_second, options.min_delay_ms) {
        (Some(rps), _) => ClientBuilder::default()
            .layer(RateLimitLayer::per_second(rps))
            .http(url),
        (None, Some(delay_ms)) => ClientBuilder::default()
            .layer(RateLimitLayer::with_min_delay(
                std::time::Duration::from_millis(delay_ms),
            ))
            .http(url),
        (None, None) => ClientBuilder::default().http(url),
    }
}

/// Build a WebSocket RPC client; this performs the handshake.
async fn build_ws_client(url: &str, options: &EndpointOptions) -> Result<RpcClient, ConnectError> {
    let ws = WsConnect::new(url);
    match (options.rate_limit_per_second, options.min_delay_ms) {
        (Some(rps), _) => ClientBuilder::default()
            .layer(RateLimitLayer::per_second(rps))
            .ws(ws)
            .await
            .map_err(|e| ConnectError::transport_failed(url, e)),
        (None, Some(delay_ms)) => ClientBuilder::default()
            .layer(RateLimitLayer::with_min_delay(
                std::time::Duration::from_millis(delay_ms),
            ))
            .ws(ws)
            .await
            .map_err(|e| ConnectError::transport_failed(url, e)),
        (None, None) => ClientBuilder::default()
            .ws(ws)
            .await
            .map_err(|e| ConnectError::transport_failed(url, e)),
    }
}

/// Keyed store of lazily-created connections, at most one per signature.
///
/// The map is guarded by a read-write lock for cheap hit-path reads; a single
/// async mutex serializes all miss-path creations across the whole key space
/// (coarse-grained, double-checked). Entries are only ever removed in bulk by
/// [`ConnectionCache::disconnect_all`] — this is a correctness cache, not a
/// resource-bounded one, so there is no eviction policy.
#[derive(Debug, Default)]
pub struct ConnectionCache {
    entries: RwLock<HashMap<EndpointSignature, Arc<Connection>>>,
    create_lock: Mutex<()>,
}

impl ConnectionCache {
    /// Create an empty connection cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the connection for `(url, options)`, creating it on first
    /// access.
    ///
    /// Concurrent callers racing to a miss are serialized by the cache-wide
    /// creation mutex; the first to construct wins and every caller receives
    /// the same instance.
    ///
    /// # Errors
    ///
    /// Propagates construction failures; the entry is left absent so a later
    /// call can retry.
    pub async fn get(
        &self,
        url: &str,
        options: &EndpointOptions,
    ) -> Result<Arc<Connection>, ConnectError> {
        let signature = EndpointSignature::new(url, options);
        if let Some(connection) = self.lookup(&signature) {
            return Ok(connection);
        }

        let _guard = self.create_lock.lock().await;
        // Re-check: another task may have populated the key while we waited
        if let Some(connection) = self.lookup(&signature) {
            return Ok(connection);
        }

        let connection = Arc::new(Connection::open(url, options).await?);
        self.entries
            .write()
            .map_err(|_| ConnectError::CacheLockPoisoned { cache: "connection" })?
            .insert(signature.clone(), connection.clone());
        debug!(key = %signature, "new connection cached");
        Ok(connection)
    }

    fn lookup(&self, signature: &EndpointSignature) -> Option<Arc<Connection>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(signature).cloned())
    }

    /// Close every cached connection and clear the cache.
    ///
    /// Individual close failures are logged and swallowed so teardown always
    /// completes; the map is cleared even if some closes failed. Takes the
    /// same mutex as creation, so it cannot interleave with an in-progress
    /// construction. Safe to call repeatedly.
    pub async fn disconnect_all(&self) {
        let _guard = self.create_lock.lock().await;
        let drained: Vec<(EndpointSignature, Arc<Connection>)> = match self.entries.write() {
            Ok(mut entries) => entries.drain().collect(),
            Err(_) => {
                warn!("connection cache lock poisoned during shutdown");
                return;
            }
        };
        for (signature, connection) in drained {
            debug!(key = %signature, "disconnecting");
            if let Err(error) = connection.close() {
                warn!(key = %signature, error = %error, "failed to close connection");
            }
        }
    }

    /// Number of cached connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
