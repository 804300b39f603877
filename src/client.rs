// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! High-level clients and the client cache
//!
//! A [`Client`] wraps exactly one cached [`Connection`] into a type-erased
//! `RootProvider<AnyNetwork>`, enabling runtime chain selection without
//! compile-time network type constraints. Clients are immutable after
//! creation; many contract handles may be built from one client without
//! owning it.
//!
//! The [`ClientCache`] mirrors the connection cache's double-checked locking
//! with its own independent lock and the identical [`EndpointSignature`] key
//! scheme, so a client's cache key always matches the connection it wraps.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use alloy_network::AnyNetwork;
use alloy_provider::{ProviderBuilder, RootProvider};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::EndpointOptions;
use crate::connection::{Connection, ConnectionCache, EndpointSignature};
use crate::errors::ConnectError;

/// Type alias for the type-erased provider a client exposes.
pub type AnyProvider = RootProvider<AnyNetwork>;

/// A high-level client wrapping one connection.
#[derive(Debug)]
pub struct Client {
    signature: EndpointSignature,
    connection: Arc<Connection>,
    provider: AnyProvider,
    options: EndpointOptions,
}

impl Client {
    fn new(
        signature: EndpointSignature,
        connection: Arc<Connection>,
        options: EndpointOptions,
    ) -> Self {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<AnyNetwork>()
            .connect_client(connection.rpc_client().clone());
        Self {
            signature,
            connection,
            provider,
            options,
        }
    }

    /// The endpoint signature this client was cached under.
    #[must_use]
    pub fn signature(&self) -> &EndpointSignature {
        &self.signature
    }

    /// The connection this client wraps.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The type-erased provider for issuing RPC calls.
    #[must_use]
    pub fn provider(&self) -> &AnyProvider {
        &self.provider
    }

    /// The options this client was constructed with.
    #[must_use]
    pub fn options(&self) -> &EndpointOptions {
        &self.options
    }
}

/// Keyed store of lazily-created clients, at most one per signature.
///
/// Clearing this cache drops the clients but never closes the connections
/// underneath them; that is the [`ConnectionCache`]'s responsibility, invoked
/// separately by the owning environment during shutdown.
#[derive(Debug, Default)]
pub struct ClientCache {
    entries: RwLock<HashMap<EndpointSignature, Arc<Client>>>,
    create_lock: Mutex<()>,
}

impl ClientCache {
    /// Create an empty client cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the client for `(url, options)`, creating it on first access.
    ///
    /// On miss, first obtains the connection from `connections` (itself
    /// lazily created and cached), then wraps it. The miss path holds this
    /// cache's own creation mutex for the full construction, so concurrent
    /// first-requesters receive the same instance.
    ///
    /// # Errors
    ///
    /// Propagates connection construction failures; the client entry is left
    /// absent so a later call can retry.
    pub async fn get(
        &self,
        connections: &ConnectionCache,
        url: &str,
        options: &EndpointOptions,
    ) -> Result<Arc<Client>, ConnectError> {
        let signature = EndpointSignature::new(url, options);
        if let Some(client) = self.lookup(&signature) {
            return Ok(client);
        }

        let _guard = self.create_lock.lock().await;
        if let Some(client) = self.lookup(&signature) {
            return Ok(client);
        }

        let connection = connections.get(url, options).await?;
        let client = Arc::new(Client::new(signature.clone(), connection, options.clone()));
        self.entries
            .write()
            .map_err(|_| ConnectError::CacheLockPoisoned { cache: "client" })?
            .insert(signature.clone(), client.clone());
        debug!(key = %signature, "new client cached");
        Ok(client)
    }

    fn lookup(&self, signature: &EndpointSignature) -> Option<Arc<Client>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(signature).cloned())
    }

    /// Drop every cached client without touching their connections.
    ///
    /// Safe to call repeatedly.
    pub async fn clear(&self) {
        let _guard = self.create_lock.lock().await;
        match self.entries.write() {
            Ok(mut entries) => {
                entries.clear();
                debug!("client cache cleared");
            }
            Err(_) => warn!("client cache lock poisoned during clear"),
        }
    }

    /// Number of cached clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no clients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
