// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Managed connectivity environments
//!
//! An [`Environment`] owns the connection and client caches for exactly one
//! `(chainId, network)` pair, together with that network's endpoint
//! configuration and deployment metadata. Environments are created once per
//! network by the [`EnvironmentRegistry`](crate::EnvironmentRegistry) and
//! live until explicitly shut down.

use std::sync::Arc;

use tracing::debug;

use crate::client::{Client, ClientCache};
use crate::config::{DeploymentContext, EndpointOptions, NetworkId, ProviderEndpoint};
use crate::connection::ConnectionCache;
use crate::contract::{build_contract, ContractHandle};
use crate::errors::{ConfigError, SemioconnectError};

/// The managed environment for one network.
#[derive(Debug)]
pub struct Environment {
    network_id: NetworkId,
    endpoint: ProviderEndpoint,
    deployment: DeploymentContext,
    connections: ConnectionCache,
    clients: ClientCache,
}

impl Environment {
    pub(crate) fn new(
        network_id: NetworkId,
        endpoint: ProviderEndpoint,
        deployment: DeploymentContext,
    ) -> Self {
        let mut contracts: Vec<&str> = deployment.contracts.keys().map(String::as_str).collect();
        contracts.sort_unstable();
        debug!(
            network = %network_id,
            contracts = contracts.join(", "),
            "environment created"
        );
        Self {
            network_id,
            endpoint,
            deployment,
            connections: ConnectionCache::new(),
            clients: ClientCache::new(),
        }
    }

    /// The `(chainId, network)` pair this environment serves.
    #[must_use]
    pub fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    /// The endpoint configuration for this network.
    #[must_use]
    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }

    /// The deployment metadata for this network.
    #[must_use]
    pub fn deployment(&self) -> &DeploymentContext {
        &self.deployment
    }

    /// Retrieve the cached client for this environment's endpoint with its
    /// configured options.
    ///
    /// # Errors
    ///
    /// Propagates connection or client construction failures.
    pub async fn client(&self) -> Result<Arc<Client>, SemioconnectError> {
        self.client_with(None).await
    }

    /// Retrieve a cached client, overriding the configured options.
    ///
    /// Effective options resolve as: explicit argument, else the endpoint's
    /// configured default, else empty.
    pub async fn client_with(
        &self,
        options: Option<EndpointOptions>,
    ) -> Result<Arc<Client>, SemioconnectError> {
        let options = self.effective_options(options, None);
        let client = self
            .clients
            .get(&self.connections, &self.endpoint.url, &options)
            .await?;
        Ok(client)
    }

    /// Build a fresh contract handle from a cached client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContractNotFound`] if `name` is absent from the
    /// deployment metadata; propagates construction failures.
    pub async fn contract(&self, name: &str) -> Result<ContractHandle, SemioconnectError> {
        self.contract_with(name, None).await
    }

    /// Build a fresh contract handle, overriding the configured options.
    ///
    /// The endpoint URL and options resolve as: explicit options argument,
    /// else the per-contract override from the providers configuration, else
    /// the endpoint default. The backing client comes from this environment's
    /// caches.
    pub async fn contract_with(
        &self,
        name: &str,
        options: Option<EndpointOptions>,
    ) -> Result<ContractHandle, SemioconnectError> {
        let deployment = self.lookup_deployment(name)?;

        let override_config = self.endpoint.contracts.get(name);
        let url = override_config
            .and_then(|c| c.url.as_deref())
            .unwrap_or(&self.endpoint.url);
        let options = self.effective_options(options, override_config.and_then(|c| c.options.clone()));

        let client = self.clients.get(&self.connections, url, &options).await?;
        Ok(build_contract(&client, deployment))
    }

    /// Build a fresh contract handle from an externally supplied client.
    ///
    /// The client bypasses this environment's caches entirely and is not
    /// cached afterwards; the caller fully owns its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContractNotFound`] if `name` is absent from the
    /// deployment metadata.
    pub fn contract_from(&self, name: &str, client: &Client) -> Result<ContractHandle, ConfigError> {
        let deployment = self.lookup_deployment(name)?;
        Ok(build_contract(client, deployment))
    }

    /// Disconnect and clear both caches.
    ///
    /// Clients are cleared before their connections are closed, so no cached
    /// client outlives its transport. An externally held client clone may
    /// still briefly reference a closed connection; no in-flight-call
    /// bookkeeping exists to prevent that. Idempotent and infallible: close
    /// failures are logged, never propagated.
    pub async fn shutdown(&self) {
        debug!(network = %self.network_id, "shutting down environment");
        self.clients.clear().await;
        self.connections.disconnect_all().await;
        debug!(network = %self.network_id, "environment disconnected");
    }

    /// Number of live cached connections.
    #[must_use]
    pub fn cached_connections(&self) -> usize {
        self.connections.len()
    }

    /// Number of live cached clients.
    #[must_use]
    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    fn lookup_deployment(
        &self,
        name: &str,
    ) -> Result<&crate::config::ContractDeployment, ConfigError> {
        self.deployment
            .contracts
            .get(name)
            .ok_or_else(|| ConfigError::ContractNotFound {
                name: name.to_string(),
            })
    }

    fn effective_options(
        &self,
        explicit: Option<EndpointOptions>,
        contract_override: Option<EndpointOptions>,
    ) -> EndpointOptions {
        explicit
            .or(contract_override)
            .or_else(|| self.endpoint.options.clone())
            .unwrap_or_default()
    }
}
