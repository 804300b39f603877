// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The environment registry
//!
//! An [`EnvironmentRegistry`] manages one [`Environment`] per network
//! identifier, created lazily on first access under the registry's own
//! creation mutex with the same double-checked pattern the connection and
//! client caches use. The default network is an explicit constructor
//! argument, resolved once by the [`Loader`](crate::Loader) — the registry
//! never reads the process environment.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client::Client;
use crate::config::{DeploymentsConfig, EndpointOptions, NetworkId, ProvidersConfig};
use crate::contract::ContractHandle;
use crate::environment::Environment;
use crate::errors::{ConfigError, SemioconnectError};

/// Manages one lazily-created [`Environment`] per configured network.
#[derive(Debug)]
pub struct EnvironmentRegistry {
    providers: ProvidersConfig,
    deployments: DeploymentsConfig,
    default_network: Option<NetworkId>,
    environments: RwLock<HashMap<NetworkId, Arc<Environment>>>,
    create_lock: Mutex<()>,
}

impl EnvironmentRegistry {
    /// Create a registry over merged configurations.
    ///
    /// `default_network` is the identifier used when operations are called
    /// without one; pass the value resolved at load time.
    #[must_use]
    pub fn new(
        providers: ProvidersConfig,
        deployments: DeploymentsConfig,
        default_network: Option<NetworkId>,
    ) -> Self {
        let mut networks: Vec<String> = providers
            .networks()
            .iter()
            .map(NetworkId::to_string)
            .collect();
        networks.sort_unstable();
        debug!(networks = networks.join(", "), "environment registry created");
        Self {
            providers,
            deployments,
            default_network,
            environments: RwLock::new(HashMap::new()),
            create_lock: Mutex::new(()),
        }
    }

    /// The providers configuration this registry was built from.
    #[must_use]
    pub fn providers(&self) -> &ProvidersConfig {
        &self.providers
    }

    /// The deployments configuration this registry was built from.
    #[must_use]
    pub fn deployments(&self) -> &DeploymentsConfig {
        &self.deployments
    }

    /// The default network identifier, if one is configured.
    #[must_use]
    pub fn default_network(&self) -> Option<&NetworkId> {
        self.default_network.as_ref()
    }

    /// Retrieve the environment for a network, creating it on first access.
    ///
    /// `network` defaults to the configured default network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDefaultNetwork`] if no identifier is given
    /// and none is configured, and [`ConfigError::NetworkNotConfigured`] if
    /// either the providers or the deployments configuration lacks the
    /// requested pair.
    pub async fn environment(
        &self,
        network: Option<&NetworkId>,
    ) -> Result<Arc<Environment>, ConfigError> {
        let id = network
            .or(self.default_network.as_ref())
            .ok_or(ConfigError::NoDefaultNetwork)?;

        if let Some(environment) = self.lookup(id) {
            return Ok(environment);
        }

        let _guard = self.create_lock.lock().await;
        if let Some(environment) = self.lookup(id) {
            return Ok(environment);
        }

        let endpoint = self
            .providers
            .endpoint(id)
            .ok_or_else(|| ConfigError::NetworkNotConfigured {
                network: id.to_string(),
            })?;
        let deployment =
            self.deployments
                .context(id)
                .ok_or_else(|| ConfigError::NetworkNotConfigured {
                    network: id.to_string(),
                })?;

        let environment = Arc::new(Environment::new(
            id.clone(),
            endpoint.clone(),
            deployment.clone(),
        ));
        if let Ok(mut environments) = self.environments.write() {
            environments.insert(id.clone(), environment.clone());
            debug!(network = %id, "new environment cached");
        }
        Ok(environment)
    }

    fn lookup(&self, id: &NetworkId) -> Option<Arc<Environment>> {
        self.environments
            .read()
            .ok()
            .and_then(|environments| environments.get(id).cloned())
    }

    /// Retrieve a cached client for a network.
    ///
    /// Thin delegation to the resolved environment's
    /// [`client_with`](Environment::client_with).
    pub async fn client(
        &self,
        network: Option<&NetworkId>,
        options: Option<EndpointOptions>,
    ) -> Result<Arc<Client>, SemioconnectError> {
        let environment = self.environment(network).await?;
        environment.client_with(options).await
    }

    /// Build a fresh contract handle on a network.
    ///
    /// Thin delegation to the resolved environment's
    /// [`contract`](Environment::contract).
    pub async fn contract(
        &self,
        name: &str,
        network: Option<&NetworkId>,
    ) -> Result<ContractHandle, SemioconnectError> {
        let environment = self.environment(network).await?;
        environment.contract(name).await
    }

    /// Shut down every cached environment and clear the registry.
    ///
    /// Environments are shut down sequentially, best-effort: each shutdown
    /// completes on its own and cannot block the others. Idempotent.
    pub async fn shutdown_all(&self) {
        let _guard = self.create_lock.lock().await;
        let drained: Vec<(NetworkId, Arc<Environment>)> = match self.environments.write() {
            Ok(mut environments) => environments.drain().collect(),
            Err(_) => {
                warn!("registry lock poisoned during shutdown");
                return;
            }
        };
        for (network, environment) in drained {
            debug!(network = %network, "shutting down cached environment");
            environment.shutdown().await;
        }
        debug!("all cached environments shut down");
    }

    /// Number of live cached environments.
    #[must_use]
    pub fn cached_environments(&self) -> usize {
        self.environments
            .read()
            .map(|environments| environments.len())
            .unwrap_or(0)
    }

    /// All network identifiers present in the providers configuration.
    #[must_use]
    pub fn networks(&self) -> Vec<NetworkId> {
        self.providers.networks()
    }
}
