// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Layered configuration loading
//!
//! The [`Loader`] assembles the two configuration axes (providers and
//! deployments) from an ordered list of sources and builds an
//! [`EnvironmentRegistry`] — or a single default [`Environment`] — from the
//! result.
//!
//! Sources load and merge sequentially, later sources overriding earlier
//! ones:
//!
//! 1. the built-in default fragment for `1337.localhost`
//!    (`http://localhost:8545`, no known contracts);
//! 2. the URLs from the associated environment variable, if set (see
//!    [`env`]); the primary name is consulted first, then the
//!    `SEMIOCONNECT_`-prefixed alternate, first one set wins;
//! 3. the caller-supplied sources, in the order given.
//!
//! Environment variables are read once per load call, never lazily at
//! request time; the resolved default network is passed into the registry
//! constructor explicitly.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use tracing::debug;

use crate::config::merge::merge_all;
use crate::config::source::{
    normalize_deployments_fragment, normalize_providers_fragment, ConfigSource,
};
use crate::config::{DeploymentsConfig, NetworkId, ProvidersConfig};
use crate::environment::Environment;
use crate::errors::ConfigError;
use crate::registry::EnvironmentRegistry;

/// Environment variables consulted while loading.
///
/// Each setting has a primary name and a `SEMIOCONNECT_`-prefixed alternate;
/// the primary wins when both are set.
pub mod env {
    /// Space-separated URLs of providers fragments (registry loading)
    pub const PROVIDERS_URLS: &str = "PROVIDERS_URLS";
    /// Alternate for [`PROVIDERS_URLS`]
    pub const PROVIDERS_URLS_ALT: &str = "SEMIOCONNECT_PROVIDERS_URLS";

    /// Space-separated URLs of deployments fragments (registry loading)
    pub const DEPLOYMENTS_URLS: &str = "DEPLOYMENTS_URLS";
    /// Alternate for [`DEPLOYMENTS_URLS`]
    pub const DEPLOYMENTS_URLS_ALT: &str = "SEMIOCONNECT_DEPLOYMENTS_URLS";

    /// URL of a single provider fragment (single-environment loading)
    pub const PROVIDER_URL: &str = "PROVIDER_URL";
    /// Alternate for [`PROVIDER_URL`]
    pub const PROVIDER_URL_ALT: &str = "SEMIOCONNECT_PROVIDER_URL";

    /// URL of a single deployment fragment (single-environment loading)
    pub const DEPLOYMENT_URL: &str = "DEPLOYMENT_URL";
    /// Alternate for [`DEPLOYMENT_URL`]
    pub const DEPLOYMENT_URL_ALT: &str = "SEMIOCONNECT_DEPLOYMENT_URL";

    /// Default network identifier override (`chainId.network`)
    pub const DEFAULT_PROVIDER: &str = "DEFAULT_PROVIDER";
    /// Alternate for [`DEFAULT_PROVIDER`]
    pub const DEFAULT_PROVIDER_ALT: &str = "SEMIOCONNECT_DEFAULT_PROVIDER";
}

/// Loads layered configuration and assembles registries and environments.
#[derive(Debug, Clone, Default)]
pub struct Loader;

impl Loader {
    /// Create a loader with the built-in `1337.localhost` defaults.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load both configuration axes and create an environment registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a fragment has an invalid single-network shape, if
    /// the merged configuration does not deserialize, or if a configured
    /// default network identifier is malformed. Remote fetch failures are
    /// recovered per source and do not error here.
    pub async fn load_registry(
        &self,
        providers: Vec<ConfigSource>,
        deployments: Vec<ConfigSource>,
    ) -> Result<EnvironmentRegistry, ConfigError> {
        let mut provider_sources = vec![ConfigSource::Inline(default_providers_fragment())];
        provider_sources.extend(env_url_sources(env::PROVIDERS_URLS, env::PROVIDERS_URLS_ALT));
        provider_sources.extend(providers);

        let mut deployment_sources = vec![ConfigSource::Inline(default_deployments_fragment())];
        deployment_sources.extend(env_url_sources(
            env::DEPLOYMENTS_URLS,
            env::DEPLOYMENTS_URLS_ALT,
        ));
        deployment_sources.extend(deployments);

        debug!("loading environments configurations");
        let (providers_config, deployments_config) = tokio::join!(
            build_providers_config(provider_sources, false),
            build_deployments_config(deployment_sources),
        );
        let providers_config = providers_config?;
        let deployments_config = deployments_config?;
        debug!("environments configurations loaded");

        let default_network = resolve_default_network(&providers_config)?;
        Ok(EnvironmentRegistry::new(
            providers_config,
            deployments_config,
            default_network,
        ))
    }

    /// Load single-network configuration and return the default environment.
    ///
    /// Single-form fragments update the default provider as they merge, so
    /// the last one given wins the default. The returned environment owns its
    /// caches independently of any registry.
    ///
    /// # Errors
    ///
    /// As [`load_registry`](Loader::load_registry), plus
    /// [`ConfigError::NoDefaultNetwork`] if no fragment established a default.
    pub async fn load_environment(
        &self,
        provider: Option<ConfigSource>,
        deployment: Option<ConfigSource>,
    ) -> Result<Arc<Environment>, ConfigError> {
        let mut provider_sources = vec![ConfigSource::Inline(default_provider_fragment())];
        if let Some(url) = env_value(env::PROVIDER_URL, env::PROVIDER_URL_ALT) {
            provider_sources.push(ConfigSource::Url(url));
        }
        provider_sources.extend(provider);

        let mut deployment_sources = vec![ConfigSource::Inline(default_deployment_fragment())];
        if let Some(url) = env_value(env::DEPLOYMENT_URL, env::DEPLOYMENT_URL_ALT) {
            deployment_sources.push(ConfigSource::Url(url));
        }
        deployment_sources.extend(deployment);

        debug!("loading environment configurations");
        let (providers_config, deployments_config) = tokio::join!(
            build_providers_config(provider_sources, true),
            build_deployments_config(deployment_sources),
        );
        let providers_config = providers_config?;
        let deployments_config = deployments_config?;
        debug!("environment configurations loaded");

        let default_network = resolve_default_network(&providers_config)?;
        let registry =
            EnvironmentRegistry::new(providers_config, deployments_config, default_network);
        registry.environment(None).await
    }
}

/// Resolve every source, normalize shapes, merge, and deserialize the
/// providers axis.
async fn build_providers_config(
    sources: Vec<ConfigSource>,
    update_default: bool,
) -> Result<ProvidersConfig, ConfigError> {
    let fragments = join_all(sources.iter().map(ConfigSource::resolve)).await;
    let normalized = fragments
        .into_iter()
        .map(|fragment| normalize_providers_fragment(fragment, update_default))
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::from_value(merge_all(normalized))
        .map_err(|e| ConfigError::InvalidConfiguration { source: e })
}

/// Resolve every source, normalize shapes, merge, and deserialize the
/// deployments axis.
async fn build_deployments_config(
    sources: Vec<ConfigSource>,
) -> Result<DeploymentsConfig, ConfigError> {
    let fragments = join_all(sources.iter().map(ConfigSource::resolve)).await;
    let normalized = fragments
        .into_iter()
        .map(normalize_deployments_fragment)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::from_value(merge_all(normalized))
        .map_err(|e| ConfigError::InvalidConfiguration { source: e })
}

/// The default network: the environment variable override if set, else the
/// merged configuration's `defaultProvider`.
fn resolve_default_network(
    providers: &ProvidersConfig,
) -> Result<Option<NetworkId>, ConfigError> {
    match env_value(env::DEFAULT_PROVIDER, env::DEFAULT_PROVIDER_ALT) {
        Some(value) => value.parse().map(Some),
        None => providers.default_network(),
    }
}

fn env_value(primary: &str, alternate: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(|| std::env::var(alternate).ok().filter(|value| !value.is_empty()))
}

fn env_url_sources(primary: &str, alternate: &str) -> Vec<ConfigSource> {
    env_value(primary, alternate)
        .map(|value| {
            value
                .split_whitespace()
                .map(|url| ConfigSource::Url(url.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn default_provider_fragment() -> serde_json::Value {
    json!({
        "chainId": "1337",
        "network": "localhost",
        "url": "http://localhost:8545"
    })
}

fn default_providers_fragment() -> serde_json::Value {
    json!({
        "defaultProvider": "1337.localhost",
        "providers": {
            "1337": {
                "localhost": { "url": "http://localhost:8545" }
            }
        }
    })
}

fn default_deployment_fragment() -> serde_json::Value {
    json!({
        "chainId": "1337",
        "network": "localhost",
        "contracts": {}
    })
}

fn default_deployments_fragment() -> serde_json::Value {
    json!({
        "1337": {
            "localhost": { "chainId": "1337", "network": "localhost", "contracts": {} }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_providers_config_defaults_only() {
        let sources = vec![ConfigSource::Inline(default_providers_fragment())];
        let config = build_providers_config(sources, false).await.unwrap();
        let id = NetworkId::new("1337", "localhost");
        assert_eq!(config.endpoint(&id).unwrap().url, "http://localhost:8545");
        assert_eq!(config.default_network().unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_later_source_overrides_default_url() {
        let sources = vec![
            ConfigSource::Inline(default_providers_fragment()),
            ConfigSource::Inline(json!({
                "providers": {
                    "1337": { "localhost": { "url": "http://localhost:9545" } }
                }
            })),
        ];
        let config = build_providers_config(sources, false).await.unwrap();
        let id = NetworkId::new("1337", "localhost");
        assert_eq!(config.endpoint(&id).unwrap().url, "http://localhost:9545");
        // defaultProvider from the earlier fragment survives the merge
        assert_eq!(config.default_network().unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_single_fragments_update_default_in_order() {
        let sources = vec![
            ConfigSource::Inline(default_provider_fragment()),
            ConfigSource::Inline(json!({
                "chainId": "1",
                "network": "mainnet",
                "url": "https://eth.llamarpc.com"
            })),
        ];
        let config = build_providers_config(sources, true).await.unwrap();
        // Last single fragment wins the default
        assert_eq!(
            config.default_network().unwrap(),
            Some(NetworkId::new("1", "mainnet"))
        );
        // Both networks remain configured
        assert!(config.endpoint(&NetworkId::new("1337", "localhost")).is_some());
        assert!(config.endpoint(&NetworkId::new("1", "mainnet")).is_some());
    }

    #[tokio::test]
    async fn test_build_deployments_config_mixed_shapes() {
        let sources = vec![
            ConfigSource::Inline(default_deployments_fragment()),
            ConfigSource::Inline(json!({
                "chainId": "1",
                "network": "mainnet",
                "contracts": {
                    "DAI": {
                        "address": "0x6B175474E89094C44Da98b954EedeAC495271d0F",
                        "abi": []
                    }
                }
            })),
        ];
        let config = build_deployments_config(sources).await.unwrap();
        assert!(config.context(&NetworkId::new("1337", "localhost")).is_some());
        let mainnet = config.context(&NetworkId::new("1", "mainnet")).unwrap();
        assert!(mainnet.contracts.contains_key("DAI"));
    }

    #[tokio::test]
    async fn test_invalid_merged_configuration_rejected() {
        // `providers` must be a map of maps
        let sources = vec![ConfigSource::Inline(json!({ "providers": { "1": 42 } }))];
        let result = build_providers_config(sources, false).await;
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }
}
