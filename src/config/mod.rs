//! Configuration types for providers and deployments
//!
//! Two configuration axes describe a connectivity setup:
//!
//! - **Providers**: which RPC endpoint (URL + construction options) serves
//!   each `(chainId, network)` pair, plus optional per-contract overrides.
//! - **Deployments**: which contracts (address + ABI) are known on each
//!   `(chainId, network)` pair.
//!
//! Both axes are keyed first by chain id, then by network name, and both are
//! immutable once merged by the [`Loader`](crate::Loader).
//!
//! # Example: Providers fragment (JSON)
//!
//! ```json
//! {
//!   "defaultProvider": "1.mainnet",
//!   "providers": {
//!     "1": {
//!       "mainnet": {
//!         "url": "https://eth.llamarpc.com",
//!         "options": { "rateLimitPerSecond": 10 },
//!         "contracts": {
//!           "DAI": { "url": "wss://eth.llamarpc.com/ws" }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! # Example: Deployment fragment, single-network form (JSON)
//!
//! ```json
//! {
//!   "chainId": "1",
//!   "network": "mainnet",
//!   "contracts": {
//!     "DAI": { "address": "0x6B175474E89094C44Da98b954EedeAC495271d0F", "abi": [] }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub mod merge;
pub mod source;

/// Identifies one `(chainId, network)` pair, written `chainId.network`.
///
/// # Example
///
/// ```rust
/// use semioconnect::NetworkId;
///
/// let id: NetworkId = "1.mainnet".parse().unwrap();
/// assert_eq!(id.chain_id, "1");
/// assert_eq!(id.network, "mainnet");
/// assert_eq!(id.to_string(), "1.mainnet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkId {
    /// Chain identifier (e.g. `"1"`, `"1337"`)
    pub chain_id: String,
    /// Network name within the chain (e.g. `"mainnet"`, `"localhost"`)
    pub network: String,
}

impl NetworkId {
    /// Create a network identifier from its parts.
    pub fn new(chain_id: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            network: network.into(),
        }
    }
}

impl FromStr for NetworkId {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('.') {
            Some((chain_id, network)) if !chain_id.is_empty() && !network.is_empty() => {
                Ok(Self::new(chain_id, network))
            }
            _ => Err(ConfigError::InvalidNetworkId {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chain_id, self.network)
    }
}

/// Options applied when constructing a connection to an endpoint.
///
/// Options participate in the cache key: two requests for the same URL with
/// different options map to different cached connections.
///
/// # Example
///
/// ```rust
/// use semioconnect::EndpointOptions;
///
/// let options = EndpointOptions::new().with_rate_limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointOptions {
    /// Rate limit in requests per second (None for unlimited)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_second: Option<u32>,
    /// Minimum delay between requests in milliseconds (alternative to rate
    /// limiting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delay_ms: Option<u64>,
}

impl EndpointOptions {
    /// Create empty options (no rate limiting).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rate limiting (requests per second).
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.rate_limit_per_second = Some(requests_per_second);
        self
    }

    /// Set a minimum delay between consecutive requests.
    #[must_use]
    pub fn with_min_delay_ms(mut self, delay_ms: u64) -> Self {
        self.min_delay_ms = Some(delay_ms);
        self
    }
}

/// Per-contract override of the endpoint a contract's calls are routed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractOverride {
    /// Endpoint URL override for this contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Connection options override for this contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EndpointOptions>,
}

/// The endpoint configuration for one `(chainId, network)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEndpoint {
    /// RPC endpoint URL (`http(s)://` or `ws(s)://`)
    pub url: String,
    /// Default connection options for this endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EndpointOptions>,
    /// Per-contract endpoint overrides, keyed by contract name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contracts: HashMap<String, ContractOverride>,
}

impl ProviderEndpoint {
    /// Create an endpoint configuration with default options.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: None,
            contracts: HashMap::new(),
        }
    }
}

/// Merged providers configuration across all chains and networks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    /// Default network identifier in `chainId.network` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    /// Endpoint configuration keyed by chain id, then network name
    #[serde(default)]
    pub providers: HashMap<String, HashMap<String, ProviderEndpoint>>,
}

impl ProvidersConfig {
    /// Look up the endpoint configured for a network.
    #[must_use]
    pub fn endpoint(&self, id: &NetworkId) -> Option<&ProviderEndpoint> {
        self.providers.get(&id.chain_id)?.get(&id.network)
    }

    /// The configured default network, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `defaultProvider` is present but not in
    /// `chainId.network` form.
    pub fn default_network(&self) -> Result<Option<NetworkId>, ConfigError> {
        self.default_provider.as_deref().map(str::parse).transpose()
    }

    /// All configured network identifiers.
    #[must_use]
    pub fn networks(&self) -> Vec<NetworkId> {
        self.providers
            .iter()
            .flat_map(|(chain_id, networks)| {
                networks
                    .keys()
                    .map(move |network| NetworkId::new(chain_id.clone(), network.clone()))
            })
            .collect()
    }
}

/// One deployed contract: its address and interface schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDeployment {
    /// Deployed contract address
    pub address: Address,
    /// Contract ABI in the standard JSON form
    pub abi: JsonAbi,
}

/// The contracts known on one `(chainId, network)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentContext {
    /// Chain identifier this context belongs to
    pub chain_id: String,
    /// Network name this context belongs to
    pub network: String,
    /// Deployed contracts keyed by name
    #[serde(default)]
    pub contracts: HashMap<String, ContractDeployment>,
}

impl DeploymentContext {
    /// Create an empty deployment context for a network.
    pub fn empty(id: &NetworkId) -> Self {
        Self {
            chain_id: id.chain_id.clone(),
            network: id.network.clone(),
            contracts: HashMap::new(),
        }
    }
}

/// Merged deployments configuration across all chains and networks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentsConfig(pub HashMap<String, HashMap<String, DeploymentContext>>);

impl DeploymentsConfig {
    /// Look up the deployment context for a network.
    #[must_use]
    pub fn context(&self, id: &NetworkId) -> Option<&DeploymentContext> {
        self.0.get(&id.chain_id)?.get(&id.network)
    }
}
