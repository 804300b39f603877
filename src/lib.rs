//! Lazily-cached blockchain connectivity for EVM chains.
//!
//! semioconnect manages lazily-created, cached connections to one or more
//! network endpoints and the contract handles built on top of them, driven by
//! a layered configuration describing networks, endpoints, and deployments.
//!
//! - [`Loader`] merges default, environment-variable, and caller-supplied
//!   configuration fragments (inline values or remote URLs) in a fixed
//!   precedence order.
//! - [`EnvironmentRegistry`] holds at most one [`Environment`] per
//!   `chainId.network` pair, created on first access.
//! - Each [`Environment`] owns a [`ConnectionCache`] and a [`ClientCache`]
//!   guaranteeing at most one connection and one client per distinct
//!   (URL, options) pair, even under concurrent first access.
//! - Contract handles are built fresh per request from the cached client and
//!   the deployment's address + ABI.
//!
//! # Example
//!
//! ```rust,ignore
//! use semioconnect::{ConfigSource, Loader};
//!
//! let loader = Loader::new();
//! let registry = loader
//!     .load_registry(
//!         vec![ConfigSource::from("https://config.example/providers.json")],
//!         vec![ConfigSource::from("https://config.example/deployments.json")],
//!     )
//!     .await?;
//!
//! let dai = registry.contract("DAI", Some(&"1.mainnet".parse()?)).await?;
//! registry.shutdown_all().await;
//! ```

mod client;
pub mod config;
mod connection;
mod contract;
mod environment;
pub mod errors;
mod loader;
mod registry;
pub mod transport;

pub use client::{AnyProvider, Client, ClientCache};
pub use config::source::ConfigSource;
pub use config::{
    ContractDeployment, ContractOverride, DeploymentContext, DeploymentsConfig, EndpointOptions,
    NetworkId, ProviderEndpoint, ProvidersConfig,
};
pub use connection::{Connection, ConnectionCache, EndpointSignature, TransportKind};
pub use contract::ContractHandle;
pub use environment::Environment;
pub use errors::{ConfigError, ConnectError, SemioconnectError};
pub use loader::{env, Loader};
pub use registry::EnvironmentRegistry;
