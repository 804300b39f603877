//! Error types for configuration loading, merging, and lookup.

/// Errors that can occur while loading or querying configuration.
///
/// Fetch failures for individual remote fragments are recovered inside the
/// loader (the fragment is replaced with an empty object and a warning is
/// logged), so [`ConfigError::FetchFailed`] only surfaces through logs.
/// Lookup failures ([`ConfigError::NetworkNotConfigured`],
/// [`ConfigError::ContractNotFound`]) are hard errors: there is no silent
/// fallback to a default.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to fetch or parse a remote configuration fragment.
    #[error("Failed to load configuration fragment from {url}")]
    FetchFailed {
        /// The URL the fragment was requested from
        url: String,
        /// The underlying HTTP or JSON decoding error
        #[source]
        source: reqwest::Error,
    },

    /// A configuration fragment did not have a recognizable shape.
    ///
    /// Raised when a single-network fragment carries a `chainId` but its
    /// discriminating fields are not usable (e.g. `network` missing).
    #[error("Invalid configuration fragment: {reason}")]
    InvalidFragment {
        /// Why the fragment was rejected
        reason: String,
    },

    /// The merged configuration could not be deserialized into its typed form.
    #[error("Invalid merged configuration")]
    InvalidConfiguration {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A network identifier was not in `chainId.network` form.
    #[error("Invalid network identifier: '{value}' (expected 'chainId.network')")]
    InvalidNetworkId {
        /// The identifier that failed to parse
        value: String,
    },

    /// The requested network is absent from the providers or deployments
    /// configuration.
    #[error("Network not configured: {network}")]
    NetworkNotConfigured {
        /// The `chainId.network` identifier that was requested
        network: String,
    },

    /// The requested contract name is absent from the deployment metadata.
    #[error("Contract not found in deployment: {name}")]
    ContractNotFound {
        /// The contract name that was requested
        name: String,
    },

    /// No network identifier was given and the configuration does not define
    /// a default provider.
    #[error("No default network configured")]
    NoDefaultNetwork,
}

impl ConfigError {
    /// Helper to create a `FetchFailed` error.
    pub fn fetch_failed(url: impl Into<String>, source: reqwest::Error) -> Self {
        ConfigError::FetchFailed {
            url: url.into(),
            source,
        }
    }

    /// Helper to create an `InvalidFragment` error.
    pub fn invalid_fragment(reason: impl Into<String>) -> Self {
        ConfigError::InvalidFragment {
            reason: reason.into(),
        }
    }
}
