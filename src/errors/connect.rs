//! Error types for connection and client construction.

use alloy_transport::TransportError;

/// Errors that can occur while constructing connections or clients.
///
/// Construction failures propagate to the caller of the cache `get`; the
/// cache entry is left absent so a later retry can attempt construction again
/// (no negative caching).
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The endpoint URL could not be parsed.
    #[error("Invalid endpoint URL: {url}")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// The endpoint URL uses a scheme with no matching transport.
    ///
    /// Only `http(s)` and `ws(s)` endpoints are supported.
    #[error("Unsupported URL scheme '{scheme}' for endpoint {url}")]
    UnsupportedScheme {
        /// The unrecognized scheme
        scheme: String,
        /// The full endpoint URL
        url: String,
    },

    /// The transport-level connection could not be established.
    ///
    /// For WebSocket endpoints this covers handshake failures; HTTP transports
    /// are constructed lazily and do not fail here.
    #[error("Failed to connect to {url}")]
    TransportFailed {
        /// The endpoint URL
        url: String,
        /// The underlying transport error
        #[source]
        source: TransportError,
    },

    /// A cache's interior lock was poisoned by a panicking thread.
    #[error("{cache} cache lock poisoned")]
    CacheLockPoisoned {
        /// Which cache observed the poisoned lock
        cache: &'static str,
    },
}

impl ConnectError {
    /// Helper to create a `TransportFailed` error.
    pub fn transport_failed(url: impl Into<String>, source: TransportError) -> Self {
        ConnectError::TransportFailed {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_poisoned_names_the_cache() {
        let connection = ConnectError::CacheLockPoisoned { cache: "connection" };
        let client = ConnectError::CacheLockPoisoned { cache: "client" };
        assert_eq!(connection.to_string(), "connection cache lock poisoned");
        assert_eq!(client.to_string(), "client cache lock poisoned");
    }
}
