//! Error types for the semioconnect library.
//!
//! This module provides strongly-typed errors for all public APIs in
//! semioconnect. It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`ConfigError`], [`ConnectError`])
//! - **Unified error type** ([`SemioconnectError`]) for convenience when you
//!   don't need to distinguish between error sources
//!
//! # Architecture
//!
//! - [`ConfigError`] - Errors from configuration loading, merging, and lookup
//! - [`ConnectError`] - Errors from connection and client construction
//!
//! # Examples
//!
//! ## Fine-grained error handling
//!
//! ```rust,ignore
//! use semioconnect::{ConfigError, EnvironmentRegistry};
//!
//! match registry.environment(Some(&"99.unknown".parse()?)).await {
//!     Ok(environment) => { /* ... */ }
//!     Err(ConfigError::NetworkNotConfigured { network }) => {
//!         eprintln!("No provider or deployment for {network}");
//!     }
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```
//!
//! ## Using the unified error type
//!
//! ```rust,ignore
//! use semioconnect::{Loader, SemioconnectError};
//!
//! async fn example() -> Result<(), SemioconnectError> {
//!     let registry = Loader::new().load_registry(vec![], vec![]).await?;
//!     let client = registry.client(None, None).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod connect;

pub use config::ConfigError;
pub use connect::ConnectError;

/// Unified error type for all semioconnect operations.
///
/// This enum wraps the module-specific error types, providing a convenient way
/// to handle errors when you don't need to distinguish between error sources.
///
/// Module-specific error types automatically convert to `SemioconnectError`
/// via `From` implementations, so you can use `?` to propagate errors
/// naturally.
#[derive(Debug, thiserror::Error)]
pub enum SemioconnectError {
    /// Error from configuration loading, merging, or lookup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from connection or client construction.
    #[error("Connection error: {0}")]
    Connect(#[from] ConnectError),
}
