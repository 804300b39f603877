//! Configuration sources and fragment shape normalization
//!
//! A configuration source is either an inline JSON value or a URL pointing to
//! a JSON document. Remote fetch failures are recovered per source: the failed
//! fragment is replaced with an empty object and a warning is logged, so one
//! unreachable URL never aborts the overall load.
//!
//! Fragments come in two shapes per axis. A fragment with an explicit
//! `chainId` field at the top level is the single-network form and is
//! converted into the multi-network keyed-by-chain-then-network shape before
//! merging. Classification happens here, once per fragment, never inside the
//! merge itself.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::ConfigError;

/// One configuration fragment: inline structured value or remote URL.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// An inline JSON fragment
    Inline(Value),
    /// A URL pointing to a JSON fragment
    Url(String),
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        ConfigSource::Inline(value)
    }
}

impl From<&str> for ConfigSource {
    fn from(url: &str) -> Self {
        ConfigSource::Url(url.to_string())
    }
}

impl From<String> for ConfigSource {
    fn from(url: String) -> Self {
        ConfigSource::Url(url)
    }
}

impl ConfigSource {
    /// Resolve this source to a JSON value.
    ///
    /// Remote fetch or parse failures are substituted with an empty object so
    /// that one bad source does not abort the merge; the failure is visible
    /// only through the warning log.
    pub(crate) async fn resolve(&self) -> Value {
        match self {
            ConfigSource::Inline(value) => value.clone(),
            ConfigSource::Url(url) => match fetch_json(url).await {
                Ok(value) => value,
                Err(error) => {
                    warn!(url = %url, error = %error, "failed to load configuration fragment, substituting empty");
                    Value::Object(Map::new())
                }
            },
        }
    }
}

/// Fetch and parse a remote JSON configuration fragment.
async fn fetch_json(url: &str) -> Result<Value, ConfigError> {
    let response = reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ConfigError::fetch_failed(url, e))?;
    response
        .json::<Value>()
        .await
        .map_err(|e| ConfigError::fetch_failed(url, e))
}

/// The recognized shapes of a configuration fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentShape {
    /// Single-network form: explicit `chainId` (and `network`) at top level
    Single,
    /// Multi-network form: keyed by chain id, then network name
    Multi,
}

fn classify(fragment: &Value) -> FragmentShape {
    match fragment.get("chainId") {
        Some(_) => FragmentShape::Single,
        None => FragmentShape::Multi,
    }
}

/// Read a discriminating field that may be a JSON string or number.
fn discriminant_field(fragment: &Value, field: &str) -> Result<String, ConfigError> {
    match fragment.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ConfigError::invalid_fragment(format!(
            "field '{field}' must be a string or number, got {other}"
        ))),
        None => Err(ConfigError::invalid_fragment(format!(
            "single-network fragment is missing field '{field}'"
        ))),
    }
}

/// Normalize a providers fragment into the multi-network shape.
///
/// A single-endpoint fragment `{ chainId, network, url, ... }` becomes
/// `{ providers: { chainId: { network: { url, ... } } } }`. When
/// `make_default` is set the converted fragment also sets `defaultProvider`
/// to `chainId.network`, so in the single-environment loading path the last
/// single fragment wins the default.
pub(crate) fn normalize_providers_fragment(
    fragment: Value,
    make_default: bool,
) -> Result<Value, ConfigError> {
    if classify(&fragment) == FragmentShape::Multi {
        return Ok(fragment);
    }

    let chain_id = discriminant_field(&fragment, "chainId")?;
    let network = discriminant_field(&fragment, "network")?;

    let mut endpoint = match fragment {
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::invalid_fragment(format!(
                "providers fragment must be an object, got {other}"
            )))
        }
    };
    endpoint.remove("chainId");
    endpoint.remove("network");

    let mut networks = Map::new();
    networks.insert(network.clone(), Value::Object(endpoint));
    let mut chains = Map::new();
    chains.insert(chain_id.clone(), Value::Object(networks));

    let mut converted = Map::new();
    if make_default {
        converted.insert(
            "defaultProvider".to_string(),
            Value::String(format!("{chain_id}.{network}")),
        );
    }
    converted.insert("providers".to_string(), Value::Object(chains));
    Ok(Value::Object(converted))
}

/// Normalize a deployments fragment into the multi-network shape.
///
/// A single-network fragment `{ chainId, network, contracts }` becomes
/// `{ chainId: { network: { chainId, network, contracts } } }` — the inner
/// context keeps its discriminating fields, matching the multi form.
pub(crate) fn normalize_deployments_fragment(fragment: Value) -> Result<Value, ConfigError> {
    if classify(&fragment) == FragmentShape::Multi {
        return Ok(fragment);
    }

    let chain_id = discriminant_field(&fragment, "chainId")?;
    let network = discriminant_field(&fragment, "network")?;

    let mut networks = Map::new();
    networks.insert(network, fragment);
    let mut chains = Map::new();
    chains.insert(chain_id, Value::Object(networks));
    Ok(Value::Object(chains))
}
