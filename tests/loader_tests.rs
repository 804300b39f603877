// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Loader behavior with inline and remote sources.
//!
//! Environment-variable precedence lives in its own binary
//! (`loader_env_tests`) so these tests can run in parallel without touching
//! process state.

mod helpers;

use semioconnect::{ConfigSource, Loader, NetworkId};
use serde_json::json;

#[tokio::test]
async fn test_registry_from_defaults_only() {
    let registry = Loader::new().load_registry(vec![], vec![]).await.unwrap();

    let localhost = NetworkId::new("1337", "localhost");
    assert_eq!(registry.default_network(), Some(&localhost));
    assert_eq!(
        registry.providers().endpoint(&localhost).unwrap().url,
        "http://localhost:8545"
    );
    assert!(registry.deployments().context(&localhost).is_some());
}

#[tokio::test]
async fn test_caller_fragment_overrides_default_url() {
    let registry = Loader::new()
        .load_registry(
            vec![ConfigSource::from(json!({
                "providers": {
                    "1337": { "localhost": { "url": "http://localhost:9545" } }
                }
            }))],
            vec![],
        )
        .await
        .unwrap();

    let localhost = NetworkId::new("1337", "localhost");
    assert_eq!(
        registry.providers().endpoint(&localhost).unwrap().url,
        "http://localhost:9545"
    );
    // The built-in default network survives a partial override
    assert_eq!(registry.default_network(), Some(&localhost));
}

#[tokio::test]
async fn test_later_caller_fragment_wins() {
    let registry = Loader::new()
        .load_registry(
            vec![
                ConfigSource::from(json!({
                    "defaultProvider": "1.mainnet",
                    "providers": {
                        "1": { "mainnet": { "url": "http://localhost:8545" } }
                    }
                })),
                ConfigSource::from(json!({
                    "providers": {
                        "1": { "mainnet": { "url": "https://eth.llamarpc.com" } }
                    }
                })),
            ],
            vec![],
        )
        .await
        .unwrap();

    let mainnet = NetworkId::new("1", "mainnet");
    assert_eq!(registry.default_network(), Some(&mainnet));
    assert_eq!(
        registry.providers().endpoint(&mainnet).unwrap().url,
        "https://eth.llamarpc.com"
    );
}

#[tokio::test]
async fn test_unreachable_source_is_skipped() {
    let registry = Loader::new()
        .load_registry(
            vec![
                ConfigSource::from(json!({
                    "providers": {
                        "1": { "mainnet": { "url": "https://eth.llamarpc.com" } }
                    }
                })),
                ConfigSource::from(helpers::unreachable_url().as_str()),
            ],
            vec![],
        )
        .await
        .unwrap();

    // The failed fetch contributes nothing; earlier sources stand
    assert!(registry
        .providers()
        .endpoint(&NetworkId::new("1", "mainnet"))
        .is_some());
    assert_eq!(
        registry.default_network(),
        Some(&NetworkId::new("1337", "localhost"))
    );
}

#[tokio::test]
async fn test_remote_fragment_is_fetched_and_merged() {
    let url = helpers::serve_json_once(json!({
        "providers": {
            "10": { "optimism": { "url": "https://mainnet.optimism.io" } }
        }
    }))
    .await;

    let registry = Loader::new()
        .load_registry(vec![ConfigSource::from(url.as_str())], vec![])
        .await
        .unwrap();

    assert_eq!(
        registry
            .providers()
            .endpoint(&NetworkId::new("10", "optimism"))
            .unwrap()
            .url,
        "https://mainnet.optimism.io"
    );
    // Built-in defaults are still underneath
    assert!(registry
        .providers()
        .endpoint(&NetworkId::new("1337", "localhost"))
        .is_some());
}

#[tokio::test]
async fn test_remote_deployments_fragment_single_form() {
    let url = helpers::serve_json_once(json!({
        "chainId": "1",
        "network": "mainnet",
        "contracts": {
            "DAI": { "address": helpers::DAI_ADDRESS, "abi": [] }
        }
    }))
    .await;

    let registry = Loader::new()
        .load_registry(vec![], vec![ConfigSource::from(url.as_str())])
        .await
        .unwrap();

    let context = registry
        .deployments()
        .context(&NetworkId::new("1", "mainnet"))
        .unwrap();
    assert!(context.contracts.contains_key("DAI"));
}

#[tokio::test]
async fn test_load_environment_defaults_to_localhost() {
    let environment = Loader::new().load_environment(None, None).await.unwrap();
    assert_eq!(
        environment.network_id(),
        &NetworkId::new("1337", "localhost")
    );
    assert_eq!(environment.endpoint().url, "http://localhost:8545");
}

#[tokio::test]
async fn test_load_environment_single_fragment_wins_default() {
    let environment = Loader::new()
        .load_environment(
            Some(ConfigSource::from(json!({
                "chainId": "1",
                "network": "mainnet",
                "url": "https://eth.llamarpc.com",
                "options": { "rateLimitPerSecond": 10 }
            }))),
            Some(ConfigSource::from(json!({
                "chainId": "1",
                "network": "mainnet",
                "contracts": {
                    "DAI": { "address": helpers::DAI_ADDRESS, "abi": [] }
                }
            }))),
        )
        .await
        .unwrap();

    assert_eq!(environment.network_id(), &NetworkId::new("1", "mainnet"));
    assert_eq!(environment.endpoint().url, "https://eth.llamarpc.com");
    assert_eq!(
        environment
            .endpoint()
            .options
            .as_ref()
            .unwrap()
            .rate_limit_per_second,
        Some(10)
    );
    assert!(environment.deployment().contracts.contains_key("DAI"));
}
