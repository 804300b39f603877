// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for semioconnect integration tests
//!
//! Provides configuration fixtures and a throwaway one-shot HTTP server so
//! tests can exercise the loader's remote-fragment path without external
//! infrastructure.

#![allow(dead_code)]

use semioconnect::{DeploymentsConfig, EnvironmentRegistry, NetworkId, ProvidersConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Address of the DAI stablecoin on Ethereum mainnet, used as a fixture.
pub const DAI_ADDRESS: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

/// A providers fixture with two networks and a per-contract override.
pub fn providers_fixture() -> ProvidersConfig {
    serde_json::from_value(json!({
        "defaultProvider": "1337.localhost",
        "providers": {
            "1337": {
                "localhost": { "url": "http://localhost:8545" }
            },
            "1": {
                "mainnet": {
                    "url": "http://localhost:8545",
                    "options": { "rateLimitPerSecond": 50 },
                    "contracts": {
                        "DAI": { "url": "http://localhost:8547" }
                    }
                }
            }
        }
    }))
    .expect("providers fixture must deserialize")
}

/// The deployments fixture matching [`providers_fixture`].
pub fn deployments_fixture() -> DeploymentsConfig {
    serde_json::from_value(json!({
        "1337": {
            "localhost": { "chainId": "1337", "network": "localhost", "contracts": {} }
        },
        "1": {
            "mainnet": {
                "chainId": "1",
                "network": "mainnet",
                "contracts": {
                    "DAI": {
                        "address": DAI_ADDRESS,
                        "abi": [{
                            "type": "function",
                            "name": "balanceOf",
                            "stateMutability": "view",
                            "inputs": [{ "name": "owner", "type": "address" }],
                            "outputs": [{ "name": "", "type": "uint256" }]
                        }]
                    }
                }
            }
        }
    }))
    .expect("deployments fixture must deserialize")
}

/// A registry over the fixtures with `1337.localhost` as the default.
pub fn registry_fixture() -> EnvironmentRegistry {
    EnvironmentRegistry::new(
        providers_fixture(),
        deployments_fixture(),
        Some(NetworkId::new("1337", "localhost")),
    )
}

/// Serve one HTTP request with the given JSON body, returning the URL.
///
/// The listener accepts a single connection and then shuts down; enough for
/// one loader fetch.
pub async fn serve_json_once(body: serde_json::Value) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("listener address");
    let body = body.to_string();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}/config.json")
}

/// A URL that refuses connections immediately (nothing listens on port 9).
pub fn unreachable_url() -> String {
    "http://127.0.0.1:9/config.json".to_string()
}
