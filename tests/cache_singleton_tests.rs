// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Singleton guarantees of the connection and client caches under
//! concurrent access.

use std::sync::Arc;

use semioconnect::{ClientCache, ConnectionCache, EndpointOptions};
use tokio::sync::Barrier;

const URL: &str = "http://localhost:8545";

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_gets_share_one_connection() {
    let cache = Arc::new(ConnectionCache::new());
    let barrier = Arc::new(Barrier::new(8));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                cache.get(URL, &EndpointOptions::new()).await.unwrap()
            })
        })
        .collect();

    let mut connections = Vec::new();
    for task in tasks {
        connections.push(task.await.unwrap());
    }

    let first = &connections[0];
    for connection in &connections[1..] {
        assert!(Arc::ptr_eq(first, connection));
    }
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_distinct_options_get_distinct_connections() {
    let cache = ConnectionCache::new();

    let plain = cache.get(URL, &EndpointOptions::new()).await.unwrap();
    let limited = cache
        .get(URL, &EndpointOptions::new().with_rate_limit(10))
        .await
        .unwrap();

    assert!(!Arc::ptr_eq(&plain, &limited));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_disconnect_all_clears_and_allows_recreation() {
    let cache = ConnectionCache::new();
    let before = cache.get(URL, &EndpointOptions::new()).await.unwrap();
    assert_eq!(cache.len(), 1);

    cache.disconnect_all().await;
    assert!(cache.is_empty());

    // A fresh get creates a new instance, not the old one
    let after = cache.get(URL, &EndpointOptions::new()).await.unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(cache.len(), 1);

    // Repeated teardown is a no-op
    cache.disconnect_all().await;
    cache.disconnect_all().await;
    assert!(cache.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_gets_share_one_client() {
    let connections = Arc::new(ConnectionCache::new());
    let clients = Arc::new(ClientCache::new());
    let barrier = Arc::new(Barrier::new(8));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let connections = connections.clone();
            let clients = clients.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                clients
                    .get(&connections, URL, &EndpointOptions::new())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    let first = &results[0];
    for client in &results[1..] {
        assert!(Arc::ptr_eq(first, client));
    }
    assert_eq!(clients.len(), 1);
    // All clients went through the same connection
    assert_eq!(connections.len(), 1);
}

#[tokio::test]
async fn test_client_clear_leaves_connections_cached() {
    let connections = ConnectionCache::new();
    let clients = ClientCache::new();

    clients
        .get(&connections, URL, &EndpointOptions::new())
        .await
        .unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(connections.len(), 1);

    clients.clear().await;
    assert!(clients.is_empty());
    assert_eq!(connections.len(), 1);
}

#[tokio::test]
async fn test_client_wraps_cached_connection() {
    let connections = ConnectionCache::new();
    let clients = ClientCache::new();

    let client = clients
        .get(&connections, URL, &EndpointOptions::new())
        .await
        .unwrap();
    let connection = connections.get(URL, &EndpointOptions::new()).await.unwrap();

    assert!(std::ptr::eq(client.connection(), connection.as_ref()));
    assert_eq!(client.signature(), &connection_signature());
}

fn connection_signature() -> semioconnect::EndpointSignature {
    semioconnect::EndpointSignature::new(URL, &EndpointOptions::new())
}
