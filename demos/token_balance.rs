/// Example demonstrating layered configuration loading and cached contract
/// access
///
/// This example shows how to:
/// 1. Load an environment registry from remote configuration fragments
/// 2. Resolve the default network's environment
/// 3. Build a contract handle and issue a read-only call
/// 4. Shut down every cached connection when done
///
/// Run with:
/// ```bash
/// PROVIDERS_URLS=https://config.example/providers.json \
/// DEPLOYMENTS_URLS=https://config.example/deployments.json \
/// HOLDER=0x47ac0Fb4F2D84898e4D9E7b4DaB3C24507a6D503 \
/// cargo run --package semioconnect --example token_balance
/// ```
use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use semioconnect::Loader;
use std::env;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    dotenvy::dotenv().ok();

    // Read configuration from environment
    let contract_name = env::var("CONTRACT").unwrap_or_else(|_| "DAI".to_string());
    let holder: Address = env::var("HOLDER")
        .context("HOLDER environment variable not set")?
        .parse()
        .context("Failed to parse HOLDER as an address")?;

    info!(contract_name, "Starting token balance example");

    // Configuration fragment URLs come from PROVIDERS_URLS / DEPLOYMENTS_URLS;
    // the built-in 1337.localhost defaults sit underneath
    let loader = Loader::new();
    let registry = loader
        .load_registry(vec![], vec![])
        .await
        .context("Failed to load environment registry")?;

    let environment = registry
        .environment(None)
        .await
        .context("Failed to resolve the default environment")?;
    info!(
        network = %environment.network_id(),
        url = environment.endpoint().url,
        "Environment resolved"
    );

    // The handle is built fresh; the client and connection underneath are
    // cached and reused by every later call on this environment
    let token = environment
        .contract(&contract_name)
        .await
        .context("Failed to build contract handle")?;

    let balance: U256 = token
        .function("balanceOf", &[holder.into()])?
        .call()
        .await
        .context("balanceOf call failed")?[0]
        .as_uint()
        .map(|(value, _)| value)
        .context("balanceOf returned a non-uint value")?;

    info!(
        contract = %token.address(),
        holder = %holder,
        balance = %balance,
        "Balance retrieved"
    );

    println!("\n=== Token Balance ===");
    println!("Contract: {}", token.address());
    println!("Holder:   {holder}");
    println!("Balance:  {balance}");

    registry.shutdown_all().await;
    Ok(())
}
