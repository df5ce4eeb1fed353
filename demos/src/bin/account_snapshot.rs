//! Demo: Account Snapshot
//!
//! Showcases: environment configuration, signed private calls, nonce
//! persistence across runs and invalid-nonce recovery
//!
//! Run: IDX_KEY=... IDX_SECRET=... cargo run --bin account_snapshot
//!
//! The last nonce is stored in `.indodax_nonce` in the working directory.

use colored::*;
use indodax_rest::{ClientConfig, IndodaxClient, OpenOrdersRequest};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const NONCE_FILE: &str = ".indodax_nonce";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(saved) = load_nonce(Path::new(NONCE_FILE)) {
        println!("{} Restored nonce {}", "✓".green(), saved);
        config = config.with_initial_nonce(saved);
    }
    let client = IndodaxClient::with_config(config)?;

    let info = match client.get_info().await {
        Ok(info) => info,
        Err(e) if e.is_invalid_nonce() => {
            println!("{} Nonce rejected, retrying with {}", "!".yellow(), client.get_nonce());
            client.get_info().await?
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", "  BALANCES".cyan().bold());
    if let Some(balances) = info["balance"].as_object() {
        for (asset, amount) in balances {
            let amount = amount.as_str().map(str::to_string).unwrap_or_else(|| amount.to_string());
            if amount != "0" && amount != "0.00000000" {
                println!("    {:<8} {}", asset.to_uppercase(), amount);
            }
        }
    }
    println!();

    let orders = client.open_orders(&OpenOrdersRequest::all()).await?;
    println!("{}", "  OPEN ORDERS".cyan().bold());
    println!("{}", serde_json::to_string_pretty(&orders["orders"])?);

    std::fs::write(NONCE_FILE, client.get_nonce().to_string())?;
    println!("\n{} Saved nonce {}", "✓".green(), client.get_nonce());

    Ok(())
}

fn load_nonce(path: &Path) -> Option<u64> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}
