//! Demo: Market Snapshot
//!
//! Showcases: public ticker, recent trades and orderbook depth
//!
//! Run: cargo run --bin market_snapshot -- btc_idr

use colored::*;
use indodax_rest::IndodaxClient;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pair = std::env::args().nth(1).unwrap_or_else(|| "btc_idr".to_string());

    println!("{}", "═".repeat(60).cyan());
    println!("{}", format!("  MARKET SNAPSHOT: {}", pair.to_uppercase()).cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = IndodaxClient::new()?;

    let ticker = client.get_ticker(&pair).await?;
    let t = &ticker["ticker"];
    println!(
        "  {} {}  {} {}  {} {}",
        "LAST:".yellow(),
        text(&t["last"]),
        "BUY:".green(),
        text(&t["buy"]),
        "SELL:".red(),
        text(&t["sell"])
    );
    println!("  {} {} - {}", "24H:".dimmed(), text(&t["low"]), text(&t["high"]));
    println!();

    let depth = client.get_depth(&pair).await?;
    println!("  {}", "Top of book".bold());
    for (label, side) in [("bid", "buy"), ("ask", "sell")] {
        if let Some(levels) = depth[side].as_array() {
            for level in levels.iter().take(5) {
                println!("    {:<4} {:>16} @ {}", label, text(&level[1]), text(&level[0]));
            }
        }
    }
    println!();

    let trades = client.get_trades(&pair).await?;
    println!("  {}", "Recent trades".bold());
    if let Some(trades) = trades.as_array() {
        for trade in trades.iter().take(10) {
            let side = text(&trade["type"]);
            let side = if side == "buy" { side.green() } else { side.red() };
            println!("    {:<5} {:>16} @ {}", side, text(&trade["amount"]), text(&trade["price"]));
        }
    }

    Ok(())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
