//! REST API client for the Indodax cryptocurrency exchange
//!
//! This crate provides a REST client for Indodax market data and trading.
//!
//! # Features
//!
//! - **Market Data**: Ticker, recent trades, orderbook depth
//! - **Account**: Balances, transaction/trade/order history, open orders
//! - **Trading**: Place and cancel orders
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Each private request is signed
//! with HMAC-SHA512 over its form payload and carries a nonce from the
//! client's [`NonceTracker`]. When the server answers `invalid_nonce`, the
//! tracker is corrected from the server's hint before the error is returned,
//! so the caller can simply issue the call again.
//!
//! # Example
//!
//! ```no_run
//! use indodax_rest::{IndodaxClient, OpenOrdersRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = IndodaxClient::new()?;
//!     let ticker = client.get_ticker("btc_idr").await?;
//!     println!("BTC/IDR: {}", ticker);
//!
//!     // Private endpoints (auth required)
//!     let auth_client = IndodaxClient::from_env()?;
//!     let orders = auth_client.open_orders(&OpenOrdersRequest::all()).await?;
//!     println!("Open orders: {}", orders);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Nonce persistence
//!
//! Nonce state is in memory only. Store [`IndodaxClient::get_nonce`] before
//! shutdown and restore it with [`ClientConfig::with_initial_nonce`] (or
//! [`IndodaxClient::set_nonce`]) to stay ahead of nonces the server has seen.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, IndodaxClient};
pub use error::{ApiErrorCode, RestError, RestResult};
pub use indodax_auth::{Credentials, NonceTracker, Payload};

// Re-export request types
pub use types::{
    CancelOrderRequest, GetInfoRequest, GetOrderRequest, MarketResource, OpenOrdersRequest,
    OrderHistoryRequest, OrderSide, OrderType, PrivateRequest, PrivateResponse, SortOrder,
    TradeHistoryRequest, TradeRequest, TransHistoryRequest,
};
