//! Public market data endpoints
//!
//! These endpoints don't require authentication. Bodies are returned exactly
//! as the server sent them.

use crate::error::RestResult;
use crate::transport::Transport;
use crate::types::MarketResource;
use serde_json::Value;
use tracing::{debug, instrument};

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    transport: &'a Transport,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Get ticker information
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "btc_idr")
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> RestResult<Value> {
        debug!("Fetching ticker for {}", pair);
        self.get(pair, MarketResource::Ticker).await
    }

    /// Get recent trades
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "btc_idr")
    #[instrument(skip(self))]
    pub async fn get_trades(&self, pair: &str) -> RestResult<Value> {
        debug!("Fetching recent trades for {}", pair);
        self.get(pair, MarketResource::Trades).await
    }

    /// Get orderbook depth
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "btc_idr")
    #[instrument(skip(self))]
    pub async fn get_depth(&self, pair: &str) -> RestResult<Value> {
        debug!("Fetching orderbook for {}", pair);
        self.get(pair, MarketResource::Depth).await
    }

    async fn get(&self, pair: &str, resource: MarketResource) -> RestResult<Value> {
        self.transport.public(&resource.path(pair)).await
    }
}
