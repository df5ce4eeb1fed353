//! Trading endpoints for order management
//!
//! These endpoints require authentication.

use crate::error::RestResult;
use crate::transport::Transport;
use crate::types::{CancelOrderRequest, TradeRequest};
use serde_json::Value;
use tracing::{debug, instrument};

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    transport: &'a Transport,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Place a new order
    ///
    /// # Returns
    /// The `return` object of the response (order ID and fills)
    #[instrument(skip(self, request), fields(pair = %request.pair, side = %request.side))]
    pub async fn trade(&self, request: &TradeRequest) -> RestResult<Value> {
        debug!(
            "Placing {} order for {} {} on {}",
            request.side,
            request.amount,
            request.amount_field(),
            request.pair
        );
        self.transport.private_request(request).await
    }

    /// Cancel an open order
    #[instrument(skip(self, request), fields(pair = %request.pair, order_id = request.order_id))]
    pub async fn cancel_order(&self, request: &CancelOrderRequest) -> RestResult<Value> {
        debug!("Cancelling order {}", request.order_id);
        self.transport.private_request(request).await
    }
}
