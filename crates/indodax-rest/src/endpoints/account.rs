//! Private account endpoints
//!
//! These endpoints require authentication.

use crate::error::RestResult;
use crate::transport::Transport;
use crate::types::{
    GetInfoRequest, GetOrderRequest, OpenOrdersRequest, OrderHistoryRequest, TradeHistoryRequest,
    TransHistoryRequest,
};
use serde_json::Value;
use tracing::{debug, instrument};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    transport: &'a Transport,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Get balances and account details
    #[instrument(skip(self))]
    pub async fn get_info(&self) -> RestResult<Value> {
        debug!("Fetching account info");
        self.transport.private_request(&GetInfoRequest).await
    }

    /// Get deposit and withdrawal history
    #[instrument(skip(self))]
    pub async fn trans_history(&self, request: &TransHistoryRequest) -> RestResult<Value> {
        debug!("Fetching transaction history");
        self.transport.private_request(request).await
    }

    /// Get filled trades for a pair
    #[instrument(skip(self), fields(pair = %request.pair))]
    pub async fn trade_history(&self, request: &TradeHistoryRequest) -> RestResult<Value> {
        debug!("Fetching trade history");
        self.transport.private_request(request).await
    }

    /// Get open orders
    #[instrument(skip(self))]
    pub async fn open_orders(&self, request: &OpenOrdersRequest) -> RestResult<Value> {
        debug!("Fetching open orders");
        self.transport.private_request(request).await
    }

    /// Get past orders for a pair
    #[instrument(skip(self), fields(pair = %request.pair))]
    pub async fn order_history(&self, request: &OrderHistoryRequest) -> RestResult<Value> {
        debug!("Fetching order history");
        self.transport.private_request(request).await
    }

    /// Get a single order
    #[instrument(skip(self), fields(pair = %request.pair, order_id = request.order_id))]
    pub async fn get_order(&self, request: &GetOrderRequest) -> RestResult<Value> {
        debug!("Fetching order {}", request.order_id);
        self.transport.private_request(request).await
    }
}
