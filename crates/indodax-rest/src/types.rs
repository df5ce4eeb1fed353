//! Types for Indodax REST API requests and responses

use indodax_auth::Payload;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ApiErrorCode;

// ============================================================================
// Private API Response
// ============================================================================

/// Private API response envelope
///
/// `{success: 0|1, return?: object, error?: string, error_code?: string}`
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateResponse {
    /// Raw `success` flag
    pub success: Value,
    /// `return` payload (present if successful)
    pub result: Option<Value>,
    /// Human-readable error message
    pub error: Option<String>,
    /// Machine-readable error code
    pub error_code: Option<String>,
}

impl PrivateResponse {
    /// Split a parsed body into its envelope fields
    ///
    /// Bodies that are not objects yield an envelope without a success flag.
    pub fn from_value(body: Value) -> Self {
        let mut object = match body {
            Value::Object(object) => object,
            _ => Default::default(),
        };

        Self {
            success: object.remove("success").unwrap_or(Value::Null),
            result: object.remove("return"),
            error: object.remove("error").map(render_text),
            error_code: object.remove("error_code").map(render_text),
        }
    }

    /// Only a numeric `1` counts as success
    pub fn is_success(&self) -> bool {
        self.success.as_f64() == Some(1.0)
    }

    /// Get the `return` payload, or the error code and message
    pub fn into_result(self) -> Result<Value, (ApiErrorCode, String)> {
        if self.is_success() {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            let code = ApiErrorCode::parse(self.error_code.as_deref());
            let message = self
                .error
                .unwrap_or_else(|| "request failed without an error message".to_string());
            Err((code, message))
        }
    }
}

fn render_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Market => "market",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for paged history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public market data resources under `/api/{pair}/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketResource {
    Ticker,
    Trades,
    Depth,
}

impl MarketResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Trades => "trades",
            Self::Depth => "depth",
        }
    }

    /// Resource path for a trading pair, e.g. `btc_idr/ticker`
    pub fn path(&self, pair: &str) -> String {
        format!("{}/{}", pair, self.as_str())
    }
}

// ============================================================================
// Private Requests
// ============================================================================

/// A typed private API call
///
/// The payload always starts with `method`; implementations append their own
/// parameters and never write `method` or `nonce`.
pub trait PrivateRequest: std::fmt::Debug {
    /// Remote method identifier
    const METHOD: &'static str;

    /// Append this request's parameters in wire order
    fn write_params(&self, payload: &mut Payload);

    /// Build the unsigned payload
    fn to_payload(&self) -> Payload {
        let mut payload = Payload::with_method(Self::METHOD);
        self.write_params(&mut payload);
        payload
    }
}

/// `getInfo` - balances and account details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetInfoRequest;

impl PrivateRequest for GetInfoRequest {
    const METHOD: &'static str = "getInfo";

    fn write_params(&self, _payload: &mut Payload) {}
}

/// `transHistory` - deposit and withdrawal history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransHistoryRequest {
    /// Start date, `yyyy-mm-dd`
    pub start: Option<String>,
    /// End date, `yyyy-mm-dd`
    pub end: Option<String>,
}

impl TransHistoryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a date range (`yyyy-mm-dd`)
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

impl PrivateRequest for TransHistoryRequest {
    const METHOD: &'static str = "transHistory";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert_opt("start", self.start.as_deref())
            .insert_opt("end", self.end.as_deref());
    }
}

/// `trade` - place a limit or market order
///
/// Buy amounts are denominated in the quote currency of the pair (e.g. `idr`
/// for `btc_idr`), sell amounts in the base currency (e.g. `btc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    /// Trading pair, e.g. `btc_idr`
    pub pair: String,
    /// Order side
    pub side: OrderSide,
    /// Limit price (ignored by the server for market orders)
    pub price: Option<Decimal>,
    /// Order type; the server defaults to limit when omitted
    pub order_type: Option<OrderType>,
    /// Order amount, see the type-level docs for its currency
    pub amount: Decimal,
    /// Caller-assigned order ID
    pub client_order_id: Option<String>,
}

impl TradeRequest {
    /// Create a limit buy spending `quote_amount`
    pub fn buy_limit(pair: impl Into<String>, price: Decimal, quote_amount: Decimal) -> Self {
        Self::limit(pair, OrderSide::Buy, price, quote_amount)
    }

    /// Create a limit sell of `base_amount`
    pub fn sell_limit(pair: impl Into<String>, price: Decimal, base_amount: Decimal) -> Self {
        Self::limit(pair, OrderSide::Sell, price, base_amount)
    }

    /// Create a market buy spending `quote_amount`
    pub fn buy_market(pair: impl Into<String>, quote_amount: Decimal) -> Self {
        Self::market(pair, OrderSide::Buy, quote_amount)
    }

    /// Create a market sell of `base_amount`
    pub fn sell_market(pair: impl Into<String>, base_amount: Decimal) -> Self {
        Self::market(pair, OrderSide::Sell, base_amount)
    }

    fn limit(pair: impl Into<String>, side: OrderSide, price: Decimal, amount: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            price: Some(price),
            order_type: None,
            amount,
            client_order_id: None,
        }
    }

    fn market(pair: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            price: None,
            order_type: Some(OrderType::Market),
            amount,
            client_order_id: None,
        }
    }

    /// Set a caller-assigned order ID
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Send `order_type` explicitly
    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Form field carrying the amount: quote currency for buys, base for sells
    ///
    /// Pairs are expected as `base_quote`. A pair without `_` is treated as
    /// the base currency quoted in `idr`, so a buy uses `idr` and a sell uses
    /// the whole pair string as the field name.
    pub fn amount_field(&self) -> &str {
        let (base, quote) = self.pair.split_once('_').unwrap_or((self.pair.as_str(), "idr"));
        match self.side {
            OrderSide::Buy => quote,
            OrderSide::Sell => base,
        }
    }
}

impl PrivateRequest for TradeRequest {
    const METHOD: &'static str = "trade";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert("pair", &self.pair)
            .insert("type", self.side)
            .insert_opt("price", self.price)
            .insert_opt("order_type", self.order_type)
            .insert(self.amount_field(), self.amount)
            .insert_opt("client_order_id", self.client_order_id.as_deref());
    }
}

/// `tradeHistory` - filled trades for a pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeHistoryRequest {
    pub pair: String,
    /// Number of trades to return
    pub count: Option<u32>,
    /// Starting trade ID
    pub from_id: Option<u64>,
    /// Ending trade ID
    pub end_id: Option<u64>,
    pub order: Option<SortOrder>,
    /// Start unix timestamp
    pub since: Option<u64>,
    /// End unix timestamp
    pub end: Option<u64>,
}

impl TradeHistoryRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            count: None,
            from_id: None,
            end_id: None,
            order: None,
            since: None,
            end: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_id_range(mut self, from_id: u64, end_id: u64) -> Self {
        self.from_id = Some(from_id);
        self.end_id = Some(end_id);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_time_range(mut self, since: u64, end: u64) -> Self {
        self.since = Some(since);
        self.end = Some(end);
        self
    }
}

impl PrivateRequest for TradeHistoryRequest {
    const METHOD: &'static str = "tradeHistory";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert("pair", &self.pair)
            .insert_opt("count", self.count)
            .insert_opt("from_id", self.from_id)
            .insert_opt("end_id", self.end_id)
            .insert_opt("order", self.order)
            .insert_opt("since", self.since)
            .insert_opt("end", self.end);
    }
}

/// `openOrders` - open orders for one pair, or all pairs when `pair` is unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOrdersRequest {
    pub pair: Option<String>,
}

impl OpenOrdersRequest {
    /// Open orders across all pairs
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_pair(pair: impl Into<String>) -> Self {
        Self {
            pair: Some(pair.into()),
        }
    }
}

impl PrivateRequest for OpenOrdersRequest {
    const METHOD: &'static str = "openOrders";

    fn write_params(&self, payload: &mut Payload) {
        payload.insert_opt("pair", self.pair.as_deref());
    }
}

/// `orderHistory` - past orders for a pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistoryRequest {
    pub pair: String,
    pub count: Option<u32>,
    /// Offset into the history
    pub from: Option<u64>,
}

impl OrderHistoryRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            count: None,
            from: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }
}

impl PrivateRequest for OrderHistoryRequest {
    const METHOD: &'static str = "orderHistory";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert("pair", &self.pair)
            .insert_opt("count", self.count)
            .insert_opt("from", self.from);
    }
}

/// `getOrder` - a single order by ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrderRequest {
    pub pair: String,
    pub order_id: u64,
}

impl GetOrderRequest {
    pub fn new(pair: impl Into<String>, order_id: u64) -> Self {
        Self {
            pair: pair.into(),
            order_id,
        }
    }
}

impl PrivateRequest for GetOrderRequest {
    const METHOD: &'static str = "getOrder";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert("pair", &self.pair)
            .insert("order_id", self.order_id);
    }
}

/// `cancelOrder` - cancel an open order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrderRequest {
    pub pair: String,
    pub order_id: u64,
    /// Side of the order being cancelled
    pub side: OrderSide,
}

impl CancelOrderRequest {
    pub fn new(pair: impl Into<String>, order_id: u64, side: OrderSide) -> Self {
        Self {
            pair: pair.into(),
            order_id,
            side,
        }
    }
}

impl PrivateRequest for CancelOrderRequest {
    const METHOD: &'static str = "cancelOrder";

    fn write_params(&self, payload: &mut Payload) {
        payload
            .insert("pair", &self.pair)
            .insert("order_id", self.order_id)
            .insert("type", self.side);
    }
}
