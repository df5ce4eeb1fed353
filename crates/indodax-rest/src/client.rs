//! Main REST client implementation

use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::transport::Transport;
use crate::types::{
    CancelOrderRequest, GetOrderRequest, OpenOrdersRequest, OrderHistoryRequest,
    TradeHistoryRequest, TradeRequest, TransHistoryRequest,
};
use indodax_auth::{Credentials, NonceTracker, Payload};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Public market data endpoint
pub const PUBLIC_ENDPOINT: &str = "https://indodax.com/api";

/// Private trading endpoint
pub const PRIVATE_ENDPOINT: &str = "https://indodax.com/tapi";

/// Environment variable enabling debug traces of signed payloads
pub const DEBUG_ENV: &str = "IS_DEBUGGING";

/// Indodax REST API client
///
/// Provides access to both public and private endpoints. Clones share the
/// HTTP connection pool and the nonce tracker.
///
/// # Example
///
/// ```no_run
/// use indodax_rest::{IndodaxClient, TradeRequest};
/// use rust_decimal::Decimal;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = IndodaxClient::new()?;
///     let ticker = client.get_ticker("btc_idr").await?;
///
///     // With authentication for private endpoints
///     let auth_client = IndodaxClient::configure("key", "secret", false)?;
///     let info = auth_client.get_info().await?;
///     let order = TradeRequest::buy_limit("btc_idr", Decimal::from(900_000_000), Decimal::from(50_000));
///     let placed = auth_client.trade(&order).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct IndodaxClient {
    transport: Arc<Transport>,
}

impl IndodaxClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Configure a client from an API key, its secret and the debug flag
    ///
    /// Must be used (or [`with_credentials`](Self::with_credentials)) before
    /// any authenticated call.
    pub fn configure(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        debug: bool,
    ) -> RestResult<Self> {
        Self::with_config(
            ClientConfig::default()
                .with_credentials(Credentials::new(api_key, secret))
                .with_debug(debug),
        )
    }

    /// Create a client from `IDX_KEY`, `IDX_SECRET` and `IS_DEBUGGING`
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = Transport::new(config)?;

        info!(
            authenticated = transport.credentials().is_some(),
            debug = transport.is_debugging(),
            "Created Indodax REST client"
        );

        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.transport.credentials().is_some()
    }

    /// Check if debug traces of signed payloads are enabled
    pub fn is_debugging(&self) -> bool {
        self.transport.is_debugging()
    }

    // ========================================================================
    // Nonce State
    // ========================================================================

    /// Current nonce lower bound
    pub fn get_nonce(&self) -> u64 {
        self.transport.nonces().get()
    }

    /// Override the nonce lower bound, e.g. with a value persisted before restart
    pub fn set_nonce(&self, nonce: u64) {
        self.transport.nonces().set(nonce);
    }

    /// Override the nonce lower bound from its decimal representation
    pub fn set_nonce_str(&self, nonce: &str) -> RestResult<()> {
        Ok(self.transport.nonces().set_str(nonce)?)
    }

    /// Shared nonce tracker
    pub fn nonce_tracker(&self) -> Arc<NonceTracker> {
        Arc::clone(self.transport.nonces())
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.transport)
    }

    /// Get ticker information for a trading pair
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "btc_idr")
    pub async fn get_ticker(&self, pair: &str) -> RestResult<Value> {
        self.market().get_ticker(pair).await
    }

    /// Get recent trades for a trading pair
    pub async fn get_trades(&self, pair: &str) -> RestResult<Value> {
        self.market().get_trades(pair).await
    }

    /// Get orderbook depth for a trading pair
    pub async fn get_depth(&self, pair: &str) -> RestResult<Value> {
        self.market().get_depth(pair).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        self.require_credentials()?;
        Ok(AccountEndpoints::new(&self.transport))
    }

    /// Get balances and account details
    pub async fn get_info(&self) -> RestResult<Value> {
        self.account()?.get_info().await
    }

    /// Get deposit and withdrawal history
    pub async fn trans_history(&self, request: &TransHistoryRequest) -> RestResult<Value> {
        self.account()?.trans_history(request).await
    }

    /// Get filled trades
    pub async fn trade_history(&self, request: &TradeHistoryRequest) -> RestResult<Value> {
        self.account()?.trade_history(request).await
    }

    /// Get open orders
    pub async fn open_orders(&self, request: &OpenOrdersRequest) -> RestResult<Value> {
        self.account()?.open_orders(request).await
    }

    /// Get past orders
    pub async fn order_history(&self, request: &OrderHistoryRequest) -> RestResult<Value> {
        self.account()?.order_history(request).await
    }

    /// Get a single order
    pub async fn get_order(&self, request: &GetOrderRequest) -> RestResult<Value> {
        self.account()?.get_order(request).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(TradingEndpoints::new(&self.transport))
    }

    /// Place a new order
    pub async fn trade(&self, request: &TradeRequest) -> RestResult<Value> {
        self.trading()?.trade(request).await
    }

    /// Cancel an open order
    pub async fn cancel_order(&self, request: &CancelOrderRequest) -> RestResult<Value> {
        self.trading()?.cancel_order(request).await
    }

    /// Send an arbitrary private payload
    ///
    /// For methods without a typed request. The payload should start with
    /// `method`; a `nonce` field, if present, is sent unchanged.
    pub async fn private_call(&self, payload: Payload) -> RestResult<Value> {
        self.require_credentials()?;
        if payload.method().is_none() {
            return Err(RestError::InvalidArgument(
                "private payload must include `method`".to_string(),
            ));
        }
        self.transport.private(payload).await
    }

    fn require_credentials(&self) -> RestResult<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(RestError::AuthRequired)
        }
    }
}

impl std::fmt::Debug for IndodaxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndodaxClient")
            .field("has_credentials", &self.has_credentials())
            .field("debug", &self.is_debugging())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Emit debug traces of signed payloads
    pub debug: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Base URL for public market data
    pub public_url: String,
    /// URL of the private trading endpoint
    pub private_url: String,
    /// Nonce state, shareable between clients using the same key
    pub nonce_tracker: Arc<NonceTracker>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            debug: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            public_url: PUBLIC_ENDPOINT.to_string(),
            private_url: PRIVATE_ENDPOINT.to_string(),
            nonce_tracker: Arc::new(NonceTracker::new()),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load credentials and the debug flag from the environment
    ///
    /// `IDX_KEY` and `IDX_SECRET` are required; `IS_DEBUGGING` is optional.
    pub fn from_env() -> RestResult<Self> {
        let credentials = Credentials::from_env()?;
        let debug = std::env::var(DEBUG_ENV)
            .map(|v| parse_debug_flag(&v))
            .unwrap_or(false);

        Ok(Self::default().with_credentials(credentials).with_debug(debug))
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Enable or disable debug traces
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the public base URL
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into();
        self
    }

    /// Override the private endpoint URL
    pub fn with_private_url(mut self, url: impl Into<String>) -> Self {
        self.private_url = url.into();
        self
    }

    /// Start the nonce tracker from a persisted value
    pub fn with_initial_nonce(mut self, nonce: u64) -> Self {
        self.nonce_tracker = Arc::new(NonceTracker::with_seed(nonce));
        self
    }

    /// Use an existing nonce tracker
    pub fn with_nonce_tracker(mut self, tracker: Arc<NonceTracker>) -> Self {
        self.nonce_tracker = tracker;
        self
    }
}

/// Interpret a textual debug flag; only `true` and `1` enable it
pub fn parse_debug_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credentials() {
        let client = IndodaxClient::new().unwrap();
        assert!(!client.has_credentials());
        assert!(!client.is_debugging());
    }

    #[test]
    fn test_configure() {
        let client = IndodaxClient::configure("key", "secret", true).unwrap();
        assert!(client.has_credentials());
        assert!(client.is_debugging());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_initial_nonce(1_700_000_000_000);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.nonce_tracker.get(), 1_700_000_000_000);
        assert_eq!(config.public_url, PUBLIC_ENDPOINT);
        assert_eq!(config.private_url, PRIVATE_ENDPOINT);
    }

    #[test]
    fn test_auth_required_error() {
        let client = IndodaxClient::new().unwrap();
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_nonce_accessors() {
        let client = IndodaxClient::new().unwrap();
        assert_eq!(client.get_nonce(), 0);

        client.set_nonce(5);
        assert_eq!(client.get_nonce(), 5);

        assert!(matches!(client.set_nonce_str("abc"), Err(RestError::InvalidArgument(_))));
        assert_eq!(client.get_nonce(), 5);
    }

    #[test]
    fn test_clones_share_nonce_state() {
        let client = IndodaxClient::new().unwrap();
        let clone = client.clone();
        clone.set_nonce(77);
        assert_eq!(client.get_nonce(), 77);
    }

    #[test]
    fn test_clients_share_nonce_tracker() {
        let tracker = Arc::new(NonceTracker::new());
        let build = || {
            IndodaxClient::with_config(
                ClientConfig::new()
                    .with_credentials(Credentials::new("key", "secret"))
                    .with_nonce_tracker(Arc::clone(&tracker)),
            )
            .unwrap()
        };
        let first = build();
        let second = build();

        let drawn = first.nonce_tracker().next_nonce_at(1_000);
        assert_eq!(second.get_nonce(), drawn + 1);

        second.set_nonce(42);
        assert_eq!(first.get_nonce(), 42);
        assert_eq!(tracker.get(), 42);
        assert!(Arc::ptr_eq(&first.nonce_tracker(), &second.nonce_tracker()));
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var(indodax_auth::API_KEY_ENV, "env-key");
        std::env::set_var(indodax_auth::API_SECRET_ENV, "env-secret");
        std::env::set_var(DEBUG_ENV, "1");

        let client = IndodaxClient::with_config(ClientConfig::from_env().unwrap()).unwrap();
        assert!(client.has_credentials());
        assert!(client.is_debugging());

        std::env::set_var(DEBUG_ENV, "false");
        assert!(!IndodaxClient::from_env().unwrap().is_debugging());

        std::env::remove_var(DEBUG_ENV);
        assert!(!ClientConfig::from_env().unwrap().debug);

        std::env::remove_var(indodax_auth::API_SECRET_ENV);
        assert!(matches!(
            ClientConfig::from_env(),
            Err(RestError::EnvVarNotSet(var)) if var == indodax_auth::API_SECRET_ENV
        ));

        std::env::remove_var(indodax_auth::API_KEY_ENV);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = IndodaxClient::with_config(ClientConfig::new().with_private_url("not a url"));
        assert!(matches!(result, Err(RestError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_debug_flag() {
        assert!(parse_debug_flag("true"));
        assert!(parse_debug_flag("1"));
        assert!(!parse_debug_flag("false"));
        assert!(!parse_debug_flag("yes"));
        assert!(!parse_debug_flag(""));
    }

    #[tokio::test]
    async fn test_private_call_requires_method() {
        let client = IndodaxClient::configure("key", "secret", false).unwrap();
        let result = client.private_call(Payload::new().field("pair", "btc_idr")).await;
        assert!(matches!(result, Err(RestError::InvalidArgument(_))));
    }
}
