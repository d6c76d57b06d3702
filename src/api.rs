//! Blocking client for the portfolio backend REST API

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{PortfolioError, Result};
use crate::models::{
    Alert, Asset, ChatReply, ChatRequest, Conversation, EsgRating, MarketData, NewsItem,
    PricePoint, RiskSummary, SettingsUpdate, TradeRequest, Transaction, UserSettings,
};

/// Direction of a trade submitted through `/api/assets/{buy,sell}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    fn path(&self) -> &'static str {
        match self {
            TradeSide::Buy => "/api/assets/buy",
            TradeSide::Sell => "/api/assets/sell",
        }
    }
}

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

pub struct PortfolioClient {
    client: Client,
    base_url: String,
}

impl PortfolioClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against an explicit base URL with default settings
    pub fn with_url(base_url: &str) -> Result<Self> {
        Self::new(&Config::default().with_api_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn symbol_url(&self, prefix: &str, symbol: &str) -> Result<String> {
        let symbol = normalize_symbol(symbol)?;
        Ok(format!("{}{}/{}", self.base_url, prefix, symbol))
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        decode(response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        log::debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()?;
        decode(response)
    }

    // ------------------------------------------------------------------
    // Assets and trading
    // ------------------------------------------------------------------

    pub fn get_assets(&self) -> Result<Vec<Asset>> {
        self.get(&self.url("/api/assets"))
    }

    /// Submit a buy or sell; the backend's reply is returned as raw JSON
    pub fn submit_trade(&self, side: TradeSide, trade: &TradeRequest) -> Result<serde_json::Value> {
        trade.validate()?;
        let trade = TradeRequest {
            symbol: normalize_symbol(&trade.symbol)?,
            ..trade.clone()
        };
        log::info!(
            "Submitting {:?} {} x {} @ {:.2}",
            side,
            trade.symbol,
            trade.quantity,
            trade.price
        );
        self.send_json(reqwest::Method::POST, &self.url(side.path()), &trade)
    }

    pub fn buy(&self, trade: &TradeRequest) -> Result<serde_json::Value> {
        self.submit_trade(TradeSide::Buy, trade)
    }

    pub fn sell(&self, trade: &TradeRequest) -> Result<serde_json::Value> {
        self.submit_trade(TradeSide::Sell, trade)
    }

    pub fn get_transactions(&self) -> Result<Vec<Transaction>> {
        self.get(&self.url("/api/transactions"))
    }

    pub fn get_alerts(&self) -> Result<Vec<Alert>> {
        self.get(&self.url("/api/alerts"))
    }

    // ------------------------------------------------------------------
    // Per-symbol data
    // ------------------------------------------------------------------

    pub fn get_market_data(&self, symbol: &str) -> Result<MarketData> {
        self.get(&self.symbol_url("/api/market-data/symbol", symbol)?)
    }

    pub fn get_price_history(&self, symbol: &str) -> Result<Vec<PricePoint>> {
        self.get(&self.symbol_url("/api/price-history/symbol", symbol)?)
    }

    pub fn get_esg_rating(&self, symbol: &str) -> Result<EsgRating> {
        self.get(&self.symbol_url("/api/esg-ratings/symbol", symbol)?)
    }

    pub fn get_news(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        self.get(&self.symbol_url("/api/news/symbol", symbol)?)
    }

    pub fn get_stock_summary(&self, symbol: &str) -> Result<RiskSummary> {
        self.get(&self.symbol_url("/api/stock-summary", symbol)?)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn get_user_settings(&self) -> Result<UserSettings> {
        self.get(&self.url("/api/user-settings"))
    }

    pub fn update_user_settings(&self, update: &SettingsUpdate) -> Result<UserSettings> {
        if update.is_empty() {
            return Err(PortfolioError::InvalidInput(
                "settings update has no fields set".to_string(),
            ));
        }
        self.send_json(reqwest::Method::PUT, &self.url("/api/user-settings"), update)
    }

    // ------------------------------------------------------------------
    // Chatbot
    // ------------------------------------------------------------------

    pub fn get_conversations(&self) -> Result<Vec<Conversation>> {
        self.get(&self.url("/api/chatbot/conversations"))
    }

    pub fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        if request.message.trim().is_empty() {
            return Err(PortfolioError::InvalidInput("message is empty".to_string()));
        }
        self.send_json(reqwest::Method::POST, &self.url("/api/chatbot/chat"), request)
    }
}

/// Trim and uppercase a ticker for use in a URL path
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(PortfolioError::InvalidInput("symbol is required".to_string()));
    }
    if symbol.contains(['/', '?', '#', ' ']) {
        return Err(PortfolioError::InvalidInput(format!(
            "invalid symbol '{}'",
            symbol
        )));
    }
    Ok(symbol)
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_else(|e| {
            log::debug!("Could not read error body for status {}: {}", status, e);
            String::new()
        });
        return Err(api_error(status.as_u16(), &body));
    }
    let text = response.text()?;
    // An empty success body decodes as JSON null
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Build an API error, preferring the body's `message` field
fn api_error(status: u16, body: &str) -> PortfolioError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("request failed with status {}", status)
            } else {
                trimmed.to_string()
            }
        });
    PortfolioError::Api { status, message }
}
