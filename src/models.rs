//! Data models for the portfolio backend API
//!
//! The backend answers in camelCase. Asset, market data and alert records
//! also come in the older snake_case shape, sometimes with both spellings in
//! one record; their keys are folded to camelCase before decoding.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{PortfolioError, Result};

/// Treat JSON `null` as zero for quantities and prices
fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Accept ids sent either as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Fold snake_case keys into their camelCase spelling.
///
/// A non-null camelCase value wins over its snake_case twin.
fn camel_case_keys(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };

    let mut out = Map::with_capacity(map.len());
    let mut snake = Vec::new();
    for (key, v) in map {
        if key.contains('_') {
            snake.push((key, v));
        } else {
            out.insert(key, v);
        }
    }
    for (key, v) in snake {
        let camel = snake_to_camel(&key);
        match out.get(&camel) {
            Some(existing) if !existing.is_null() => {}
            _ => {
                out.insert(camel, v);
            }
        }
    }
    Value::Object(out)
}

/// Decode a record the backend may send in either key casing, or both
fn from_mixed_case<'de, D, T>(
    deserializer: D,
    fields: fn(Value) -> serde_json::Result<T>,
) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    fields(camel_case_keys(value)).map_err(serde::de::Error::custom)
}

/// Serialize and Deserialize for records decoded through [`from_mixed_case`]
macro_rules! mixed_case_serde {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
                from_mixed_case(d, |v| $ty::deserialize(v))
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                $ty::serialize(self, s)
            }
        }
    };
}

/// Parse the date formats the backend emits (RFC 3339, naive datetime, plain date)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ============================================================================
// Assets
// ============================================================================

/// Asset class code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetTypeCode {
    #[serde(alias = "stock")]
    Stock,
    #[serde(alias = "bond")]
    Bond,
    #[serde(alias = "cash")]
    Cash,
    #[serde(alias = "crypto")]
    Crypto,
}

impl AssetTypeCode {
    pub const ALL: [AssetTypeCode; 4] = [
        AssetTypeCode::Stock,
        AssetTypeCode::Bond,
        AssetTypeCode::Cash,
        AssetTypeCode::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetTypeCode::Stock => "STOCK",
            AssetTypeCode::Bond => "BOND",
            AssetTypeCode::Cash => "CASH",
            AssetTypeCode::Crypto => "CRYPTO",
        }
    }

}

impl FromStr for AssetTypeCode {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "STOCK" => Ok(AssetTypeCode::Stock),
            "BOND" => Ok(AssetTypeCode::Bond),
            "CASH" => Ok(AssetTypeCode::Cash),
            "CRYPTO" => Ok(AssetTypeCode::Crypto),
            _ => Err(PortfolioError::InvalidInput(format!("unknown asset type '{}'", s))),
        }
    }
}

impl std::fmt::Display for AssetTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle status of an asset row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetStatus {
    #[serde(alias = "active", alias = "owned")]
    Owned,
    #[serde(alias = "watching", alias = "watchlist")]
    Watchlist,
    #[serde(alias = "research")]
    Research,
    #[serde(alias = "sold")]
    Sold,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FromStr for AssetStatus {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "owned" | "active" => Ok(AssetStatus::Owned),
            "watchlist" | "watching" => Ok(AssetStatus::Watchlist),
            "research" => Ok(AssetStatus::Research),
            "sold" => Ok(AssetStatus::Sold),
            _ => Err(PortfolioError::InvalidInput(format!("unknown status '{}'", s))),
        }
    }
}

/// Asset type as joined by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetType {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "risk_level")]
    pub risk_level: Option<String>,
}

impl AssetType {
    pub fn code(&self) -> Option<AssetTypeCode> {
        self.code.parse().ok()
    }
}

/// Live market quote for a symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct MarketData {
    pub symbol: String,
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub day_change: Option<f64>,
    pub day_change_percent: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub eps: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub asset_type: Option<AssetType>,
}

mixed_case_serde!(MarketData);

/// Asset row from `/api/assets`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase", default)]
pub struct Asset {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub status: AssetStatus,
    #[serde(deserialize_with = "null_as_zero")]
    pub quantity: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub purchase_price: f64,
    pub current_price: Option<f64>,
    pub day_change: Option<f64>,
    pub previous_close: Option<f64>,
    pub sector: Option<String>,
    pub purchase_date: Option<String>,
    pub target_price: Option<f64>,
    pub notes: Option<String>,
    pub asset_type: Option<AssetType>,
    pub market_data: Option<MarketData>,
    pub total_value: Option<f64>,
    pub gain_loss: Option<f64>,
    pub gain_loss_percent: Option<f64>,
}

mixed_case_serde!(Asset);

impl Asset {
    /// Symbol from the row, falling back to the joined market data
    pub fn display_symbol(&self) -> &str {
        if !self.symbol.is_empty() {
            return &self.symbol;
        }
        self.market_data
            .as_ref()
            .map(|m| m.symbol.as_str())
            .unwrap_or("")
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
            .or_else(|| self.market_data.as_ref().and_then(|m| m.current_price))
            .unwrap_or(0.0)
    }

    pub fn day_change(&self) -> f64 {
        self.day_change
            .or_else(|| self.market_data.as_ref().and_then(|m| m.day_change))
            .unwrap_or(0.0)
    }

    pub fn previous_close(&self) -> f64 {
        self.previous_close
            .or_else(|| self.market_data.as_ref().and_then(|m| m.previous_close))
            .unwrap_or_else(|| self.current_price() - self.day_change())
    }

    pub fn asset_type_code(&self) -> AssetTypeCode {
        self.asset_type
            .as_ref()
            .and_then(AssetType::code)
            .or_else(|| {
                self.market_data
                    .as_ref()
                    .and_then(|m| m.asset_type.as_ref())
                    .and_then(AssetType::code)
            })
            .unwrap_or(AssetTypeCode::Stock)
    }

    pub fn is_owned(&self) -> bool {
        self.status == AssetStatus::Owned
    }

    /// Market value, preferring the server-computed figure
    pub fn total_value(&self) -> f64 {
        self.total_value
            .unwrap_or_else(|| self.quantity * self.current_price())
    }

    pub fn gain_loss_percent(&self) -> f64 {
        if let Some(pct) = self.gain_loss_percent {
            return pct;
        }
        let invested = self.quantity * self.purchase_price;
        if invested > 0.0 {
            (self.total_value() - invested) / invested * 100.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[serde(alias = "buy")]
    Buy,
    #[serde(alias = "sell")]
    Sell,
    #[serde(alias = "dividend")]
    Dividend,
    #[serde(alias = "transfer")]
    Transfer,
    #[serde(other)]
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionAsset {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub transaction_type: TransactionType,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    #[serde(default)]
    pub transaction_date: String,
    pub total_value: Option<f64>,
    pub total_cost_with_fees: Option<f64>,
    pub fees: Option<f64>,
    pub asset: Option<TransactionAsset>,
}

impl Transaction {
    pub fn symbol(&self) -> &str {
        self.asset
            .as_ref()
            .and_then(|a| {
                a.market_data
                    .as_ref()
                    .map(|m| m.symbol.as_str())
                    .filter(|s| !s.is_empty())
                    .or(a.symbol.as_deref())
            })
            .unwrap_or("N/A")
    }

    pub fn name(&self) -> &str {
        self.asset
            .as_ref()
            .and_then(|a| {
                a.market_data
                    .as_ref()
                    .and_then(|m| m.name.as_deref())
                    .or(a.name.as_deref())
            })
            .unwrap_or("")
    }

    /// Cash amount of the transaction
    pub fn total(&self) -> f64 {
        let quantity = self.quantity.unwrap_or(0.0);
        let price = self.price.unwrap_or(0.0);
        self.total_value
            .or(self.total_cost_with_fees)
            .unwrap_or(match self.transaction_type {
                TransactionType::Dividend => price,
                _ => quantity * price,
            })
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.transaction_date)
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    #[serde(alias = "PRICE_ABOVE")]
    PriceAbove,
    #[serde(alias = "PRICE_BELOW")]
    PriceBelow,
    #[serde(alias = "PERCENT_CHANGE")]
    PercentChange,
    #[serde(alias = "VOLUME_SPIKE")]
    VolumeSpike,
    #[serde(other)]
    Other,
}

impl AlertType {
    pub fn label(&self) -> &'static str {
        match self {
            AlertType::PriceAbove => "Price Above",
            AlertType::PriceBelow => "Price Below",
            AlertType::PercentChange => "Percent Change",
            AlertType::VolumeSpike => "Volume Spike",
            AlertType::Other => "Alert",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub asset_symbol: String,
    #[serde(default)]
    pub asset_name: String,
    pub alert_type: AlertType,
    #[serde(default)]
    pub threshold_value: f64,
    pub current_value: Option<f64>,
    #[serde(default)]
    pub is_triggered: bool,
    pub triggered_at: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_date: Option<String>,
    #[serde(default)]
    pub message: String,
}

mixed_case_serde!(Alert);

// ============================================================================
// Asset detail
// ============================================================================

/// Daily OHLCV bar from `/api/price-history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricePoint {
    pub price_date: String,
    pub open_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
    pub close_price: Option<f64>,
    pub adjusted_close: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EsgRating {
    pub symbol: String,
    pub total_score: Option<f64>,
    pub total_grade: Option<String>,
    pub environment_score: Option<f64>,
    pub environment_grade: Option<String>,
    pub social_score: Option<f64>,
    pub social_grade: Option<String>,
    pub governance_score: Option<f64>,
    pub governance_grade: Option<String>,
    pub controversy_level: Option<f64>,
    pub risk_level: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[serde(alias = "POSITIVE")]
    Positive,
    #[serde(alias = "NEGATIVE")]
    Negative,
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsItem {
    pub symbol: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub publisher: Option<String>,
    pub published_date: String,
    pub sentiment: Sentiment,
}

impl NewsItem {
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.published_date)
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub id: Option<i64>,
    pub user_name: String,
    pub currency: String,
    pub default_currency: String,
    pub theme: String,
    pub time_zone: String,
    pub wallet: f64,
}

/// Partial settings update; unset fields are left out of the PUT body
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.currency.is_none()
            && self.default_currency.is_none()
            && self.theme.is_none()
            && self.time_zone.is_none()
    }
}

// ============================================================================
// Trading
// ============================================================================

/// Body of `/api/assets/buy` and `/api/assets/sell`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub date: String,
}

impl TradeRequest {
    pub fn new(symbol: &str, quantity: f64, price: f64, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            quantity,
            price,
            date: date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(PortfolioError::InvalidInput("symbol is required".to_string()));
        }
        if !(self.quantity > 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if !(self.price >= 0.0) {
            return Err(PortfolioError::InvalidInput(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.quantity * self.price
    }
}

// ============================================================================
// Risk
// ============================================================================

/// Per-symbol risk/return figures from `/api/stock-summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskSummary {
    pub symbol: Option<String>,
    #[serde(alias = "sharpe_ratio")]
    pub sharpe_ratio: Option<f64>,
    /// Annualised volatility, percent
    #[serde(alias = "annualizedVolatility", alias = "annualized_volatility")]
    pub volatility: Option<f64>,
    /// Maximum drawdown, percent
    #[serde(alias = "max_drawdown")]
    pub max_drawdown: Option<f64>,
    /// Value at risk at 95% confidence, percent
    #[serde(alias = "var_95", alias = "valueAtRisk95")]
    pub var95: Option<f64>,
}

// ============================================================================
// Chatbot
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(alias = "message", alias = "reply")]
    pub response: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_camel_case_with_nested_market_data() {
        let json = r#"{
            "id": 7,
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "status": "OWNED",
            "quantity": 10,
            "purchasePrice": 150.0,
            "marketData": {
                "symbol": "AAPL",
                "currentPrice": 180.0,
                "previousClose": 178.0,
                "dayChange": 2.0,
                "assetType": { "id": 1, "code": "STOCK" }
            }
        }"#;

        let asset: Asset = serde_json::from_str(json).unwrap();
        assert!(asset.is_owned());
        assert_eq!(asset.current_price(), 180.0);
        assert_eq!(asset.previous_close(), 178.0);
        assert_eq!(asset.day_change(), 2.0);
        assert_eq!(asset.asset_type_code(), AssetTypeCode::Stock);
        assert_eq!(asset.total_value(), 1800.0);
    }

    #[test]
    fn test_asset_legacy_snake_case() {
        let json = r#"{
            "id": 6, "symbol": "BND", "name": "Vanguard Total Bond ETF",
            "status": "active", "quantity": 100, "purchase_price": 72.5,
            "current_price": 73.85, "asset_type": { "id": 2, "code": "BOND" }
        }"#;

        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.status, AssetStatus::Owned);
        assert_eq!(asset.purchase_price, 72.5);
        assert_eq!(asset.current_price(), 73.85);
        assert_eq!(asset.asset_type_code(), AssetTypeCode::Bond);
    }

    #[test]
    fn test_asset_list_with_both_casings_in_one_record() {
        let json = r#"[
            { "symbol": "AAPL", "status": "OWNED", "quantity": 10,
              "currentPrice": 10.0, "current_price": 9.0,
              "purchasePrice": null, "purchase_price": 8.0,
              "marketData": { "symbol": "AAPL", "dayChange": 0.5, "day_change": 0.4 } },
            { "symbol": "MSFT", "status": "OWNED", "quantity": 2, "current_price": 400.0 }
        ]"#;

        let assets: Vec<Asset> = serde_json::from_str(json).unwrap();
        assert_eq!(assets.len(), 2);
        // camelCase wins unless it is null
        assert_eq!(assets[0].current_price(), 10.0);
        assert_eq!(assets[0].purchase_price, 8.0);
        assert_eq!(assets[0].day_change(), 0.5);
        assert_eq!(assets[1].current_price(), 400.0);

        let round_trip = serde_json::to_value(&assets[1]).unwrap();
        assert_eq!(round_trip["currentPrice"], 400.0);
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("gain_loss_percent"), "gainLossPercent");
        assert_eq!(snake_to_camel("week52_high"), "week52High");
        assert_eq!(snake_to_camel("symbol"), "symbol");
    }

    #[test]
    fn test_unknown_enum_values_keep_the_list() {
        let alerts: Vec<Alert> = serde_json::from_str(
            r#"[{ "id": 1, "alertType": "earnings_date" },
                { "id": 2, "alert_type": "price_above", "alertType": null }]"#,
        )
        .unwrap();
        assert_eq!(alerts[0].alert_type, AlertType::Other);
        assert_eq!(alerts[1].alert_type, AlertType::PriceAbove);

        let txs: Vec<Transaction> = serde_json::from_str(
            r#"[{ "id": 1, "transactionType": "SPLIT" }, { "id": 2, "transactionType": "BUY" }]"#,
        )
        .unwrap();
        assert_eq!(txs[0].transaction_type, TransactionType::Other);
        assert_eq!(txs[1].transaction_type, TransactionType::Buy);
    }

    #[test]
    fn test_parse_codes_and_statuses() {
        assert_eq!(" crypto ".parse::<AssetTypeCode>().unwrap(), AssetTypeCode::Crypto);
        assert!("gold".parse::<AssetTypeCode>().is_err());
        assert_eq!("active".parse::<AssetStatus>().unwrap(), AssetStatus::Owned);
        assert!(matches!(
            "archived".parse::<AssetStatus>(),
            Err(PortfolioError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_asset_nulls_and_unknown_status() {
        let json = r#"{ "symbol": "XYZ", "status": "ARCHIVED", "quantity": null }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.status, AssetStatus::Unknown);
        assert_eq!(asset.quantity, 0.0);
        assert_eq!(asset.current_price(), 0.0);
        // Missing type defaults to stock
        assert_eq!(asset.asset_type_code(), AssetTypeCode::Stock);
    }

    #[test]
    fn test_previous_close_derived_from_day_change() {
        let asset = Asset {
            current_price: Some(100.0),
            day_change: Some(-4.0),
            ..Default::default()
        };
        assert_eq!(asset.previous_close(), 104.0);
    }

    #[test]
    fn test_transaction_fallbacks() {
        let json = r#"[
            { "id": 1, "transactionType": "BUY", "quantity": 2, "price": 50.0,
              "transactionDate": "2024-03-01",
              "asset": { "symbol": "MSFT", "marketData": { "symbol": "MSFT", "name": "Microsoft" } } },
            { "id": 2, "transactionType": "dividend", "quantity": null, "price": 12.5,
              "transactionDate": "2024-03-05T10:00:00" },
            { "id": 3, "transactionType": "SELL", "quantity": 1, "price": 10.0,
              "totalCostWithFees": 11.0, "transactionDate": "2024-03-06" }
        ]"#;

        let txs: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txs[0].symbol(), "MSFT");
        assert_eq!(txs[0].name(), "Microsoft");
        assert_eq!(txs[0].total(), 100.0);

        assert_eq!(txs[1].transaction_type, TransactionType::Dividend);
        assert_eq!(txs[1].symbol(), "N/A");
        assert_eq!(txs[1].total(), 12.5);
        assert!(txs[1].date().is_some());

        assert_eq!(txs[2].total(), 11.0);
    }

    #[test]
    fn test_alert_accepts_both_casings() {
        let camel = r#"{ "id": 1, "assetSymbol": "NVDA", "alertType": "price_above",
                         "thresholdValue": 600, "isActive": true, "isTriggered": false }"#;
        let snake = r#"{ "id": 2, "asset_symbol": "TSLA", "alert_type": "PRICE_BELOW",
                         "threshold_value": 200, "is_active": true, "is_triggered": true }"#;

        let a: Alert = serde_json::from_str(camel).unwrap();
        let b: Alert = serde_json::from_str(snake).unwrap();
        assert_eq!(a.alert_type, AlertType::PriceAbove);
        assert_eq!(a.asset_symbol, "NVDA");
        assert_eq!(b.alert_type, AlertType::PriceBelow);
        assert!(b.is_triggered);
    }

    #[test]
    fn test_trade_request_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ok = TradeRequest::new(" aapl ", 3.0, 190.0, date);
        assert_eq!(ok.symbol, "AAPL");
        assert_eq!(ok.date, "2024-05-01");
        assert!(ok.validate().is_ok());

        assert!(TradeRequest::new("", 1.0, 1.0, date).validate().is_err());
        assert!(TradeRequest::new("AAPL", 0.0, 1.0, date).validate().is_err());
        assert!(TradeRequest::new("AAPL", 1.0, -1.0, date).validate().is_err());
        assert!(TradeRequest::new("AAPL", f64::NAN, 1.0, date).validate().is_err());
    }

    #[test]
    fn test_settings_update_skips_unset_fields() {
        let update = SettingsUpdate {
            theme: Some("dark".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"theme":"dark"}"#);
        assert!(SettingsUpdate::default().is_empty());
    }

    #[test]
    fn test_chat_reply_numeric_conversation_id() {
        let reply: ChatReply =
            serde_json::from_str(r#"{ "response": "Hi", "conversationId": 42 }"#).unwrap();
        assert_eq!(reply.conversation_id, "42");

        let bare: ChatReply = serde_json::from_str(r#"{ "message": "Hello" }"#).unwrap();
        assert_eq!(bare.response, "Hello");
        assert!(bare.conversation_id.is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("2024-01-15T09:30:00").is_some());
        assert!(parse_timestamp("2024-01-15T09:30:00.123Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
