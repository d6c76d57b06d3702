//! Portfolio Insights
//!
//! Dashboard views and health scoring over the portfolio REST API:
//! - Fetching assets, transactions, alerts and per-symbol market data
//! - Aggregating positions into summary, allocation and performance views
//! - Scoring portfolio health from diversification, risk, return and volatility
//! - Chatting with the portfolio assistant, with sessions cached on disk
//!
//! # Example
//!
//! ```no_run
//! use portfolio_insights::{Config, InsightsReport, PortfolioClient};
//!
//! let config = Config::from_env().unwrap();
//! let client = PortfolioClient::new(&config).unwrap();
//!
//! let report = InsightsReport::load(&client);
//! println!(
//!     "Health: {} ({})",
//!     report.metrics.health_score,
//!     report.metrics.grade()
//! );
//! for tip in &report.recommendations {
//!     println!("- {}", tip);
//! }
//! ```

pub mod api;
pub mod chat;
pub mod chat_history;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod insights;
pub mod models;
pub mod portfolio;

// Re-exports for convenience
pub use api::{normalize_symbol, PortfolioClient, TradeSide};
pub use chat::{send_message, ChatExchange};
pub use chat_history::{ChatHistoryStore, ChatMessage, ChatSession, MessageRole};
pub use config::Config;
pub use dashboard::{AlertBoard, AssetOverview, DashboardView};
pub use error::{PortfolioError, Result};
pub use health::{calculate_health, recommendations, HealthDetails, HealthMetrics};
pub use insights::InsightsReport;
pub use models::{
    Alert, AlertType, Asset, AssetStatus, AssetType, AssetTypeCode, EsgRating, MarketData,
    NewsItem, PricePoint, RiskSummary, SettingsUpdate, TradeRequest, Transaction,
    TransactionType, UserSettings,
};
pub use portfolio::{
    allocation, owned_positions, performance_by_type, top_performers, AssetAllocation,
    AssetQuery, PortfolioSummary, Position, SortDirection, SortField, TopPerformer,
    TypePerformance,
};
