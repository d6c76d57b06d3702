//! View loaders for the dashboard screens
//!
//! Every view fetches its own data. A failed request is logged and the view
//! falls back to empty data instead of failing as a whole.

use serde::Serialize;
use std::cmp::Ordering;

use crate::api::PortfolioClient;
use crate::error::Result;
use crate::models::{Alert, Asset, EsgRating, MarketData, NewsItem, PricePoint, Transaction};
use crate::portfolio::{
    allocation, owned_positions, performance_by_type, top_performers, AssetAllocation,
    PortfolioSummary, TopPerformer, TypePerformance,
};

pub const TOP_PERFORMER_COUNT: usize = 5;
pub const NEWS_LIMIT: usize = 6;

/// Log a failed fetch and substitute the fallback
pub(crate) fn or_fallback<T>(what: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to load {}: {}", what, e);
            fallback
        }
    }
}

/// Assets, falling back to an empty list
pub fn load_assets(client: &PortfolioClient) -> Vec<Asset> {
    or_fallback("assets", client.get_assets(), Vec::new())
}

/// Main dashboard: summary, allocation, best performers
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub summary: PortfolioSummary,
    pub allocation: Vec<AssetAllocation>,
    pub top_performers: Vec<TopPerformer>,
    pub performance_by_type: Vec<TypePerformance>,
}

impl DashboardView {
    pub fn load(client: &PortfolioClient) -> Self {
        Self::from_assets(&load_assets(client))
    }

    pub fn from_assets(assets: &[Asset]) -> Self {
        let positions = owned_positions(assets);
        Self {
            summary: PortfolioSummary::from_assets(assets),
            allocation: allocation(&positions),
            top_performers: top_performers(&positions, TOP_PERFORMER_COUNT),
            performance_by_type: performance_by_type(&positions),
        }
    }
}

/// Everything shown on a single asset's page
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetOverview {
    pub symbol: String,
    pub market_data: Option<MarketData>,
    pub esg_rating: Option<EsgRating>,
    pub price_history: Vec<PricePoint>,
    pub news: Vec<NewsItem>,
}

impl AssetOverview {
    pub fn load(client: &PortfolioClient, symbol: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        let market_data = or_fallback("market data", client.get_market_data(&symbol).map(Some), None);
        let esg_rating = or_fallback("ESG rating", client.get_esg_rating(&symbol).map(Some), None);
        let price_history = or_fallback("price history", client.get_price_history(&symbol), Vec::new());
        let news = or_fallback("news", client.get_news(&symbol), Vec::new());

        Self {
            symbol,
            market_data,
            esg_rating,
            price_history,
            news: latest_news(news, NEWS_LIMIT),
        }
    }

    /// Latest close from market data, or the last bar of history
    pub fn last_price(&self) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.current_price)
            .or_else(|| self.price_history.last().and_then(|p| p.close_price))
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Option<chrono::NaiveDateTime>,
{
    items.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Newest `limit` articles; undated ones sort last
pub fn latest_news(mut news: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    newest_first(&mut news, NewsItem::published_at);
    news.truncate(limit);
    news
}

/// Transactions sorted newest first
pub fn sort_transactions(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    newest_first(&mut transactions, Transaction::date);
    transactions
}

pub fn recent_transactions(client: &PortfolioClient) -> Vec<Transaction> {
    sort_transactions(or_fallback("transactions", client.get_transactions(), Vec::new()))
}

/// Alert list with its headline counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertBoard {
    pub alerts: Vec<Alert>,
    pub active_count: usize,
    pub triggered_count: usize,
}

impl AlertBoard {
    pub fn load(client: &PortfolioClient) -> Self {
        Self::from_alerts(or_fallback("alerts", client.get_alerts(), Vec::new()))
    }

    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let active_count = alerts.iter().filter(|a| a.is_active).count();
        let triggered_count = alerts.iter().filter(|a| a.is_triggered).count();
        Self {
            alerts,
            active_count,
            triggered_count,
        }
    }
}
