//! Health report assembly for the insights view

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::api::PortfolioClient;
use crate::dashboard::{load_assets, or_fallback};
use crate::health::{calculate_health, recommendations, HealthMetrics};
use crate::models::{Asset, RiskSummary};
use crate::portfolio::{owned_positions, PortfolioSummary, Position};

/// Health metrics plus the figures and advice shown next to them
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightsReport {
    pub summary: PortfolioSummary,
    pub metrics: HealthMetrics,
    pub recommendations: Vec<String>,
    /// Owned symbols the backend had no risk summary for
    pub missing_risk_data: Vec<String>,
}

impl InsightsReport {
    /// Fetch assets and per-symbol risk summaries, then score them
    pub fn load(client: &PortfolioClient) -> Self {
        let assets = load_assets(client);
        let positions = owned_positions(&assets);

        let mut risk = HashMap::new();
        for symbol in distinct_symbols(&positions) {
            let fetched = client.get_stock_summary(&symbol).map(Some);
            if let Some(summary) = or_fallback(&format!("risk summary for {}", symbol), fetched, None) {
                risk.insert(symbol, summary);
            }
        }

        log::info!(
            "Scoring {} positions ({} with risk data)",
            positions.len(),
            risk.len()
        );
        Self::from_parts(&assets, &risk)
    }

    /// Pure assembly from already-fetched data
    pub fn from_parts(assets: &[Asset], risk: &HashMap<String, RiskSummary>) -> Self {
        let summary = PortfolioSummary::from_assets(assets);
        let positions = owned_positions(assets);
        let metrics = calculate_health(
            &positions,
            risk,
            summary.total_value,
            summary.total_invested,
        );
        let missing_risk_data = distinct_symbols(&positions)
            .into_iter()
            .filter(|s| !risk.contains_key(s))
            .collect();

        Self {
            recommendations: recommendations(&metrics),
            summary,
            metrics,
            missing_risk_data,
        }
    }
}

fn distinct_symbols(positions: &[Position]) -> Vec<String> {
    positions
        .iter()
        .map(|p| p.symbol.clone())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
