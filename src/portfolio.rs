//! Positions and dashboard aggregates over owned assets

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::PortfolioError;
use crate::models::{Asset, AssetStatus, AssetTypeCode};

/// An owned holding used for valuation and scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub asset_type: AssetTypeCode,
    /// Unrealised gain/loss reported by the backend, if any
    pub gain_loss: Option<f64>,
}

impl Position {
    pub fn new(
        symbol: &str,
        quantity: f64,
        purchase_price: f64,
        current_price: f64,
        asset_type: AssetTypeCode,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity,
            purchase_price,
            current_price,
            asset_type,
            gain_loss: None,
        }
    }

    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            symbol: asset.display_symbol().to_uppercase(),
            quantity: asset.quantity,
            purchase_price: asset.purchase_price,
            current_price: asset.current_price(),
            asset_type: asset.asset_type_code(),
            gain_loss: asset.gain_loss,
        }
    }

    pub fn value(&self) -> f64 {
        self.quantity * self.current_price
    }

    pub fn invested(&self) -> f64 {
        self.quantity * self.purchase_price
    }

    pub fn gain_loss(&self) -> f64 {
        self.gain_loss.unwrap_or_else(|| self.value() - self.invested())
    }

    pub fn gain_loss_percent(&self) -> f64 {
        let invested = self.invested();
        if invested > 0.0 {
            self.gain_loss() / invested * 100.0
        } else {
            0.0
        }
    }
}

/// Positions for every asset with OWNED status
pub fn owned_positions(assets: &[Asset]) -> Vec<Position> {
    assets
        .iter()
        .filter(|a| a.is_owned())
        .map(Position::from_asset)
        .collect()
}

/// Headline figures shown on the dashboard and sidebar
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_invested: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub daily_change: f64,
    pub daily_change_percent: f64,
    pub position_count: usize,
}

impl PortfolioSummary {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut total = 0.0;
        let mut today = 0.0;
        let mut prev_total = 0.0;
        let mut invested = 0.0;
        let mut count = 0;

        for asset in assets.iter().filter(|a| a.is_owned()) {
            let quantity = asset.quantity;
            let price = asset.current_price();
            let previous_close = asset.previous_close();
            let change = match asset.day_change() {
                c if c != 0.0 => c,
                _ => price - previous_close,
            };
            let prev_price = if previous_close != 0.0 {
                previous_close
            } else {
                price - change
            };

            total += quantity * price;
            today += quantity * change;
            prev_total += quantity * prev_price;
            invested += quantity * asset.purchase_price;
            count += 1;
        }

        let gain_loss = total - invested;
        Self {
            total_value: total,
            total_invested: invested,
            total_gain_loss: gain_loss,
            total_gain_loss_percent: if invested > 0.0 {
                gain_loss / invested * 100.0
            } else {
                0.0
            },
            daily_change: today,
            daily_change_percent: if prev_total > 0.0 {
                today / prev_total * 100.0
            } else {
                0.0
            },
            position_count: count,
        }
    }
}

/// Value held in one asset type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub asset_type: AssetTypeCode,
    pub value: f64,
    pub percentage: f64,
    pub count: usize,
}

/// Allocation by asset type, largest first
pub fn allocation(positions: &[Position]) -> Vec<AssetAllocation> {
    let mut by_type: BTreeMap<AssetTypeCode, (f64, usize)> = BTreeMap::new();
    for p in positions {
        let entry = by_type.entry(p.asset_type).or_insert((0.0, 0));
        entry.0 += p.value();
        entry.1 += 1;
    }

    let total: f64 = by_type.values().map(|(v, _)| v).sum();
    let mut result: Vec<AssetAllocation> = by_type
        .into_iter()
        .map(|(asset_type, (value, count))| AssetAllocation {
            asset_type,
            value,
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            count,
        })
        .collect();

    result.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub symbol: String,
    pub asset_type: AssetTypeCode,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

/// Best `n` positions by percentage return
pub fn top_performers(positions: &[Position], n: usize) -> Vec<TopPerformer> {
    let mut ranked: Vec<TopPerformer> = positions
        .iter()
        .map(|p| TopPerformer {
            symbol: p.symbol.clone(),
            asset_type: p.asset_type,
            gain_loss: p.gain_loss(),
            gain_loss_percent: p.gain_loss_percent(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.gain_loss_percent
            .partial_cmp(&a.gain_loss_percent)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypePerformance {
    pub asset_type: AssetTypeCode,
    pub value: f64,
    pub invested: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

/// Return per asset type, in type order
pub fn performance_by_type(positions: &[Position]) -> Vec<TypePerformance> {
    let mut by_type: BTreeMap<AssetTypeCode, (f64, f64)> = BTreeMap::new();
    for p in positions {
        let entry = by_type.entry(p.asset_type).or_insert((0.0, 0.0));
        entry.0 += p.value();
        entry.1 += p.invested();
    }

    by_type
        .into_iter()
        .map(|(asset_type, (value, invested))| {
            let gain_loss = value - invested;
            TypePerformance {
                asset_type,
                value,
                invested,
                gain_loss,
                gain_loss_percent: if invested > 0.0 {
                    gain_loss / invested * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

// ============================================================================
// Asset listing
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Symbol,
    #[default]
    TotalValue,
    GainLossPercent,
    Quantity,
}

impl FromStr for SortField {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "symbol" => Ok(SortField::Symbol),
            "value" | "total_value" => Ok(SortField::TotalValue),
            "gain" | "gain_loss_percent" => Ok(SortField::GainLossPercent),
            "quantity" | "qty" => Ok(SortField::Quantity),
            _ => Err(PortfolioError::InvalidInput(format!("unknown sort field '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search, filter and sort options for the asset list
#[derive(Debug, Clone, Default)]
pub struct AssetQuery {
    pub search: Option<String>,
    pub asset_type: Option<AssetTypeCode>,
    pub status: Option<AssetStatus>,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl AssetQuery {
    pub fn apply<'a>(&self, assets: &'a [Asset]) -> Vec<&'a Asset> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut result: Vec<&Asset> = assets
            .iter()
            .filter(|a| match &needle {
                Some(q) => {
                    a.display_symbol().to_lowercase().contains(q)
                        || a.name.to_lowercase().contains(q)
                        || a.sector
                            .as_deref()
                            .map(|s| s.to_lowercase().contains(q))
                            .unwrap_or(false)
                }
                None => true,
            })
            .filter(|a| self.asset_type.map_or(true, |t| a.asset_type_code() == t))
            .filter(|a| self.status.map_or(true, |s| a.status == s))
            .collect();

        result.sort_by(|a, b| {
            let ordering = match self.sort_field {
                SortField::Symbol => a.display_symbol().cmp(b.display_symbol()),
                SortField::TotalValue => a
                    .total_value()
                    .partial_cmp(&b.total_value())
                    .unwrap_or(Ordering::Equal),
                SortField::GainLossPercent => a
                    .gain_loss_percent()
                    .partial_cmp(&b.gain_loss_percent())
                    .unwrap_or(Ordering::Equal),
                SortField::Quantity => a
                    .quantity
                    .partial_cmp(&b.quantity)
                    .unwrap_or(Ordering::Equal),
            };
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        result
    }
}
