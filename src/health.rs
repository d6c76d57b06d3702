//! Portfolio health score
//!
//! Four sub-scores on a 0-100 scale, each weighted 0.25 in the composite:
//!
//! - diversification: position count, Herfindahl concentration, asset-type spread
//! - risk: average Sharpe ratio, max drawdown and 95% VaR
//! - performance: portfolio return against a fixed market benchmark
//! - volatility: value-weighted annualised volatility against a fixed benchmark
//!
//! The constants below are product decisions and must not drift.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{AssetTypeCode, RiskSummary};
use crate::portfolio::Position;

// ============================================================================
// Constants
// ============================================================================

pub const DIVERSIFICATION_WEIGHT: f64 = 0.25;
pub const RISK_WEIGHT: f64 = 0.25;
pub const PERFORMANCE_WEIGHT: f64 = 0.25;
pub const VOLATILITY_WEIGHT: f64 = 0.25;

/// Position count that earns a full count score
pub const TARGET_POSITION_COUNT: f64 = 15.0;
/// Points per distinct asset type, capped at 100
pub const POINTS_PER_ASSET_TYPE: f64 = 25.0;

const COUNT_BLEND: f64 = 0.3;
const CONCENTRATION_BLEND: f64 = 0.4;
const TYPE_BLEND: f64 = 0.3;

const SHARPE_MULTIPLIER: f64 = 50.0;
const DRAWDOWN_PENALTY: f64 = 3.0;
const VAR_PENALTY: f64 = 15.0;

const SHARPE_BLEND: f64 = 0.5;
const DRAWDOWN_BLEND: f64 = 0.3;
const VAR_BLEND: f64 = 0.2;

/// Annual market return the portfolio is measured against, percent
pub const MARKET_BENCHMARK_RETURN: f64 = 10.5;
const PERFORMANCE_SLOPE: f64 = 2.5;

/// Annualised market volatility, percent
pub const BENCHMARK_VOLATILITY: f64 = 15.0;
const VOLATILITY_PENALTY: f64 = 50.0;

/// Score used when a component has no input data at all
const NEUTRAL_SCORE: f64 = 50.0;

pub const MAX_RECOMMENDATIONS: usize = 3;

// ============================================================================
// Result types
// ============================================================================

/// Supporting figures behind the scores
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthDetails {
    pub position_count: usize,
    pub avg_sharpe: Option<f64>,
    /// Value-weighted annualised volatility, percent
    pub avg_volatility: Option<f64>,
    pub avg_max_drawdown: Option<f64>,
    pub avg_var95: Option<f64>,
    pub top_holding_percent: f64,
    pub portfolio_return_percent: f64,
    pub asset_type_breakdown: BTreeMap<AssetTypeCode, f64>,
}

/// Health scores, each an integer in 0..=100
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub health_score: u8,
    pub diversification_score: u8,
    pub risk_score: u8,
    pub performance_score: u8,
    pub volatility_score: u8,
    pub details: HealthDetails,
}

impl HealthMetrics {
    /// Score positions using their own totals
    pub fn from_positions(positions: &[Position], risk: &HashMap<String, RiskSummary>) -> Self {
        let total_value: f64 = positions.iter().map(Position::value).sum();
        let total_invested: f64 = positions.iter().map(Position::invested).sum();
        calculate_health(positions, risk, total_value, total_invested)
    }

    pub fn grade(&self) -> &'static str {
        match self.health_score {
            80..=100 => "Excellent",
            70..=79 => "Good",
            50..=69 => "Fair",
            _ => "Poor",
        }
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Lots of one symbol merged into a single holding
#[derive(Debug, Clone)]
struct Holding<'a> {
    symbol: &'a str,
    value: f64,
}

fn merge_holdings(positions: &[Position]) -> Vec<Holding<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut holdings: Vec<Holding> = Vec::new();

    for p in positions {
        match index.get(p.symbol.as_str()) {
            Some(&i) => holdings[i].value += p.value(),
            None => {
                index.insert(p.symbol.as_str(), holdings.len());
                holdings.push(Holding {
                    symbol: p.symbol.as_str(),
                    value: p.value(),
                });
            }
        }
    }

    holdings
}

/// Round into an integer score; NaN scores zero
fn to_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

fn clamp_component(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 100.0)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn lookup<'r>(risk: &'r HashMap<String, RiskSummary>, symbol: &str) -> Option<&'r RiskSummary> {
    risk.get(symbol)
        .or_else(|| risk.get(&symbol.to_uppercase()))
}

fn position_count_score(count: usize) -> f64 {
    (count as f64 / TARGET_POSITION_COUNT * 100.0).min(100.0)
}

/// 100 minus the Herfindahl index (as a percentage) of holding weights
fn concentration_score(holdings: &[Holding], total_value: f64) -> f64 {
    if total_value <= 0.0 {
        return 0.0;
    }
    let herfindahl: f64 = holdings
        .iter()
        .map(|h| {
            let weight = h.value / total_value;
            weight * weight
        })
        .sum();
    clamp_component(100.0 - herfindahl * 100.0)
}

fn asset_type_score(type_count: usize) -> f64 {
    (type_count as f64 * POINTS_PER_ASSET_TYPE).min(100.0)
}

fn diversification_score(holdings: &[Holding], type_count: usize, total_value: f64) -> f64 {
    position_count_score(holdings.len()) * COUNT_BLEND
        + concentration_score(holdings, total_value) * CONCENTRATION_BLEND
        + asset_type_score(type_count) * TYPE_BLEND
}

/// Simple averages over symbols that report each figure
#[derive(Debug, Default)]
struct RiskAverages {
    sharpe: Option<f64>,
    max_drawdown: Option<f64>,
    var95: Option<f64>,
}

impl RiskAverages {
    fn collect(holdings: &[Holding], risk: &HashMap<String, RiskSummary>) -> Self {
        let summaries: Vec<&RiskSummary> = holdings
            .iter()
            .filter_map(|h| lookup(risk, h.symbol))
            .collect();

        let sharpe: Vec<f64> = summaries
            .iter()
            .filter_map(|s| s.sharpe_ratio)
            .filter(|v| v.is_finite())
            .collect();
        let drawdown: Vec<f64> = summaries
            .iter()
            .filter_map(|s| s.max_drawdown)
            .filter(|v| v.is_finite())
            .map(f64::abs)
            .collect();
        let var95: Vec<f64> = summaries
            .iter()
            .filter_map(|s| s.var95)
            .filter(|v| v.is_finite())
            .map(f64::abs)
            .collect();

        Self {
            sharpe: mean(&sharpe),
            max_drawdown: mean(&drawdown),
            var95: mean(&var95),
        }
    }

    fn score(&self) -> f64 {
        let sharpe = self
            .sharpe
            .map(|s| clamp_component(s * SHARPE_MULTIPLIER))
            .unwrap_or(NEUTRAL_SCORE);
        let drawdown = self
            .max_drawdown
            .map(|d| clamp_component(100.0 - d * DRAWDOWN_PENALTY))
            .unwrap_or(NEUTRAL_SCORE);
        let var = self
            .var95
            .map(|v| clamp_component(100.0 - v * VAR_PENALTY))
            .unwrap_or(NEUTRAL_SCORE);

        sharpe * SHARPE_BLEND + drawdown * DRAWDOWN_BLEND + var * VAR_BLEND
    }
}

fn portfolio_return_percent(total_value: f64, total_invested: f64) -> f64 {
    if total_invested > 0.0 {
        (total_value - total_invested) / total_invested * 100.0
    } else {
        0.0
    }
}

fn performance_score(return_percent: f64) -> f64 {
    let excess = return_percent - MARKET_BENCHMARK_RETURN;
    clamp_component(50.0 + excess * PERFORMANCE_SLOPE)
}

/// Value-weighted volatility over holdings with data; plain mean if they hold no value
fn weighted_volatility(holdings: &[Holding], risk: &HashMap<String, RiskSummary>) -> Option<f64> {
    let samples: Vec<(f64, f64)> = holdings
        .iter()
        .filter_map(|h| {
            lookup(risk, h.symbol)
                .and_then(|s| s.volatility)
                .filter(|v| v.is_finite())
                .map(|v| (h.value.max(0.0), v.abs()))
        })
        .collect();

    if samples.is_empty() {
        return None;
    }

    let weight: f64 = samples.iter().map(|(w, _)| w).sum();
    if weight > 0.0 {
        Some(samples.iter().map(|(w, v)| w * v).sum::<f64>() / weight)
    } else {
        mean(&samples.iter().map(|(_, v)| *v).collect::<Vec<_>>())
    }
}

fn volatility_score(avg_volatility: Option<f64>) -> f64 {
    match avg_volatility {
        Some(vol) => {
            let ratio = vol / BENCHMARK_VOLATILITY;
            clamp_component(100.0 - (ratio - 1.0) * VOLATILITY_PENALTY)
        }
        None => NEUTRAL_SCORE,
    }
}

fn top_holding_percent(holdings: &[Holding], total_value: f64) -> f64 {
    if total_value <= 0.0 {
        return 0.0;
    }
    let top = holdings.iter().map(|h| h.value).fold(0.0_f64, f64::max);
    clamp_component(top / total_value * 100.0)
}

/// Score a set of owned positions.
///
/// `risk` maps symbols to backend risk summaries; symbols without one are
/// left out of the risk and volatility averages but still count towards
/// diversification and performance. `total_value` and `total_invested`
/// are the portfolio totals reported alongside the positions.
pub fn calculate_health(
    positions: &[Position],
    risk: &HashMap<String, RiskSummary>,
    total_value: f64,
    total_invested: f64,
) -> HealthMetrics {
    if positions.is_empty() {
        return HealthMetrics::default();
    }

    let holdings = merge_holdings(positions);

    let mut breakdown: BTreeMap<AssetTypeCode, f64> = BTreeMap::new();
    for p in positions {
        *breakdown.entry(p.asset_type).or_insert(0.0) += p.value();
    }

    let averages = RiskAverages::collect(&holdings, risk);
    let avg_volatility = weighted_volatility(&holdings, risk);
    let return_percent = portfolio_return_percent(total_value, total_invested);

    let diversification = to_score(diversification_score(&holdings, breakdown.len(), total_value));
    let risk_score = to_score(averages.score());
    let performance = to_score(performance_score(return_percent));
    let volatility = to_score(volatility_score(avg_volatility));

    let composite = diversification as f64 * DIVERSIFICATION_WEIGHT
        + risk_score as f64 * RISK_WEIGHT
        + performance as f64 * PERFORMANCE_WEIGHT
        + volatility as f64 * VOLATILITY_WEIGHT;

    let metrics = HealthMetrics {
        health_score: to_score(composite),
        diversification_score: diversification,
        risk_score,
        performance_score: performance,
        volatility_score: volatility,
        details: HealthDetails {
            position_count: holdings.len(),
            avg_sharpe: averages.sharpe,
            avg_volatility,
            avg_max_drawdown: averages.max_drawdown,
            avg_var95: averages.var95,
            top_holding_percent: top_holding_percent(&holdings, total_value),
            portfolio_return_percent: return_percent,
            asset_type_breakdown: breakdown,
        },
    };

    log::debug!(
        "Health score {} (div {}, risk {}, perf {}, vol {}) over {} holdings",
        metrics.health_score,
        metrics.diversification_score,
        metrics.risk_score,
        metrics.performance_score,
        metrics.volatility_score,
        metrics.details.position_count
    );

    metrics
}

// ============================================================================
// Recommendations
// ============================================================================

/// Short status lines for the metrics, at most [`MAX_RECOMMENDATIONS`].
///
/// Categories are checked in a fixed order (overall, position count,
/// concentration, Sharpe, volatility, defensive assets); within a category
/// the first matching rule wins.
pub fn recommendations(metrics: &HealthMetrics) -> Vec<String> {
    let details = &metrics.details;
    let mut out = Vec::new();

    out.push(
        if metrics.health_score >= 70 {
            "Your portfolio is in good health".to_string()
        } else if metrics.health_score >= 50 {
            "Your portfolio needs attention".to_string()
        } else {
            "Your portfolio needs improvement".to_string()
        },
    );

    if details.position_count < 5 {
        out.push(format!(
            "Add more positions to diversify (currently {})",
            details.position_count
        ));
    } else if details.position_count < 10 {
        out.push(format!(
            "Consider growing to 10 or more positions (currently {})",
            details.position_count
        ));
    }

    if details.top_holding_percent > 30.0 {
        out.push(format!(
            "Top holding is {:.1}% of the portfolio; consider trimming it",
            details.top_holding_percent
        ));
    }

    if let Some(sharpe) = details.avg_sharpe {
        if sharpe < 0.5 {
            out.push(format!("Low risk-adjusted returns (average Sharpe {:.2})", sharpe));
        } else if sharpe >= 1.0 {
            out.push(format!("Strong risk-adjusted returns (average Sharpe {:.2})", sharpe));
        }
    }

    if let Some(vol) = details.avg_volatility {
        if vol > 25.0 {
            out.push(format!(
                "High volatility ({:.1}% annualised); add steadier assets",
                vol
            ));
        }
    }

    let has_defensive = details.asset_type_breakdown.contains_key(&AssetTypeCode::Bond)
        || details.asset_type_breakdown.contains_key(&AssetTypeCode::Cash);
    if !has_defensive {
        out.push("No bonds or cash held; consider a defensive allocation".to_string());
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(sharpe: f64, vol: f64, dd: f64, var: f64) -> RiskSummary {
        RiskSummary {
            symbol: None,
            sharpe_ratio: Some(sharpe),
            volatility: Some(vol),
            max_drawdown: Some(dd),
            var95: Some(var),
        }
    }

    fn two_asset_portfolio() -> (Vec<Position>, HashMap<String, RiskSummary>) {
        let positions = vec![
            Position::new("AAPL", 60.0, 80.0, 100.0, AssetTypeCode::Stock),
            Position::new("BND", 40.0, 100.0, 100.0, AssetTypeCode::Bond),
        ];
        let mut risk = HashMap::new();
        risk.insert("AAPL".to_string(), summary(1.2, 30.0, -20.0, 2.0));
        risk.insert("BND".to_string(), summary(0.4, 6.0, -5.0, 0.5));
        (positions, risk)
    }

    fn equal_weight(n: usize) -> Vec<Position> {
        (0..n)
            .map(|i| Position::new(&format!("S{}", i), 10.0, 10.0, 10.0, AssetTypeCode::Stock))
            .collect()
    }

    #[test]
    fn test_empty_portfolio_scores_zero() {
        let metrics = calculate_health(&[], &HashMap::new(), 0.0, 0.0);
        assert_eq!(metrics.health_score, 0);
        assert_eq!(metrics.diversification_score, 0);
        assert_eq!(metrics.risk_score, 0);
        assert_eq!(metrics.performance_score, 0);
        assert_eq!(metrics.volatility_score, 0);
        assert!(metrics.details.asset_type_breakdown.is_empty());
        assert_eq!(metrics.details.position_count, 0);
    }

    #[test]
    fn test_known_portfolio() {
        let (positions, risk) = two_asset_portfolio();
        let metrics = calculate_health(&positions, &risk, 10_000.0, 8_800.0);

        // count 13.33*0.3 + concentration 48*0.4 + types 50*0.3 = 38.2
        assert_eq!(metrics.diversification_score, 38);
        // sharpe 40*0.5 + drawdown 62.5*0.3 + var 81.25*0.2 = 55
        assert_eq!(metrics.risk_score, 55);
        // 13.64% return -> 50 + 3.14*2.5
        assert_eq!(metrics.performance_score, 58);
        // weighted volatility 20.4% -> 100 - 0.36*50
        assert_eq!(metrics.volatility_score, 82);
        assert_eq!(metrics.health_score, 58);

        let d = &metrics.details;
        assert_eq!(d.position_count, 2);
        assert!((d.top_holding_percent - 60.0).abs() < 1e-9);
        assert!((d.avg_volatility.unwrap() - 20.4).abs() < 1e-9);
        assert!((d.avg_max_drawdown.unwrap() - 12.5).abs() < 1e-9);
        assert_eq!(d.asset_type_breakdown[&AssetTypeCode::Stock], 6_000.0);
        assert_eq!(d.asset_type_breakdown[&AssetTypeCode::Bond], 4_000.0);
    }

    #[test]
    fn test_from_positions_matches_explicit_totals() {
        let (positions, risk) = two_asset_portfolio();
        assert_eq!(
            HealthMetrics::from_positions(&positions, &risk),
            calculate_health(&positions, &risk, 10_000.0, 8_800.0)
        );
    }

    #[test]
    fn test_scores_bounded_for_extreme_inputs() {
        let positions = vec![
            Position::new("LOSS", 100.0, 500.0, 1.0, AssetTypeCode::Crypto),
            Position::new("NAN", 1.0, 1.0, f64::NAN, AssetTypeCode::Stock),
        ];
        let mut risk = HashMap::new();
        risk.insert("LOSS".to_string(), summary(-9.0, 400.0, -99.0, 80.0));
        risk.insert("NAN".to_string(), summary(f64::NAN, f64::INFINITY, f64::NAN, f64::NAN));

        for (value, invested) in [(100.0, 50_000.0), (100.0, 0.0), (0.0, 0.0), (-10.0, 5.0)] {
            let m = calculate_health(&positions, &risk, value, invested);
            for score in [
                m.health_score,
                m.diversification_score,
                m.risk_score,
                m.performance_score,
                m.volatility_score,
            ] {
                assert!(score <= 100);
            }
            assert!(m.details.top_holding_percent >= 0.0);
            assert!(m.details.top_holding_percent <= 100.0);
        }

        let huge = calculate_health(
            &[Position::new("MOON", 1.0, 1.0, 1_000_000.0, AssetTypeCode::Crypto)],
            &HashMap::new(),
            1_000_000.0,
            1.0,
        );
        assert_eq!(huge.performance_score, 100);
    }

    #[test]
    fn test_more_positions_never_lowers_diversification() {
        let none = HashMap::new();
        let mut previous = 0;
        for n in 1..=20 {
            let positions = equal_weight(n);
            let m = HealthMetrics::from_positions(&positions, &none);
            assert!(m.diversification_score >= previous, "dropped at n={}", n);
            previous = m.diversification_score;
        }

        let mut last = 0.0;
        for n in 0..30 {
            let s = position_count_score(n);
            assert!(s >= last);
            last = s;
        }
        assert_eq!(position_count_score(15), 100.0);
        assert_eq!(position_count_score(40), 100.0);
    }

    #[test]
    fn test_single_symbol_is_fully_concentrated() {
        let positions = vec![
            Position::new("NVDA", 10.0, 250.0, 500.0, AssetTypeCode::Stock),
            Position::new("NVDA", 5.0, 400.0, 500.0, AssetTypeCode::Stock),
        ];
        let total: f64 = positions.iter().map(Position::value).sum();
        let m = HealthMetrics::from_positions(&positions, &HashMap::new());

        assert_eq!(m.details.position_count, 1);
        assert!((m.details.top_holding_percent - 100.0).abs() < 1e-9);

        let holdings = merge_holdings(&positions);
        assert_eq!(concentration_score(&holdings, total), 0.0);
    }

    #[test]
    fn test_composite_is_mean_of_rounded_subscores() {
        let (positions, risk) = two_asset_portfolio();
        let cases = [
            calculate_health(&positions, &risk, 10_000.0, 8_800.0),
            calculate_health(&positions, &risk, 10_000.0, 20_000.0),
            calculate_health(&equal_weight(7), &risk, 700.0, 650.0),
        ];

        for m in cases {
            let sum = m.diversification_score as f64
                + m.risk_score as f64
                + m.performance_score as f64
                + m.volatility_score as f64;
            assert_eq!(m.health_score, (sum / 4.0).round() as u8);
        }
    }

    #[test]
    fn test_missing_risk_data_is_excluded() {
        let positions = vec![
            Position::new("AAPL", 10.0, 100.0, 100.0, AssetTypeCode::Stock),
            Position::new("MYSTERY", 90.0, 100.0, 100.0, AssetTypeCode::Stock),
        ];
        let mut risk = HashMap::new();
        risk.insert("AAPL".to_string(), summary(1.0, 30.0, -10.0, 1.0));

        let m = HealthMetrics::from_positions(&positions, &risk);
        assert_eq!(m.details.position_count, 2);
        assert_eq!(m.details.avg_sharpe, Some(1.0));
        // Only AAPL has volatility data, so the weighting is over AAPL alone
        assert_eq!(m.details.avg_volatility, Some(30.0));
        assert_eq!(m.volatility_score, 50);
    }

    #[test]
    fn test_no_risk_data_is_neutral() {
        let m = HealthMetrics::from_positions(&equal_weight(3), &HashMap::new());
        assert_eq!(m.risk_score, 50);
        assert_eq!(m.volatility_score, 50);
        assert_eq!(m.details.avg_sharpe, None);
    }

    #[test]
    fn test_recommendations_capped_and_ordered() {
        let (positions, risk) = two_asset_portfolio();
        let m = calculate_health(&positions, &risk, 10_000.0, 8_800.0);
        let recs = recommendations(&m);

        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert_eq!(recs[0], "Your portfolio needs attention");
        assert!(recs[1].contains("Add more positions"));
        assert!(recs[2].contains("60.0%"));

        assert!(recommendations(&HealthMetrics::default()).len() <= MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_recommendations_rule_selection() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(AssetTypeCode::Stock, 1_000.0);

        let metrics = HealthMetrics {
            health_score: 75,
            details: HealthDetails {
                position_count: 12,
                avg_sharpe: Some(1.4),
                avg_volatility: Some(28.0),
                top_holding_percent: 12.0,
                asset_type_breakdown: breakdown,
                ..Default::default()
            },
            ..Default::default()
        };

        let recs = recommendations(&metrics);
        assert_eq!(
            recs,
            vec![
                "Your portfolio is in good health".to_string(),
                "Strong risk-adjusted returns (average Sharpe 1.40)".to_string(),
                "High volatility (28.0% annualised); add steadier assets".to_string(),
            ]
        );
    }

    fn rec_metrics(
        score: u8,
        count: usize,
        top: f64,
        sharpe: Option<f64>,
        vol: Option<f64>,
        types: &[AssetTypeCode],
    ) -> HealthMetrics {
        HealthMetrics {
            health_score: score,
            details: HealthDetails {
                position_count: count,
                avg_sharpe: sharpe,
                avg_volatility: vol,
                top_holding_percent: top,
                asset_type_breakdown: types.iter().map(|t| (*t, 1_000.0)).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_recommendation_branches_and_boundaries() {
        use crate::models::AssetTypeCode::{Bond, Cash, Crypto, Stock};
        const GOOD: &str = "Your portfolio is in good health";
        let balanced = [Stock, Bond];

        let cases: Vec<(&str, HealthMetrics, Vec<&str>)> = vec![
            (
                "all thresholds exactly at their limits",
                rec_metrics(70, 15, 30.0, Some(0.7), Some(25.0), &balanced),
                vec![GOOD],
            ),
            (
                "just under healthy",
                rec_metrics(69, 15, 30.0, Some(0.7), Some(25.0), &balanced),
                vec!["Your portfolio needs attention"],
            ),
            (
                "attention boundary",
                rec_metrics(50, 15, 30.0, Some(0.7), Some(25.0), &balanced),
                vec!["Your portfolio needs attention"],
            ),
            (
                "needs improvement",
                rec_metrics(49, 15, 30.0, Some(0.7), Some(25.0), &balanced),
                vec!["Your portfolio needs improvement"],
            ),
            (
                "four positions",
                rec_metrics(70, 4, 30.0, Some(0.7), Some(25.0), &balanced),
                vec![GOOD, "Add more positions to diversify (currently 4)"],
            ),
            (
                "five positions",
                rec_metrics(70, 5, 30.0, Some(0.7), Some(25.0), &balanced),
                vec![GOOD, "Consider growing to 10 or more positions (currently 5)"],
            ),
            (
                "nine positions",
                rec_metrics(70, 9, 30.0, Some(0.7), Some(25.0), &balanced),
                vec![GOOD, "Consider growing to 10 or more positions (currently 9)"],
            ),
            (
                "ten positions",
                rec_metrics(70, 10, 30.0, Some(0.7), Some(25.0), &balanced),
                vec![GOOD],
            ),
            (
                "concentration over 30%",
                rec_metrics(70, 15, 30.1, Some(0.7), Some(25.0), &balanced),
                vec![GOOD, "Top holding is 30.1% of the portfolio; consider trimming it"],
            ),
            (
                "low sharpe",
                rec_metrics(70, 15, 30.0, Some(0.49), Some(25.0), &balanced),
                vec![GOOD, "Low risk-adjusted returns (average Sharpe 0.49)"],
            ),
            (
                "sharpe at 0.5 is neither weak nor strong",
                rec_metrics(70, 15, 30.0, Some(0.5), Some(25.0), &balanced),
                vec![GOOD],
            ),
            (
                "strong sharpe boundary",
                rec_metrics(70, 15, 30.0, Some(1.0), Some(25.0), &balanced),
                vec![GOOD, "Strong risk-adjusted returns (average Sharpe 1.00)"],
            ),
            (
                "volatility over 25%",
                rec_metrics(70, 15, 30.0, Some(0.7), Some(25.1), &balanced),
                vec![GOOD, "High volatility (25.1% annualised); add steadier assets"],
            ),
            (
                "no risk data",
                rec_metrics(70, 15, 30.0, None, None, &balanced),
                vec![GOOD],
            ),
            (
                "no bonds or cash",
                rec_metrics(70, 15, 30.0, Some(0.7), Some(25.0), &[Stock, Crypto]),
                vec![GOOD, "No bonds or cash held; consider a defensive allocation"],
            ),
            (
                "cash counts as defensive",
                rec_metrics(70, 15, 30.0, Some(0.7), Some(25.0), &[Stock, Cash]),
                vec![GOOD],
            ),
            (
                "everything fires, first three kept",
                rec_metrics(40, 3, 80.0, Some(0.2), Some(40.0), &[Crypto]),
                vec![
                    "Your portfolio needs improvement",
                    "Add more positions to diversify (currently 3)",
                    "Top holding is 80.0% of the portfolio; consider trimming it",
                ],
            ),
        ];

        for (name, metrics, expected) in cases {
            assert_eq!(recommendations(&metrics), expected, "case: {}", name);
        }
    }

    #[test]
    fn test_grade_labels() {
        let mut m = HealthMetrics::default();
        assert_eq!(m.grade(), "Poor");
        m.health_score = 55;
        assert_eq!(m.grade(), "Fair");
        m.health_score = 70;
        assert_eq!(m.grade(), "Good");
        m.health_score = 92;
        assert_eq!(m.grade(), "Excellent");
    }
}
