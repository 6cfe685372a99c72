//! Translation between the dashboard's request shapes and the optimizer
//! service's wire schema, in both directions.

use anyhow::anyhow;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

use crate::error::ApiError;
use crate::models::{
    Diagnostics, NamedValue, NormalizedOptimizeResult, OptimizeRequest, PortfolioLine,
    RebalanceAction, RebalanceRequest, RebalanceResult, RebalanceSummary, ReturnShape, RiskLevel,
    UpstreamDataset, UpstreamHolding, UpstreamOptimizeBody, UpstreamOptimizeResponse,
    UpstreamRebalanceBody, UpstreamRebalanceResponse, UpstreamRecommendation, WeightShape,
};
use crate::synth::evolution::{synth_evolution, EvolutionParams};

/// Backend tag reported in optimize diagnostics.
pub const UPSTREAM_BACKEND: &str = "fastapi";

/// Any string mentioning NIFTY, NASDAQ or CRYPTO (any case) maps to that
/// token; everything else, including no input, maps to NIFTY50.
pub fn map_dataset(raw: Option<&str>) -> UpstreamDataset {
    let upper = raw.unwrap_or_default().to_uppercase();
    if upper.contains("NIFTY") {
        UpstreamDataset::Nifty50
    } else if upper.contains("NASDAQ") {
        UpstreamDataset::Nasdaq
    } else if upper.contains("CRYPTO") {
        UpstreamDataset::Crypto
    } else {
        UpstreamDataset::Nifty50
    }
}

/// Exactly `low` or `high` (any case) keep their level; anything else is medium.
pub fn map_risk(raw: Option<&str>) -> RiskLevel {
    match raw.map(str::to_lowercase).as_deref() {
        Some("low") => RiskLevel::Low,
        Some("high") => RiskLevel::High,
        _ => RiskLevel::Medium,
    }
}

pub fn run_id(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// UI `budget` (currency) travels as `total_investment`; UI `maxAssets`
/// (count) travels as `budget`.
pub fn optimize_body(req: &OptimizeRequest) -> UpstreamOptimizeBody {
    UpstreamOptimizeBody {
        dataset_option: map_dataset(Some(req.dataset.as_str())),
        budget: req.max_assets,
        risk_factor: map_risk(Some(req.risk_level.as_str())),
        total_investment: req.budget,
    }
}

pub fn normalize_optimize(
    raw: UpstreamOptimizeResponse,
    now: DateTime<Utc>,
) -> Result<NormalizedOptimizeResult, ApiError> {
    if raw.portfolio.is_empty() {
        return Err(ApiError::Internal(anyhow!(
            "optimizer returned an empty portfolio"
        )));
    }

    let selected = raw.portfolio.iter().map(|p| p.asset.clone()).collect();
    let weights = raw.portfolio.iter().map(|p| p.weight).collect();
    let allocation = raw
        .portfolio
        .iter()
        .map(|p| {
            let pct = p.percentage.unwrap_or(p.weight * 100.0);
            NamedValue::new(p.asset.clone(), pct.round() as i64)
        })
        .collect();

    let returns: Vec<f64> = raw
        .portfolio
        .iter()
        .filter_map(|p| p.expected_return)
        .collect();
    let expected_return = if returns.is_empty() {
        None
    } else {
        Some(returns.iter().sum::<f64>() / returns.len() as f64)
    };

    Ok(NormalizedOptimizeResult {
        run_id: run_id(now),
        method: "quantum".to_string(),
        selected,
        weights,
        allocation,
        expected_return,
        risk: None,
        sharpe: None,
        diagnostics: Diagnostics {
            backend: Some(UPSTREAM_BACKEND.to_string()),
            dataset: Some(raw.dataset),
            objective_value: raw.objective_value,
            gamma: raw.gamma,
        },
    })
}

pub fn rebalance_body(req: &RebalanceRequest) -> UpstreamRebalanceBody {
    UpstreamRebalanceBody {
        dataset_option: map_dataset(Some(&req.dataset)),
        future_dataset_option: None,
        budget: req.budget,
        risk_factor: map_risk(Some(req.risk.as_str())),
        total_investment: req.total_investment,
    }
}

impl WeightShape {
    /// Weight as a fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        match self {
            WeightShape::Fraction { weight } => *weight,
            WeightShape::Percentage { percentage } => percentage / 100.0,
            WeightShape::Absent {} => 0.0,
        }
    }
}

impl ReturnShape {
    pub fn value(&self) -> f64 {
        match self {
            ReturnShape::Expected { expected_return } => *expected_return,
            ReturnShape::Abbreviated { exp_ret } => *exp_ret,
            ReturnShape::Absent {} => 0.0,
        }
    }
}

impl From<UpstreamHolding> for PortfolioLine {
    fn from(h: UpstreamHolding) -> Self {
        Self {
            weight: h.weight.fraction(),
            expected_return: h.expected.value(),
            asset: h.asset,
        }
    }
}

impl From<UpstreamRecommendation> for RebalanceAction {
    fn from(r: UpstreamRecommendation) -> Self {
        Self {
            action: r.action,
            asset: r.asset,
            current_pct: r.current_pct.unwrap_or(0.0),
            future_pct: r.future_pct.unwrap_or(0.0),
            change_pct: r.change_pct.unwrap_or(0.0),
        }
    }
}

/// Σ weight · expected_return.
pub fn weighted_return(lines: &[PortfolioLine]) -> f64 {
    lines.iter().map(|l| l.weight * l.expected_return).sum()
}

/// Canonicalize an optimizer rebalance payload. The evolution path is always
/// synthesized from the weighted returns, never copied from upstream.
pub fn normalize_rebalance<R: Rng>(
    raw: UpstreamRebalanceResponse,
    req: &RebalanceRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> RebalanceResult {
    let current: Vec<PortfolioLine> = raw.current_portfolio.into_iter().map(Into::into).collect();
    let future: Vec<PortfolioLine> = raw.future_portfolio.into_iter().map(Into::into).collect();
    let actions = raw.recommendations.into_iter().map(Into::into).collect();

    let summary = RebalanceSummary {
        mu_current: weighted_return(&current),
        mu_future: weighted_return(&future),
    };
    let dataset = raw
        .dataset
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| map_dataset(Some(&req.dataset)).as_str().to_string());

    RebalanceResult {
        run_id: run_id(now),
        dataset,
        current,
        future,
        actions,
        evolution: synth_evolution(EvolutionParams::for_request(req, summary), rng),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, UpstreamPortfolioEntry};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn optimize_request() -> OptimizeRequest {
        OptimizeRequest {
            dataset: Dataset::Nasdaq100,
            time_horizon: None,
            risk_level: RiskLevel::High,
            budget: 250_000.0,
            max_assets: 4,
            objective: None,
            constraints: None,
            include: None,
            exclude: None,
            qaoa_params: None,
        }
    }

    fn entry(asset: &str, weight: f64, ret: Option<f64>, pct: Option<f64>) -> UpstreamPortfolioEntry {
        UpstreamPortfolioEntry {
            asset: asset.to_string(),
            expected_return: ret,
            weight,
            investment: None,
            percentage: pct,
        }
    }

    #[test]
    fn test_map_dataset_is_substring_tolerant() {
        for raw in ["NIFTY", "nifty50", "Nifty 50 Index"] {
            assert_eq!(map_dataset(Some(raw)), UpstreamDataset::Nifty50);
        }
        assert_eq!(map_dataset(Some("nasdaq")), UpstreamDataset::Nasdaq);
        assert_eq!(map_dataset(Some("NASDAQ100")), UpstreamDataset::Nasdaq);
        assert_eq!(map_dataset(Some("crypto")), UpstreamDataset::Crypto);
        assert_eq!(map_dataset(Some("CRYPTO50")), UpstreamDataset::Crypto);
        assert_eq!(map_dataset(Some("ftse")), UpstreamDataset::Nifty50);
        assert_eq!(map_dataset(None), UpstreamDataset::Nifty50);
    }

    #[test]
    fn test_map_risk_defaults_to_medium() {
        assert_eq!(map_risk(Some("LOW")), RiskLevel::Low);
        assert_eq!(map_risk(Some("High")), RiskLevel::High);
        assert_eq!(map_risk(Some("medium")), RiskLevel::Medium);
        assert_eq!(map_risk(Some("unknown")), RiskLevel::Medium);
        assert_eq!(map_risk(Some(" low")), RiskLevel::Medium);
        assert_eq!(map_risk(None), RiskLevel::Medium);
    }

    #[test]
    fn test_optimize_body_swaps_budget_and_count() {
        let body = optimize_body(&optimize_request());
        assert_eq!(body.dataset_option, UpstreamDataset::Nasdaq);
        assert_eq!(body.budget, 4);
        assert_eq!(body.total_investment, 250_000.0);
        assert_eq!(body.risk_factor, RiskLevel::High);
        let v = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            v,
            json!({"dataset_option": "NASDAQ", "budget": 4, "risk_factor": "high", "total_investment": 250000.0})
        );
    }

    #[test]
    fn test_normalize_optimize_lengths_and_mean() {
        let raw = UpstreamOptimizeResponse {
            dataset: "NASDAQ".to_string(),
            budget: 3.0,
            risk_factor: "high".to_string(),
            total_investment: 1000.0,
            objective_value: Some(-0.42),
            gamma: Some(0.5),
            portfolio: vec![
                entry("Apple", 0.5, Some(12.0), None),
                entry("Nvidia", 0.3, None, Some(31.6)),
                entry("Meta", 0.2, Some(8.0), None),
            ],
        };
        let out = normalize_optimize(raw, Utc::now()).expect("normalized");
        assert_eq!(out.selected.len(), 3);
        assert_eq!(out.weights.len(), 3);
        assert_eq!(out.allocation.len(), 3);
        assert_eq!(out.allocation[0].value, 50);
        assert_eq!(out.allocation[1].value, 32);
        assert_eq!(out.expected_return, Some(10.0));
        assert_eq!(out.method, "quantum");
        assert_eq!(out.diagnostics.objective_value, Some(-0.42));
        assert_eq!(out.diagnostics.dataset.as_deref(), Some("NASDAQ"));
    }

    #[test]
    fn test_normalize_optimize_without_returns() {
        let raw = UpstreamOptimizeResponse {
            dataset: "NIFTY50".to_string(),
            budget: 1.0,
            risk_factor: "low".to_string(),
            total_investment: 10.0,
            objective_value: None,
            gamma: None,
            portfolio: vec![entry("TCS", 1.0, None, None)],
        };
        let out = normalize_optimize(raw, Utc::now()).expect("normalized");
        assert_eq!(out.expected_return, None);
        assert_eq!(out.allocation[0].value, 100);
    }

    #[test]
    fn test_normalize_optimize_rejects_empty_portfolio() {
        let raw = UpstreamOptimizeResponse {
            dataset: "NIFTY50".to_string(),
            budget: 1.0,
            risk_factor: "low".to_string(),
            total_investment: 10.0,
            objective_value: None,
            gamma: None,
            portfolio: vec![],
        };
        assert!(normalize_optimize(raw, Utc::now()).is_err());
    }

    #[test]
    fn test_weighted_return() {
        let lines = vec![
            PortfolioLine {
                asset: "A".into(),
                weight: 0.6,
                expected_return: 10.0,
            },
            PortfolioLine {
                asset: "B".into(),
                weight: 0.4,
                expected_return: 5.0,
            },
        ];
        assert!((weighted_return(&lines) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_rebalance_plucks_aliases() {
        let raw: UpstreamRebalanceResponse = serde_json::from_value(json!({
            "current_portfolio": [
                {"asset": "TCS", "weight": 0.6, "expected_return": 10},
                {"asset": "HUL", "percentage": 40, "exp_ret": 5}
            ],
            "future_portfolio": [
                {"asset": "TCS", "weight": 1.0, "expected_return": 12}
            ],
            "recommendations": [
                {"action": "SELL", "asset": "HUL", "current_pct": 40, "future_pct": 0, "change_pct": -40}
            ]
        }))
        .expect("payload");
        let req = RebalanceRequest {
            dataset: "nifty50".to_string(),
            budget: 2,
            risk: RiskLevel::Low,
            total_investment: 50_000.0,
            time_horizon: 10,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let out = normalize_rebalance(raw, &req, Utc::now(), &mut rng);

        assert_eq!(out.dataset, "NIFTY50");
        assert_eq!(out.current[1].weight, 0.4);
        assert_eq!(out.current[1].expected_return, 5.0);
        assert!((out.summary.mu_current - 8.0).abs() < 1e-9);
        assert!((out.summary.mu_future - 12.0).abs() < 1e-9);
        assert_eq!(out.actions[0].change_pct, -40.0);
        assert_eq!(out.evolution.len(), 10);
        assert_eq!(out.evolution[0].time, "Day 1");
    }

    #[test]
    fn test_normalize_rebalance_null_lists_read_empty() {
        let raw: UpstreamRebalanceResponse = serde_json::from_value(json!({
            "dataset": "NIFTY50",
            "current_portfolio": null,
            "future_portfolio": {"asset": "TCS"},
            "recommendations": "none"
        }))
        .expect("payload");
        assert!(raw.current_portfolio.is_empty());
        assert!(raw.future_portfolio.is_empty());
        assert!(raw.recommendations.is_empty());

        let req = RebalanceRequest {
            dataset: "nifty50".to_string(),
            budget: 2,
            risk: RiskLevel::Medium,
            total_investment: 10_000.0,
            time_horizon: 5,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = normalize_rebalance(raw, &req, Utc::now(), &mut rng);
        assert!(out.current.is_empty() && out.future.is_empty() && out.actions.is_empty());
        assert_eq!(out.summary.mu_current, 0.0);
        assert_eq!(out.evolution.len(), 5);
    }
}
