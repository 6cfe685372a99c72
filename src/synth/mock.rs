//! Stand-ins for the optimizer service when running in mock mode.
//!
//! Optimize output is produced in the upstream wire shape so it flows
//! through the same normalization as live data.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::demo::{dataset_assets, random_weights};
use super::evolution::{synth_evolution, EvolutionParams};
use super::round2;
use crate::error::ApiError;
use crate::mapper;
use crate::models::{
    OptimizeRequest, RebalanceRequest, RebalanceResult, RebalanceSummary, UpstreamOptimizeResponse,
    UpstreamPortfolioEntry,
};

pub const MOCK_MU_CURRENT: f64 = 8.5;
pub const MOCK_MU_FUTURE: f64 = 11.0;

/// Included names come first, excluded names never appear, and the pick is
/// capped at `maxAssets`.
pub fn pick_assets(req: &OptimizeRequest) -> Vec<String> {
    let body = mapper::optimize_body(req);
    let excluded = |name: &str| {
        req.exclude
            .iter()
            .flatten()
            .any(|e| e.eq_ignore_ascii_case(name))
    };

    let mut picked: Vec<String> = Vec::new();
    let candidates = req
        .include
        .iter()
        .flatten()
        .map(String::as_str)
        .chain(dataset_assets(body.dataset_option.as_str()).iter().copied());
    for name in candidates {
        if picked.len() >= req.max_assets as usize {
            break;
        }
        if excluded(name) || picked.iter().any(|p| p.eq_ignore_ascii_case(name)) {
            continue;
        }
        picked.push(name.to_string());
    }
    picked
}

pub fn mock_optimize_payload<R: Rng>(
    req: &OptimizeRequest,
    rng: &mut R,
) -> Result<UpstreamOptimizeResponse, ApiError> {
    let names = pick_assets(req);
    if names.is_empty() {
        return Err(ApiError::BadRequest(
            "no eligible assets left after exclusions".to_string(),
        ));
    }
    let body = mapper::optimize_body(req);

    let weights = random_weights(names.len(), rng);
    let portfolio: Vec<UpstreamPortfolioEntry> = names
        .into_iter()
        .zip(weights)
        .map(|(asset, w)| UpstreamPortfolioEntry {
            asset,
            expected_return: Some(round2(rng.gen_range(6.0..18.0))),
            weight: w,
            investment: Some(round2(w * body.total_investment)),
            percentage: Some(round2(w * 100.0)),
        })
        .collect();
    let objective = portfolio
        .iter()
        .map(|p| p.weight * p.expected_return.unwrap_or_default())
        .sum::<f64>();

    Ok(UpstreamOptimizeResponse {
        dataset: body.dataset_option.as_str().to_string(),
        budget: f64::from(body.budget),
        risk_factor: body.risk_factor.as_str().to_string(),
        total_investment: body.total_investment,
        objective_value: Some(round2(-objective)),
        gamma: None,
        portfolio,
    })
}

/// Fixed monthly returns, no holdings, synthesized evolution.
pub fn mock_rebalance<R: Rng>(
    req: &RebalanceRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> RebalanceResult {
    let summary = RebalanceSummary {
        mu_current: MOCK_MU_CURRENT,
        mu_future: MOCK_MU_FUTURE,
    };
    RebalanceResult {
        run_id: mapper::run_id(now),
        dataset: mapper::map_dataset(Some(&req.dataset)).as_str().to_string(),
        current: Vec::new(),
        future: Vec::new(),
        actions: Vec::new(),
        evolution: synth_evolution(EvolutionParams::for_request(req, summary), rng),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, RiskLevel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn request(dataset: Dataset, max_assets: u32) -> OptimizeRequest {
        OptimizeRequest {
            dataset,
            time_horizon: None,
            risk_level: RiskLevel::Medium,
            budget: 100_000.0,
            max_assets,
            objective: None,
            constraints: None,
            include: None,
            exclude: None,
            qaoa_params: None,
        }
    }

    #[test]
    fn test_pick_assets_caps_at_universe() {
        let picked = pick_assets(&request(Dataset::Crypto50, 20));
        assert_eq!(picked.len(), 7);
        assert_eq!(picked[0], "Bitcoin");
    }

    #[test]
    fn test_pick_assets_honors_include_and_exclude() {
        let mut req = request(Dataset::Nifty50, 3);
        req.include = Some(vec!["ITC".to_string()]);
        req.exclude = Some(vec!["reliance".to_string()]);
        assert_eq!(pick_assets(&req), ["ITC", "HDFC Bank", "Infosys"]);
    }

    #[test]
    fn test_mock_payload_normalizes_cleanly() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let req = request(Dataset::Nasdaq100, 4);
        let raw = mock_optimize_payload(&req, &mut rng).expect("payload");
        assert_eq!(raw.dataset, "NASDAQ");
        assert_eq!(raw.budget, 4.0);
        assert_eq!(raw.total_investment, 100_000.0);

        let weight_sum: f64 = raw.portfolio.iter().map(|p| p.weight).sum();
        assert!((weight_sum - 1.0).abs() < 1e-9);
        for p in &raw.portfolio {
            let r = p.expected_return.expect("return");
            assert!((6.0..=18.0).contains(&r));
        }

        let out = mapper::normalize_optimize(raw, Utc::now()).expect("normalized");
        assert_eq!(out.selected.len(), 4);
        assert_eq!(out.weights.len(), 4);
        assert_eq!(out.allocation.len(), 4);
        assert_eq!(out.selected[0], "Apple");
    }

    #[test]
    fn test_everything_excluded_is_bad_request() {
        let mut req = request(Dataset::Nifty50, 2);
        req.exclude = Some(
            dataset_assets("nifty50")
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let err = mock_optimize_payload(&req, &mut rng).expect_err("nothing left");
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_mock_rebalance_shape() {
        let req = RebalanceRequest {
            dataset: "crypto".to_string(),
            budget: 3,
            risk: RiskLevel::High,
            total_investment: 20_000.0,
            time_horizon: 14,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let out = mock_rebalance(&req, Utc::now(), &mut rng);
        assert_eq!(out.dataset, "Crypto");
        assert!(out.current.is_empty() && out.future.is_empty() && out.actions.is_empty());
        assert_eq!(out.summary.mu_current, 8.5);
        assert_eq!(out.summary.mu_future, 11.0);
        assert_eq!(out.evolution.len(), 14);
    }
}
