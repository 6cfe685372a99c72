//! Equity paths for the rebalance and evolution charts.

use rand::Rng;

use crate::models::{
    EquityEvolutionRequest, EquityPoint, EvolutionPoint, RebalanceRequest, RebalanceSummary,
};

pub const TRADING_DAYS_PER_MONTH: f64 = 22.0;

const MIN_DAYS: u32 = 5;
const MIN_START: f64 = 1_000.0;
const DAILY_JITTER: f64 = 0.001;
const CLASSICAL_HEADSTART: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    pub days: u32,
    pub start: f64,
    /// Monthly percent return.
    pub mu_current: f64,
    pub mu_future: f64,
}

impl EvolutionParams {
    pub fn for_request(req: &RebalanceRequest, summary: RebalanceSummary) -> Self {
        Self {
            days: req.time_horizon,
            start: req.total_investment,
            mu_current: summary.mu_current,
            mu_future: summary.mu_future,
        }
    }
}

/// Day-by-day Current/Future equity for a rebalance, compounding the
/// monthly returns at a daily rate plus a small jitter.
pub fn synth_evolution<R: Rng>(params: EvolutionParams, rng: &mut R) -> Vec<EvolutionPoint> {
    let n = params.days.max(MIN_DAYS);
    let start = params.start.max(MIN_START);
    let cur_day = params.mu_current / 100.0 / TRADING_DAYS_PER_MONTH;
    let fut_day = params.mu_future / 100.0 / TRADING_DAYS_PER_MONTH;

    let mut cur = start;
    let mut fut = start;
    (1..=n)
        .map(|i| {
            cur *= 1.0 + cur_day + rng.gen_range(-DAILY_JITTER..DAILY_JITTER);
            fut *= 1.0 + fut_day + rng.gen_range(-DAILY_JITTER..DAILY_JITTER);
            EvolutionPoint {
                time: format!("Day {i}"),
                current: cur.round() as i64,
                future: fut.round() as i64,
            }
        })
        .collect()
}

/// Quantum vs classical growth paths; classical starts 5% behind.
pub fn equity_evolution<R: Rng>(req: &EquityEvolutionRequest, rng: &mut R) -> Vec<EquityPoint> {
    let mut quantum = req.initial_equity;
    let mut classical = req.initial_equity * CLASSICAL_HEADSTART;
    (1..=req.time_horizon)
        .map(|i| {
            quantum *= 1.0 + rng.gen_range(-0.01..0.03);
            classical *= 1.0 + rng.gen_range(-0.01..0.02);
            EquityPoint {
                time: format!("Day {i}"),
                quantum: quantum.round() as i64,
                classical: classical.round() as i64,
            }
        })
        .collect()
}
