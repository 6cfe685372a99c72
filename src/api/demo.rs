//! Demo analytics. None of these have a live backend.

use axum::{extract::State, Json};

use super::AppState;
use crate::models::{
    EquityEvolutionRequest, EquityPoint, FrontierPoint, NamedValue, QaoaBitstring, StressRequest,
    StressResult,
};
use crate::synth::{demo, evolution, stress as stress_test};
use crate::validate::{AllocationRequest, FrontierRequest, Validated};

/// Optional artificial latency so dashboard loaders are visible.
async fn pause(state: &AppState) {
    if !state.config.demo_latency.is_zero() {
        tokio::time::sleep(state.config.demo_latency).await;
    }
}

pub async fn sharpe(State(state): State<AppState>) -> Json<Vec<NamedValue<f64>>> {
    pause(&state).await;
    Json(demo::sharpe_comparison())
}

pub async fn frontier(
    State(state): State<AppState>,
    Validated(req): Validated<FrontierRequest>,
) -> Json<Vec<FrontierPoint>> {
    pause(&state).await;
    Json(demo::efficient_frontier(req.risk_level))
}

pub async fn qaoa_bits(State(state): State<AppState>) -> Json<Vec<QaoaBitstring>> {
    pause(&state).await;
    Json(demo::qaoa_bitstrings())
}

pub async fn allocation(
    State(state): State<AppState>,
    Validated(req): Validated<AllocationRequest>,
) -> Json<Vec<NamedValue<i64>>> {
    pause(&state).await;
    Json(demo::allocation(&req.dataset, &mut rand::thread_rng()))
}

pub async fn evolution(
    State(state): State<AppState>,
    Validated(req): Validated<EquityEvolutionRequest>,
) -> Json<Vec<EquityPoint>> {
    pause(&state).await;
    Json(evolution::equity_evolution(&req, &mut rand::thread_rng()))
}

pub async fn stress(
    State(state): State<AppState>,
    Validated(req): Validated<StressRequest>,
) -> Json<StressResult> {
    pause(&state).await;
    Json(stress_test::run_stress(&req))
}
