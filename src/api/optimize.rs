//! Optimize and rebalance: proxied to the optimizer, or synthesized in mock mode.

use anyhow::Context;
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use super::AppState;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::mapper;
use crate::models::{
    NormalizedOptimizeResult, OptimizeRequest, RebalanceRequest, RebalanceResult,
    UpstreamOptimizeResponse, UpstreamRebalanceResponse,
};
use crate::synth::mock;
use crate::validate::Validated;

pub async fn optimize(
    State(state): State<AppState>,
    Validated(req): Validated<OptimizeRequest>,
) -> Result<Json<NormalizedOptimizeResult>, ApiError> {
    let raw = if state.config.mock_mode {
        mock_optimize_payload(&state.config, &req).await?
    } else {
        state.gateway.optimize(&mapper::optimize_body(&req)).await?
    };
    let result = mapper::normalize_optimize(raw, Utc::now())?;

    info!(
        mode = state.config.mode(),
        dataset = req.dataset.as_str(),
        assets = result.selected.len(),
        "optimize completed"
    );
    Ok(Json(result))
}

/// Payload file when configured, otherwise a synthesized portfolio.
async fn mock_optimize_payload(
    config: &AppConfig,
    req: &OptimizeRequest,
) -> Result<UpstreamOptimizeResponse, ApiError> {
    let Some(path) = &config.mock_optimize_payload else {
        return synthesize_optimize(req);
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read mock payload {}", path.display()))?;
    let raw = serde_json::from_str(&text)
        .with_context(|| format!("Mock payload {} is not an optimize response", path.display()))?;
    Ok(raw)
}

fn synthesize_optimize(req: &OptimizeRequest) -> Result<UpstreamOptimizeResponse, ApiError> {
    mock::mock_optimize_payload(req, &mut rand::thread_rng())
}

pub async fn rebalance(
    State(state): State<AppState>,
    Validated(req): Validated<RebalanceRequest>,
) -> Result<Json<RebalanceResult>, ApiError> {
    let result = if state.config.mock_mode {
        mock_rebalance(&req)
    } else {
        let raw = state.gateway.rebalance(&mapper::rebalance_body(&req)).await?;
        normalize_rebalance(raw, &req)
    };

    info!(
        mode = state.config.mode(),
        dataset = %result.dataset,
        days = result.evolution.len(),
        "rebalance completed"
    );
    Ok(Json(result))
}

fn mock_rebalance(req: &RebalanceRequest) -> RebalanceResult {
    mock::mock_rebalance(req, Utc::now(), &mut rand::thread_rng())
}

fn normalize_rebalance(raw: UpstreamRebalanceResponse, req: &RebalanceRequest) -> RebalanceResult {
    mapper::normalize_rebalance(raw, req, Utc::now(), &mut rand::thread_rng())
}
