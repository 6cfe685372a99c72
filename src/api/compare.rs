//! Quantum vs classical comparison endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{AccuracyComparison, RiskLevel, RiskReturnRequest, RiskReturnResponse};
use crate::synth::compare;
use crate::validate::Validated;

#[derive(Debug, Deserialize)]
pub struct AccuracyQuery {
    pub risk: Option<String>,
}

/// `GET /compare/accuracy?risk=low|medium|high`
///
/// Exact tokens only; anything else reads as medium. A query string that
/// fails to decode is a `bad_request`.
pub async fn accuracy(
    query: Result<Query<AccuracyQuery>, QueryRejection>,
) -> Result<Json<AccuracyComparison>, ApiError> {
    let Query(q) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let risk = q
        .risk
        .as_deref()
        .and_then(RiskLevel::parse)
        .unwrap_or_default();
    Ok(Json(compare::accuracy(risk)))
}

/// `POST /compare/risk-return`
pub async fn risk_return(Validated(req): Validated<RiskReturnRequest>) -> Json<RiskReturnResponse> {
    Json(compare::risk_return(&req, &mut rand::thread_rng()))
}
