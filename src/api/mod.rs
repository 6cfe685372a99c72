//! HTTP dispatch layer.
//!
//! Thin handlers: validate, hand off to the mapper/gateway or the synthetic
//! engine, serialize. Everything is mounted under `/api`.

pub mod compare;
pub mod demo;
pub mod health;
pub mod optimize;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::gateway::QuantumGateway;
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: QuantumGateway,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let gateway = QuantumGateway::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            gateway,
        })
    }
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/optimize", post(optimize::optimize))
        .route("/rebalance", post(optimize::rebalance))
        .route("/compare/accuracy", get(compare::accuracy))
        .route("/compare/risk-return", post(compare::risk_return))
        .route("/sharpe", get(demo::sharpe).post(demo::sharpe))
        .route("/frontier", post(demo::frontier))
        .route("/qaoa/bits", post(demo::qaoa_bits))
        .route("/allocation", post(demo::allocation))
        .route("/evolution", post(demo::evolution))
        .route("/stress", post(demo::stress))
        .route("/health", get(health::liveness))
        .route("/health/quantum", get(health::quantum))
}

/// Full application: `/api` routes, request logging and CORS.
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.allow_origin)?;
    Ok(Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
        .with_state(state))
}

/// `*` allows any origin; anything else must be a single exact origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(origin.trim())
        .with_context(|| format!("Invalid ALLOW_ORIGIN `{origin}`"))?;
    Ok(layer.allow_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origin_parsing() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000").is_ok());
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
