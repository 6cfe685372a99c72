//! Liveness and optimizer reachability.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::AppState;
use crate::gateway::HealthProbe;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuantumHealth {
    pub quantum_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Mock mode always reports healthy so the dashboard does not block.
pub async fn quantum(State(state): State<AppState>) -> Response {
    if state.config.mock_mode {
        let body = QuantumHealth {
            quantum_healthy: true,
            mode: Some("mock"),
            code: None,
            reason: None,
            time: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        return (StatusCode::OK, Json(body)).into_response();
    }
    let (status, body) = from_probe(state.gateway.health().await);
    (status, Json(body)).into_response()
}

fn from_probe(probe: HealthProbe) -> (StatusCode, QuantumHealth) {
    let unhealthy = |mode, code, reason| QuantumHealth {
        quantum_healthy: false,
        mode,
        code,
        reason,
        time: None,
    };
    match probe {
        HealthProbe::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            unhealthy(None, None, Some("QUANTUM_BASE_URL not set")),
        ),
        HealthProbe::Responded { code } if (200..300).contains(&code) => (
            StatusCode::OK,
            QuantumHealth {
                quantum_healthy: true,
                mode: Some("live"),
                code: Some(code),
                reason: None,
                time: None,
            },
        ),
        HealthProbe::Responded { code } => (
            StatusCode::SERVICE_UNAVAILABLE,
            unhealthy(Some("live"), Some(code), None),
        ),
        HealthProbe::Unreachable => (
            StatusCode::SERVICE_UNAVAILABLE,
            unhealthy(Some("live"), None, Some("timeout/unreachable")),
        ),
    }
}
