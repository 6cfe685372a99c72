//! HTTP client for the quantum optimizer service.
//!
//! Every call runs under a hard deadline. Failures are classified into
//! `upstream_timeout` or `upstream_unavailable`; nothing is retried.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{
    UpstreamOptimizeBody, UpstreamOptimizeResponse, UpstreamRebalanceBody,
    UpstreamRebalanceResponse,
};

const MISSING_BASE_URL: &str = "QUANTUM_BASE_URL not set";

/// Outcome of probing the optimizer's `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthProbe {
    NotConfigured,
    Responded { code: u16 },
    Unreachable,
}

#[derive(Clone)]
pub struct QuantumGateway {
    client: Client,
    base_url: Option<String>,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl QuantumGateway {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.quantum_api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))
                    .context("Invalid QUANTUM_API_KEY")?,
            );
        }
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .default_headers(headers)
            .build()
            .context("Failed to build optimizer HTTP client")?;

        Ok(Self {
            client,
            base_url: config.quantum_base_url.clone(),
            request_timeout: config.request_timeout,
            health_timeout: config.health_timeout,
        })
    }

    fn url(&self, path: &str) -> Option<String> {
        self.base_url.as_ref().map(|base| format!("{base}{path}"))
    }

    pub async fn optimize(
        &self,
        body: &UpstreamOptimizeBody,
    ) -> Result<UpstreamOptimizeResponse, ApiError> {
        self.post_json("/optimize", body).await
    }

    pub async fn rebalance(
        &self,
        body: &UpstreamRebalanceBody,
    ) -> Result<UpstreamRebalanceResponse, ApiError> {
        self.post_json("/rebalance", body).await
    }

    /// POST `body` and decode the reply. The deadline covers both sending and
    /// reading the body; elapsing drops the in-flight request.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .url(path)
            .ok_or_else(|| ApiError::UpstreamUnavailable(MISSING_BASE_URL.to_string()))?;
        let start = Instant::now();
        debug!(%url, "calling optimizer");

        let call = async {
            let resp = self.client.post(&url).json(body).send().await?;
            let status = resp.status().as_u16();
            let text = resp.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match tokio::time::timeout(self.request_timeout, call).await {
            Err(_) => {
                warn!(%url, timeout_ms = self.request_timeout.as_millis() as u64, "optimizer timed out");
                return Err(ApiError::UpstreamTimeout(format!(
                    "Quantum {path} timed out after {} ms",
                    self.request_timeout.as_millis()
                )));
            }
            Ok(Err(e)) => return Err(classify_transport(path, &e)),
            Ok(Ok(reply)) => reply,
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        if !(200..300).contains(&status) {
            warn!(%url, status, latency_ms, "optimizer returned an error status");
            return Err(classify_status(path, status, &text));
        }
        debug!(%url, status, latency_ms, "optimizer replied");

        serde_json::from_str(&text)
            .with_context(|| format!("Unexpected payload from optimizer {path}"))
            .map_err(ApiError::Internal)
    }

    pub async fn health(&self) -> HealthProbe {
        let Some(url) = self.url("/health") else {
            return HealthProbe::NotConfigured;
        };
        match tokio::time::timeout(self.health_timeout, self.client.get(&url).send()).await {
            Ok(Ok(resp)) => HealthProbe::Responded {
                code: resp.status().as_u16(),
            },
            Ok(Err(e)) => {
                debug!(%url, error = %e, "optimizer health probe failed");
                HealthProbe::Unreachable
            }
            Err(_) => {
                debug!(%url, "optimizer health probe timed out");
                HealthProbe::Unreachable
            }
        }
    }
}

fn classify_transport(path: &str, err: &reqwest::Error) -> ApiError {
    warn!(path, error = %err, "optimizer request failed");
    if err.is_timeout() {
        ApiError::UpstreamTimeout(format!("Quantum {path} request timed out"))
    } else {
        ApiError::UpstreamUnavailable(format!("Quantum {path} request failed: {err}"))
    }
}

/// A 504 from the optimizer is its own timeout; any other non-2xx is an outage.
fn classify_status(path: &str, status: u16, text: &str) -> ApiError {
    let detail = if text.is_empty() {
        "no body".to_string()
    } else {
        text.chars().take(500).collect()
    };
    let message = format!("Quantum {path} error {status}: {detail}");
    if status == 504 {
        ApiError::UpstreamTimeout(message)
    } else {
        ApiError::UpstreamUnavailable(message)
    }
}
