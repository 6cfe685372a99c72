//! Error taxonomy shared by every stage.
//!
//! Each failure carries a [`ErrorKind`] that the HTTP boundary maps to a
//! status code. One request produces at most one of these.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BadRequest,
    UpstreamTimeout,
    UpstreamUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::UpstreamTimeout => "upstream_timeout",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::Internal => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every field-level violation found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl fmt::Display) {
        self.issues.push(format!("{field}: {message}"));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.issues.join("; "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(ValidationErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    UpstreamTimeout(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::BadRequest(_) => ErrorKind::BadRequest,
            ApiError::UpstreamTimeout(_) => ErrorKind::UpstreamTimeout,
            ApiError::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (error, details) = match self {
            ApiError::Validation(errors) => (
                "Invalid request",
                Some(Details::List(errors.issues().to_vec())),
            ),
            ApiError::BadRequest(msg) => ("Bad request", Some(Details::Message(msg.clone()))),
            ApiError::UpstreamTimeout(msg) => (
                "Quantum service timed out",
                Some(Details::Message(msg.clone())),
            ),
            ApiError::UpstreamUnavailable(msg) => (
                "Quantum service unavailable",
                Some(Details::Message(msg.clone())),
            ),
            // Internal detail stays in the logs.
            ApiError::Internal(_) => ("Internal error", None),
        };
        ErrorEnvelope {
            error: error.to_string(),
            kind: self.kind(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Details {
    Message(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status();
        if status.is_server_error() {
            error!(kind = kind.as_str(), status = status.as_u16(), "{:#}", self);
        } else {
            warn!(kind = kind.as_str(), status = status.as_u16(), "{}", self);
        }
        (status, Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(ValidationErrors::new()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UpstreamTimeout("slow".into()).into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::UpstreamUnavailable("down".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_envelope_lists_every_issue() {
        let mut errors = ValidationErrors::new();
        errors.push("budget", "must be a positive finite number");
        errors.push("maxAssets", "is required");
        let envelope = ApiError::Validation(errors).envelope();
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["error"], "Invalid request");
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["details"].as_array().map(Vec::len), Some(2));
        assert!(json["details"][0].as_str().unwrap_or_default().contains("budget"));
    }

    #[test]
    fn test_internal_envelope_hides_detail() {
        let envelope = ApiError::from(anyhow::anyhow!("secret path")).envelope();
        assert_eq!(envelope.details, None);
        assert_eq!(envelope.kind, ErrorKind::Internal);
    }

    #[test]
    fn test_finish_passes_through_when_clean() {
        let ok = ValidationErrors::new().finish(|| 7).expect("clean");
        assert_eq!(ok, 7);
    }
}
