use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::secrets::Service;

/// Why a request was turned away by the validator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid origin")]
    InvalidOrigin,

    #[error("Invalid user agent")]
    InvalidUserAgent,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::InvalidOrigin | ValidationError::InvalidUserAgent => {
                StatusCode::FORBIDDEN
            }
            ValidationError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    // metrics label
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidOrigin => "invalid_origin",
            ValidationError::InvalidUserAgent => "invalid_user_agent",
            ValidationError::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid service: {0}")]
    UnknownService(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("Translation failed: {}", .0.as_u16())]
    Upstream(StatusCode),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Internal(e.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ProxyError::Validation(e) => match e {
                ValidationError::RateLimitExceeded => (e.status(), "Too many requests".to_string()),
                _ => (e.status(), "Forbidden".to_string()),
            },
            ProxyError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            ProxyError::UnknownService(_) => {
                let supported: Vec<&str> = Service::ALL.iter().map(|s| s.name()).collect();
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid service", "supported": supported })),
                )
                    .into_response();
            }
            ProxyError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ProxyError::NotConfigured(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ProxyError::Upstream(status) => (*status, self.to_string()),
            ProxyError::Metrics(e) => {
                tracing::error!(error = %e, "metrics encoding failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ProxyError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ProxyError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn validation_status_mapping() {
        assert_eq!(ValidationError::InvalidOrigin.status(), StatusCode::FORBIDDEN);
        assert_eq!(ValidationError::InvalidUserAgent.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ValidationError::RateLimitExceeded.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn forbidden_body_hides_reason() {
        let (status, json) = body_json(ValidationError::InvalidUserAgent.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Forbidden");
    }

    #[tokio::test]
    async fn rate_limited_body() {
        let (status, json) = body_json(ValidationError::RateLimitExceeded.into()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"], "Too many requests");
    }

    #[tokio::test]
    async fn unknown_service_lists_supported() {
        let (status, json) = body_json(ProxyError::UnknownService("openai".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid service");
        assert_eq!(json["supported"], json!(["assemblyai", "deepl", "gemini"]));
    }

    #[tokio::test]
    async fn upstream_status_is_relayed() {
        let (status, json) = body_json(ProxyError::Upstream(StatusCode::FORBIDDEN)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Translation failed: 403");
    }

    #[tokio::test]
    async fn metrics_failure_is_opaque() {
        let err = prometheus::Error::Msg("bad family".into());
        let (status, json) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn internal_detail_not_exposed() {
        let (status, json) = body_json(ProxyError::Internal("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
    }
}
