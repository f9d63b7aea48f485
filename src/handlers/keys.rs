use axum::Json;
use axum::extract::{Path, State};
use chrono::SecondsFormat;
use std::sync::Arc;

use crate::error::{ProxyError, Result};
use crate::handlers::Validated;
use crate::metrics::REQUEST_TOTAL;
use crate::models::KeyResponse;
use crate::secrets::Service;
use crate::state::AppState;

// GET /api/keys/{service}
pub async fn keys_handler(
    validated: Validated,
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
) -> Result<Json<KeyResponse>> {
    REQUEST_TOTAL.with_label_values(&["keys"]).inc();

    let service: Service = service
        .parse()
        .map_err(|_| ProxyError::UnknownService(service))?;

    let api_key = state.secrets.get(service).ok_or_else(|| {
        tracing::error!(env = service.env_var(), "API key not configured");
        ProxyError::NotConfigured("Service not configured".to_string())
    })?;

    tracing::info!(
        %service,
        caller = validated.caller.as_deref().unwrap_or("-"),
        "API key provided"
    );

    Ok(Json(KeyResponse {
        api_key: api_key.to_string(),
        service: service.name().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
