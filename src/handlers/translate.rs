use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ProxyError, Result};
use crate::handlers::Validated;
use crate::metrics::{REQUEST_TOTAL, UPSTREAM_LATENCY};
use crate::models::TranslateRequest;
use crate::secrets::Service;
use crate::state::AppState;

// POST /api/translate
pub async fn translate_handler(
    validated: Validated,
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    REQUEST_TOTAL.with_label_values(&["translate"]).inc();

    let api_key = state.secrets.get(Service::DeepL).ok_or_else(|| {
        tracing::error!(env = Service::DeepL.env_var(), "API key not configured");
        ProxyError::NotConfigured("Translation service not configured".to_string())
    })?;

    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "unreadable translate body");
        ProxyError::BadRequest("Invalid JSON body".to_string())
    })?;
    let body = payload
        .into_upstream()
        .map_err(|msg| ProxyError::BadRequest(msg.to_string()))?;

    let start_time = Instant::now();

    let res = state
        .client
        .post(&state.translate_url)
        .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
        .json(&body)
        .send()
        .await?;

    UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let status = res.status();
    if !status.is_success() {
        let error_text = res.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %error_text, "translation API error");
        return Err(ProxyError::Upstream(status));
    }

    let translation: serde_json::Value = res.json().await?;

    tracing::info!(
        caller = validated.caller.as_deref().unwrap_or("-"),
        "translation completed"
    );

    Ok(Json(translation))
}
