use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{ORIGIN, REFERER};
use axum::http::request::Parts;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::ProxyError;
use crate::identity::client_identity;
use crate::metrics::REJECTIONS_TOTAL;
use crate::state::AppState;

/// Proof that the request passed origin, user-agent and rate-limit checks.
///
/// Put it first in a handler's argument list so nothing else runs for a
/// rejected request.
#[derive(Debug, Clone)]
pub struct Validated {
    // Origin, else Referer; used for logging only
    pub caller: Option<String>,
}

impl FromRequestParts<Arc<AppState>> for Validated {
    type Rejection = ProxyError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // absent when served without into_make_service_with_connect_info
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        if let Err(e) = state.validator.validate(&parts.headers, remote) {
            REJECTIONS_TOTAL.with_label_values(&[e.reason()]).inc();
            tracing::warn!(
                reason = e.reason(),
                client = %client_identity(&parts.headers, remote),
                "request rejected"
            );
            return Err(e.into());
        }

        let caller = parts
            .headers
            .get(ORIGIN)
            .or_else(|| parts.headers.get(REFERER))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Validated { caller })
    }
}
