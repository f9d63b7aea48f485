use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{MethodRouter, get, post};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers::{
    health_handler, keys_handler, method_not_allowed, metrics_handler, translate_handler,
};
use crate::state::AppState;

pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/keys/{service}",
            proxy_route(get(keys_handler), Method::GET, "GET, OPTIONS"),
        )
        .route(
            "/api/translate",
            proxy_route(post(translate_handler), Method::POST, "POST, OPTIONS"),
        )
        .with_state(state)
}

// Browser-facing route. CorsLayer echoes the caller's Origin and answers every
// OPTIONS itself; other methods get a JSON 405. Allow-Methods/Allow-Headers
// go on every response, not only preflights.
fn proxy_route(
    route: MethodRouter<Arc<AppState>>,
    method: Method,
    allow_methods: &'static str,
) -> MethodRouter<Arc<AppState>> {
    route
        .fallback(method_not_allowed)
        .layer::<_, std::convert::Infallible>(cors_layer(method))
        .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(allow_methods),
        ))
        .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

fn cors_layer(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
