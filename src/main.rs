use api_key_proxy::config::Args;
use api_key_proxy::rate_limit::{RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_MS, RateLimiter};
use api_key_proxy::router;
use api_key_proxy::secrets::Secrets;
use api_key_proxy::state::AppState;
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run(Args::parse()).await {
        tracing::error!(error = %e, "proxy exited");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let secrets = Secrets::from_env();
    // one limiter for the whole process, shared by both proxy routes
    let rate_limiter = Arc::new(RateLimiter::new());

    let state = Arc::new(AppState::new(
        secrets,
        args.translate_url.clone(),
        rate_limiter,
        args.upstream_timeout(),
    )?);

    let app = router::build(Arc::clone(&state));

    let addr = SocketAddr::from((args.host, args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API key proxy running on http://{}", addr);
    tracing::info!("Forwarding translations to {}", args.translate_url);
    tracing::info!(
        "Rate limit: {} requests per {} seconds",
        RATE_LIMIT_MAX,
        RATE_LIMIT_WINDOW_MS / 1000
    );
    let configured: Vec<String> = state.secrets.configured().map(|s| s.to_string()).collect();
    tracing::info!(services = ?configured, "API keys loaded");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
