use std::sync::Arc;
use std::time::Duration;

use crate::rate_limit::RateLimiter;
use crate::secrets::Secrets;
use crate::validator::RequestValidator;

// app's shared state
pub struct AppState {
    pub client: reqwest::Client,
    pub validator: RequestValidator,
    pub secrets: Secrets,
    pub translate_url: String, // upstream translation endpoint
}

impl AppState {
    pub fn new(
        secrets: Secrets,
        translate_url: String,
        rate_limiter: Arc<RateLimiter>,
        upstream_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()?;

        Ok(Self {
            client,
            validator: RequestValidator::new(rate_limiter),
            secrets,
            translate_url,
        })
    }
}
