use axum::http::HeaderMap;
use axum::http::header::{AsHeaderName, HOST, ORIGIN, REFERER, USER_AGENT};
use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::root_domain;
use crate::error::ValidationError;
use crate::identity::client_identity;
use crate::rate_limit::RateLimiter;

// Non-ASCII bytes are kept (lossily) rather than treating the header as absent
fn header<'a>(headers: &'a HeaderMap, name: impl AsHeaderName) -> Option<Cow<'a, str>> {
    headers.get(name).map(|v| String::from_utf8_lossy(v.as_bytes()))
}

/// Same-site check: the root domain of `Origin` (or, failing that,
/// `Referer`) must equal the root domain of our own `Host`.
pub fn check_origin(headers: &HeaderMap) -> bool {
    let Some(host) = header(headers, HOST) else {
        return false;
    };
    let proxy_domain = root_domain(&host);

    if let Some(origin) = header(headers, ORIGIN) {
        if root_domain(&origin) == proxy_domain {
            return true;
        }
    }

    // referer as fallback
    if let Some(referer) = header(headers, REFERER) {
        if root_domain(&referer) == proxy_domain {
            return true;
        }
    }

    false
}

// "looks like a browser" heuristic
pub fn check_user_agent(headers: &HeaderMap) -> bool {
    headers
        .get(USER_AGENT)
        .is_some_and(|ua| ua.as_bytes().windows(7).any(|w| w == b"Mozilla"))
}

/// Runs origin, user-agent and rate-limit checks in that order; the first
/// failure wins. A request that passes has been counted against its client's
/// rate-limit window.
#[derive(Clone)]
pub struct RequestValidator {
    rate_limiter: Arc<RateLimiter>,
}

impl RequestValidator {
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        Self { rate_limiter }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn validate(
        &self,
        headers: &HeaderMap,
        remote: Option<SocketAddr>,
    ) -> Result<(), ValidationError> {
        if !check_origin(headers) {
            return Err(ValidationError::InvalidOrigin);
        }

        if !check_user_agent(headers) {
            return Err(ValidationError::InvalidUserAgent);
        }

        let identity = client_identity(headers, remote);
        if !self.rate_limiter.check(&identity) {
            return Err(ValidationError::RateLimitExceeded);
        }

        Ok(())
    }
}
