use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const UNKNOWN_CLIENT: &str = "unknown";

// lossy so a stray non-ASCII byte does not hide the header
fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Best-effort client key used only for rate-limit bucketing.
///
/// Order: leftmost `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// transport peer address, then `"unknown"`. All of these are spoofable.
pub fn client_identity(headers: &HeaderMap, remote: Option<SocketAddr>) -> String {
    // X-Forwarded-For: client, proxy1, proxy2
    if let Some(first) = header_string(headers, "x-forwarded-for").and_then(|xff| {
        xff.split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }) {
        return first;
    }

    if let Some(real_ip) = header_string(headers, "x-real-ip") {
        return real_ip;
    }

    match remote {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}
