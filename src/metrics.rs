use lazy_static::lazy_static;
use prometheus::{
    Gauge, Histogram, IntCounterVec, TextEncoder, register_gauge, register_histogram,
    register_int_counter_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "proxy_requests_total",
        "Total number of proxied requests",
        &["endpoint"]
    )
    .unwrap();
    pub static ref REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "proxy_rejections_total",
        "Requests rejected by validation",
        &["reason"]
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "proxy_upstream_latency_seconds",
        "Upstream translation latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge = register_gauge!(
        "proxy_rate_limit_entries",
        "Rate limit buckets left after the last cleanup"
    )
    .unwrap();
}

// Prometheus text exposition of the default registry
pub fn render() -> prometheus::Result<String> {
    TextEncoder::new().encode_to_string(&prometheus::gather())
}
