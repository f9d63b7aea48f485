use crate::error::Result;
use crate::metrics;

pub async fn metrics_handler() -> Result<String> {
    Ok(metrics::render()?)
}
