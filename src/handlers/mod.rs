mod health;
mod keys;
mod metrics;
mod translate;
mod validated;

pub use health::health_handler;
pub use keys::keys_handler;
pub use metrics::metrics_handler;
pub use translate::translate_handler;
pub use validated::Validated;

use crate::error::ProxyError;

// method fallback for the proxy routes
pub async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}
