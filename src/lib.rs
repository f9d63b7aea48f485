pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod router;
pub mod secrets;
pub mod state;
pub mod validator;
