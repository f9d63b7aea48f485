use clap::Parser;
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_TRANSLATE_URL: &str = "https://api-free.deepl.com/v2/translate";

// CLI argument structure
// API keys are not flags; they come from the environment (see secrets.rs)
#[derive(Parser, Debug, Clone)]
#[command(name = "api-key-proxy")]
#[command(about = "Same-domain proxy that keeps third-party API keys off the browser")]
pub struct Args {
    // Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    // Port to run the server on
    #[arg(short, long, default_value_t = 3001)]
    pub port: u16,

    // Translation endpoint requests are forwarded to
    #[arg(long, default_value = DEFAULT_TRANSLATE_URL)]
    pub translate_url: String,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,
}

impl Args {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}
