/// Configuration management for the market service
///
/// Loaded from environment variables with defaults suitable for local
/// development.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Demo/seed settings used by the smoke binary
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Service name used in log output
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Seed the demo marketplace (users, content, wallets) at startup
    pub seed_demo_data: bool,
    /// Simulated seconds between payment checkpoints in the demo run
    pub payment_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                name: std::env::var("MARKET_SERVICE_NAME")
                    .unwrap_or_else(|_| "market-service".to_string()),
            },
            demo: DemoConfig {
                seed_demo_data: parse_env_or_default("SEED_DEMO_DATA", true)?,
                payment_interval_secs: parse_env_or_default("PAYMENT_INTERVAL_SECS", 60)?,
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
