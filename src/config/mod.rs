//! Configuration for the VUSD console
//!
//! Loads configuration from environment variables once at startup. The
//! resulting `Config` is passed down explicitly to the API client and the
//! orchestrators; no module reads ambient constants.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the lending backend REST API
    pub api_base_url: String,

    /// Default Algorand wallet address used when none is supplied
    pub default_wallet: String,

    /// Publishable key for the payment provider. Not consumed by this crate:
    /// it is carried for `PaymentProvider` implementations that drive the
    /// external payment widget, which needs it at initialization.
    pub publishable_key: Option<String>,

    /// Currency for payment intents (minor units on the wire)
    pub currency: String,

    /// Delay between re-checks while a confirmed payment is still processing
    pub processing_recheck: Duration,

    /// Interval for payment/verification status polling
    pub status_poll_interval: Duration,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

/// Fallback wallet address shipped with the original dashboard
pub const DEFAULT_WALLET: &str = "QW5L3VD2RIFAKB33I6DCQAMZUSYSS2B5IW4GBQM7T7KSJWANU3ONHUFMTI";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("VUSD_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

        let default_wallet =
            env::var("VUSD_DEFAULT_WALLET").unwrap_or_else(|_| DEFAULT_WALLET.to_string());

        let publishable_key = env::var("VUSD_PUBLISHABLE_KEY").ok();

        let currency = env::var("VUSD_CURRENCY").unwrap_or_else(|_| "usd".to_string());

        let processing_recheck = parse_millis("VUSD_PROCESSING_RECHECK_MS", 2_000)?;
        let status_poll_interval = parse_millis("VUSD_STATUS_POLL_MS", 5_000)?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            default_wallet,
            publishable_key,
            currency,
            processing_recheck,
            status_poll_interval,
            log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000".to_string(),
            default_wallet: DEFAULT_WALLET.to_string(),
            publishable_key: None,
            currency: "usd".to_string(),
            processing_recheck: Duration::from_secs(2),
            status_poll_interval: Duration::from_secs(5),
            log_level: "info".to_string(),
        }
    }
}

fn parse_millis(var: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let ms = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw))?;
            Ok(Duration::from_millis(ms))
        }
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}
