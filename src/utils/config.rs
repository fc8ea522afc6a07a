use std::env::var;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_FLUTTERWAVE_BASE_URL: &str = "https://api.flutterwave.com/v3";
pub const DEFAULT_FLUTTERWAVE_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for env {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Process configuration read once at boot.
///
/// The provider secret is not stored here. It is looked up on every call,
/// see [`crate::utils::flutterwave::FLUTTERWAVE_SECRET_KEY`].
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub flutterwave_base_url: String,
    pub flutterwave_timeout: Duration,
}

impl EnvConfig {
    pub fn init() -> Result<EnvConfig, ConfigError> {
        Ok(EnvConfig {
            app_name: var("APP_NAME").unwrap_or(String::from("virtual-account-v1")),
            host: var("HOST").unwrap_or(String::from("0.0.0.0")),
            port: parse_env("PORT", 8080)?,
            flutterwave_base_url: var("FLUTTERWAVE_BASE_URL")
                .unwrap_or(String::from(DEFAULT_FLUTTERWAVE_BASE_URL)),
            flutterwave_timeout: Duration::from_secs(parse_env(
                "FLUTTERWAVE_TIMEOUT_SECS",
                DEFAULT_FLUTTERWAVE_TIMEOUT_SECS,
            )?),
        })
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}
