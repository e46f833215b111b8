use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Stores user preferences that drive period selection and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Day of the month on which a custom month begins (1-31).
    #[serde(default = "Config::default_start_day_of_month")]
    pub start_day_of_month: u32,
    /// `tracing` filter directive used when no `RUST_LOG` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            start_day_of_month: Self::default_start_day_of_month(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_start_day_of_month() -> u32 {
        1
    }

    /// Directory used when the caller does not supply one.
    pub fn default_base_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fintrack")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=31).contains(&self.start_day_of_month) {
            return Err(ConfigError::Invalid(format!(
                "start_day_of_month must be between 1 and 31, got {}",
                self.start_day_of_month
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }
}
