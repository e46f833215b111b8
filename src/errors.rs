use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use thiserror::Error;

/// Error type for application-level wiring.
#[derive(Debug, Error)]
pub enum FinTrackError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}
