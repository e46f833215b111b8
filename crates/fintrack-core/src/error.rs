use fintrack_domain::{CurrencyCode, TimeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("start day of month must be between 1 and 31, got {0}")]
    InvalidStartDay(u32),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error("no exchange rate from {from} to {to}")]
    MissingRate { from: CurrencyCode, to: CurrencyCode },
    #[error("period store is no longer running")]
    StoreClosed,
    #[error("streams need a running tokio runtime")]
    NoRuntime,
}
