//! fintrack-core
//!
//! Period selection, period navigation and balance aggregation.
//! Depends on fintrack-domain. No terminal I/O, no persistence.

pub mod balance;
pub mod combine;
pub mod error;
pub mod monthly;
pub mod months;
pub mod period_event;
pub mod settings;
pub mod shift;
pub mod stats;
pub mod store;
pub mod time;

pub use balance::*;
pub use combine::LatestCombiner;
pub use error::CoreError;
pub use monthly::*;
pub use months::*;
pub use period_event::*;
pub use settings::SettingsFlow;
pub use shift::*;
pub use stats::*;
pub use store::*;
pub use time::*;
