//! fintrack-domain
//!
//! Pure value types: time ranges, period selections, accounts and money.
//! No I/O, no async, no storage.

pub mod account;
pub mod period;
pub mod time;
pub mod transaction;

pub use account::*;
pub use period::*;
pub use time::*;
pub use transaction::*;
