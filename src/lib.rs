#![doc(test(attr(deny(warnings))))]

//! fintrack tracks which window of time is selected, moves it forward and
//! backward, and turns "which window and which account" into balances.

pub mod app;
pub mod errors;
pub mod utils;

pub use app::FinTrack;
pub use errors::FinTrackError;
pub use fintrack_config;
pub use fintrack_core;
pub use fintrack_domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], using `directive` (usually `Config::log_filter`) when `RUST_LOG` is unset.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("fintrack tracing initialized.");
    });
}
