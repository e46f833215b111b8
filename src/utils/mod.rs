use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_DIRECTIVE: &str = "fintrack=info";

/// Installs the global tracing subscriber once.
///
/// `RUST_LOG` wins; otherwise `directive` (or [`DEFAULT_LOG_DIRECTIVE`]) is used.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let directive = directive.unwrap_or(DEFAULT_LOG_DIRECTIVE);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        // Another subscriber may already be installed by the embedding application.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
