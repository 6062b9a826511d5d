//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "ROUTEMINE_LOG";

/// Filter used when `ROUTEMINE_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "routemine=info";

/// Initialize the routemine tracing/logging system.
///
/// Reads `ROUTEMINE_LOG` for per-module log levels, e.g.
/// `ROUTEMINE_LOG=routemine_analysis::patterns=debug,routemine_core=warn`.
///
/// Falls back to `routemine=info` if `ROUTEMINE_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
