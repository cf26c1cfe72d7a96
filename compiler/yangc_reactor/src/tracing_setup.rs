//! Opt-in tracing output for reactor runs.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG`, e.g.
/// `RUST_LOG=yangc_reactor::reactor=debug` for phase and round progress.
///
/// Does nothing when `RUST_LOG` is unset or a global subscriber already
/// exists. Later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).compact())
            .with(filter)
            .try_init();
    });
}
