//! Diagnostic logging of the passes via `tracing`.

use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt};

/// The filter used if `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Install a subscriber printing events to stderr.
///
/// The events are filtered by the environment variable `RUST_LOG`, e.g.
/// `RUST_LOG=resolver=debug`. Repeated calls have no effect.
pub fn initialize() {
    static INITIALIZED: OnceLock<()> = OnceLock::new();

    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // Another subscriber may already be installed by the host.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    });
}
