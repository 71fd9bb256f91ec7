// Application state module
// Immutable per-process state shared across connections

use super::types::Config;

/// Application state
///
/// The dataset itself is intentionally absent: every request re-reads the
/// CSV from disk, so the only shared state is the configuration.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}
