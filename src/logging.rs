use std::io;
use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Diagnostics go to stderr so they never mix with the child's stdout.
/// Warnings only by default; `--verbose` adds debug output.
pub(crate) fn level_for(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(level_for(verbose))
            .with_target(verbose)
            .without_time()
            .try_init();
    });
}
