mod app;
mod cli;
pub(crate) mod bundle;
pub(crate) mod config;
pub(crate) mod detect;
pub(crate) mod dispatch;
pub(crate) mod logging;
pub(crate) mod model;
pub(crate) mod resolve;

use std::path::Path;

pub use crate::cli::{Cli, Command};
pub use crate::config::ProjectConfig;
pub use crate::dispatch::{Dispatcher, ProcessDispatcher, RecordingDispatcher};
pub use crate::logging::init_logging;
pub use crate::model::{FrameworkKind, Invocation, Toolchain};
pub use crate::resolve::ResolveError;

pub fn run(cli: Cli) -> anyhow::Result<i32> {
    app::run(cli)
}

/// Like [`run`], with the working directory, extraction cache and launcher
/// supplied by the caller.
pub fn run_in(
    cli: Cli,
    cwd: &Path,
    cache_dir: &Path,
    dispatcher: &dyn Dispatcher,
) -> anyhow::Result<i32> {
    app::run_in(cli, cwd, cache_dir, dispatcher)
}

pub fn detect_framework(root: &Path) -> FrameworkKind {
    detect::detect_framework(root)
}
