use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::bundle::{Bundle, cached_toolchain};
use crate::cli::Cli;
use crate::config::load_project_config;
use crate::dispatch::{Dispatcher, ProcessDispatcher};
use crate::resolve::{ResolveContext, resolve};

pub(crate) fn run(cli: Cli) -> Result<i32> {
    let cwd = env::current_dir().context("failed to resolve current directory")?;
    run_in(cli, &cwd, &env::temp_dir(), &ProcessDispatcher)
}

pub(crate) fn run_in(
    cli: Cli,
    cwd: &Path,
    cache_dir: &Path,
    dispatcher: &dyn Dispatcher,
) -> Result<i32> {
    debug!(command = ?cli.command, cwd = %cwd.display(), "starting");

    let load = load_project_config(cwd);
    if let Some(diagnostic) = &load.diagnostic {
        warn!("{diagnostic}");
    }
    let config = load.config;
    let toolchain = cached_toolchain(cache_dir);
    let ctx = ResolveContext {
        cwd,
        config: &config,
        toolchain: &toolchain,
    };

    let invocation = match resolve(&cli.command, &ctx) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(1);
        }
    };

    if cli.dry_run {
        println!("would run: {}", invocation.display_line());
        return Ok(0);
    }

    let bundle = Bundle::locate(cli.bundle_dir.as_deref())?;
    bundle.install(cache_dir)?;
    dispatcher.execute(&invocation)
}
