use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::cli::Command;
use crate::config::{DEFAULT_PORT, ProjectConfig};
use crate::detect::detect_framework;
use crate::model::{Invocation, Toolchain};

/// User-facing resolution failures. Nothing is launched when one occurs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{hint} not found: {}", .path.display())]
    MissingLocalFile { path: PathBuf, hint: &'static str },

    #[error("unsupported framework: {name} (expected one of: laravel, symfony, codeigniter)")]
    UnsupportedFramework { name: String },
}

pub(crate) struct ResolveContext<'a> {
    pub(crate) cwd: &'a Path,
    pub(crate) config: &'a ProjectConfig,
    pub(crate) toolchain: &'a Toolchain,
}

const SCAFFOLD_PACKAGES: &[(&str, &str)] = &[
    ("laravel", "laravel/laravel"),
    ("symfony", "symfony/skeleton"),
    ("codeigniter", "codeigniter4/appstarter"),
];

pub(crate) fn resolve(
    command: &Command,
    ctx: &ResolveContext<'_>,
) -> Result<Invocation, ResolveError> {
    let args: Vec<OsString> = match command {
        Command::Run { script } => {
            require_file(ctx.cwd, script, "PHP script")?;
            vec![script.clone().into_os_string()]
        }
        Command::Serve { port } => {
            let framework = detect_framework(ctx.cwd);
            let port = resolve_port(port.as_deref(), ctx.config);
            vec![
                "-S".into(),
                format!("localhost:{port}").into(),
                framework.serve_entry().into(),
            ]
        }
        Command::Composer { args } => {
            with_entry(ctx.toolchain.composer.clone().into_os_string(), args)
        }
        Command::Laravel { args } => {
            require_file(ctx.cwd, Path::new("artisan"), "Laravel artisan script")?;
            with_entry("artisan".into(), args)
        }
        Command::Symfony { args } => {
            require_file(ctx.cwd, Path::new("bin/console"), "Symfony console script")?;
            with_entry("bin/console".into(), args)
        }
        Command::Ci { args } => {
            require_file(ctx.cwd, Path::new("spark"), "CodeIgniter spark script")?;
            with_entry("spark".into(), args)
        }
        Command::Init { framework } => {
            let package = scaffold_package(framework)?;
            vec![
                ctx.toolchain.composer.clone().into_os_string(),
                "create-project".into(),
                package.into(),
                ".".into(),
            ]
        }
    };

    let invocation = Invocation {
        program: ctx.toolchain.interpreter.clone(),
        args,
        working_dir: ctx.cwd.to_path_buf(),
    };
    debug!(?invocation, "resolved invocation");
    Ok(invocation)
}

/// `--port` beats the config file, which beats the built-in default.
pub(crate) fn resolve_port(flag: Option<&str>, config: &ProjectConfig) -> String {
    flag.map(str::to_owned)
        .or_else(|| config.port())
        .unwrap_or_else(|| DEFAULT_PORT.to_owned())
}

pub(crate) fn scaffold_package(framework: &str) -> Result<&'static str, ResolveError> {
    let wanted = framework.trim().to_ascii_lowercase();
    SCAFFOLD_PACKAGES
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, package)| *package)
        .ok_or_else(|| ResolveError::UnsupportedFramework {
            name: framework.to_owned(),
        })
}

fn with_entry(entry: OsString, rest: &[String]) -> Vec<OsString> {
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(entry);
    args.extend(rest.iter().map(OsString::from));
    args
}

fn require_file(cwd: &Path, rel: &Path, hint: &'static str) -> Result<(), ResolveError> {
    let path = cwd.join(rel);
    if fs::metadata(&path).is_ok_and(|meta| meta.is_file()) {
        Ok(())
    } else {
        Err(ResolveError::MissingLocalFile { path, hint })
    }
}
