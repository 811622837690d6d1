use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, anyhow};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::model::Toolchain;

pub(crate) const CACHE_PREFIX: &str = "phpwrap-";
pub(crate) const COMPOSER_FILE_NAME: &str = "composer.phar";

pub(crate) const fn interpreter_file_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "php-mac"
    } else if cfg!(windows) {
        "php-win.exe"
    } else {
        "php-linux"
    }
}

/// Directory the interpreter and composer.phar ship in.
#[derive(Debug, Clone)]
pub(crate) struct Bundle {
    root: PathBuf,
}

impl Bundle {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Uses `explicit` when given, else `bin/` beside or one level above the
    /// running executable.
    pub(crate) fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            if !dir.is_dir() {
                return Err(anyhow!("bundle directory not found: {}", dir.display()));
            }
            return Ok(Self::new(dir.to_path_buf()));
        }

        let exe = env::current_exe().context("failed to resolve current executable")?;
        let exe_dir = exe
            .parent()
            .ok_or_else(|| anyhow!("executable has no parent directory: {}", exe.display()))?;
        let candidates = [exe_dir.join("..").join("bin"), exe_dir.join("bin")];
        candidates
            .iter()
            .find(|dir| dir.join(interpreter_file_name()).is_file())
            .map(|dir| Self::new(dir.clone()))
            .ok_or_else(|| {
                anyhow!(
                    "bundled {} not found near {} (use --bundle-dir)",
                    interpreter_file_name(),
                    exe_dir.display()
                )
            })
    }

    /// Extracts both binaries into `cache_dir`, reusing earlier extractions.
    pub(crate) fn install(&self, cache_dir: &Path) -> Result<Toolchain> {
        let interpreter = extract_cached(&self.root.join(interpreter_file_name()), cache_dir)?;
        let composer = extract_cached(&self.root.join(COMPOSER_FILE_NAME), cache_dir)?;
        Ok(Toolchain {
            interpreter,
            composer,
        })
    }
}

/// Where the extracted binaries live in `cache_dir`. Computing this touches
/// nothing on disk.
pub(crate) fn cached_toolchain(cache_dir: &Path) -> Toolchain {
    Toolchain {
        interpreter: cache_path(cache_dir, interpreter_file_name()),
        composer: cache_path(cache_dir, COMPOSER_FILE_NAME),
    }
}

fn cache_path(cache_dir: &Path, file_name: &str) -> PathBuf {
    cache_dir.join(format!("{CACHE_PREFIX}{file_name}"))
}

/// Copies `source` to `<cache_dir>/phpwrap-<name>` unless it is already there.
/// The copy is written beside the target and renamed into place so readers
/// never observe a partial file.
pub(crate) fn extract_cached(source: &Path, cache_dir: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("bundled file has no name: {}", source.display()))?;
    let target = cache_path(cache_dir, &file_name);

    if target.exists() {
        debug!("using cached {}", target.display());
        return Ok(target);
    }

    let source_meta = fs::metadata(source)
        .with_context(|| format!("failed to inspect bundled file {}", source.display()))?;
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("failed to create cache directory {}", cache_dir.display()))?;
    check_disk_space(cache_dir, source_meta.len())?;

    let staging = cache_dir.join(format!(".{CACHE_PREFIX}{file_name}.{}.tmp", process::id()));
    if let Err(err) = stage_copy(source, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    match fs::rename(&staging, &target) {
        Ok(()) => {
            info!("extracted {} to {}", file_name, target.display());
            Ok(target)
        }
        Err(_) if target.exists() => {
            // Another process placed the same file first.
            let _ = fs::remove_file(&staging);
            Ok(target)
        }
        Err(err) => {
            let _ = fs::remove_file(&staging);
            Err(err).with_context(|| {
                format!(
                    "failed to move {} into place at {}",
                    staging.display(),
                    target.display()
                )
            })
        }
    }
}

fn stage_copy(source: &Path, staging: &Path) -> Result<()> {
    fs::copy(source, staging).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            staging.display()
        )
    })?;

    let expected = calculate_sha256(source)?;
    let actual = calculate_sha256(staging)?;
    if expected != actual {
        return Err(anyhow!(
            "checksum mismatch after copying {}: expected {expected}, got {actual}",
            source.display()
        ));
    }

    #[cfg(unix)]
    {
        let mut permissions = fs::metadata(staging)
            .with_context(|| format!("failed to stat {}", staging.display()))?
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(staging, permissions)
            .with_context(|| format!("failed to set executable bit: {}", staging.display()))?;
    }

    Ok(())
}

pub(crate) fn calculate_sha256(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open file for hashing {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut reader = std::io::BufReader::new(file);

    std::io::copy(&mut reader, &mut hasher)
        .with_context(|| format!("failed to read file for hashing {}", path.display()))?;

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(unix)]
fn check_disk_space(dir: &Path, required_bytes: u64) -> Result<()> {
    use std::ffi::CString;

    let path_cstr = CString::new(dir.to_string_lossy().as_bytes())
        .map_err(|_| anyhow!("invalid path for disk space check"))?;

    let stat = unsafe {
        let mut stat_buf = std::mem::MaybeUninit::<libc::statfs>::uninit();
        if libc::statfs(path_cstr.as_ptr(), stat_buf.as_mut_ptr()) != 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Unsupported {
                return Ok(());
            }
            return Err(anyhow!(
                "failed to check disk space for {}: {err}",
                dir.display()
            ));
        }
        stat_buf.assume_init()
    };

    let available_bytes = available_space(stat.f_bavail as u64, stat.f_bsize as u64);
    if available_bytes < required_bytes {
        return Err(anyhow!(
            "insufficient disk space in {}: required={} bytes, available={} bytes",
            dir.display(),
            required_bytes,
            available_bytes
        ));
    }

    Ok(())
}

fn available_space(free_blocks: u64, block_size: u64) -> u64 {
    free_blocks.saturating_mul(block_size)
}

#[cfg(not(unix))]
fn check_disk_space(_dir: &Path, _required_bytes: u64) -> Result<()> {
    Ok(())
}
