/// `load_config` module: turns the optional YAML file, CLI overrides and environment into an [`AppConfig`].
///
/// # Responsibilities
/// - Parse the user-supplied YAML file (every key optional, unknown keys rejected)
/// - Resolve source root candidates: `--source` flags win, then `source_roots`
///   from the file, then the built-in `comics-zip` / `comics` pair. Relative
///   entries from the file or the defaults are anchored at the install base.
/// - Apply the `ZIPDROP_ENDPOINT` environment override to the upload endpoint
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use zipdrop_core::batch::BatchConfig;
use zipdrop_core::size_gate::MAX_ARCHIVE_BYTES;

pub const DEFAULT_ENDPOINT: &str = "https://file.io";
pub const ENDPOINT_ENV: &str = "ZIPDROP_ENDPOINT";
/// Tried in this order, relative to the install base.
pub const DEFAULT_SOURCE_DIRS: [&str; 2] = ["comics-zip", "comics"];

/// The YAML file as written by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source_roots: Option<Vec<PathBuf>>,
    pub endpoint: Option<String>,
    pub max_archive_bytes: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub endpoint: String,
    /// `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub batch: BatchConfig,
    pub upload: UploadConfig,
}

/// Directory the default source roots hang off: the parent of the directory
/// holding the executable.
pub fn install_base() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let exe_dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(exe_dir.parent().unwrap_or(exe_dir).to_path_buf())
}

pub fn load_config(
    path: Option<&Path>,
    source_overrides: &[PathBuf],
    install_base: &Path,
) -> Result<AppConfig> {
    let file = match path {
        Some(path) => read_config_file(path)?,
        None => {
            info!("No config file given, using defaults");
            FileConfig::default()
        }
    };

    let source_candidates = if !source_overrides.is_empty() {
        source_overrides.to_vec()
    } else {
        let roots = file.source_roots.unwrap_or_else(|| {
            DEFAULT_SOURCE_DIRS.iter().map(PathBuf::from).collect()
        });
        roots
            .into_iter()
            .map(|root| {
                if root.is_absolute() {
                    root
                } else {
                    install_base.join(root)
                }
            })
            .collect()
    };
    if source_candidates.is_empty() {
        error!("source_roots is empty");
        bail!("at least one source root candidate is required");
    }

    let max_archive_bytes = file.max_archive_bytes.unwrap_or(MAX_ARCHIVE_BYTES);
    if max_archive_bytes == 0 || max_archive_bytes > MAX_ARCHIVE_BYTES {
        error!(max_archive_bytes, "max_archive_bytes out of range");
        bail!(
            "max_archive_bytes must be between 1 and {MAX_ARCHIVE_BYTES}, \
             got {max_archive_bytes}"
        );
    }

    let endpoint = match std::env::var(ENDPOINT_ENV) {
        Ok(endpoint) if !endpoint.trim().is_empty() => {
            info!(endpoint = %endpoint, "{ENDPOINT_ENV} found in env");
            endpoint
        }
        _ => file
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
    };

    let config = AppConfig {
        batch: BatchConfig {
            source_candidates,
            max_archive_bytes,
        },
        upload: UploadConfig {
            endpoint,
            request_timeout: file.request_timeout_secs.map(Duration::from_secs),
        },
    };
    info!(
        candidates = ?config.batch.source_candidates,
        endpoint = %config.upload.endpoint,
        max_archive_bytes,
        "Config loaded and merged successfully"
    );
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");
    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;
    // An empty file is a valid "all defaults" config.
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })
}
