//! Finding the source root and the items under it.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::RunError;

/// An entry directly under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// First candidate that is an existing directory, in the order given.
pub fn resolve_source_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    for candidate in candidates {
        if candidate.is_dir() {
            info!(source_root = %candidate.display(), "Resolved source root");
            return Some(candidate.clone());
        }
        debug!(candidate = %candidate.display(), "Source root candidate not found");
    }
    None
}

/// Lists the top-level entries of `root`, sorted by name.
///
/// Symlinks are followed when deciding whether an entry is a directory. Any
/// listing or stat failure is fatal for the run.
pub fn enumerate_items(root: &Path) -> Result<Vec<CandidateItem>, RunError> {
    let enumeration_error = |path: &Path, source: std::io::Error| {
        error!(path = %path.display(), error = %source, "Failed to enumerate source root");
        RunError::Enumeration {
            path: path.to_path_buf(),
            source,
        }
    };

    let mut items = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| enumeration_error(root, e))? {
        let entry = entry.map_err(|e| enumeration_error(root, e))?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|e| enumeration_error(path.as_path(), e))?;
        items.push(CandidateItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir: metadata.is_dir(),
        });
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(
        root = %root.display(),
        entries = items.len(),
        directories = items.iter().filter(|i| i.is_dir).count(),
        "Enumerated source root"
    );
    Ok(items)
}
