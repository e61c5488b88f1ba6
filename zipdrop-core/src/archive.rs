//! In-memory zip archives of whole directories.
//!
//! Entry names are relative to the archived directory and always use `/`, so
//! the directory's own name never shows up as a wrapper folder. Files are
//! written in sorted order; empty subdirectories get an explicit `name/` entry,
//! non-empty ones are implied by the paths of their files. Anything that is
//! neither a file nor a directory once symlinks are followed is left out.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::contract::{Archive, Archiver};
use crate::error::ArchiveError;

/// Default [`Archiver`]: walks the directory on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

#[async_trait]
impl Archiver for ZipArchiver {
    async fn build(&self, dir: &Path, item_name: &str) -> Result<Archive, ArchiveError> {
        let dir = dir.to_path_buf();
        let item_name = item_name.to_string();
        tokio::task::spawn_blocking(move || build_archive(&dir, &item_name))
            .await
            .map_err(|e| ArchiveError::Interrupted(e.to_string()))?
    }
}

/// Zips everything under `dir` into memory. Blocking.
pub fn build_archive(dir: &Path, item_name: &str) -> Result<Archive, ArchiveError> {
    debug!(dir = %dir.display(), item = item_name, "Building archive");
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut files = 0usize;
    let mut skipped = 0usize;

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            error!(dir = %dir.display(), error = %e, "Directory walk failed");
            ArchiveError::Walk {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e,
            }
        })?;
        let path = entry.path();
        let name = entry_name(dir, path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if is_empty_dir(path)? {
                writer.add_directory(format!("{name}/"), base)?;
            }
            continue;
        }
        if !file_type.is_file() {
            // Pipes, sockets and device nodes have no stable contents to store.
            warn!(path = %path.display(), "Skipping entry that is not a regular file");
            skipped += 1;
            continue;
        }

        let mut file = File::open(path).map_err(|source| io_error(path, source))?;
        let len = file
            .metadata()
            .map_err(|source| io_error(path, source))?
            .len();
        writer.start_file(name, base.large_file(len >= u32::MAX as u64))?;
        io::copy(&mut file, &mut writer).map_err(|source| io_error(path, source))?;
        files += 1;
    }

    let bytes = writer.finish()?.into_inner();
    info!(
        item = item_name,
        files,
        skipped,
        bytes = bytes.len(),
        "Archive built"
    );
    Ok(Archive::new(item_name, bytes))
}

fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_empty_dir(path: &Path) -> Result<bool, ArchiveError> {
    let mut entries = fs::read_dir(path).map_err(|source| io_error(path, source))?;
    Ok(entries.next().is_none())
}

fn io_error(path: &Path, source: io::Error) -> ArchiveError {
    error!(path = %path.display(), error = %source, "Failed to read while archiving");
    ArchiveError::Io {
        path: PathBuf::from(path),
        source,
    }
}
