//! Error types for the batch pipeline.
//!
//! Only [`RunError`] aborts a run. [`ArchiveError`] and [`UploadError`] are
//! caught at the item boundary and end up inside an item's outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Building the in-memory archive for one item failed.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip writer error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive task did not complete: {0}")]
    Interrupted(String),
}

/// A hard upload failure: the request never got a 2xx answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Fatal to the whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("cannot enumerate source root {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
