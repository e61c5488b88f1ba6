//! # contract: the seams of the batch pipeline
//!
//! The orchestrator in [`crate::batch`] only knows these traits and plain data
//! types. Concrete implementations live next to what they wrap:
//! [`crate::archive::ZipArchiver`] here, the HTTP client in the `zipdrop` crate.
//!
//! ## Mocking & Testing
//! - Traits are annotated for `mockall`; with the `test-export-mocks` feature
//!   (on by default) `MockArchiver` and `MockArchiveUploader` are exported so
//!   downstream crates can drive the orchestrator deterministically.

use std::path::Path;

use async_trait::async_trait;
#[allow(unused_imports)]
use mockall::automock;

use crate::error::{ArchiveError, UploadError};

/// Reported in place of a reference when none could be parsed from a response.
pub const UNRESOLVED_REFERENCE: &str = "unresolved";

/// The upload filename for an item: `<item-name>.zip`.
pub fn archive_filename(item_name: &str) -> String {
    format!("{item_name}.zip")
}

/// One item's compressed contents, held fully in memory.
#[derive(Debug)]
pub struct Archive {
    /// See [`archive_filename`].
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Archive {
    pub fn new(item_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: archive_filename(item_name),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What came back from an upload that reached the host and got a 2xx answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    /// A download reference was found in the response.
    Resolved { reference: String },
    /// The request went through but no reference could be extracted.
    /// `success_flag` mirrors the response's own `success` field.
    Unresolved {
        raw_response: String,
        success_flag: bool,
    },
}

impl UploadResult {
    /// The reference to show to an operator, or [`UNRESOLVED_REFERENCE`].
    pub fn reference(&self) -> &str {
        match self {
            UploadResult::Resolved { reference } => reference,
            UploadResult::Unresolved { .. } => UNRESOLVED_REFERENCE,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, UploadResult::Resolved { .. })
    }
}

/// Builds the archive for a single directory.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Archiver: Send + Sync {
    /// Archive the full contents of `dir`, naming the result after `item_name`.
    async fn build(&self, dir: &Path, item_name: &str) -> Result<Archive, ArchiveError>;
}

/// Sends an archive to the file host.
///
/// The archive is moved in: once the call returns it is gone, whatever the
/// outcome.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArchiveUploader: Send + Sync {
    async fn upload(&self, archive: Archive) -> Result<UploadResult, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_the_item_name_plus_zip() {
        assert_eq!(archive_filename("vol.1"), "vol.1.zip");
        assert_eq!(Archive::new("vol.1", Vec::new()).filename, archive_filename("vol.1"));
    }
}
