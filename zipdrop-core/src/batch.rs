//! High-level pipeline: resolve the source root, then archive → gate → upload each folder.
//!
//! This module provides the top-level orchestration for one run. It:
//!   - Picks the source root from an ordered list of candidates
//!   - Lists the entries directly under it and keeps only directories
//!   - For each directory, strictly one after another: builds the archive via an
//!     [`Archiver`], checks it against the size limit, hands it to an
//!     [`ArchiveUploader`]
//!   - Reports every step through a [`Reporter`] and returns a [`BatchReport`]
//!
//! # Error Handling
//! Only a failure to list the source root stops the run ([`RunError`]). Build and
//! upload failures are turned into an [`ItemOutcome`] at the item boundary and
//! the loop moves on. A missing source root is not an error either: the run ends
//! with a "nothing to process" notice and an empty report.
//!
//! # Navigation
//! - Main entrypoint: [`run_batch`]
//! - Supporting types: [`BatchConfig`], [`BatchReport`], [`ItemReport`], [`ItemOutcome`].

use std::path::PathBuf;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::contract::{
    archive_filename, ArchiveUploader, Archiver, UploadResult, UNRESOLVED_REFERENCE,
};
use crate::error::{ArchiveError, RunError, UploadError};
use crate::reporter::Reporter;
use crate::size_gate::{check_size, SizeDecision, MAX_ARCHIVE_BYTES};
use crate::source::{enumerate_items, resolve_source_root, CandidateItem};

/// Everything one run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Tried in order; the first existing directory becomes the source root.
    pub source_candidates: Vec<PathBuf>,
    /// Archives of this many bytes or more are skipped.
    pub max_archive_bytes: u64,
}

impl BatchConfig {
    pub fn new(source_candidates: Vec<PathBuf>) -> Self {
        Self {
            source_candidates,
            max_archive_bytes: MAX_ARCHIVE_BYTES,
        }
    }
}

/// Why an item ended without an upload result.
#[derive(Debug)]
pub enum ItemFailure {
    Archive(ArchiveError),
    Upload(UploadError),
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemFailure::Archive(e) => write!(f, "archive failed: {e}"),
            ItemFailure::Upload(e) => write!(f, "upload failed: {e}"),
        }
    }
}

/// Terminal outcome of one item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The host accepted the archive; the reference may still be unresolved.
    Uploaded(UploadResult),
    /// The archive was at or over the size limit and was never sent.
    Skipped { size: u64, limit: u64 },
    Failed(ItemFailure),
}

#[derive(Debug)]
pub struct ItemReport {
    pub name: String,
    /// `<name>.zip`
    pub filename: String,
    pub outcome: ItemOutcome,
}

/// Summary of one run: one [`ItemReport`] per directory, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `None` when no candidate existed and nothing was processed.
    pub source_root: Option<PathBuf>,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }

    /// Uploads with a resolved reference.
    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Uploaded(r) if r.is_resolved()))
    }

    /// Uploads that went through without a usable reference.
    pub fn unresolved(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Uploaded(r) if !r.is_resolved()))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }
}

/// Runs the whole batch.
///
/// Returns `Err` only when the source root exists but cannot be enumerated.
pub async fn run_batch<A, U, R>(
    config: &BatchConfig,
    archiver: &A,
    uploader: &U,
    reporter: &R,
) -> Result<BatchReport, RunError>
where
    A: Archiver + ?Sized,
    U: ArchiveUploader + ?Sized,
    R: Reporter + ?Sized,
{
    info!(
        candidates = ?config.source_candidates,
        max_archive_bytes = config.max_archive_bytes,
        "[BATCH] Starting batch run"
    );

    let Some(root) = resolve_source_root(&config.source_candidates) else {
        warn!(candidates = ?config.source_candidates, "[BATCH] No source root found");
        reporter.warning("nothing to process: no source directory found");
        return Ok(BatchReport::default());
    };

    let entries = match enumerate_items(&root) {
        Ok(entries) => entries,
        Err(e) => {
            reporter.error("cannot list source directory", &e.to_string());
            return Err(e);
        }
    };

    let mut report = BatchReport {
        source_root: Some(root),
        items: Vec::new(),
    };

    for item in entries.iter().filter(|i| i.is_dir) {
        let span = info_span!("item", item = %item.name);
        let item_report = process_item(config, item, archiver, uploader, reporter)
            .instrument(span)
            .await;
        report.items.push(item_report);
    }

    info!(
        total = report.items.len(),
        uploaded = report.uploaded(),
        unresolved = report.unresolved(),
        skipped = report.skipped(),
        failed = report.failed(),
        "[BATCH] Batch run complete"
    );
    reporter.info(&format!(
        "all items processed: {} uploaded, {} without reference, {} skipped, {} failed",
        report.uploaded(),
        report.unresolved(),
        report.skipped(),
        report.failed()
    ));

    Ok(report)
}

async fn process_item<A, U, R>(
    config: &BatchConfig,
    item: &CandidateItem,
    archiver: &A,
    uploader: &U,
    reporter: &R,
) -> ItemReport
where
    A: Archiver + ?Sized,
    U: ArchiveUploader + ?Sized,
    R: Reporter + ?Sized,
{
    let filename = archive_filename(&item.name);
    reporter.info(&format!("archiving and uploading: {}...", item.name));

    let outcome = match archiver.build(&item.path, &item.name).await {
        Err(e) => {
            error!(error = %e, "[BATCH][ERROR] Archive build failed");
            ItemOutcome::Failed(ItemFailure::Archive(e))
        }
        Ok(archive) => {
            let size = archive.len();
            match check_size(size, config.max_archive_bytes) {
                SizeDecision::Rejected => {
                    warn!(
                        size,
                        limit = config.max_archive_bytes,
                        "[BATCH] Archive too large, skipping upload"
                    );
                    drop(archive);
                    ItemOutcome::Skipped {
                        size,
                        limit: config.max_archive_bytes,
                    }
                }
                SizeDecision::Accepted => {
                    debug!(size, "[BATCH] Archive within size limit, uploading");
                    match uploader.upload(archive).await {
                        Ok(result) => ItemOutcome::Uploaded(result),
                        Err(e) => {
                            error!(error = %e, "[BATCH][ERROR] Upload failed");
                            ItemOutcome::Failed(ItemFailure::Upload(e))
                        }
                    }
                }
            }
        }
    };

    report_outcome(reporter, item, &filename, &outcome);
    ItemReport {
        name: item.name.clone(),
        filename,
        outcome,
    }
}

/// Exactly one reporter event per terminal outcome.
fn report_outcome<R: Reporter + ?Sized>(
    reporter: &R,
    item: &CandidateItem,
    filename: &str,
    outcome: &ItemOutcome,
) {
    match outcome {
        ItemOutcome::Uploaded(UploadResult::Resolved { reference }) => {
            info!(filename, reference = %reference, "[BATCH] Uploaded");
            reporter.info(&format!("{filename} uploaded. download: {reference}"));
        }
        ItemOutcome::Uploaded(UploadResult::Unresolved {
            raw_response,
            success_flag: true,
        }) => {
            warn!(
                filename,
                raw_response = %raw_response,
                "[BATCH] Uploaded but reference unresolved"
            );
            reporter.warning(&format!(
                "{filename} uploaded. download: {UNRESOLVED_REFERENCE} (response: {raw_response})"
            ));
        }
        ItemOutcome::Uploaded(UploadResult::Unresolved {
            raw_response,
            success_flag: false,
        }) => {
            warn!(
                filename,
                raw_response = %raw_response,
                "[BATCH] Upload completed without a reference"
            );
            reporter.error(
                &format!("{filename}: upload completed but no download reference was returned"),
                raw_response,
            );
        }
        ItemOutcome::Skipped { size, limit } => {
            reporter.warning(&format!(
                "{filename} is {size} bytes, at or over the {limit} byte limit; upload skipped"
            ));
        }
        ItemOutcome::Failed(failure) => {
            reporter.error(&format!("{} failed", item.name), &failure.to_string());
        }
    }
}
