//! Android evidence collection library
//!
//! This library walks the file system of an attached Android device through a
//! remote shell, classifies files by extension, downloads them with
//! collision-free local names, and extracts best-effort forensic metadata.
//! Call logs and WhatsApp backup artifacts are collected alongside, and a
//! whole session can be persisted as a Parquet evaluation snapshot.

pub mod cli;
pub mod config;
pub mod device;
pub mod io;
pub mod models;
pub mod services;

pub use config::ExtractorConfig;
pub use device::{RemoteShell, ShellError};
pub use models::{
    DiscoveredEntry, ErrorItem, Evaluation, ExtractionResult, FileMetadataRecord, ScanResult,
};
pub use services::evaluation::{EvaluationOptions, evaluate};

use services::progress::ProgressNotifier;
use std::path::PathBuf;
use std::result;
use thiserror::Error;

/// Custom error type for the library
#[derive(Debug, Error)]
pub enum Error {
    /// The device cannot be reached; fatal to the whole request.
    #[error("connection error: {0}")]
    Connection(#[from] ShellError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = result::Result<T, Error>;

/// Options for scanning the device
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Roots to walk; `default_roots` are used when empty.
    pub paths: Vec<String>,
    /// Category labels to keep; every category when empty.
    pub categories: Vec<String>,
    pub default_roots: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            categories: Vec::new(),
            default_roots: config::DEFAULT_ROOTS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        }
    }
}

impl ScanOptions {
    /// Roots this scan will walk.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        if self.paths.is_empty() {
            &self.default_roots
        } else {
            &self.paths
        }
    }
}

/// Options for scanning and downloading
#[derive(Clone)]
pub struct ExtractOptions {
    pub scan: ScanOptions,
    pub destination: PathBuf,
    pub progress_notifier: Option<ProgressNotifier>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            destination: PathBuf::from(config::DEFAULT_DESTINATION),
            progress_notifier: None,
        }
    }
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("scan", &self.scan)
            .field("destination", &self.destination)
            .field(
                "progress_notifier",
                &self.progress_notifier.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

/// Walk the device and summarize matching files
///
/// Unreadable directories are reported in `errors`; only losing the device
/// or having no root to walk fails the call.
pub fn scan(shell: &dyn RemoteShell, opts: &ScanOptions) -> Result<ScanResult> {
    let filter = services::categories::category_extensions(&opts.categories);
    let roots = opts.roots().to_vec();
    if roots.is_empty() {
        return Err(Error::InvalidInput("no scan roots given".to_string()));
    }

    let outcome = services::traverse::walk(shell, &roots, &filter)?;
    let categories = services::aggregate::category_counts(&outcome.entries);

    log::info!("Found {} matching files", outcome.entries.len());

    Ok(ScanResult {
        total_entries: outcome.entries.len(),
        categories,
        entries: outcome.entries,
        roots,
        errors: outcome.errors,
    })
}

/// Scan the device and download every matching file
///
/// When nothing matches, no destination directory is created and
/// `destination` is `None`.
pub fn extract_files(shell: &dyn RemoteShell, opts: &ExtractOptions) -> Result<ExtractionResult> {
    let scanned = scan(shell, &opts.scan)?;

    if scanned.entries.is_empty() {
        log::info!("No files to download");
        return Ok(ExtractionResult {
            errors: scanned.errors,
            ..ExtractionResult::default()
        });
    }

    let destination = std::path::absolute(&opts.destination)?;
    let tally = services::download::download_entries(
        shell,
        &scanned.entries,
        &destination,
        opts.progress_notifier.as_ref(),
    )?;

    log::info!(
        "Downloaded {} of {} files into {}",
        tally.downloaded,
        scanned.total_entries,
        destination.display()
    );

    let mut errors = scanned.errors;
    errors.extend(tally.errors);

    Ok(ExtractionResult {
        scanned: scanned.total_entries,
        downloaded: tally.downloaded,
        failed: tally.failed,
        categories: scanned.categories,
        destination: Some(destination),
        files: tally.files,
        errors,
    })
}

/// Best-effort metadata for one local file; never fails
#[must_use]
pub fn extract_file_metadata(path: &std::path::Path) -> FileMetadataRecord {
    services::metadata::extract(path)
}
