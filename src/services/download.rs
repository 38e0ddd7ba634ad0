//! Bulk download of discovered entries into a local directory.
//!
//! Files are pulled one at a time, in scan order. A failed pull is counted
//! and the batch continues; only failing to create the destination
//! directory aborts the operation.
//!
//! Name collisions are resolved by probing `name.ext`, `name_1.ext`,
//! `name_2.ext`, ... until a free path is found. The probe and the pull are
//! not atomic, so two processes downloading into the same directory at the
//! same time can still overwrite each other.

use crate::device::RemoteShell;
use crate::models::{DiscoveredEntry, DownloadedFile, ErrorItem};
use crate::services::paths::{remote_base_name, split_extension};
use crate::services::progress::{ProgressCounters, ProgressNotifier, ProgressThrottler};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Counts and per-file outcomes of a download batch.
#[derive(Debug, Default)]
pub struct DownloadTally {
    pub downloaded: usize,
    pub failed: usize,
    pub files: Vec<DownloadedFile>,
    pub errors: Vec<ErrorItem>,
}

/// First free path for `file_name` inside `dir`.
#[must_use]
pub fn resolve_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = split_extension(file_name);
    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Local file name for a remote path; falls back to `fallback` for paths
/// ending in `/`.
#[must_use]
pub fn local_file_name<'a>(remote: &'a str, fallback: &'a str) -> &'a str {
    let base = remote_base_name(remote);
    if base.is_empty() { fallback } else { base }
}

/// Pull every entry into `destination`, creating it when missing.
pub fn download_entries(
    shell: &dyn RemoteShell,
    entries: &[DiscoveredEntry],
    destination: &Path,
    notifier: Option<&ProgressNotifier>,
) -> io::Result<DownloadTally> {
    fs::create_dir_all(destination)?;

    let mut tally = DownloadTally::default();
    let mut throttler = ProgressThrottler::new();
    let total = entries.len();

    for (index, entry) in entries.iter().enumerate() {
        let file_name = local_file_name(&entry.path, &entry.name);
        let target = resolve_destination(destination, file_name);

        match shell.pull(&entry.path, &target) {
            Ok(()) => {
                log::info!("[{}/{total}] {}", index + 1, entry.name);
                tally.downloaded += 1;
                tally.files.push(DownloadedFile {
                    entry: entry.clone(),
                    local_path: target,
                });
            }
            Err(err) => {
                log::warn!("[{}/{total}] failed to pull {}: {err}", index + 1, entry.path);
                tally.failed += 1;
                tally.errors.push(ErrorItem {
                    path: entry.path.clone(),
                    code: err.code().to_string(),
                    message: err.to_string(),
                });
            }
        }

        if let Some(notifier) = notifier {
            let counters = ProgressCounters {
                processed: index + 1,
                total,
                downloaded: tally.downloaded,
                failed: tally.failed,
            };
            if let Some(snapshot) = throttler.consider(Instant::now(), counters) {
                notifier(&snapshot);
            }
        }
    }

    if let Some(notifier) = notifier {
        let counters = ProgressCounters {
            processed: total,
            total,
            downloaded: tally.downloaded,
            failed: tally.failed,
        };
        if let Some(snapshot) = throttler.finish(Instant::now(), counters) {
            notifier(&snapshot);
        }
    }

    Ok(tally)
}
