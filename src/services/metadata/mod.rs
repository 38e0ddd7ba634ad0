//! Best-effort forensic metadata for downloaded files.
//!
//! Every file gets size, extension, timestamps, a SHA-256 digest and a MIME
//! guess. Images additionally get dimensions, pixel layout and EXIF; audio and
//! video get duration, bitrate, sample rate, channels and tags. Nothing here
//! returns an error: failures land in `hash_error` or `error_extraction` so a
//! corrupt file never stops a batch.

mod images;
mod media;

use crate::models::FileMetadataRecord;
use crate::services::paths::lowercase_extension;
use chrono::{DateTime, Local, SecondsFormat};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Block size used when streaming a file through the hasher.
pub const HASH_BLOCK_SIZE: usize = 65_536;

/// Extract metadata for one local file.
#[must_use]
pub fn extract(path: &Path) -> FileMetadataRecord {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut record = FileMetadataRecord {
        extension: lowercase_extension(&name),
        ..FileMetadataRecord::default()
    };

    match fs::metadata(path) {
        Ok(meta) => {
            record.size_bytes = meta.len();
            record.created_at = meta.created().ok().map(iso_timestamp);
            record.modified_at = meta.modified().ok().map(iso_timestamp);
        }
        Err(err) => {
            log::warn!("Cannot stat {}: {err}", path.display());
            record.error_extraction = Some(err.to_string());
        }
    }

    match sha256_file(path) {
        Ok(digest) => record.hash_sha256 = Some(digest),
        Err(err) => record.hash_error = Some(format!("Error calculating hash: {err}")),
    }

    record.mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    if let Some(mime) = record.mime_type.clone() {
        if mime.starts_with("image/") {
            run_decoder(path, &mut record, images::extract_image);
        } else if mime.starts_with("audio/") || mime.starts_with("video/") {
            run_decoder(path, &mut record, media::extract_media);
        }
    }

    record
}

/// Run a format decoder on `path`.
///
/// A panic inside `decode` stops at this frame and is recorded in
/// `error_extraction`; fields filled before the panic are kept.
pub fn run_decoder<F>(path: &Path, record: &mut FileMetadataRecord, decode: F)
where
    F: FnOnce(&Path, &mut FileMetadataRecord),
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| decode(path, record)));
    if let Err(payload) = outcome {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("Decoder panicked on {}: {message}", path.display());
        record.error_extraction = Some(format!("decoder panicked: {message}"));
    }
}

/// Extract metadata for many files in parallel, preserving input order.
///
/// `workers` bounds the rayon pool; `None` uses the global pool.
#[must_use]
pub fn extract_batch(paths: &[PathBuf], workers: Option<usize>) -> Vec<FileMetadataRecord> {
    let run = || paths.par_iter().map(|p| extract(p)).collect::<Vec<_>>();

    match workers {
        Some(n) if n > 0 => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(run),
            Err(err) => {
                log::warn!("Cannot build metadata pool with {n} workers: {err}; using global pool");
                run()
            }
        },
        _ => run(),
    }
}

/// Hex SHA-256 of a file, streamed in [`HASH_BLOCK_SIZE`] blocks.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BLOCK_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn iso_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Micros, false)
}
