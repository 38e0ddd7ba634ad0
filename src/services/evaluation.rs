//! One complete collection session against a single device.

use crate::config::ExtractorConfig;
use crate::device::{RemoteShell, device_info};
use crate::models::{DownloadedFile, Evaluation, EvidenceFile};
use crate::services::categories::classify;
use crate::services::{calls, metadata, whatsapp};
use crate::{ExtractOptions, Result, extract_files};
use chrono::{Local, SecondsFormat};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What an evaluation collects besides the file extraction.
#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    pub extract: ExtractOptions,
    pub include_calls: bool,
    /// WhatsApp roots to collect from; `None` skips WhatsApp entirely.
    pub whatsapp_roots: Option<Vec<String>>,
    pub call_log_utc_offset_hours: i32,
    pub metadata_workers: Option<usize>,
    pub notes: BTreeMap<String, String>,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl EvaluationOptions {
    /// Options seeded from a configuration: default roots, destination,
    /// call log offset and worker count.
    #[must_use]
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let mut extract = ExtractOptions {
            destination: config.destination.clone(),
            ..ExtractOptions::default()
        };
        extract.scan.default_roots.clone_from(&config.default_roots);

        Self {
            extract,
            include_calls: true,
            whatsapp_roots: Some(config.whatsapp_roots.clone()),
            call_log_utc_offset_hours: config.call_log_utc_offset_hours,
            metadata_workers: config.metadata_workers,
            notes: BTreeMap::new(),
        }
    }
}

/// Run device identification, extraction, metadata, call log and WhatsApp
/// collection in that order.
///
/// Metadata covers exactly the files downloaded by this run, in download order.
pub fn evaluate(shell: &dyn RemoteShell, opts: &EvaluationOptions) -> Result<Evaluation> {
    let started_at = now();

    let device = device_info(shell)?;
    log::info!(
        "Evaluating {} {} (Android {}, serial {})",
        device.brand,
        device.model,
        device.android_version,
        device.serial
    );

    let extraction = extract_files(shell, &opts.extract)?;
    let files = evidence_files(&extraction.files, opts.metadata_workers);

    let calls = if opts.include_calls {
        calls::extract_calls(shell, opts.call_log_utc_offset_hours)
    } else {
        Vec::new()
    };

    let whatsapp = match &opts.whatsapp_roots {
        Some(roots) => Some(whatsapp::extract_backups(
            shell,
            roots,
            &opts.extract.destination,
        )?),
        None => None,
    };

    Ok(Evaluation {
        device,
        started_at,
        finished_at: now(),
        notes: opts.notes.clone(),
        extraction,
        files,
        calls,
        whatsapp,
    })
}

/// Pair downloaded files with their extracted metadata.
#[must_use]
pub fn evidence_files(downloaded: &[DownloadedFile], workers: Option<usize>) -> Vec<EvidenceFile> {
    let paths: Vec<PathBuf> = downloaded.iter().map(|f| f.local_path.clone()).collect();
    let records = metadata::extract_batch(&paths, workers);

    downloaded
        .iter()
        .zip(records)
        .map(|(file, metadata)| EvidenceFile {
            original_name: file.entry.name.clone(),
            remote_path: file.entry.path.clone(),
            local_path: file.local_path.clone(),
            category: classify(&file.entry.name),
            mime_type: metadata.mime_type.clone(),
            size_bytes: metadata.size_bytes,
            metadata,
        })
        .collect()
}

fn now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
