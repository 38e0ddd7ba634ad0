//! Output formatting for CLI

use crate::models::{
    CallRecord, DeviceInfo, DiscoveredEntry, Evaluation, ExtractionResult, FileMetadataRecord,
    ScanResult, WhatsAppExtraction,
};
use crate::services::aggregate::category_sizes;
use crate::services::format::{format_duration, format_size};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Maximum number of errors listed in text output
const MAX_ERRORS_SHOWN: usize = 5;

/// Format any result as pretty JSON
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_device_text(device: &DeviceInfo) -> String {
    format!(
        "Device:  {} {}\nAndroid: {}\nSerial:  {}\n",
        device.brand, device.model, device.android_version, device.serial
    )
}

/// Format a scan as a table of `entries` followed by per-category totals
pub fn format_scan_text(result: &ScanResult, entries: &[DiscoveredEntry]) -> String {
    let mut out = String::new();

    if result.entries.is_empty() {
        out.push_str("No matching files found.\n");
        write_errors(&mut out, &result.errors);
        return out;
    }

    let _ = writeln!(out, "{:<70} {:>10} {:>16}", "Path", "Size", "Modified");
    let _ = writeln!(out, "{}", "-".repeat(98));
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<70} {:>10} {:>16}",
            entry.path,
            format_size(entry.size_bytes),
            entry.modified
        );
    }
    if entries.len() < result.entries.len() {
        let _ = writeln!(out, "... and {} more", result.entries.len() - entries.len());
    }

    out.push('\n');
    let sizes = category_sizes(&result.entries);
    for (category, count) in &result.categories {
        let bytes = sizes.get(category).copied().unwrap_or(0);
        let _ = writeln!(out, "{:<16} {:>6} files {:>10}", category, count, format_size(bytes));
    }
    let _ = writeln!(out, "Total: {} files", result.total_entries);

    write_errors(&mut out, &result.errors);
    out
}

pub fn format_extraction_text(result: &ExtractionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scanned:    {}", result.scanned);
    let _ = writeln!(out, "Downloaded: {}", result.downloaded);
    let _ = writeln!(out, "Failed:     {}", result.failed);
    for (category, count) in &result.categories {
        let _ = writeln!(out, "  {category:<16} {count:>6}");
    }
    match &result.destination {
        Some(dir) => {
            let _ = writeln!(out, "Destination: {}", dir.display());
        }
        None => out.push_str("Nothing to download.\n"),
    }
    write_errors(&mut out, &result.errors);
    out
}

pub fn format_metadata_text(path: &Path, record: &FileMetadataRecord) -> String {
    let mut out = String::new();
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let _ = writeln!(out, "{}", path.display());
    let _ = writeln!(out, "  size:      {} ({} bytes)", format_size(record.size_bytes), record.size_bytes);
    let _ = writeln!(out, "  extension: {}", record.extension);
    let _ = writeln!(out, "  mime:      {}", or_dash(&record.mime_type));
    let _ = writeln!(out, "  created:   {}", or_dash(&record.created_at));
    let _ = writeln!(out, "  modified:  {}", or_dash(&record.modified_at));
    match (&record.hash_sha256, &record.hash_error) {
        (Some(hash), _) => {
            let _ = writeln!(out, "  sha256:    {hash}");
        }
        (None, Some(err)) => {
            let _ = writeln!(out, "  sha256:    ({err})");
        }
        (None, None) => {}
    }

    if let Some(image) = &record.image {
        let _ = writeln!(
            out,
            "  image:     {}x{} {} {}",
            image.width,
            image.height,
            image.format.as_deref().unwrap_or("?"),
            image.mode
        );
        if let Some(exif) = &image.exif {
            let _ = writeln!(out, "  exif tags: {}", exif.len());
        }
        if let Some(gps) = &image.gps {
            let _ = writeln!(out, "  gps:       {gps}");
        }
    }

    if let Some(media) = &record.media {
        let _ = writeln!(out, "  duration:  {}", format_duration(media.duration_seconds));
        if let Some(bitrate) = media.bitrate {
            let _ = writeln!(out, "  bitrate:   {} kbps", bitrate / 1000);
        }
        if let Some(rate) = media.sample_rate {
            let _ = writeln!(out, "  rate:      {rate} Hz");
        }
        if let Some(channels) = media.channels {
            let _ = writeln!(out, "  channels:  {channels}");
        }
    }

    if let Some(err) = &record.error_extraction {
        let _ = writeln!(out, "  error:     {err}");
    }
    out
}

pub fn format_calls_text(calls: &[CallRecord]) -> String {
    if calls.is_empty() {
        return "No calls found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<20} {:<24} {:>8} {:<10}",
        "Date", "Number", "Contact", "Seconds", "Type"
    );
    for call in calls {
        let date = call
            .date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<20} {:<20} {:<24} {:>8} {:<10}",
            date,
            call.number.as_deref().unwrap_or(""),
            call.contact_name.as_deref().unwrap_or(""),
            call.duration_seconds,
            call.call_type.as_str()
        );
    }
    let _ = writeln!(out, "Total: {} calls", calls.len());
    out
}

pub fn format_whatsapp_text(result: &WhatsAppExtraction) -> String {
    if result.backups.is_empty() {
        return "No WhatsApp backups found.\n".to_string();
    }

    let mut out = String::new();
    for backup in &result.backups {
        let status = if backup.local_path.is_some() { "ok" } else { "FAILED" };
        let _ = writeln!(
            out,
            "{:<6} {:<40} {:>10}  {}",
            status,
            backup.name,
            format_size(backup.size_bytes),
            backup.kind.description()
        );
    }
    let _ = writeln!(out, "Downloaded: {}  Failed: {}", result.downloaded, result.failed);
    if let Some(dir) = &result.destination {
        let _ = writeln!(out, "Destination: {}", dir.display());
    }
    out
}

/// Format an evaluation, listing at most `top` files
pub fn format_evaluation_text(evaluation: &Evaluation, top: usize) -> String {
    let mut out = format_device_text(&evaluation.device);
    let _ = writeln!(out, "Started:  {}", evaluation.started_at);
    let _ = writeln!(out, "Finished: {}", evaluation.finished_at);
    for (key, value) in &evaluation.notes {
        let _ = writeln!(out, "Note {key}: {value}");
    }
    out.push('\n');
    out.push_str(&format_extraction_text(&evaluation.extraction));

    if !evaluation.files.is_empty() {
        out.push('\n');
        for file in evaluation.files.iter().take(top) {
            let _ = writeln!(
                out,
                "{:<40} {:>10} {:<20} {}",
                file.original_name,
                format_size(file.size_bytes),
                file.mime_type.as_deref().unwrap_or("-"),
                file.metadata.hash_sha256.as_deref().unwrap_or("-")
            );
        }
        if evaluation.files.len() > top {
            let _ = writeln!(out, "... and {} more", evaluation.files.len() - top);
        }
    }

    let _ = writeln!(out, "\nCalls: {}", evaluation.calls.len());
    if let Some(whatsapp) = &evaluation.whatsapp {
        let _ = writeln!(
            out,
            "WhatsApp artifacts: {} ({} downloaded, {} failed)",
            whatsapp.backups.len(),
            whatsapp.downloaded,
            whatsapp.failed
        );
    }
    out
}

fn write_errors(out: &mut String, errors: &[crate::models::ErrorItem]) {
    if errors.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nErrors encountered: {}", errors.len());
    for error in errors.iter().take(MAX_ERRORS_SHOWN) {
        let _ = writeln!(out, "  {}: {}", error.path, error.message);
    }
    if errors.len() > MAX_ERRORS_SHOWN {
        let _ = writeln!(out, "  ... and {} more", errors.len() - MAX_ERRORS_SHOWN);
    }
}
