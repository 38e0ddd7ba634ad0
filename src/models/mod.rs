//! Data models for discovered entries, extraction results and evidence records

use crate::services::categories::Category;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A file found on the device during a directory walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEntry {
    /// Absolute remote path.
    pub path: String,
    pub name: String,
    /// Size in bytes, 0 when the listing did not report one.
    pub size_bytes: u64,
    /// Raw `date time` text from the listing, empty when unavailable.
    pub modified: String,
    /// Lower-cased extension including the leading dot.
    pub extension: String,
}

/// Represents an error encountered while walking or downloading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

/// Outcome of one scan invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub total_entries: usize,
    /// Per-category counts; only categories with at least one entry appear.
    pub categories: BTreeMap<Category, usize>,
    pub entries: Vec<DiscoveredEntry>,
    pub roots: Vec<String>,
    pub errors: Vec<ErrorItem>,
}

/// A file pulled to the local destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub entry: DiscoveredEntry,
    pub local_path: PathBuf,
}

/// Outcome of one extraction invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub scanned: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub categories: BTreeMap<Category, usize>,
    /// Absolute destination directory, `None` when nothing was scanned.
    pub destination: Option<PathBuf>,
    pub files: Vec<DownloadedFile>,
    pub errors: Vec<ErrorItem>,
}

/// Image-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
    /// Pixel layout reported by the decoder (e.g. `Rgb8`).
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<BTreeMap<String, serde_json::Value>>,
    /// Raw GPS block, stringified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<String>,
}

/// Audio/video metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub duration_seconds: Option<f64>,
    /// Bits per second.
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// Best-effort metadata for one downloaded file.
///
/// Failures are recorded in `hash_error` / `error_extraction` instead of
/// being returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadataRecord {
    pub size_bytes: u64,
    pub extension: String,
    /// ISO-8601 timestamps.
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub hash_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_error: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_extraction: Option<String>,
}

/// Identity of the connected device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub brand: String,
    pub model: String,
    pub android_version: String,
    pub serial: String,
}

/// Call direction/outcome as reported by the call log provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Voicemail,
    Rejected,
    Blocked,
    Unknown,
}

impl CallType {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.replace(',', "").trim() {
            "1" => CallType::Incoming,
            "2" => CallType::Outgoing,
            "3" => CallType::Missed,
            "4" => CallType::Voicemail,
            "5" => CallType::Rejected,
            "6" => CallType::Blocked,
            _ => CallType::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Incoming => "incoming",
            CallType::Outgoing => "outgoing",
            CallType::Missed => "missed",
            CallType::Voicemail => "voicemail",
            CallType::Rejected => "rejected",
            CallType::Blocked => "blocked",
            CallType::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "incoming" => CallType::Incoming,
            "outgoing" => CallType::Outgoing,
            "missed" => CallType::Missed,
            "voicemail" => CallType::Voicemail,
            "rejected" => CallType::Rejected,
            "blocked" => CallType::Blocked,
            _ => CallType::Unknown,
        }
    }
}

/// Extra call log columns kept alongside a [`CallRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub date_readable: Option<String>,
    pub raw_type: Option<String>,
    pub geocoded_location: Option<String>,
    pub presentation: Option<String>,
}

/// One entry of the device call log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub number: Option<String>,
    pub contact_name: Option<String>,
    /// Local wall-clock time of the call.
    pub date: Option<NaiveDateTime>,
    pub duration_seconds: i64,
    pub call_type: CallType,
    pub metadata: CallMetadata,
}

/// Kind of WhatsApp artifact, derived from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    Crypt15,
    Crypt14,
    Crypt12,
    Key,
    Database,
    Unknown,
}

impl BackupKind {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            BackupKind::Crypt15 => "crypt15 (Android 12+)",
            BackupKind::Crypt14 => "crypt14 (Android 10-11)",
            BackupKind::Crypt12 => "crypt12 (legacy)",
            BackupKind::Key => "key (encryption key)",
            BackupKind::Database => "database",
            BackupKind::Unknown => "unknown",
        }
    }
}

/// Application that produced a WhatsApp artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceApp {
    WhatsApp,
    WhatsAppBusiness,
}

impl SourceApp {
    /// Prefix prepended to downloaded artifact names.
    #[must_use]
    pub fn file_prefix(&self) -> &'static str {
        match self {
            SourceApp::WhatsApp => "wa_",
            SourceApp::WhatsAppBusiness => "wab_",
        }
    }
}

/// A WhatsApp database, encrypted backup or key file found on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppBackup {
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
    pub modified: String,
    pub kind: BackupKind,
    pub source_app: SourceApp,
    pub local_path: Option<PathBuf>,
}

/// Outcome of a WhatsApp backup extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppExtraction {
    pub backups: Vec<WhatsAppBackup>,
    pub downloaded: usize,
    pub failed: usize,
    pub destination: Option<PathBuf>,
}

/// A downloaded file together with its extracted metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub original_name: String,
    pub remote_path: String,
    pub local_path: PathBuf,
    pub category: Option<Category>,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub metadata: FileMetadataRecord,
}

/// One data-collection session against a single device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub device: DeviceInfo,
    pub started_at: String,  // RFC3339 format
    pub finished_at: String, // RFC3339 format
    pub notes: BTreeMap<String, String>,
    pub extraction: ExtractionResult,
    pub files: Vec<EvidenceFile>,
    pub calls: Vec<CallRecord>,
    pub whatsapp: Option<WhatsAppExtraction>,
}

/// Progress report emitted while downloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub elapsed_ms: u64,
    pub processed: usize,
    pub total: usize,
    pub downloaded: usize,
    pub failed: usize,
}
