//! Parquet snapshot read/write operations
//!
//! An evaluation is stored as a single wide table. Every row carries a
//! `row_kind` (`meta`, `download`, `file`, `call`, `whatsapp` or `error`) and
//! only the columns relevant to that kind are non-null. Nested metadata is
//! kept as JSON text so the schema stays flat.

use crate::models::{
    CallMetadata, CallRecord, CallType, DeviceInfo, DiscoveredEntry, DownloadedFile, ErrorItem,
    Evaluation, EvidenceFile, ExtractionResult, FileMetadataRecord, WhatsAppBackup,
    WhatsAppExtraction,
};
use crate::services::categories::Category;
use arrow_array::{Array, ArrayRef, Int64Array, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use chrono::NaiveDateTime;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const KIND_META: &str = "meta";
const KIND_DOWNLOAD: &str = "download";
const KIND_FILE: &str = "file";
const KIND_CALL: &str = "call";
const KIND_WHATSAPP: &str = "whatsapp";
const KIND_ERROR: &str = "error";

const CALL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Return the Arrow schema shared by snapshot writers and readers.
#[must_use]
pub fn snapshot_schema() -> Arc<Schema> {
    let text = |name: &str| Field::new(name, DataType::Utf8, true);
    Arc::new(Schema::new(vec![
        Field::new("row_kind", DataType::Utf8, false),
        text("path"),
        text("name"),
        text("local_path"),
        text("category"),
        text("mime_type"),
        Field::new("size_bytes", DataType::UInt64, true),
        text("modified"),
        text("extension"),
        text("hash_sha256"),
        text("metadata_json"),
        text("call_number"),
        text("call_contact"),
        text("call_date"),
        Field::new("call_duration", DataType::Int64, true),
        text("call_type"),
        text("error_code"),
        text("error_message"),
        text("meta_brand"),
        text("meta_model"),
        text("meta_android_version"),
        text("meta_serial"),
        text("meta_started_at"),
        text("meta_finished_at"),
        text("meta_notes_json"),
        text("meta_extraction_json"),
        text("meta_whatsapp_json"),
    ]))
}

/// Counters of an extraction, stored on the meta row.
#[derive(Debug, Serialize, Deserialize)]
struct ExtractionCounts {
    scanned: usize,
    downloaded: usize,
    failed: usize,
    categories: BTreeMap<Category, usize>,
    destination: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WhatsAppCounts {
    downloaded: usize,
    failed: usize,
    destination: Option<PathBuf>,
}

/// One row of the wide table; unused columns stay `None`.
#[derive(Debug, Default)]
struct SnapshotRow {
    row_kind: &'static str,
    path: Option<String>,
    name: Option<String>,
    local_path: Option<String>,
    category: Option<String>,
    mime_type: Option<String>,
    size_bytes: Option<u64>,
    modified: Option<String>,
    extension: Option<String>,
    hash_sha256: Option<String>,
    metadata_json: Option<String>,
    call_number: Option<String>,
    call_contact: Option<String>,
    call_date: Option<String>,
    call_duration: Option<i64>,
    call_type: Option<String>,
    error_code: Option<String>,
    error_message: Option<String>,
    meta_brand: Option<String>,
    meta_model: Option<String>,
    meta_android_version: Option<String>,
    meta_serial: Option<String>,
    meta_started_at: Option<String>,
    meta_finished_at: Option<String>,
    meta_notes_json: Option<String>,
    meta_extraction_json: Option<String>,
    meta_whatsapp_json: Option<String>,
}

/// Write an evaluation to a Parquet file.
pub fn write_snapshot(path: &Path, evaluation: &Evaluation) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let schema = snapshot_schema();
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer =
        ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(Error::other)?;

    let groups = [
        vec![meta_row(evaluation)?],
        evaluation.extraction.files.iter().map(download_row).collect(),
        evaluation
            .files
            .iter()
            .map(file_row)
            .collect::<Result<Vec<_>>>()?,
        evaluation
            .calls
            .iter()
            .map(call_row)
            .collect::<Result<Vec<_>>>()?,
        evaluation
            .whatsapp
            .iter()
            .flat_map(|w| w.backups.iter())
            .map(whatsapp_row)
            .collect::<Result<Vec<_>>>()?,
        evaluation.extraction.errors.iter().map(error_row).collect(),
    ];

    for rows in groups.iter().filter(|rows| !rows.is_empty()) {
        let batch = create_batch(&schema, rows)?;
        writer.write(&batch).map_err(Error::other)?;
    }

    writer.close().map_err(Error::other)?;
    Ok(())
}

/// Read an evaluation back from a Parquet file.
pub fn read_snapshot(path: &Path) -> Result<Evaluation> {
    let file = File::open(path)?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let mut reader = builder
        .build()
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let mut evaluation = Evaluation::default();
    let mut seen_meta = false;
    let mut whatsapp: Option<WhatsAppExtraction> = None;
    let mut backups = Vec::new();

    for batch_result in &mut reader {
        let batch = batch_result.map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

        for row_idx in 0..batch.num_rows() {
            let kind = required(&batch, "row_kind", row_idx)?;
            match kind.as_str() {
                KIND_META => {
                    if seen_meta {
                        continue;
                    }
                    seen_meta = true;
                    whatsapp = apply_meta(&batch, row_idx, &mut evaluation)?;
                }
                KIND_DOWNLOAD => evaluation
                    .extraction
                    .files
                    .push(extract_download(&batch, row_idx)?),
                KIND_FILE => evaluation.files.push(extract_file(&batch, row_idx)?),
                KIND_CALL => evaluation.calls.push(extract_call(&batch, row_idx)?),
                KIND_WHATSAPP => backups.push(extract_whatsapp(&batch, row_idx)?),
                KIND_ERROR => evaluation
                    .extraction
                    .errors
                    .push(extract_error(&batch, row_idx)?),
                other => {
                    log::warn!("Ignoring snapshot row of unknown kind '{other}'");
                }
            }
        }
    }

    if !seen_meta {
        return Err(Error::new(ErrorKind::InvalidData, "No metadata found"));
    }

    if let Some(mut extraction) = whatsapp {
        extraction.backups = backups;
        evaluation.whatsapp = Some(extraction);
    }

    Ok(evaluation)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::new(ErrorKind::InvalidData, e))
}

fn from_json<T: for<'de> Deserialize<'de>>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Invalid {what}: {e}")))
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn meta_row(evaluation: &Evaluation) -> Result<SnapshotRow> {
    let extraction = &evaluation.extraction;
    let counts = ExtractionCounts {
        scanned: extraction.scanned,
        downloaded: extraction.downloaded,
        failed: extraction.failed,
        categories: extraction.categories.clone(),
        destination: extraction.destination.clone(),
    };
    let whatsapp = evaluation
        .whatsapp
        .as_ref()
        .map(|w| {
            to_json(&WhatsAppCounts {
                downloaded: w.downloaded,
                failed: w.failed,
                destination: w.destination.clone(),
            })
        })
        .transpose()?;

    Ok(SnapshotRow {
        row_kind: KIND_META,
        meta_brand: Some(evaluation.device.brand.clone()),
        meta_model: Some(evaluation.device.model.clone()),
        meta_android_version: Some(evaluation.device.android_version.clone()),
        meta_serial: Some(evaluation.device.serial.clone()),
        meta_started_at: Some(evaluation.started_at.clone()),
        meta_finished_at: Some(evaluation.finished_at.clone()),
        meta_notes_json: Some(to_json(&evaluation.notes)?),
        meta_extraction_json: Some(to_json(&counts)?),
        meta_whatsapp_json: whatsapp,
        ..SnapshotRow::default()
    })
}

fn download_row(file: &DownloadedFile) -> SnapshotRow {
    SnapshotRow {
        row_kind: KIND_DOWNLOAD,
        path: Some(file.entry.path.clone()),
        name: Some(file.entry.name.clone()),
        local_path: Some(path_text(&file.local_path)),
        size_bytes: Some(file.entry.size_bytes),
        modified: Some(file.entry.modified.clone()),
        extension: Some(file.entry.extension.clone()),
        ..SnapshotRow::default()
    }
}

fn file_row(file: &EvidenceFile) -> Result<SnapshotRow> {
    Ok(SnapshotRow {
        row_kind: KIND_FILE,
        path: Some(file.remote_path.clone()),
        name: Some(file.original_name.clone()),
        local_path: Some(path_text(&file.local_path)),
        category: file.category.map(|c| c.as_str().to_string()),
        mime_type: file.mime_type.clone(),
        size_bytes: Some(file.size_bytes),
        extension: Some(file.metadata.extension.clone()),
        hash_sha256: file.metadata.hash_sha256.clone(),
        metadata_json: Some(to_json(&file.metadata)?),
        ..SnapshotRow::default()
    })
}

fn call_row(call: &CallRecord) -> Result<SnapshotRow> {
    Ok(SnapshotRow {
        row_kind: KIND_CALL,
        call_number: call.number.clone(),
        call_contact: call.contact_name.clone(),
        call_date: call
            .date
            .map(|d| d.format(CALL_DATE_FORMAT).to_string()),
        call_duration: Some(call.duration_seconds),
        call_type: Some(call.call_type.as_str().to_string()),
        metadata_json: Some(to_json(&call.metadata)?),
        ..SnapshotRow::default()
    })
}

fn whatsapp_row(backup: &WhatsAppBackup) -> Result<SnapshotRow> {
    Ok(SnapshotRow {
        row_kind: KIND_WHATSAPP,
        path: Some(backup.path.clone()),
        name: Some(backup.name.clone()),
        local_path: backup.local_path.as_deref().map(path_text),
        size_bytes: Some(backup.size_bytes),
        modified: Some(backup.modified.clone()),
        metadata_json: Some(to_json(backup)?),
        ..SnapshotRow::default()
    })
}

fn error_row(error: &ErrorItem) -> SnapshotRow {
    SnapshotRow {
        row_kind: KIND_ERROR,
        path: Some(error.path.clone()),
        error_code: Some(error.code.clone()),
        error_message: Some(error.message.clone()),
        ..SnapshotRow::default()
    }
}

fn string_column<F>(rows: &[SnapshotRow], get: F) -> ArrayRef
where
    F: Fn(&SnapshotRow) -> Option<&str>,
{
    Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
}

fn create_batch(schema: &Arc<Schema>, rows: &[SnapshotRow]) -> Result<RecordBatch> {
    let row_kinds: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(|r| r.row_kind).collect::<Vec<_>>(),
    ));
    let sizes: ArrayRef = Arc::new(UInt64Array::from(
        rows.iter().map(|r| r.size_bytes).collect::<Vec<_>>(),
    ));
    let durations: ArrayRef = Arc::new(Int64Array::from(
        rows.iter().map(|r| r.call_duration).collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        schema.clone(),
        vec![
            row_kinds,
            string_column(rows, |r| r.path.as_deref()),
            string_column(rows, |r| r.name.as_deref()),
            string_column(rows, |r| r.local_path.as_deref()),
            string_column(rows, |r| r.category.as_deref()),
            string_column(rows, |r| r.mime_type.as_deref()),
            sizes,
            string_column(rows, |r| r.modified.as_deref()),
            string_column(rows, |r| r.extension.as_deref()),
            string_column(rows, |r| r.hash_sha256.as_deref()),
            string_column(rows, |r| r.metadata_json.as_deref()),
            string_column(rows, |r| r.call_number.as_deref()),
            string_column(rows, |r| r.call_contact.as_deref()),
            string_column(rows, |r| r.call_date.as_deref()),
            durations,
            string_column(rows, |r| r.call_type.as_deref()),
            string_column(rows, |r| r.error_code.as_deref()),
            string_column(rows, |r| r.error_message.as_deref()),
            string_column(rows, |r| r.meta_brand.as_deref()),
            string_column(rows, |r| r.meta_model.as_deref()),
            string_column(rows, |r| r.meta_android_version.as_deref()),
            string_column(rows, |r| r.meta_serial.as_deref()),
            string_column(rows, |r| r.meta_started_at.as_deref()),
            string_column(rows, |r| r.meta_finished_at.as_deref()),
            string_column(rows, |r| r.meta_notes_json.as_deref()),
            string_column(rows, |r| r.meta_extraction_json.as_deref()),
            string_column(rows, |r| r.meta_whatsapp_json.as_deref()),
        ],
    )
    .map_err(Error::other)
}

/// Fill device, timestamps, notes and counters from the meta row; returns the
/// WhatsApp counters when the evaluation collected WhatsApp artifacts.
fn apply_meta(
    batch: &RecordBatch,
    row: usize,
    evaluation: &mut Evaluation,
) -> Result<Option<WhatsAppExtraction>> {
    evaluation.device = DeviceInfo {
        brand: get_string_value(batch, "meta_brand", row)?.unwrap_or_default(),
        model: get_string_value(batch, "meta_model", row)?.unwrap_or_default(),
        android_version: get_string_value(batch, "meta_android_version", row)?
            .unwrap_or_default(),
        serial: get_string_value(batch, "meta_serial", row)?.unwrap_or_default(),
    };
    evaluation.started_at = required(batch, "meta_started_at", row)?;
    evaluation.finished_at = required(batch, "meta_finished_at", row)?;

    if let Some(notes) = get_string_value(batch, "meta_notes_json", row)? {
        evaluation.notes = from_json(&notes, "notes")?;
    }

    let counts: ExtractionCounts =
        from_json(&required(batch, "meta_extraction_json", row)?, "extraction counts")?;
    evaluation.extraction = ExtractionResult {
        scanned: counts.scanned,
        downloaded: counts.downloaded,
        failed: counts.failed,
        categories: counts.categories,
        destination: counts.destination,
        files: std::mem::take(&mut evaluation.extraction.files),
        errors: std::mem::take(&mut evaluation.extraction.errors),
    };

    get_string_value(batch, "meta_whatsapp_json", row)?
        .map(|text| {
            let counts: WhatsAppCounts = from_json(&text, "WhatsApp counts")?;
            Ok(WhatsAppExtraction {
                backups: Vec::new(),
                downloaded: counts.downloaded,
                failed: counts.failed,
                destination: counts.destination,
            })
        })
        .transpose()
}

fn extract_download(batch: &RecordBatch, row: usize) -> Result<DownloadedFile> {
    Ok(DownloadedFile {
        entry: DiscoveredEntry {
            path: required(batch, "path", row)?,
            name: required(batch, "name", row)?,
            size_bytes: get_u64_value(batch, "size_bytes", row)?.unwrap_or(0),
            modified: get_string_value(batch, "modified", row)?.unwrap_or_default(),
            extension: get_string_value(batch, "extension", row)?.unwrap_or_default(),
        },
        local_path: PathBuf::from(required(batch, "local_path", row)?),
    })
}

fn extract_file(batch: &RecordBatch, row: usize) -> Result<EvidenceFile> {
    let metadata: FileMetadataRecord =
        from_json(&required(batch, "metadata_json", row)?, "file metadata")?;

    Ok(EvidenceFile {
        original_name: required(batch, "name", row)?,
        remote_path: required(batch, "path", row)?,
        local_path: PathBuf::from(required(batch, "local_path", row)?),
        category: get_string_value(batch, "category", row)?
            .as_deref()
            .and_then(Category::from_label),
        mime_type: get_string_value(batch, "mime_type", row)?,
        size_bytes: get_u64_value(batch, "size_bytes", row)?.unwrap_or(0),
        metadata,
    })
}

fn extract_call(batch: &RecordBatch, row: usize) -> Result<CallRecord> {
    let date = get_string_value(batch, "call_date", row)?
        .map(|text| {
            NaiveDateTime::parse_from_str(&text, CALL_DATE_FORMAT)
                .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Invalid call_date: {e}")))
        })
        .transpose()?;
    let metadata: CallMetadata = match get_string_value(batch, "metadata_json", row)? {
        Some(text) => from_json(&text, "call metadata")?,
        None => CallMetadata::default(),
    };

    Ok(CallRecord {
        number: get_string_value(batch, "call_number", row)?,
        contact_name: get_string_value(batch, "call_contact", row)?,
        date,
        duration_seconds: get_i64_value(batch, "call_duration", row)?.unwrap_or(0),
        call_type: get_string_value(batch, "call_type", row)?
            .as_deref()
            .map_or(CallType::Unknown, CallType::from_label),
        metadata,
    })
}

fn extract_whatsapp(batch: &RecordBatch, row: usize) -> Result<WhatsAppBackup> {
    from_json(&required(batch, "metadata_json", row)?, "WhatsApp backup")
}

fn extract_error(batch: &RecordBatch, row: usize) -> Result<ErrorItem> {
    Ok(ErrorItem {
        path: required(batch, "path", row)?,
        code: required(batch, "error_code", row)?,
        message: required(batch, "error_message", row)?,
    })
}

fn required(batch: &RecordBatch, col_name: &str, row: usize) -> Result<String> {
    get_string_value(batch, col_name, row)?
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("Missing {col_name}")))
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, col_name: &str) -> Result<&'a T> {
    let col = batch.column_by_name(col_name).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidData,
            format!("Missing column: {col_name}"),
        )
    })?;

    col.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidData,
            format!("Invalid type for: {col_name}"),
        )
    })
}

fn get_string_value(batch: &RecordBatch, col_name: &str, row: usize) -> Result<Option<String>> {
    let array = column::<StringArray>(batch, col_name)?;
    if array.is_null(row) {
        Ok(None)
    } else {
        Ok(Some(array.value(row).to_string()))
    }
}

fn get_u64_value(batch: &RecordBatch, col_name: &str, row: usize) -> Result<Option<u64>> {
    let array = column::<UInt64Array>(batch, col_name)?;
    if array.is_null(row) {
        Ok(None)
    } else {
        Ok(Some(array.value(row)))
    }
}

fn get_i64_value(batch: &RecordBatch, col_name: &str, row: usize) -> Result<Option<i64>> {
    let array = column::<Int64Array>(batch, col_name)?;
    if array.is_null(row) {
        Ok(None)
    } else {
        Ok(Some(array.value(row)))
    }
}
