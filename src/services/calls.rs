//! Call log extraction through the Android `content` provider.
//!
//! `content query` prints one `Row: N key=value, key=value, ...` line per
//! record. Values may contain spaces, so a token without `=` continues the
//! previous value.

use crate::device::RemoteShell;
use crate::models::{CallMetadata, CallRecord, CallType};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::collections::BTreeMap;

/// Shell command that dumps the call log.
pub const CALL_LOG_QUERY: &str = "content query --uri content://call_log/calls";

/// Offset applied to call timestamps when none is configured.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;

const READABLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw columns of one call log row.
pub type ContentRow = BTreeMap<String, String>;

/// Parse `content query` output into one map per `Row:` line.
#[must_use]
pub fn parse_content_query(output: &str) -> Vec<ContentRow> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Row:"))
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> ContentRow {
    let mut row = ContentRow::new();
    let mut current: Option<String> = None;

    // skip "Row:" and the row number
    for token in line.split_whitespace().skip(2) {
        if let Some((key, value)) = token.split_once('=') {
            row.insert(key.to_string(), value.to_string());
            current = Some(key.to_string());
        } else if let Some(key) = &current {
            if let Some(value) = row.get_mut(key) {
                value.push(' ');
                value.push_str(token);
            }
        }
    }

    row
}

/// Integer column value; commas and whitespace are ignored, 0 when unparsable.
#[must_use]
pub fn safe_int(value: &str) -> i64 {
    value.replace(',', "").trim().parse().unwrap_or(0)
}

/// Convert an epoch-milliseconds column to local wall-clock time.
///
/// Returns the naive local datetime together with its readable form; when the
/// value cannot be interpreted the datetime is `None` and the raw text is kept
/// as the readable form.
#[must_use]
pub fn convert_date(raw: &str, utc_offset_hours: i32) -> (Option<NaiveDateTime>, String) {
    let local = raw
        .replace(',', "")
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .zip(FixedOffset::east_opt(utc_offset_hours * 3600))
        .map(|(utc, offset)| utc.with_timezone(&offset).naive_local());

    match local {
        Some(dt) => (Some(dt), dt.format(READABLE_FORMAT).to_string()),
        None => (None, raw.to_string()),
    }
}

/// Build a call record from a parsed row, `None` when the row carries neither
/// a number nor a contact name.
#[must_use]
pub fn call_record(row: &ContentRow, utc_offset_hours: i32) -> Option<CallRecord> {
    let non_empty = |key: &str| row.get(key).filter(|v| !v.is_empty()).cloned();

    let number = non_empty("number");
    let contact_name = non_empty("name")
        .or_else(|| non_empty("cached_name"))
        .or_else(|| non_empty("display_name"));

    if number.is_none() && contact_name.is_none() {
        return None;
    }

    let (date, date_readable) = match row.get("date") {
        Some(raw) => {
            let (date, readable) = convert_date(raw, utc_offset_hours);
            (date, Some(readable))
        }
        None => (None, None),
    };

    let raw_type = row.get("type").cloned();

    Some(CallRecord {
        number,
        contact_name,
        date,
        duration_seconds: row.get("duration").map_or(0, |v| safe_int(v)),
        call_type: raw_type
            .as_deref()
            .map_or(CallType::Unknown, CallType::from_code),
        metadata: CallMetadata {
            date_readable,
            raw_type,
            geocoded_location: row.get("geocoded_location").cloned(),
            presentation: row.get("presentation").cloned(),
        },
    })
}

/// Read the device call log.
///
/// Best effort: any failure of the query yields an empty list.
#[must_use]
pub fn extract_calls(shell: &dyn RemoteShell, utc_offset_hours: i32) -> Vec<CallRecord> {
    let output = match shell.shell(CALL_LOG_QUERY) {
        Ok(output) => output,
        Err(err) => {
            log::warn!("Call log query failed: {err}");
            return Vec::new();
        }
    };

    let calls: Vec<CallRecord> = parse_content_query(&output)
        .iter()
        .filter_map(|row| call_record(row, utc_offset_hours))
        .collect();

    log::info!("Found {} calls", calls.len());
    calls
}
