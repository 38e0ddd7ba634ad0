//! Image dimensions, pixel layout and EXIF tags.

use crate::models::{FileMetadataRecord, ImageMetadata};
use exif::{Context, Field, In, Value};
use image::{ImageDecoder, ImageReader};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub(super) fn extract_image(path: &Path, record: &mut FileMetadataRecord) {
    let mut meta = match read_header(path) {
        Ok(meta) => meta,
        Err(err) => {
            log::debug!("Image parsing failed for {}: {err}", path.display());
            record.error_extraction = Some(err);
            return;
        }
    };

    if !carries_exif(meta.format.as_deref()) {
        record.image = Some(meta);
        return;
    }

    match read_exif(path) {
        Ok(Some((tags, gps))) => {
            meta.exif = Some(tags);
            meta.gps = gps;
        }
        Ok(None) => {}
        Err(err) => {
            log::debug!("EXIF parsing failed for {}: {err}", path.display());
            record.error_extraction = Some(err);
        }
    }

    record.image = Some(meta);
}

/// Containers the EXIF reader understands; others (GIF, BMP, ...) simply
/// have no EXIF block.
fn carries_exif(format: Option<&str>) -> bool {
    matches!(format, Some("JPEG" | "TIFF" | "PNG" | "WEBP"))
}

fn read_header(path: &Path) -> Result<ImageMetadata, String> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| e.to_string())?;

    let format = reader.format().map(|f| format!("{f:?}").to_uppercase());
    let decoder = reader.into_decoder().map_err(|e| e.to_string())?;
    let (width, height) = decoder.dimensions();

    Ok(ImageMetadata {
        width,
        height,
        format,
        mode: format!("{:?}", decoder.color_type()),
        exif: None,
        gps: None,
    })
}

type ExifTable = BTreeMap<String, serde_json::Value>;

/// Primary-IFD EXIF tags plus the stringified GPS block, `None` without EXIF.
fn read_exif(path: &Path) -> Result<Option<(ExifTable, Option<String>)>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(err) => return Err(err.to_string()),
    };

    let mut tags = ExifTable::new();
    let mut gps_parts = Vec::new();

    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if field.tag.context() == Context::Gps {
            gps_parts.push(format!("{}: {}", field.tag, field.display_value()));
            continue;
        }
        tags.insert(field.tag.to_string(), coerce_value(field));
    }

    let gps = if gps_parts.is_empty() {
        None
    } else {
        let block = format!("{{{}}}", gps_parts.join(", "));
        tags.insert("GPSInfo".to_string(), serde_json::Value::String(block.clone()));
        Some(block)
    };

    Ok(Some((tags, gps)))
}

/// Coerce an EXIF value to a JSON primitive: text when the bytes decode,
/// single integers and floats as numbers, everything else stringified.
fn coerce_value(field: &Field) -> serde_json::Value {
    use serde_json::Value as Json;

    let display = || Json::String(field.display_value().to_string());

    match &field.value {
        Value::Ascii(parts) => {
            let decoded: Result<Vec<&str>, _> =
                parts.iter().map(|p| std::str::from_utf8(p)).collect();
            match decoded {
                Ok(texts) => Json::String(texts.join("\n").trim_end_matches('\0').to_string()),
                Err(_) => display(),
            }
        }
        Value::Undefined(bytes, _) => match std::str::from_utf8(bytes) {
            Ok(text) => Json::String(text.trim_end_matches('\0').to_string()),
            Err(_) => display(),
        },
        Value::Byte(v) if v.len() == 1 => Json::from(v[0]),
        Value::Short(v) if v.len() == 1 => Json::from(v[0]),
        Value::Long(v) if v.len() == 1 => Json::from(v[0]),
        Value::SByte(v) if v.len() == 1 => Json::from(v[0]),
        Value::SShort(v) if v.len() == 1 => Json::from(v[0]),
        Value::SLong(v) if v.len() == 1 => Json::from(v[0]),
        Value::Float(v) if v.len() == 1 => serde_json::Number::from_f64(f64::from(v[0]))
            .map_or_else(display, Json::Number),
        Value::Double(v) if v.len() == 1 => {
            serde_json::Number::from_f64(v[0]).map_or_else(display, Json::Number)
        }
        _ => display(),
    }
}
