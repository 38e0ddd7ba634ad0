//! Audio and video stream properties and tags.

use crate::models::{FileMetadataRecord, MediaMetadata};
use lofty::error::ErrorKind;
use lofty::prelude::*;
use lofty::tag::ItemValue;
use std::collections::BTreeMap;
use std::path::Path;

pub(super) fn extract_media(path: &Path, record: &mut FileMetadataRecord) {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        // Containers lofty does not understand simply carry no media block.
        Err(err) if matches!(err.kind(), ErrorKind::UnknownFormat) => return,
        Err(err) => {
            log::debug!("Media parsing failed for {}: {err}", path.display());
            record.error_extraction = Some(err.to_string());
            return;
        }
    };

    let properties = tagged.properties();
    let duration = properties.duration().as_secs_f64();
    let bitrate = properties
        .overall_bitrate()
        .or_else(|| properties.audio_bitrate())
        .map(|kbps| kbps.saturating_mul(1000));

    let mut tags = BTreeMap::new();
    for tag in tagged.tags() {
        for item in tag.items() {
            let key = match item.key() {
                ItemKey::Unknown(raw) => raw.clone(),
                other => format!("{other:?}"),
            };
            let value = match item.value() {
                ItemValue::Text(text) | ItemValue::Locator(text) => text.clone(),
                ItemValue::Binary(bytes) => format!("<{} bytes>", bytes.len()),
            };
            tags.entry(key).or_insert(value);
        }
    }

    record.media = Some(MediaMetadata {
        duration_seconds: (duration > 0.0).then_some(duration),
        bitrate,
        sample_rate: properties.sample_rate(),
        channels: properties.channels(),
        tags: (!tags.is_empty()).then_some(tags),
    });
}
