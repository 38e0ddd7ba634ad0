//! Summaries over discovered entries

use crate::models::DiscoveredEntry;
use crate::services::categories::{Category, classify};
use std::collections::BTreeMap;

/// Sort entries by a specified field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Size,
    Name,
    Modified,
}

impl SortBy {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "size" => Some(SortBy::Size),
            "name" => Some(SortBy::Name),
            "modified" | "date" => Some(SortBy::Modified),
            _ => None,
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::from_label(s).ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// Sort and limit entries to top K
///
/// Size and modification time sort descending, names ascending. Ties keep
/// discovery order.
#[must_use]
pub fn sort_and_limit(
    mut entries: Vec<DiscoveredEntry>,
    sort_by: SortBy,
    top_k: Option<usize>,
) -> Vec<DiscoveredEntry> {
    match sort_by {
        SortBy::Size => {
            entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        }
        SortBy::Name => {
            entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortBy::Modified => {
            // listing timestamps are ISO-like `YYYY-MM-DD HH:MM`, so text order works
            entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        }
    }

    if let Some(k) = top_k {
        entries.truncate(k);
    }

    entries
}

/// Number of entries per category; empty categories are omitted.
#[must_use]
pub fn category_counts(entries: &[DiscoveredEntry]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        if let Some(category) = classify(&entry.name) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    counts
}

/// Total reported bytes per category.
#[must_use]
pub fn category_sizes(entries: &[DiscoveredEntry]) -> BTreeMap<Category, u64> {
    let mut sizes = BTreeMap::new();
    for entry in entries {
        if let Some(category) = classify(&entry.name) {
            *sizes.entry(category).or_insert(0) += entry.size_bytes;
        }
    }
    sizes
}
