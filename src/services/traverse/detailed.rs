//! `ls -l` listing backend.
//!
//! Lines are split on whitespace: permissions, links, owner, group, size,
//! date, time, then the name (remaining fields re-joined with single spaces).
//! Lines with fewer than [`MIN_FIELDS`] fields are skipped.

use super::strategy::ListingStrategy;
use super::{ListingItem, StrategyKind};
use crate::device::quote_remote_path;

/// Fields required before a line is interpreted.
pub const MIN_FIELDS: usize = 8;

/// Detailed (`ls -l`) listing strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailedListing;

/// One parsed `ls -l` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedLine {
    pub permissions: String,
    pub size_bytes: u64,
    pub date: String,
    pub time: String,
    pub name: String,
}

impl DetailedLine {
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.permissions.starts_with('d')
    }

    #[must_use]
    pub fn is_regular_file(&self) -> bool {
        self.permissions.starts_with('-')
    }

    #[must_use]
    pub fn modified(&self) -> String {
        format!("{} {}", self.date, self.time)
    }
}

/// Parse one `ls -l` line, or `None` when it has too few fields.
#[must_use]
pub fn parse_line(line: &str) -> Option<DetailedLine> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    Some(DetailedLine {
        permissions: fields[0].to_string(),
        size_bytes: parse_size(fields[4]),
        date: fields[5].to_string(),
        time: fields[6].to_string(),
        name: fields[7..].join(" "),
    })
}

/// Parse a size column, tolerating thousands separators; 0 when unparsable.
#[must_use]
pub fn parse_size(field: &str) -> u64 {
    field.replace(',', "").trim().parse().unwrap_or(0)
}

impl ListingStrategy for DetailedListing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Detailed
    }

    fn command(&self, dir: &str) -> String {
        format!("ls -l {}", quote_remote_path(dir))
    }

    fn parse(&self, output: &str) -> Vec<ListingItem> {
        output
            .lines()
            .filter_map(parse_line)
            .filter_map(|line| {
                if line.is_directory() {
                    if line.name == "." || line.name == ".." {
                        return None;
                    }
                    Some(ListingItem::Directory { name: line.name })
                } else if line.is_regular_file() {
                    let modified = line.modified();
                    Some(ListingItem::File {
                        name: line.name,
                        size_bytes: line.size_bytes,
                        modified,
                    })
                } else {
                    // symlinks, sockets, devices and error text
                    None
                }
            })
            .collect()
    }
}
