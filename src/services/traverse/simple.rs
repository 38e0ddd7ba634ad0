//! `ls -p` listing backend, used when the detailed listing is unusable.
//!
//! Only names are available: a token ending in `/` is a directory, anything
//! else is a file with unknown size and timestamp. Names containing spaces
//! are split into several tokens; that loss is accepted in this mode.

use super::strategy::ListingStrategy;
use super::{ListingItem, StrategyKind};
use crate::device::quote_remote_path;

/// Simple (`ls -p`) listing strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleListing;

impl ListingStrategy for SimpleListing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Simple
    }

    fn command(&self, dir: &str) -> String {
        format!("ls -p {}", quote_remote_path(dir))
    }

    fn parse(&self, output: &str) -> Vec<ListingItem> {
        output
            .split_whitespace()
            .filter_map(|token| {
                if token.ends_with('/') {
                    let bare = token.trim_end_matches('/');
                    if bare.is_empty() || bare == "." || bare == ".." {
                        return None;
                    }
                    Some(ListingItem::Directory {
                        name: token.to_string(),
                    })
                } else {
                    Some(ListingItem::File {
                        name: token.to_string(),
                        size_bytes: 0,
                        modified: String::new(),
                    })
                }
            })
            .collect()
    }
}
