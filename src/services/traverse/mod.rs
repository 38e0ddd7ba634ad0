//! Remote directory walker with per-directory listing strategy selection.
//!
//! Every directory is listed with the detailed strategy first; when the
//! command fails or its output does not look like `ls -l`, the simple
//! strategy is used for that directory only. Children make their own choice.
//!
//! - A directory whose listings both fail contributes no entries and is
//!   recorded as an [`ErrorItem`]; the walk carries on with its siblings.
//! - Losing the device ([`ShellError::Connection`]) ends the walk with an error.
//! - `.` and `..` are never descended into.
//! - The walk is iterative, so tree depth is bounded only by memory, and
//!   entries come out in depth-first listing order.

pub mod detailed;
pub mod detect;
pub mod simple;
pub mod strategy;

use crate::device::{RemoteShell, ShellError};
use crate::models::{DiscoveredEntry, ErrorItem};
use crate::services::categories::ExtensionFilter;
use crate::services::paths::join_remote;
use detailed::DetailedListing;
use simple::SimpleListing;
use strategy::ListingStrategy;

/// Enumeration of the supported listing formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// `ls -l`: permissions, size and timestamp per entry.
    #[default]
    Detailed,
    /// `ls -p`: names only, directories suffixed with `/`.
    Simple,
}

/// Normalized item produced by either listing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingItem {
    Directory {
        name: String,
    },
    File {
        name: String,
        size_bytes: u64,
        modified: String,
    },
}

/// Parsed listing of one directory along with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub strategy: StrategyKind,
    pub items: Vec<ListingItem>,
}

/// List one directory, falling back from detailed to simple listing.
pub fn list_directory(shell: &dyn RemoteShell, dir: &str) -> Result<DirectoryListing, ShellError> {
    let detailed = DetailedListing;
    match shell.shell(&detailed.command(dir)) {
        Ok(output) if detect::listing_format(&output) == StrategyKind::Detailed => {
            return Ok(DirectoryListing {
                strategy: detailed.kind(),
                items: detailed.parse(&output),
            });
        }
        Ok(_) => {
            log::warn!("Detailed listing of {dir} not recognised; falling back to simple listing");
        }
        Err(err @ ShellError::Connection { .. }) => return Err(err),
        Err(err) => {
            log::warn!("Detailed listing failed for {dir}: {err}; falling back to simple listing");
        }
    }

    let simple = SimpleListing;
    let output = shell.shell(&simple.command(dir))?;
    Ok(DirectoryListing {
        strategy: simple.kind(),
        items: simple.parse(&output),
    })
}

/// Entries and skipped directories collected by a walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub entries: Vec<DiscoveredEntry>,
    pub errors: Vec<ErrorItem>,
    pub detailed_dirs: usize,
    pub simple_dirs: usize,
}

/// Walk state shared across all roots of one scan.
pub struct WalkContext<'a> {
    filter: &'a ExtensionFilter,
    outcome: WalkOutcome,
    lost: Option<ShellError>,
}

impl<'a> WalkContext<'a> {
    #[must_use]
    pub fn new(filter: &'a ExtensionFilter) -> Self {
        Self {
            filter,
            outcome: WalkOutcome::default(),
            lost: None,
        }
    }

    fn record_file(&mut self, dir: &str, name: String, size_bytes: u64, modified: String) {
        let Some(extension) = self.filter.matching_extension(&name) else {
            return;
        };

        let entry = DiscoveredEntry {
            path: join_remote(dir, &name),
            name,
            size_bytes,
            modified,
            extension: extension.to_string(),
        };
        log::debug!("File entry: {} (size: {})", entry.path, entry.size_bytes);
        self.outcome.entries.push(entry);
    }

    fn record_error(&mut self, dir: &str, error: &ShellError) {
        log::warn!("Skipping {dir}: {error}");
        self.outcome.errors.push(ErrorItem {
            path: dir.to_string(),
            code: error.code().to_string(),
            message: error.to_string(),
        });
    }

    fn open(&mut self, shell: &dyn RemoteShell, dir: &str) -> Option<Frame> {
        match list_directory(shell, dir) {
            Ok(listing) => {
                match listing.strategy {
                    StrategyKind::Detailed => self.outcome.detailed_dirs += 1,
                    StrategyKind::Simple => self.outcome.simple_dirs += 1,
                }
                Some(Frame {
                    path: dir.to_string(),
                    items: listing.items.into_iter(),
                })
            }
            Err(err @ ShellError::Connection { .. }) => {
                log::error!("Device lost while listing {dir}: {err}");
                self.lost = Some(err);
                None
            }
            Err(err) => {
                self.record_error(dir, &err);
                None
            }
        }
    }

    /// Whether the device connection was lost during the walk.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.lost.is_some()
    }

    /// Finish the walk, failing when the device connection was lost.
    pub fn into_outcome(self) -> Result<WalkOutcome, ShellError> {
        match self.lost {
            Some(err) => Err(err),
            None => Ok(self.outcome),
        }
    }
}

struct Frame {
    path: String,
    items: std::vec::IntoIter<ListingItem>,
}

/// Walk a single root, appending matching files to the context.
pub fn walk_root(shell: &dyn RemoteShell, root: &str, context: &mut WalkContext<'_>) {
    let mut stack: Vec<Frame> = Vec::new();
    if let Some(frame) = context.open(shell, root) {
        stack.push(frame);
    }

    while let Some(frame) = stack.last_mut() {
        if context.is_lost() {
            return;
        }
        let Some(item) = frame.items.next() else {
            stack.pop();
            continue;
        };

        match item {
            ListingItem::Directory { name } => {
                let child = join_remote(&frame.path, &name);
                if let Some(child_frame) = context.open(shell, &child) {
                    stack.push(child_frame);
                }
            }
            ListingItem::File {
                name,
                size_bytes,
                modified,
            } => {
                context.record_file(&frame.path, name, size_bytes, modified);
            }
        }
    }
}

/// Walk every root in order and collect files matching `filter`.
pub fn walk<S: AsRef<str>>(
    shell: &dyn RemoteShell,
    roots: &[S],
    filter: &ExtensionFilter,
) -> Result<WalkOutcome, ShellError> {
    let mut context = WalkContext::new(filter);
    for root in roots {
        if context.is_lost() {
            break;
        }
        log::info!("Scanning {}", root.as_ref());
        walk_root(shell, root.as_ref(), &mut context);
    }

    let outcome = context.into_outcome()?;
    log::debug!(
        "Walk finished: {} entries, {} detailed / {} simple listings, {} skipped",
        outcome.entries.len(),
        outcome.detailed_dirs,
        outcome.simple_dirs,
        outcome.errors.len()
    );
    Ok(outcome)
}
