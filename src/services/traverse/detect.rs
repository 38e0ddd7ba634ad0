//! Listing format detection for strategy selection.

use super::StrategyKind;

/// Minimum whitespace-separated fields a line needs to look like `ls -l`.
pub const DETAILED_MIN_FIELDS: usize = 5;

/// Decide which listing format a raw `ls -l` response holds.
///
/// The response counts as detailed when at least one line has
/// [`DETAILED_MIN_FIELDS`] or more fields; anything else (including empty
/// output) calls for the simple listing.
#[must_use]
pub fn listing_format(output: &str) -> StrategyKind {
    let detailed = output
        .lines()
        .any(|line| line.split_whitespace().count() >= DETAILED_MIN_FIELDS);

    if detailed {
        StrategyKind::Detailed
    } else {
        StrategyKind::Simple
    }
}
