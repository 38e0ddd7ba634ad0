//! Strategy trait shared by the directory listing backends.

use super::{ListingItem, StrategyKind};

/// A way of listing one remote directory and parsing the result.
pub trait ListingStrategy {
    /// Identify the strategy for logging and diagnostics.
    fn kind(&self) -> StrategyKind;

    /// Shell command listing `dir`.
    fn command(&self, dir: &str) -> String;

    /// Parse raw command output into directory and file items.
    fn parse(&self, output: &str) -> Vec<ListingItem>;
}
