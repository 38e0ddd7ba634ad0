//! Persistence of evaluations

pub mod snapshot;
