//! Core services for discovery, download, metadata and artifact extraction

pub mod aggregate;
pub mod calls;
pub mod categories;
pub mod download;
pub mod evaluation;
pub mod format;
pub mod metadata;
pub mod paths;
pub mod progress;
pub mod traverse;
pub mod whatsapp;
