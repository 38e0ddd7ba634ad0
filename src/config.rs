//! Extractor configuration loaded from TOML with built-in defaults.
//!
//! Every field is optional in the file. `DROIDEX_ADB` overrides the adb
//! binary and `ANDROID_SERIAL` selects the device when no serial is set.

use crate::services::calls::DEFAULT_UTC_OFFSET_HOURS;
use crate::services::whatsapp::DEFAULT_WHATSAPP_ROOTS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Media roots scanned when the caller supplies no paths.
pub const DEFAULT_ROOTS: [&str; 8] = [
    "/storage/emulated/0/DCIM/",
    "/storage/emulated/0/Pictures/",
    "/storage/emulated/0/Download/",
    "/storage/emulated/0/Documents/",
    "/storage/emulated/0/Music/",
    "/storage/emulated/0/Movies/",
    "/storage/emulated/0/WhatsApp/Media/",
    "/storage/emulated/0/Telegram/",
];

pub const DEFAULT_DESTINATION: &str = "extracted_files";

pub const ADB_ENV: &str = "DROIDEX_ADB";
pub const SERIAL_ENV: &str = "ANDROID_SERIAL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub adb_path: PathBuf,
    pub serial: Option<String>,
    pub default_roots: Vec<String>,
    pub whatsapp_roots: Vec<String>,
    pub destination: PathBuf,
    /// Size of the metadata worker pool; the global rayon pool when unset.
    pub metadata_workers: Option<usize>,
    pub call_log_utc_offset_hours: i32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            serial: None,
            default_roots: DEFAULT_ROOTS.iter().map(|r| (*r).to_string()).collect(),
            whatsapp_roots: DEFAULT_WHATSAPP_ROOTS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            metadata_workers: None,
            call_log_utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl ExtractorConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply environment overrides.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(adb) = lookup(ADB_ENV).filter(|v| !v.is_empty()) {
            self.adb_path = PathBuf::from(adb);
        }
        if self.serial.is_none() {
            self.serial = lookup(SERIAL_ENV).filter(|v| !v.is_empty());
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.metadata_workers == Some(0) {
            return Err(Error::Config("metadata_workers must be at least 1".to_string()));
        }
        if !(-12..=14).contains(&self.call_log_utc_offset_hours) {
            return Err(Error::Config(format!(
                "call_log_utc_offset_hours out of range: {}",
                self.call_log_utc_offset_hours
            )));
        }
        Ok(())
    }
}
