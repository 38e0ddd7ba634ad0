//! Remote shell abstraction over an attached Android device.
//!
//! Discovery and download code only ever talks to a [`RemoteShell`]; the adb
//! client lives in [`adb`]. A failed command is always an `Err`, never an empty
//! string, so an empty directory can be told apart from an unreadable one.

pub mod adb;

use crate::models::DeviceInfo;
use std::path::Path;
use thiserror::Error;

/// Errors reported by a remote shell backend.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The device (or the adb client itself) is unreachable.
    #[error("cannot reach device: {message}")]
    Connection { message: String },

    /// The shell command ran but reported a failure.
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// A file transfer from the device failed.
    #[error("pull {remote} -> {local} failed: {message}")]
    Transfer {
        remote: String,
        local: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Short machine-readable code used in scan error records.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ShellError::Connection { .. } => "CONNECTION",
            ShellError::CommandFailed { .. } => "COMMAND",
            ShellError::Transfer { .. } => "TRANSFER",
            ShellError::Io(_) => "IO",
        }
    }
}

/// Minimal device interface consumed by the discovery engine.
pub trait RemoteShell {
    /// Run a shell command on the device and return its text output.
    fn shell(&self, command: &str) -> Result<String, ShellError>;

    /// Copy a remote file to a local path.
    fn pull(&self, remote: &str, local: &Path) -> Result<(), ShellError>;

    /// Serial number of the attached device.
    fn device_serial(&self) -> &str;
}

/// Quote a remote path for `sh`, escaping characters that stay special
/// inside double quotes.
#[must_use]
pub fn quote_remote_path(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('"');
    for ch in path.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Read brand, model, Android release and serial from the device.
///
/// Failing here means the device is not usable at all, so every error is
/// reported as a connection error.
pub fn device_info(shell: &dyn RemoteShell) -> Result<DeviceInfo, ShellError> {
    let prop = |name: &str| -> Result<String, ShellError> {
        shell
            .shell(&format!("getprop {name}"))
            .map(|value| value.trim().to_string())
            .map_err(|err| match err {
                ShellError::Connection { .. } => err,
                other => ShellError::Connection {
                    message: other.to_string(),
                },
            })
    };

    Ok(DeviceInfo {
        brand: prop("ro.product.brand")?,
        model: prop("ro.product.model")?,
        android_version: prop("ro.build.version.release")?,
        serial: shell.device_serial().to_string(),
    })
}
