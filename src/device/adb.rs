//! `adb` client backend for [`RemoteShell`].
//!
//! Every operation spawns the adb client and blocks until it exits. There is
//! no timeout: an unresponsive device blocks the caller.

use super::{RemoteShell, ShellError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Connected device reached through the `adb` executable.
#[derive(Debug, Clone)]
pub struct AdbShell {
    adb_path: PathBuf,
    serial: String,
}

/// One line of `adb devices` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceListing {
    pub serial: String,
    pub state: String,
}

impl AdbShell {
    /// Select a device and return a shell bound to its serial.
    ///
    /// With `preferred_serial` the device must be listed in `device` state;
    /// otherwise the first ready device wins.
    pub fn connect(adb_path: &Path, preferred_serial: Option<&str>) -> Result<Self, ShellError> {
        let output = run_adb(adb_path, &["devices"])?;
        if !output.status.success() {
            return Err(ShellError::Connection {
                message: stderr_text(&output),
            });
        }

        let devices = parse_device_list(&String::from_utf8_lossy(&output.stdout));
        log::debug!("adb reports {} device(s)", devices.len());

        let selected = match preferred_serial {
            Some(serial) => devices
                .iter()
                .find(|d| d.serial == serial)
                .ok_or_else(|| ShellError::Connection {
                    message: format!("device '{serial}' not found"),
                })?,
            None => devices
                .iter()
                .find(|d| d.state == "device")
                .ok_or_else(|| ShellError::Connection {
                    message: "no device attached".to_string(),
                })?,
        };

        if selected.state != "device" {
            return Err(ShellError::Connection {
                message: format!("device '{}' is {}", selected.serial, selected.state),
            });
        }

        log::info!("Connected to device {}", selected.serial);

        Ok(Self {
            adb_path: adb_path.to_path_buf(),
            serial: selected.serial.clone(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<Output, ShellError> {
        let mut full = Vec::with_capacity(args.len() + 2);
        full.push("-s");
        full.push(self.serial.as_str());
        full.extend_from_slice(args);
        run_adb(&self.adb_path, &full)
    }

    fn is_connection_failure(&self, stderr: &str) -> bool {
        let lowered = stderr.to_lowercase();
        lowered.contains("no devices")
            || lowered.contains("device offline")
            || lowered.contains("device unauthorized")
            || lowered.contains(&format!("device '{}' not found", self.serial.to_lowercase()))
    }
}

impl RemoteShell for AdbShell {
    fn shell(&self, command: &str) -> Result<String, ShellError> {
        log::trace!("adb -s {} shell {command}", self.serial);
        let output = self.run(&["shell", command])?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if output.status.success() || !stdout.trim().is_empty() {
            return Ok(stdout);
        }

        let stderr = stderr_text(&output);
        if self.is_connection_failure(&stderr) {
            return Err(ShellError::Connection { message: stderr });
        }

        Err(ShellError::CommandFailed {
            command: command.to_string(),
            message: if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            },
        })
    }

    fn pull(&self, remote: &str, local: &Path) -> Result<(), ShellError> {
        let local_str = local.to_string_lossy();
        log::trace!("adb -s {} pull {remote} {local_str}", self.serial);
        let output = self.run(&["pull", remote, &local_str])?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = stderr_text(&output);
        if self.is_connection_failure(&stderr) {
            return Err(ShellError::Connection { message: stderr });
        }

        Err(ShellError::Transfer {
            remote: remote.to_string(),
            local: local_str.into_owned(),
            message: stderr,
        })
    }

    fn device_serial(&self) -> &str {
        &self.serial
    }
}

/// Parse `adb devices` output into serial/state pairs.
#[must_use]
pub fn parse_device_list(output: &str) -> Vec<DeviceListing> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            let state = parts.next()?;
            Some(DeviceListing {
                serial: serial.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}

fn run_adb(adb_path: &Path, args: &[&str]) -> Result<Output, ShellError> {
    Command::new(adb_path)
        .args(args)
        .output()
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ShellError::Connection {
                message: format!("adb executable not found: {}", adb_path.display()),
            },
            _ => ShellError::Connection {
                message: format!("failed to run {}: {err}", adb_path.display()),
            },
        })
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
