//! WhatsApp message databases, encrypted backups and key files.
//!
//! Each known WhatsApp root is listed once with `ls -la` (no recursion).
//! Artifacts are downloaded into a `whatsapp_backups` sub-directory with a
//! `wa_` / `wab_` prefix naming the application they came from.

use crate::device::{RemoteShell, quote_remote_path};
use crate::models::{BackupKind, SourceApp, WhatsAppBackup, WhatsAppExtraction};
use crate::services::categories::Category;
use crate::services::download::resolve_destination;
use crate::services::paths::join_remote;
use crate::services::traverse::detailed::parse_line;
use std::fs;
use std::io;
use std::path::Path;

/// Sub-directory of the destination receiving WhatsApp artifacts.
pub const BACKUP_DIR: &str = "whatsapp_backups";

/// Default WhatsApp roots, legacy and scoped-storage layouts.
pub const DEFAULT_WHATSAPP_ROOTS: [&str; 6] = [
    "/storage/emulated/0/WhatsApp/Databases/",
    "/storage/emulated/0/WhatsApp/Backups/",
    "/storage/emulated/0/Android/media/com.whatsapp/WhatsApp/Databases/",
    "/storage/emulated/0/Android/media/com.whatsapp/WhatsApp/Backups/",
    "/storage/emulated/0/WhatsApp Business/Databases/",
    "/storage/emulated/0/Android/media/com.whatsapp.w4b/WhatsApp Business/Databases/",
];

/// Whether a file name looks like a WhatsApp artifact.
#[must_use]
pub fn is_artifact(name: &str) -> bool {
    let lower = name.to_lowercase();
    Category::WhatsappBackup
        .extensions()
        .iter()
        .any(|ext| lower.ends_with(ext))
        || lower.contains("msgstore")
        || lower.contains("wa.db")
}

/// Backup kind by substring, most specific first.
#[must_use]
pub fn backup_kind(name: &str) -> BackupKind {
    let lower = name.to_lowercase();
    if lower.contains(".crypt15") {
        BackupKind::Crypt15
    } else if lower.contains(".crypt14") {
        BackupKind::Crypt14
    } else if lower.contains(".crypt12") {
        BackupKind::Crypt12
    } else if lower.contains(".key") {
        BackupKind::Key
    } else if lower.contains(".db") {
        BackupKind::Database
    } else {
        BackupKind::Unknown
    }
}

#[must_use]
pub fn source_app(root: &str) -> SourceApp {
    let lower = root.to_lowercase();
    if lower.contains("w4b") || lower.contains("business") {
        SourceApp::WhatsAppBusiness
    } else {
        SourceApp::WhatsApp
    }
}

/// Parse an `ls -la` listing of `root` into artifacts.
#[must_use]
pub fn parse_artifacts(root: &str, output: &str) -> Vec<WhatsAppBackup> {
    let app = source_app(root);
    output
        .lines()
        .filter_map(parse_line)
        .filter(|line| line.is_regular_file() && is_artifact(&line.name))
        .map(|line| WhatsAppBackup {
            path: join_remote(root, &line.name),
            kind: backup_kind(&line.name),
            modified: line.modified(),
            size_bytes: line.size_bytes,
            name: line.name,
            source_app: app,
            local_path: None,
        })
        .collect()
}

/// List every root and collect artifacts. Absent or unreadable roots are skipped.
pub fn find_backups<S: AsRef<str>>(shell: &dyn RemoteShell, roots: &[S]) -> Vec<WhatsAppBackup> {
    let mut backups = Vec::new();

    for root in roots {
        let root = root.as_ref();
        let command = format!("ls -la {} 2>/dev/null", quote_remote_path(root));
        let output = match shell.shell(&command) {
            Ok(output) => output,
            Err(err) => {
                log::debug!("WhatsApp root {root} unavailable: {err}");
                continue;
            }
        };

        if output.trim().is_empty() || output.contains("No such file") {
            continue;
        }

        log::info!("Scanning WhatsApp root {root}");
        backups.extend(parse_artifacts(root, &output));
    }

    backups
}

/// Find and download WhatsApp artifacts into `<destination>/whatsapp_backups`.
///
/// Nothing is created locally when no artifact is found.
pub fn extract_backups<S: AsRef<str>>(
    shell: &dyn RemoteShell,
    roots: &[S],
    destination: &Path,
) -> io::Result<WhatsAppExtraction> {
    let mut backups = find_backups(shell, roots);
    if backups.is_empty() {
        log::info!("No WhatsApp backups found");
        return Ok(WhatsAppExtraction::default());
    }

    let dir = destination.join(BACKUP_DIR);
    fs::create_dir_all(&dir)?;
    let dir = std::path::absolute(&dir)?;

    let total = backups.len();
    let mut downloaded = 0;
    let mut failed = 0;

    for (index, backup) in backups.iter_mut().enumerate() {
        let file_name = format!("{}{}", backup.source_app.file_prefix(), backup.name);
        let target = resolve_destination(&dir, &file_name);

        match shell.pull(&backup.path, &target) {
            Ok(()) => {
                log::info!(
                    "[{}/{total}] {} ({})",
                    index + 1,
                    backup.name,
                    backup.kind.description()
                );
                backup.local_path = Some(target);
                downloaded += 1;
            }
            Err(err) => {
                log::warn!("[{}/{total}] failed to pull {}: {err}", index + 1, backup.path);
                failed += 1;
            }
        }
    }

    Ok(WhatsAppExtraction {
        backups,
        downloaded,
        failed,
        destination: Some(dir),
    })
}
