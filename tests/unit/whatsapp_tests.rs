//! Unit tests for WhatsApp artifact recognition

#[cfg(test)]
mod tests {
    use droidex::models::{BackupKind, SourceApp};
    use droidex::services::whatsapp::{backup_kind, is_artifact, parse_artifacts, source_app};

    #[test]
    fn test_is_artifact() {
        assert!(is_artifact("msgstore.db.crypt15"));
        assert!(is_artifact("msgstore-2024-01-01.1.db.crypt14"));
        assert!(is_artifact("encrypted_backup.key"));
        assert!(is_artifact("wa.db"));
        assert!(is_artifact("msgstore.db.BAK"));
        assert!(!is_artifact("photo.jpg"));
    }

    #[test]
    fn test_backup_kind_priority() {
        assert_eq!(backup_kind("msgstore.db.crypt15"), BackupKind::Crypt15);
        assert_eq!(backup_kind("msgstore.db.crypt14"), BackupKind::Crypt14);
        assert_eq!(backup_kind("msgstore.db.crypt12"), BackupKind::Crypt12);
        assert_eq!(backup_kind("encrypted_backup.key"), BackupKind::Key);
        assert_eq!(backup_kind("wa.db"), BackupKind::Database);
        assert_eq!(backup_kind("msgstore"), BackupKind::Unknown);
        assert_eq!(BackupKind::Crypt15.description(), "crypt15 (Android 12+)");
    }

    #[test]
    fn test_source_app() {
        assert_eq!(
            source_app("/storage/emulated/0/WhatsApp/Databases/"),
            SourceApp::WhatsApp
        );
        assert_eq!(
            source_app("/storage/emulated/0/Android/media/com.whatsapp.w4b/WhatsApp Business/Databases/"),
            SourceApp::WhatsAppBusiness
        );
        assert_eq!(SourceApp::WhatsAppBusiness.file_prefix(), "wab_");
    }

    #[test]
    fn test_parse_artifacts_regular_files_only() {
        let output = "\
total 40
drwxrwx--x 2 u0_a123 media_rw 4096 2024-05-01 02:00 .
drwxrwx--x 2 u0_a123 media_rw 4096 2024-05-01 02:00 ..
-rw-rw---- 1 u0_a123 media_rw 1,234,567 2024-05-01 02:00 msgstore.db.crypt15
-rw-rw---- 1 u0_a123 media_rw 2048 2024-04-30 02:00 msgstore-2024-04-30.1.db.crypt15
-rw-rw---- 1 u0_a123 media_rw 12 2024-04-30 02:00 notes.txt
drwxrwx--x 2 u0_a123 media_rw 4096 2024-04-30 02:00 old.db
";
        let backups = parse_artifacts("/storage/emulated/0/WhatsApp/Databases/", output);
        assert_eq!(backups.len(), 2);
        assert_eq!(
            backups[0].path,
            "/storage/emulated/0/WhatsApp/Databases/msgstore.db.crypt15"
        );
        assert_eq!(backups[0].size_bytes, 1_234_567);
        assert_eq!(backups[0].modified, "2024-05-01 02:00");
        assert_eq!(backups[0].kind, BackupKind::Crypt15);
        assert_eq!(backups[0].source_app, SourceApp::WhatsApp);
        assert!(backups[0].local_path.is_none());
    }
}
