//! Contract tests for the JSON emitted by `--json` output

#[cfg(test)]
mod tests {
    use crate::fixtures::{ScriptedShell, file_line, listing};
    use droidex::ScanOptions;
    use droidex::cli::output::format_json;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_result_shape() {
        let shell = ScriptedShell::new().detailed(
            "/r/",
            &listing(&[file_line(1024, "photo.jpg"), file_line(9, "Song.MP3")]),
        );
        let opts = ScanOptions {
            paths: vec!["/r/".to_string()],
            ..ScanOptions::default()
        };
        let result = droidex::scan(&shell, &opts).unwrap();

        let json: Value = serde_json::from_str(&format_json(&result)).unwrap();

        assert_eq!(json["total_entries"], 2);
        assert_eq!(json["categories"]["images"], 1);
        assert_eq!(json["categories"]["audio"], 1);
        assert!(json["categories"].get("videos").is_none());
        assert_eq!(json["roots"][0], "/r/");
        assert!(json["errors"].as_array().unwrap().is_empty());

        let entry = &json["entries"][0];
        assert_eq!(entry["path"], "/r/photo.jpg");
        assert_eq!(entry["name"], "photo.jpg");
        assert_eq!(entry["size_bytes"], 1024);
        assert_eq!(entry["modified"], "2024-01-01 10:00");
        assert_eq!(entry["extension"], ".jpg");
        assert_eq!(json["entries"][1]["extension"], ".mp3");
    }

    #[test]
    fn test_metadata_record_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let record = droidex::extract_file_metadata(&path);
        let json: Value = serde_json::from_str(&format_json(&record)).unwrap();

        for key in [
            "size_bytes",
            "extension",
            "created_at",
            "modified_at",
            "hash_sha256",
            "mime_type",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["extension"], ".pdf");
        assert_eq!(json["mime_type"], "application/pdf");
        assert_eq!(json["hash_sha256"].as_str().unwrap().len(), 64);
        // absent optional sections are omitted entirely
        assert!(json.get("image").is_none());
        assert!(json.get("hash_error").is_none());
        assert!(json.get("error_extraction").is_none());
    }

    #[test]
    fn test_category_keys_are_snake_case() {
        let shell = ScriptedShell::new().detailed(
            "/r/",
            &listing(&[file_line(1, "msgstore.db.crypt15")]),
        );
        let opts = ScanOptions {
            paths: vec!["/r/".to_string()],
            ..ScanOptions::default()
        };
        let result = droidex::scan(&shell, &opts).unwrap();

        let json: Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["categories"]["whatsapp_backup"], 1);
    }
}
