//! Integration tests for evaluation snapshots

#[cfg(test)]
mod tests {
    use crate::fixtures::{evaluation_options as options, scripted_device};
    use droidex::io::snapshot::{read_snapshot, write_snapshot};
    use droidex::models::{CallType, Evaluation};
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_evaluation_survives_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let shell = scripted_device().fail_pull("/r/notes.txt");
        let evaluation = droidex::evaluate(&shell, &options(&temp_dir.path().join("out"))).unwrap();
        assert_eq!(evaluation.extraction.failed, 1);

        let snapshot = temp_dir.path().join("case").join("session.parquet");
        write_snapshot(&snapshot, &evaluation).unwrap();
        let restored = read_snapshot(&snapshot).unwrap();

        assert_eq!(
            serde_json::to_value(&restored).unwrap(),
            serde_json::to_value(&evaluation).unwrap()
        );
        assert_eq!(restored.extraction.errors[0].path, "/r/notes.txt");
        assert_eq!(restored.calls[0].call_type, CallType::Outgoing);
        assert_eq!(restored.calls[0].date, evaluation.calls[0].date);
    }

    #[test]
    fn test_minimal_evaluation_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let evaluation = Evaluation {
            started_at: "2024-01-01T10:00:00+00:00".to_string(),
            finished_at: "2024-01-01T10:05:00+00:00".to_string(),
            ..Evaluation::default()
        };

        let snapshot = temp_dir.path().join("empty.parquet");
        write_snapshot(&snapshot, &evaluation).unwrap();
        let restored = read_snapshot(&snapshot).unwrap();

        assert_eq!(restored.started_at, evaluation.started_at);
        assert!(restored.files.is_empty());
        assert!(restored.calls.is_empty());
        assert!(restored.whatsapp.is_none());
        assert!(restored.extraction.destination.is_none());
    }

    #[test]
    fn test_empty_whatsapp_section_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = options(&temp_dir.path().join("out"));
        opts.whatsapp_roots = Some(vec!["/nowhere/".to_string()]);
        let evaluation = droidex::evaluate(&scripted_device(), &opts).unwrap();

        let snapshot = temp_dir.path().join("s.parquet");
        write_snapshot(&snapshot, &evaluation).unwrap();
        let restored = read_snapshot(&snapshot).unwrap();

        let whatsapp = restored.whatsapp.unwrap();
        assert!(whatsapp.backups.is_empty());
        assert_eq!(whatsapp.downloaded, 0);
    }

    #[test]
    fn test_not_a_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let bogus = temp_dir.path().join("bogus.parquet");
        std::fs::write(&bogus, b"PAR1 but not really").unwrap();

        let err = read_snapshot(&bogus).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let missing = read_snapshot(&temp_dir.path().join("absent.parquet")).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }
}
