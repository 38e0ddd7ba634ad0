//! Integration tests for scan-and-download

#[cfg(test)]
mod tests {
    use crate::fixtures::{ScriptedShell, dir_line, file_line, listing};
    use droidex::services::categories::Category;
    use droidex::services::progress::ProgressNotifier;
    use droidex::{Error, ExtractOptions, ScanOptions};
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn options(paths: &[&str], destination: &Path) -> ExtractOptions {
        ExtractOptions {
            scan: ScanOptions {
                paths: paths.iter().map(|p| (*p).to_string()).collect(),
                ..ScanOptions::default()
            },
            destination: destination.to_path_buf(),
            progress_notifier: None,
        }
    }

    fn two_photos() -> ScriptedShell {
        ScriptedShell::new()
            .detailed("/r/", &listing(&[dir_line("a"), dir_line("b")]))
            .detailed("/r/a", &listing(&[file_line(3, "photo.jpg")]))
            .detailed("/r/b", &listing(&[file_line(4, "photo.jpg")]))
            .file("/r/a/photo.jpg", b"aaa")
            .file("/r/b/photo.jpg", b"bbbb")
    }

    #[test]
    fn test_collisions_get_numbered_names() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("evidence");
        let shell = two_photos();

        let result = droidex::extract_files(&shell, &options(&["/r/"], &dest)).unwrap();

        assert_eq!(result.scanned, 2);
        assert_eq!(result.downloaded, 2);
        assert_eq!(result.failed, 0);
        assert_eq!(result.categories.get(&Category::Images), Some(&2));
        assert_eq!(fs::read(dest.join("photo.jpg")).unwrap(), b"aaa");
        assert_eq!(fs::read(dest.join("photo_1.jpg")).unwrap(), b"bbbb");

        let locals: Vec<_> = result.files.iter().map(|f| f.local_path.clone()).collect();
        assert_eq!(locals, [dest.join("photo.jpg"), dest.join("photo_1.jpg")]);
        assert_eq!(result.files[1].entry.path, "/r/b/photo.jpg");
    }

    #[test]
    fn test_existing_files_are_never_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("evidence");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("photo.jpg"), b"earlier run").unwrap();

        let result = droidex::extract_files(&two_photos(), &options(&["/r/"], &dest)).unwrap();

        assert_eq!(result.downloaded, 2);
        assert_eq!(fs::read(dest.join("photo.jpg")).unwrap(), b"earlier run");
        assert_eq!(fs::read(dest.join("photo_1.jpg")).unwrap(), b"aaa");
        assert_eq!(fs::read(dest.join("photo_2.jpg")).unwrap(), b"bbbb");
    }

    #[test]
    fn test_nothing_matched_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("evidence");
        let shell = ScriptedShell::new().detailed("/r/", &listing(&[file_line(1, "notes")]));

        let result = droidex::extract_files(&shell, &options(&["/r/"], &dest)).unwrap();

        assert_eq!(result.scanned, 0);
        assert_eq!(result.downloaded, 0);
        assert_eq!(result.failed, 0);
        assert!(result.destination.is_none());
        assert!(result.files.is_empty());
        assert!(!dest.exists());
        assert!(shell.pulls().is_empty());
    }

    #[test]
    fn test_failed_pull_is_counted() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("evidence");
        let shell = ScriptedShell::new()
            .detailed(
                "/r/",
                &listing(&[file_line(1, "a.jpg"), file_line(2, "b.mp4"), file_line(3, "c.pdf")]),
            )
            .file("/r/a.jpg", b"a")
            .fail_pull("/r/b.mp4")
            .file("/r/c.pdf", b"c");

        let result = droidex::extract_files(&shell, &options(&["/r/"], &dest)).unwrap();

        assert_eq!(result.scanned, 3);
        assert_eq!(result.downloaded, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.scanned, result.downloaded + result.failed);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/r/b.mp4");
        assert_eq!(result.errors[0].code, "TRANSFER");
        assert_eq!(shell.pulls(), ["/r/a.jpg", "/r/b.mp4", "/r/c.pdf"]);
    }

    #[test]
    fn test_destination_is_absolute() {
        let shell = ScriptedShell::new()
            .detailed("/r/", &listing(&[file_line(1, "a.jpg")]))
            .file("/r/a.jpg", b"a");
        let temp_dir = TempDir::new().unwrap();

        let result = droidex::extract_files(&shell, &options(&["/r/"], temp_dir.path())).unwrap();

        let destination = result.destination.unwrap();
        assert!(destination.is_absolute());
        assert!(result.files[0].local_path.starts_with(&destination));
    }

    #[test]
    fn test_destination_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("evidence");
        fs::write(&blocker, b"not a directory").unwrap();
        let shell = ScriptedShell::new()
            .detailed("/r/", &listing(&[file_line(1, "a.jpg")]))
            .file("/r/a.jpg", b"a");

        let result = droidex::extract_files(&shell, &options(&["/r/"], &blocker));

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(shell.pulls().is_empty());
    }

    #[test]
    fn test_progress_reports_final_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let notifier: ProgressNotifier = Arc::new(move |snapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        });

        let mut opts = options(&["/r/"], &temp_dir.path().join("out"));
        opts.progress_notifier = Some(notifier);
        droidex::extract_files(&two_photos(), &opts).unwrap();

        let seen = seen.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.processed, 2);
        assert_eq!(last.total, 2);
        assert_eq!(last.downloaded, 2);
    }
}
