//! Integration tests for partial failures during a walk

#[cfg(test)]
mod tests {
    use crate::fixtures::{ScriptedShell, detailed_cmd, dir_line, file_line, listing};
    use droidex::{Error, ScanOptions, ShellError};

    fn options(paths: &[&str]) -> ScanOptions {
        ScanOptions {
            paths: paths.iter().map(|p| (*p).to_string()).collect(),
            ..ScanOptions::default()
        }
    }

    #[test]
    fn test_unreadable_directory_is_skipped() {
        let shell = ScriptedShell::new()
            .detailed(
                "/r/",
                &listing(&[dir_line("bad"), dir_line("good"), file_line(5, "root.png")]),
            )
            .unreadable("/r/bad")
            .detailed("/r/good", &listing(&[file_line(9, "ok.pdf")]));

        let result = droidex::scan(&shell, &options(&["/r/"])).unwrap();

        let paths: Vec<_> = result.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/r/good/ok.pdf", "/r/root.png"]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/r/bad");
        assert_eq!(result.errors[0].code, "COMMAND");
        assert!(result.errors[0].message.contains("Permission denied"));
    }

    #[test]
    fn test_unreadable_root_does_not_stop_other_roots() {
        let shell = ScriptedShell::new()
            .unreadable("/missing/")
            .detailed("/r/", &listing(&[file_line(1, "a.mp3")]));

        let result = droidex::scan(&shell, &options(&["/missing/", "/r/"])).unwrap();

        assert_eq!(result.total_entries, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "/missing/");
    }

    #[test]
    fn test_connection_loss_fails_scan() {
        let shell = ScriptedShell::new()
            .detailed("/r/", &listing(&[dir_line("a"), dir_line("b")]))
            .disconnect_on(&detailed_cmd("/r/a"));

        let result = droidex::scan(&shell, &options(&["/r/", "/s/"]));

        assert!(matches!(
            result,
            Err(Error::Connection(ShellError::Connection { .. }))
        ));
        // nothing is listed after the device goes away
        let commands = shell.commands();
        assert_eq!(commands.last(), Some(&detailed_cmd("/r/a")));
        assert!(!commands.contains(&detailed_cmd("/r/b")));
        assert!(!commands.contains(&detailed_cmd("/s/")));
    }

    #[test]
    fn test_connection_loss_fails_extract() {
        let shell = ScriptedShell::new().disconnect_on(&detailed_cmd("/r/"));
        let dest = tempfile::TempDir::new().unwrap();
        let opts = droidex::ExtractOptions {
            scan: options(&["/r/"]),
            destination: dest.path().join("out"),
            progress_notifier: None,
        };

        let result = droidex::extract_files(&shell, &opts);

        assert!(matches!(result, Err(Error::Connection(_))));
        assert!(!dest.path().join("out").exists());
    }
}
