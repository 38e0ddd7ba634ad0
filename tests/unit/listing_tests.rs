//! Unit tests for listing format detection and parsing

#[cfg(test)]
mod tests {
    use droidex::services::traverse::detailed::{DetailedListing, parse_line, parse_size};
    use droidex::services::traverse::detect::listing_format;
    use droidex::services::traverse::simple::SimpleListing;
    use droidex::services::traverse::strategy::ListingStrategy;
    use droidex::services::traverse::{ListingItem, StrategyKind, list_directory};
    use crate::fixtures::{ScriptedShell, capture_logs, detailed_cmd, logged, simple_cmd};
    use droidex::ShellError;

    const DETAILED: &str = "\
total 24
drwxrwx--x 2 u0_a123 media_rw 4096 2024-01-01 09:00 .
drwxrwx--x 5 u0_a123 media_rw 4096 2024-01-01 09:00 ..
drwxrwx--x 2 u0_a123 media_rw 4096 2024-01-01 09:00 Camera
-rw-rw---- 1 u0_a123 media_rw 1024 2024-01-01 10:00 photo.jpg
-rw-rw---- 1 u0_a123 media_rw 2,048 2024-01-02 11:30 My Holiday Video.mp4
lrwxrwxrwx 1 root root 21 2024-01-01 09:00 sdcard -> /storage/self/primary
";

    #[test]
    fn test_detect_detailed_output() {
        assert_eq!(listing_format(DETAILED), StrategyKind::Detailed);
    }

    #[test]
    fn test_detect_needs_five_fields_on_one_line() {
        assert_eq!(listing_format("a b c d e"), StrategyKind::Detailed);
        assert_eq!(listing_format("a b c d\nx y"), StrategyKind::Simple);
        assert_eq!(listing_format(""), StrategyKind::Simple);
        assert_eq!(listing_format("photo.jpg\nsub/\n"), StrategyKind::Simple);
    }

    #[test]
    fn test_parse_line_fields() {
        let line = parse_line("-rw-rw---- 1 u0_a123 media_rw 1024 2024-01-01 10:00 photo.jpg").unwrap();
        assert!(line.is_regular_file());
        assert!(!line.is_directory());
        assert_eq!(line.size_bytes, 1024);
        assert_eq!(line.modified(), "2024-01-01 10:00");
        assert_eq!(line.name, "photo.jpg");
    }

    #[test]
    fn test_parse_line_rejects_short_lines() {
        assert!(parse_line("total 24").is_none());
        assert!(parse_line("-rw-rw---- 1 u0_a123 media_rw 1024 2024-01-01 10:00").is_none());
    }

    #[test]
    fn test_parse_line_joins_names_with_spaces() {
        let line = parse_line("-rw-rw---- 1 u g 5 2024-01-01 10:00 a  b   c.txt").unwrap();
        assert_eq!(line.name, "a b c.txt");
    }

    #[test]
    fn test_parse_size_defaults_to_zero() {
        assert_eq!(parse_size("1,048,576"), 1_048_576);
        assert_eq!(parse_size("12K"), 0);
        assert_eq!(parse_size("?"), 0);
    }

    #[test]
    fn test_detailed_parse_skips_dots_and_special_entries() {
        let items = DetailedListing.parse(DETAILED);
        assert_eq!(
            items,
            vec![
                ListingItem::Directory {
                    name: "Camera".to_string()
                },
                ListingItem::File {
                    name: "photo.jpg".to_string(),
                    size_bytes: 1024,
                    modified: "2024-01-01 10:00".to_string(),
                },
                ListingItem::File {
                    name: "My Holiday Video.mp4".to_string(),
                    size_bytes: 2048,
                    modified: "2024-01-02 11:30".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_simple_parse_tokens() {
        let items = SimpleListing.parse("photo.jpg  sub/\nnotes.txt\n./\n../\n");
        assert_eq!(
            items,
            vec![
                ListingItem::File {
                    name: "photo.jpg".to_string(),
                    size_bytes: 0,
                    modified: String::new(),
                },
                ListingItem::Directory {
                    name: "sub/".to_string()
                },
                ListingItem::File {
                    name: "notes.txt".to_string(),
                    size_bytes: 0,
                    modified: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_commands_quote_directory() {
        assert_eq!(
            DetailedListing.command("/sdcard/My Files/"),
            "ls -l \"/sdcard/My Files/\""
        );
        assert_eq!(SimpleListing.command("/a/$b"), "ls -p \"/a/\\$b\"");
    }

    #[test]
    fn test_list_directory_falls_back_per_call() {
        let shell = ScriptedShell::new()
            .detailed("/a/", "x.jpg\n")
            .simple("/a/", "x.jpg\n");

        let listing = list_directory(&shell, "/a/").unwrap();

        assert_eq!(listing.strategy, StrategyKind::Simple);
        assert_eq!(shell.commands(), [detailed_cmd("/a/"), simple_cmd("/a/")]);
    }

    #[test]
    fn test_list_directory_does_not_fall_back_when_device_lost() {
        let shell = ScriptedShell::new().disconnect_on(&detailed_cmd("/a/"));

        let result = list_directory(&shell, "/a/");

        assert!(matches!(result, Err(ShellError::Connection { .. })));
        assert_eq!(shell.commands(), [detailed_cmd("/a/")]);
    }

    #[test]
    fn test_unrecognised_detailed_output_warns_on_fallback() {
        capture_logs();
        let shell = ScriptedShell::new()
            .detailed("/unrecognised/", "ls: bad option\n")
            .simple("/unrecognised/", "a.jpg\n");

        let listing = list_directory(&shell, "/unrecognised/").unwrap();

        assert_eq!(listing.strategy, StrategyKind::Simple);
        let warnings = logged(log::Level::Warn, "/unrecognised/");
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("simple listing"));
    }
}
