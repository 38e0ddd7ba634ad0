//! Integration tests for error classification

#[cfg(test)]
mod tests {
    use crate::fixtures::ScriptedShell;
    use droidex::{Error, ScanOptions, ShellError};

    #[test]
    fn test_no_roots_is_invalid_input() {
        let shell = ScriptedShell::new();
        let opts = ScanOptions {
            default_roots: Vec::new(),
            ..ScanOptions::default()
        };

        let result = droidex::scan(&shell, &opts);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(shell.commands().is_empty());
    }

    #[test]
    fn test_shell_error_codes() {
        let connection = ShellError::Connection {
            message: "no devices/emulators found".to_string(),
        };
        let command = ShellError::CommandFailed {
            command: "ls -l \"/data/\"".to_string(),
            message: "Permission denied".to_string(),
        };
        let transfer = ShellError::Transfer {
            remote: "/r/a.jpg".to_string(),
            local: "out/a.jpg".to_string(),
            message: "remote object does not exist".to_string(),
        };
        let io = ShellError::from(std::io::Error::other("disk full"));

        assert_eq!(connection.code(), "CONNECTION");
        assert_eq!(command.code(), "COMMAND");
        assert_eq!(transfer.code(), "TRANSFER");
        assert_eq!(io.code(), "IO");
        assert!(command.to_string().contains("Permission denied"));
    }

    #[test]
    fn test_library_error_conversions() {
        let err: Error = ShellError::Connection {
            message: "device offline".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Connection(_)));
        assert!(err.to_string().contains("device offline"));

        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_failed_simple_listing_reports_last_error() {
        let shell = ScriptedShell::new().unreadable("/data/");
        let opts = ScanOptions {
            paths: vec!["/data/".to_string()],
            ..ScanOptions::default()
        };

        let result = droidex::scan(&shell, &opts).unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "COMMAND");
        assert!(result.errors[0].message.contains("ls -p"));
    }
}
