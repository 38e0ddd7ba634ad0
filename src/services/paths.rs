//! Remote path joining and file name splitting helpers.

/// Join a remote directory and a child name with a single `/`.
///
/// Absolute child names replace the base. A trailing `/` on the child is
/// preserved (simple listings mark directories that way).
#[must_use]
pub fn join_remote(base: &str, name: &str) -> String {
    if name.starts_with('/') || base.is_empty() {
        name.to_string()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Final component of a remote path (text after the last `/`).
#[must_use]
pub fn remote_base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a file name into stem and extension (with its leading dot).
///
/// Leading dots belong to the stem, so `.nomedia` has no extension and
/// `archive.tar.gz` splits as (`archive.tar`, `.gz`).
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(idx) if idx > leading_dots => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Lower-cased extension of a file name, or an empty string.
#[must_use]
pub fn lowercase_extension(name: &str) -> String {
    split_extension(name).1.to_lowercase()
}
