//! Path utilities for archive entry names.

/// Replace backslashes with forward slashes.
///
/// Archive entry names always use `/`, regardless of the host platform.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Final component of an archive entry name.
///
/// Both `/` and `\` count as separators, since some tools write Windows
/// separators into zip entry names. A trailing separator is ignored.
pub fn entry_base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Join archive path segments with `/`, normalizing separators.
pub fn join_entry(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches(['/', '\\']);
    to_forward_slashes(&format!("{}/{}", dir, name))
}
