//! Module version lookup and bumping.
//!
//! Versions here are loose dotted strings, not semver: whatever the source
//! archive declares is carried forward, and the bump degrades instead of
//! failing on input it cannot interpret.

use std::io::{self, BufRead, BufReader, Read};

use crate::core::source::SourceArchive;

/// Version assumed when the source archive does not declare one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Key prefix of the version line in `module.properties`.
pub const VERSION_KEY: &str = "module.version=";

/// Path of the properties member for a module.
pub fn properties_path(module_name: &str) -> String {
    format!("{}/module/{}/module.properties", super::NAMESPACE, module_name)
}

/// Outcome of looking up the current version in a source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    /// `module.version=` was found in the properties member.
    Declared(String),
    /// The properties member exists but has no version line.
    MissingKey,
    /// The archive has no properties member for this module.
    MissingMember,
}

impl VersionLookup {
    /// The version to continue from. Both fallbacks collapse to
    /// [`DEFAULT_VERSION`].
    pub fn version(&self) -> &str {
        match self {
            VersionLookup::Declared(v) => v,
            VersionLookup::MissingKey | VersionLookup::MissingMember => DEFAULT_VERSION,
        }
    }

    pub fn is_declared(&self) -> bool {
        matches!(self, VersionLookup::Declared(_))
    }
}

/// Look up the current module version in the source archive.
///
/// Only an entry whose path is exactly `alfresco/module/<name>/module.properties`
/// is consulted. Errors are returned only when that member exists and
/// reading it fails.
pub fn resolve_version(archive: &mut SourceArchive, module_name: &str) -> io::Result<VersionLookup> {
    let path = properties_path(module_name);
    let Some(index) = archive.find(&path) else {
        return Ok(VersionLookup::MissingMember);
    };

    let reader = archive.open_entry(index)?;
    read_version_line(reader)
}

/// Scan a properties stream for the first `module.version=` line.
///
/// Lines are matched as bytes: properties files are often Latin-1, and only
/// the version value itself is decoded (lossily).
pub fn read_version_line(reader: impl Read) -> io::Result<VersionLookup> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(VersionLookup::MissingKey);
        }

        let trimmed = line
            .strip_suffix(b"\n")
            .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
            .unwrap_or(&line[..]);
        if let Some(version) = trimmed.strip_prefix(VERSION_KEY.as_bytes()) {
            return Ok(VersionLookup::Declared(
                String::from_utf8_lossy(version).into_owned(),
            ));
        }
    }
}

/// Compute the next version.
///
/// The version is padded to three dotted components, then the last
/// component is incremented. If the last component is not a number, `.1`
/// is appended instead, so the result may have more components than the
/// input.
///
/// ```
/// use modeljar::core::version::increment_version;
///
/// assert_eq!(increment_version("1.2.3"), "1.2.4");
/// assert_eq!(increment_version("1"), "1.0.1");
/// assert_eq!(increment_version("1.2.x"), "1.2.x.1");
/// ```
pub fn increment_version(version: &str) -> String {
    let mut parts: Vec<String> = version.split('.').map(str::to_string).collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }

    let bumped = parts
        .last()
        .and_then(|last| last.parse::<u64>().ok())
        .and_then(|n| n.checked_add(1));

    match bumped {
        Some(n) => {
            if let Some(last) = parts.last_mut() {
                *last = n.to_string();
            }
        }
        None => parts.push("1".to_string()),
    }

    parts.join(".")
}
