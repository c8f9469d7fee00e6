//! Repackaging error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while repackaging a source archive.
///
/// Recoverable conditions (missing version, a single unreadable model) never
/// reach this type; they are logged and absorbed where they happen.
#[derive(Debug, Error)]
pub enum RepackError {
    #[error("unsupported archive format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to open source archive {}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read source archive {}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot derive a module name from `{file}`")]
    InvalidModuleName { file: String },

    #[error("no content model XML files found in {}", path.display())]
    NoModelsFound { path: PathBuf },

    #[error("failed to create output archive {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{entry}` to output archive")]
    WriteOutput {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("zip error while writing `{entry}`")]
    Zip {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },
}

impl RepackError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            RepackError::UnsupportedFormat { path } => diag
                .with_location(path)
                .with_note("recognized containers: zip, jar, amp, tar, tar.gz")
                .with_help(suggestions::CHECK_INPUT),

            RepackError::OpenSource { path, source }
            | RepackError::ReadSource { path, source } => diag
                .with_location(path)
                .with_note(source.to_string())
                .with_help(suggestions::CHECK_INPUT),

            RepackError::InvalidModuleName { .. } => diag
                .with_note("the file name is made only of a version suffix")
                .with_help(suggestions::RENAME_INPUT),

            RepackError::NoModelsFound { path } => diag
                .with_location(path)
                .with_note("a model file is an .xml entry declaring `<model ... name=`")
                .with_help(suggestions::NO_MODELS),

            RepackError::CreateOutput { path, source } => diag
                .with_location(path)
                .with_note(source.to_string())
                .with_help(suggestions::CHECK_OUTPUT),

            RepackError::WriteOutput { source, .. } => diag
                .with_note(source.to_string())
                .with_help(suggestions::CHECK_OUTPUT),

            RepackError::Zip { source, .. } => diag.with_note(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_models_diagnostic_mentions_signature() {
        let err = RepackError::NoModelsFound {
            path: PathBuf::from("addon.zip"),
        };
        let diag = err.to_diagnostic();

        assert!(diag.message.contains("no content model XML files"));
        assert_eq!(diag.location, Some(PathBuf::from("addon.zip")));
        assert!(diag.notes[0].contains("<model"));
        assert_eq!(diag.help, Some(suggestions::NO_MODELS));
    }

    #[test]
    fn test_open_source_carries_io_cause() {
        let err = RepackError::OpenSource {
            path: PathBuf::from("missing.zip"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let rendered = err.to_diagnostic().format(false);

        assert!(rendered.starts_with("error: failed to open source archive missing.zip"));
        assert!(rendered.contains("--> missing.zip"));
        assert!(rendered.contains("  = note: no such file\n"));
    }
}
