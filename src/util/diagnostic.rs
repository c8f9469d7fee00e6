//! Messages printed to the terminal when a run fails or falls back.
//!
//! A diagnostic names what went wrong, the file involved, the underlying
//! cause and at most one hint for fixing it.

use std::fmt;
use std::path::PathBuf;

/// Hints attached to fatal errors.
pub mod suggestions {
    pub const CHECK_INPUT: &str = "check that `--zip` points to a readable zip, jar or tar archive";

    pub const RENAME_INPUT: &str = "rename the archive to `<module-name>-<version>.zip`";

    pub const NO_MODELS: &str =
        "run `modeljar --zip <PATH> --dry-run --verbose` to list scanned entries";

    pub const CHECK_OUTPUT: &str = "check that the `--output` directory exists and is writable";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
        }
    }

    /// ANSI bold + foreground color for the label.
    fn ansi(self) -> &'static str {
        match self {
            Level::Error => "1;31",
            Level::Warning => "1;33",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// File the message is about
    pub location: Option<PathBuf>,
    /// Underlying causes, printed as `= note:` lines
    pub notes: Vec<String>,
    pub help: Option<&'static str>,
}

impl Diagnostic {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Diagnostic {
            level,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Render for a terminal, with ANSI colors on the labels when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |text: &str, ansi: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", ansi, text)
            } else {
                text.to_string()
            }
        };

        let mut lines = vec![format!(
            "{}: {}",
            paint(self.level.label(), self.level.ansi()),
            self.message
        )];
        lines.extend(
            self.location
                .iter()
                .map(|path| format!("  --> {}", path.display())),
        );
        lines.extend(self.notes.iter().map(|note| format!("  = note: {}", note)));
        lines.extend(
            self.help
                .map(|help| format!("  = {}: {}", paint("help", "1;32"), help)),
        );

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}
