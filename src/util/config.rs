//! Configuration file support for modeljar.
//!
//! modeljar reads up to three configuration files, later ones overriding
//! earlier ones:
//! - Global: `~/.modeljar/config.toml` - User-wide defaults
//! - Project: `.modeljar/config.toml` - Directory-specific overrides
//! - Explicit: the file passed with `--config`
//!
//! Command-line flags override all of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::descriptor::ManifestSettings;

/// Default output archive name when neither the CLI nor a config file sets one.
pub const DEFAULT_OUTPUT: &str = "models.jar";

/// modeljar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest values written to `META-INF/MANIFEST.MF`
    pub manifest: ManifestConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Overrides for the generated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// `Created-By` value
    pub created_by: Option<String>,

    /// `Build-Jdk` value
    pub build_jdk: Option<String>,

    /// `Package` value
    pub package: Option<String>,

    /// `Built-By` value; wins over `USER`, loses to `--built-by`
    pub built_by: Option<String>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output archive path
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.manifest.created_by.is_some() {
            self.manifest.created_by = other.manifest.created_by;
        }
        if other.manifest.build_jdk.is_some() {
            self.manifest.build_jdk = other.manifest.build_jdk;
        }
        if other.manifest.package.is_some() {
            self.manifest.package = other.manifest.package;
        }
        if other.manifest.built_by.is_some() {
            self.manifest.built_by = other.manifest.built_by;
        }
        if other.output.path.is_some() {
            self.output.path = other.output.path;
        }
    }

    /// Output path to use when the CLI does not name one.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Build the manifest settings.
    ///
    /// `Built-By` resolves as: `built_by` (the CLI flag), then the configured
    /// value, then `login` (the invoking user), then empty.
    pub fn manifest_settings(
        &self,
        built_by: Option<String>,
        login: Option<String>,
    ) -> ManifestSettings {
        let mut settings = ManifestSettings::default();
        if let Some(created_by) = &self.manifest.created_by {
            settings.created_by = created_by.clone();
        }
        if let Some(build_jdk) = &self.manifest.build_jdk {
            settings.build_jdk = build_jdk.clone();
        }
        if let Some(package) = &self.manifest.package {
            settings.package = package.clone();
        }
        settings.built_by = built_by
            .or_else(|| self.manifest.built_by.clone())
            .or(login)
            .unwrap_or_default();
        settings
    }
}

/// Load merged configuration from global, project and explicit locations.
///
/// Order of precedence (highest to lowest):
/// 1. Explicit config (`--config`), which must exist and parse
/// 2. Project config (.modeljar/config.toml)
/// 3. Global config (~/.modeljar/config.toml)
/// 4. Defaults
pub fn load_config(
    global_path: Option<&Path>,
    project_path: &Path,
    explicit_path: Option<&Path>,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    config.merge(Config::load_or_default(project_path));

    if let Some(explicit) = explicit_path {
        config.merge(Config::load(explicit)?);
    }

    Ok(config)
}

/// Get the global modeljar config directory (~/.modeljar).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".modeljar"))
}

/// Get the global config path (~/.modeljar/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.modeljar/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".modeljar").join("config.toml")
}
