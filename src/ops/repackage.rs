//! The repackaging pipeline.
//!
//! Derives the module name from the input file name, bumps the version
//! declared in the source archive, scans for content models and writes them
//! into a module jar.

use std::path::{Path, PathBuf};

use crate::core::descriptor::ManifestSettings;
use crate::core::identity::{module_name, ModuleIdentity};
use crate::core::source::SourceArchive;
use crate::core::version::{increment_version, resolve_version, VersionLookup};
use crate::ops::assemble::{dedupe_models, write_module_archive};
use crate::ops::errors::RepackError;
use crate::ops::scan::scan_models;
use crate::util::fs::join_entry;

/// Options for a repackaging run.
#[derive(Debug, Clone)]
pub struct RepackOptions {
    /// Source archive
    pub input: PathBuf,

    /// Destination jar
    pub output: PathBuf,

    /// Manifest values
    pub manifest: ManifestSettings,

    /// Scan and report without writing the output archive
    pub dry_run: bool,
}

impl RepackOptions {
    /// Create options with default manifest settings.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        RepackOptions {
            input: input.into(),
            output: output.into(),
            manifest: ManifestSettings::default(),
            dry_run: false,
        }
    }

    /// Set the manifest values.
    pub fn with_manifest(mut self, manifest: ManifestSettings) -> Self {
        self.manifest = manifest;
        self
    }

    /// Set dry run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a repackaging run.
#[derive(Debug, Clone)]
pub struct RepackReport {
    /// Where the archive was (or, in a dry run, would be) written
    pub output: PathBuf,

    /// Name and new version of the module
    pub identity: ModuleIdentity,

    /// What the source archive declared
    pub previous: VersionLookup,

    /// Output paths of the packaged models, sorted
    pub model_paths: Vec<String>,

    /// Whether the output archive was written
    pub written: bool,
}

impl RepackReport {
    pub fn model_count(&self) -> usize {
        self.model_paths.len()
    }
}

/// Run the pipeline.
///
/// Nothing is written to `opts.output` unless at least one model is found.
pub fn repackage(opts: &RepackOptions) -> Result<RepackReport, RepackError> {
    let file_name = opts.input.to_string_lossy();
    let name = module_name(&file_name);
    if name.is_empty() {
        return Err(RepackError::InvalidModuleName {
            file: file_name.into_owned(),
        });
    }
    tracing::info!("Module name: {}", name);

    let mut source = SourceArchive::open(&opts.input)?;
    tracing::debug!(
        "Opened {} ({} entries)",
        source.path().display(),
        source.len()
    );

    let previous = current_version(&mut source, &name);
    let identity = ModuleIdentity::new(&name, increment_version(previous.version()));
    tracing::info!("Version: {} -> {}", previous.version(), identity.version());

    let models = scan_models(&mut source)?;
    tracing::info!("Found {} content model(s)", models.len());

    if opts.dry_run {
        let model_dir = identity.model_dir();
        let model_paths = dedupe_models(&models)
            .keys()
            .map(|file| join_entry(&model_dir, file))
            .collect();
        return Ok(RepackReport {
            output: opts.output.clone(),
            identity,
            previous,
            model_paths,
            written: false,
        });
    }

    let assembly = write_module_archive(&opts.output, &identity, &models, &opts.manifest)?;

    Ok(RepackReport {
        output: opts.output.clone(),
        identity,
        previous,
        model_paths: assembly.model_paths,
        written: true,
    })
}

/// Look up the current version, absorbing every failure into the default.
fn current_version(source: &mut SourceArchive, name: &str) -> VersionLookup {
    match resolve_version(source, name) {
        Ok(VersionLookup::MissingMember) => {
            tracing::debug!("No module.properties for `{}`", name);
            VersionLookup::MissingMember
        }
        Ok(VersionLookup::MissingKey) => {
            tracing::warn!("module.properties for `{}` has no module.version", name);
            VersionLookup::MissingKey
        }
        Ok(declared) => declared,
        Err(e) => {
            tracing::warn!("Could not read current version: {}", e);
            VersionLookup::MissingKey
        }
    }
}

/// Remove a partially written output archive, if any.
pub fn remove_partial_output(path: &Path) {
    if path.is_file() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
