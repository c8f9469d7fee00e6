//! Output archive assembly.
//!
//! Entries are written in a fixed order:
//! 1. directory markers, sorted
//! 2. `META-INF/MANIFEST.MF` (stored)
//! 3. `module.properties` and `module-context.xml` (deflated)
//! 4. the model files, sorted by name (deflated)
//!
//! Every file lands under a directory marker written in step 1.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::descriptor::{DescriptorData, ManifestSettings};
use crate::core::identity::ModuleIdentity;
use crate::ops::errors::RepackError;
use crate::ops::scan::MatchedEntry;
use crate::util::fs::join_entry;

/// Metadata directory of a jar.
pub const META_INF_DIR: &str = "META-INF/";

/// Manifest path inside the jar.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

const DIR_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Summary of a written archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Every entry name, in write order
    pub entries: Vec<String>,
    /// Output paths of the packaged models, sorted
    pub model_paths: Vec<String>,
}

/// Directory markers for a module, sorted so parents come first.
pub fn module_directories(identity: &ModuleIdentity) -> Vec<String> {
    let mut dirs = vec![
        META_INF_DIR.to_string(),
        format!("{}/", crate::core::NAMESPACE),
        format!("{}/module/", crate::core::NAMESPACE),
        format!("{}/", identity.module_dir()),
        format!("{}/", identity.model_dir()),
    ];
    dirs.sort();
    dirs
}

/// Select one model per base file name.
///
/// Models sharing a base file name collide in the flat model directory; the
/// one enumerated last wins and the loss is logged.
pub fn dedupe_models(models: &[MatchedEntry]) -> BTreeMap<&str, &MatchedEntry> {
    let mut by_name = BTreeMap::new();
    for model in models {
        if let Some(previous) = by_name.insert(model.file_name(), model) {
            tracing::warn!(
                "{} replaces {}: both package as {}",
                model.source_path,
                previous.source_path,
                model.file_name()
            );
        }
    }
    by_name
}

/// Write the module archive to `output`.
///
/// A failure part-way leaves an incomplete file behind; the caller decides
/// whether to remove it.
pub fn write_module_archive(
    output: &Path,
    identity: &ModuleIdentity,
    models: &[MatchedEntry],
    manifest: &ManifestSettings,
) -> Result<AssemblyReport, RepackError> {
    let file = File::create(output).map_err(|source| RepackError::CreateOutput {
        path: output.to_path_buf(),
        source,
    })?;

    let (mut sink, report) = assemble(BufWriter::new(file), identity, models, manifest)?;
    sink.flush().map_err(|source| RepackError::WriteOutput {
        entry: output.display().to_string(),
        source,
    })?;

    tracing::debug!(
        "Wrote {} entries to {}",
        report.entries.len(),
        output.display()
    );
    Ok(report)
}

/// Assemble the module archive into any seekable sink and hand the sink back.
pub fn assemble<W: Write + Seek>(
    sink: W,
    identity: &ModuleIdentity,
    models: &[MatchedEntry],
    manifest: &ManifestSettings,
) -> Result<(W, AssemblyReport), RepackError> {
    let mut writer = ArchiveWriter::new(sink);

    for dir in module_directories(identity) {
        writer.add_dir(&dir)?;
    }

    writer.add_file(MANIFEST_PATH, manifest.render(identity).as_bytes(), false)?;

    let selected = dedupe_models(models);
    let model_dir = identity.model_dir();
    let model_paths: Vec<String> = selected
        .keys()
        .map(|name| join_entry(&model_dir, name))
        .collect();

    let data = DescriptorData::new(identity, model_paths.clone());
    let module_dir = identity.module_dir();
    writer.add_file(
        &join_entry(&module_dir, "module.properties"),
        data.render_properties().as_bytes(),
        true,
    )?;
    writer.add_file(
        &join_entry(&module_dir, "module-context.xml"),
        data.render_module_context().as_bytes(),
        true,
    )?;

    for (path, model) in model_paths.iter().zip(selected.values()) {
        writer.add_file(path, &model.content, true)?;
    }

    let (sink, entries) = writer.finish()?;
    Ok((
        sink,
        AssemblyReport {
            entries,
            model_paths,
        },
    ))
}

/// Thin wrapper over [`ZipWriter`] that records what it wrote.
struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    written: Vec<String>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    fn new(sink: W) -> Self {
        ArchiveWriter {
            zip: ZipWriter::new(sink),
            written: Vec::new(),
        }
    }

    /// Directories are stored, never compressed. The default options stamp
    /// the entry with the current time.
    fn add_dir(&mut self, name: &str) -> Result<(), RepackError> {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(DIR_MODE);

        self.zip
            .add_directory(name.as_str(), options)
            .map_err(|source| RepackError::Zip {
                entry: name.clone(),
                source,
            })?;
        self.written.push(name);
        Ok(())
    }

    fn add_file(&mut self, name: &str, data: &[u8], compress: bool) -> Result<(), RepackError> {
        let method = if compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(FILE_MODE);

        self.zip
            .start_file(name, options)
            .map_err(|source| RepackError::Zip {
                entry: name.to_string(),
                source,
            })?;
        self.zip
            .write_all(data)
            .map_err(|source| RepackError::WriteOutput {
                entry: name.to_string(),
                source,
            })?;
        self.written.push(name.to_string());
        Ok(())
    }

    fn finish(self) -> Result<(W, Vec<String>), RepackError> {
        let sink = self.zip.finish().map_err(|source| RepackError::Zip {
            entry: "central directory".to_string(),
            source,
        })?;
        Ok((sink, self.written))
    }
}
