//! Content model discovery.
//!
//! A model is an `.xml` entry whose first [`SNIFF_WINDOW`] bytes contain both
//! `<model` and `name=`. The documents are not parsed. A signature that
//! only appears after the window is never seen.

use std::io::Read;

use crate::core::source::SourceArchive;
use crate::ops::errors::RepackError;
use crate::util::fs::entry_base_name;

/// Number of leading bytes inspected for the model signature.
pub const SNIFF_WINDOW: u64 = 4096;

const MODEL_TAG: &[u8] = b"<model";
const NAME_ATTR: &[u8] = b"name=";

/// A source entry that qualified as a content model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Path inside the source archive
    pub source_path: String,
    /// Full, unmodified content
    pub content: Vec<u8>,
}

impl MatchedEntry {
    /// Base file name; the key under which the model is packaged.
    pub fn file_name(&self) -> &str {
        entry_base_name(&self.source_path)
    }
}

/// Whether an entry path has an `.xml` extension, ignoring case.
pub fn is_xml_name(path: &str) -> bool {
    entry_base_name(path).to_ascii_lowercase().ends_with(".xml")
}

/// Whether a byte window carries the model signature. Order and position of
/// the two markers do not matter.
pub fn has_model_signature(window: &[u8]) -> bool {
    contains(window, MODEL_TAG) && contains(window, NAME_ATTR)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Collect every content model in the archive, in enumeration order.
///
/// Entries that cannot be read are skipped. Returns
/// [`RepackError::NoModelsFound`] if nothing qualifies.
pub fn scan_models(archive: &mut SourceArchive) -> Result<Vec<MatchedEntry>, RepackError> {
    let candidates: Vec<(usize, String)> = archive
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_dir && is_xml_name(&e.path))
        .map(|(i, e)| (i, e.path.clone()))
        .collect();

    tracing::debug!(
        "Scanning {} XML entries out of {}",
        candidates.len(),
        archive.len()
    );

    let mut matches = Vec::new();
    for (index, path) in candidates {
        let mut reader = match archive.open_entry(index) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!("Cannot open {}, not counting it: {}", path, e);
                continue;
            }
        };

        let mut window = Vec::with_capacity(SNIFF_WINDOW as usize);
        if let Err(e) = (&mut reader).take(SNIFF_WINDOW).read_to_end(&mut window) {
            tracing::debug!("Cannot read {}, not counting it: {}", path, e);
            continue;
        }

        if !has_model_signature(&window) {
            tracing::trace!("{} is not a content model", path);
            continue;
        }

        let mut content = window;
        if let Err(e) = reader.read_to_end(&mut content) {
            tracing::warn!("Failed to extract {}: {}", path, e);
            continue;
        }

        tracing::debug!("Found content model {} ({} bytes)", path, content.len());
        matches.push(MatchedEntry {
            source_path: path,
            content,
        });
    }

    if matches.is_empty() {
        return Err(RepackError::NoModelsFound {
            path: archive.path().to_path_buf(),
        });
    }

    Ok(matches)
}
