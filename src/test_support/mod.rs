//! Test utilities for modeljar unit tests.
//!
//! Builds zip and tar archives in memory from an [`ArchiveFixture`] and
//! reads generated archives back for assertions.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{zip_archive, ArchiveFixture, MODEL_XML};
//!
//! #[test]
//! fn test_example() {
//!     let mut source = zip_archive(&ArchiveFixture::new().file("types.xml", MODEL_XML));
//!     // Scan or resolve against `source`...
//! }
//! ```

pub mod fixtures;

use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::source::SourceArchive;

pub use fixtures::*;

/// Render a fixture as zip bytes.
pub fn zip_bytes(fixture: &ArchiveFixture) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in &fixture.entries {
        match entry {
            FixtureEntry::Dir(path) => writer.add_directory(path.as_str(), options).unwrap(),
            FixtureEntry::File(path, content) => {
                writer.start_file(path.as_str(), options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Render a fixture as an uncompressed tar stream.
pub fn tar_bytes(fixture: &ArchiveFixture) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    for entry in &fixture.entries {
        let mut header = tar::Header::new_gnu();
        match entry {
            FixtureEntry::Dir(path) => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder
                    .append_data(&mut header, path, std::io::empty())
                    .unwrap();
            }
            FixtureEntry::File(path, content) => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(content.len() as u64);
                builder
                    .append_data(&mut header, path, content.as_slice())
                    .unwrap();
            }
        }
    }

    builder.into_inner().unwrap()
}

/// Open a fixture as an in-memory zip [`SourceArchive`].
pub fn zip_archive(fixture: &ArchiveFixture) -> SourceArchive {
    SourceArchive::from_zip_reader(Cursor::new(zip_bytes(fixture)), Path::new("fixture.zip"))
        .unwrap()
}

/// A generated archive read back for assertions.
pub struct WrittenArchive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl WrittenArchive {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        WrittenArchive {
            zip: ZipArchive::new(Cursor::new(bytes)).unwrap(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_bytes(std::fs::read(path).unwrap())
    }

    /// Entry names in write order.
    pub fn names(&mut self) -> Vec<String> {
        (0..self.zip.len())
            .map(|i| self.zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    pub fn read(&mut self, name: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        self.zip.by_name(name).unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    pub fn read_string(&mut self, name: &str) -> String {
        String::from_utf8(self.read(name)).unwrap()
    }

    pub fn compression(&mut self, name: &str) -> CompressionMethod {
        self.zip.by_name(name).unwrap().compression()
    }

    pub fn unix_mode(&mut self, name: &str) -> Option<u32> {
        self.zip.by_name(name).unwrap().unix_mode()
    }
}
