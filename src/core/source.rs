//! Read-only access to the source archive.
//!
//! The container flavor is detected from the file's leading bytes, so a
//! `.jar`, `.amp` or `.zip` all open the same way, and tarballs work too.
//! Zip entries are decompressed lazily on [`SourceArchive::open_entry`];
//! tar has no random access, so tar entries are buffered when the archive
//! is opened.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::ops::errors::RepackError;
use crate::util::fs::to_forward_slashes;

/// Bytes inspected to detect the container format.
const SNIFF_LEN: u64 = 512;

/// Container formats understood by [`SourceArchive::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// zip, jar, amp
    Zip,
    /// Uncompressed tar
    Tar,
    /// gzip-compressed tar
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the first bytes of a file.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        if head.starts_with(b"PK\x03\x04") || head.starts_with(b"PK\x05\x06") {
            Some(ArchiveFormat::Zip)
        } else if head.starts_with(&[0x1f, 0x8b]) {
            Some(ArchiveFormat::TarGz)
        } else if head.len() >= 262 && &head[257..262] == b"ustar" {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }
}

/// Metadata of one archive entry, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Entry path with `/` separators
    pub path: String,
    /// Whether the entry is a directory marker
    pub is_dir: bool,
    /// Uncompressed size in bytes
    pub size: u64,
}

trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

enum Backend {
    Zip(ZipArchive<Box<dyn ReadSeek>>),
    /// Buffered contents, parallel to `SourceArchive::entries`
    Tar(Vec<Vec<u8>>),
}

/// An opened source archive.
///
/// The archive is never modified. Dropping it closes the underlying file.
pub struct SourceArchive {
    path: PathBuf,
    format: ArchiveFormat,
    entries: Vec<SourceEntry>,
    backend: Backend,
}

impl std::fmt::Debug for SourceArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceArchive")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl SourceArchive {
    /// Open an archive on disk, detecting its format.
    pub fn open(path: &Path) -> Result<Self, RepackError> {
        let open_err = |source| RepackError::OpenSource {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(open_err)?;

        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        (&mut file)
            .take(SNIFF_LEN)
            .read_to_end(&mut head)
            .map_err(open_err)?;
        file.seek(SeekFrom::Start(0)).map_err(open_err)?;

        let format = ArchiveFormat::sniff(&head).ok_or_else(|| RepackError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        tracing::debug!("Opening {} as {:?}", path.display(), format);

        match format {
            ArchiveFormat::Zip => Self::from_zip_reader(file, path),
            ArchiveFormat::Tar => Self::from_tar_reader(file, path, ArchiveFormat::Tar),
            ArchiveFormat::TarGz => {
                Self::from_tar_reader(GzDecoder::new(file), path, ArchiveFormat::TarGz)
            }
        }
    }

    /// Open a zip archive from any seekable reader.
    ///
    /// `path` is only used for error messages and logs.
    pub fn from_zip_reader<R>(reader: R, path: &Path) -> Result<Self, RepackError>
    where
        R: Read + Seek + 'static,
    {
        let read_err = |e: zip::result::ZipError| RepackError::ReadSource {
            path: path.to_path_buf(),
            source: io::Error::other(e),
        };

        let boxed: Box<dyn ReadSeek> = Box::new(reader);
        let mut zip = ZipArchive::new(boxed).map_err(read_err)?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let file = zip.by_index_raw(i).map_err(read_err)?;
            entries.push(SourceEntry {
                path: to_forward_slashes(file.name()),
                is_dir: file.is_dir(),
                size: file.size(),
            });
        }

        Ok(SourceArchive {
            path: path.to_path_buf(),
            format: ArchiveFormat::Zip,
            entries,
            backend: Backend::Zip(zip),
        })
    }

    /// Read a tar stream into memory.
    ///
    /// Only regular files and directories are kept; links and special
    /// entries are skipped.
    pub fn from_tar_reader<R: Read>(
        reader: R,
        path: &Path,
        format: ArchiveFormat,
    ) -> Result<Self, RepackError> {
        let read_err = |source| RepackError::ReadSource {
            path: path.to_path_buf(),
            source,
        };

        let mut archive = tar::Archive::new(reader);
        let mut entries = Vec::new();
        let mut contents = Vec::new();

        for entry in archive.entries().map_err(read_err)? {
            let mut entry = entry.map_err(read_err)?;
            let entry_type = entry.header().entry_type();
            let raw_path = entry.path().map_err(read_err)?.to_string_lossy().into_owned();
            let entry_path = to_forward_slashes(raw_path.trim_start_matches("./"));

            if entry_path.is_empty() {
                continue;
            }

            if entry_type.is_dir() {
                entries.push(SourceEntry {
                    path: entry_path,
                    is_dir: true,
                    size: 0,
                });
                contents.push(Vec::new());
            } else if entry_type.is_file() {
                let mut data = Vec::new();
                entry.read_to_end(&mut data).map_err(read_err)?;
                entries.push(SourceEntry {
                    path: entry_path,
                    is_dir: false,
                    size: data.len() as u64,
                });
                contents.push(data);
            } else {
                tracing::debug!("Skipping non-file tar entry: {}", entry_path);
            }
        }

        Ok(SourceArchive {
            path: path.to_path_buf(),
            format,
            entries,
            backend: Backend::Tar(contents),
        })
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Entries in enumeration order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry whose path equals `path` exactly.
    pub fn find(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// Open an entry's content as a byte stream.
    pub fn open_entry(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        if index >= self.entries.len() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry at index {}", index),
            ));
        }

        match &mut self.backend {
            Backend::Zip(zip) => {
                let file = zip.by_index(index).map_err(io::Error::other)?;
                Ok(Box::new(file))
            }
            Backend::Tar(contents) => Ok(Box::new(Cursor::new(contents[index].as_slice()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{tar_bytes, zip_archive, zip_bytes, ArchiveFixture};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn fixture() -> ArchiveFixture {
        ArchiveFixture::new()
            .dir("models/")
            .file("models/types.xml", "<model name=\"t:types\"/>")
            .file("readme.txt", "hello")
    }

    fn read_all(archive: &mut SourceArchive, index: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        archive.open_entry(index).unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ArchiveFormat::sniff(b"PK\x03\x04rest"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::sniff(b"PK\x05\x06"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::sniff(&[0x1f, 0x8b, 0x08]), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::sniff(b"plain text"), None);

        let mut tar_head = vec![0u8; 512];
        tar_head[257..262].copy_from_slice(b"ustar");
        assert_eq!(ArchiveFormat::sniff(&tar_head), Some(ArchiveFormat::Tar));
    }

    #[test]
    fn test_zip_entries_in_order() {
        let mut archive = zip_archive(&fixture());
        let paths: Vec<_> = archive.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["models/", "models/types.xml", "readme.txt"]);
        assert!(archive.entries()[0].is_dir);
        assert!(!archive.entries()[1].is_dir);
        assert_eq!(archive.entries()[2].size, 5);

        let idx = archive.find("readme.txt").unwrap();
        assert_eq!(read_all(&mut archive, idx), b"hello");
        assert_eq!(archive.find("README.txt"), None);
    }

    #[test]
    fn test_open_entry_out_of_range() {
        let mut archive = zip_archive(&fixture());
        assert!(archive.open_entry(99).is_err());
    }

    #[test]
    fn test_open_detects_zip_by_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("addon-1.0.amp");
        std::fs::write(&path, zip_bytes(&fixture())).unwrap();

        let archive = SourceArchive::open(&path).unwrap();
        assert_eq!(archive.format(), ArchiveFormat::Zip);
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.path(), path.as_path());
    }

    #[test]
    fn test_open_tar_and_tar_gz() {
        let tmp = TempDir::new().unwrap();
        let tar = tar_bytes(&fixture());

        let tar_path = tmp.path().join("models.tar");
        std::fs::write(&tar_path, &tar).unwrap();

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(&tar).unwrap();
        let gz_path = tmp.path().join("models.tgz");
        std::fs::write(&gz_path, gz.finish().unwrap()).unwrap();

        for (path, format) in [(tar_path, ArchiveFormat::Tar), (gz_path, ArchiveFormat::TarGz)] {
            let mut archive = SourceArchive::open(&path).unwrap();
            assert_eq!(archive.format(), format);

            let idx = archive.find("models/types.xml").unwrap();
            assert_eq!(read_all(&mut archive, idx), b"<model name=\"t:types\"/>");
            assert!(archive.entries().iter().any(|e| e.is_dir));
        }
    }

    #[test]
    fn test_open_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = SourceArchive::open(&tmp.path().join("absent.zip")).unwrap_err();
        assert!(matches!(err, RepackError::OpenSource { .. }));
    }

    #[test]
    fn test_open_unsupported_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.zip");
        std::fs::write(&path, "not an archive").unwrap();

        let err = SourceArchive::open(&path).unwrap_err();
        assert!(matches!(err, RepackError::UnsupportedFormat { .. }));
    }
}
