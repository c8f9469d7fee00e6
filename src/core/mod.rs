//! Core data types for modeljar.

pub mod descriptor;
pub mod identity;
pub mod source;
pub mod version;

/// Top-level namespace directory of module content inside an archive.
pub const NAMESPACE: &str = "alfresco";

pub use descriptor::{DescriptorData, ManifestSettings};
pub use identity::{module_name, ModuleIdentity};
pub use source::{ArchiveFormat, SourceArchive, SourceEntry};
pub use version::{increment_version, resolve_version, VersionLookup};
