//! modeljar - repackage content model XML files into a module jar
//!
//! This crate provides the library behind the `modeljar` binary: module
//! name derivation, version lookup and bumping, model discovery and the
//! assembly of the output archive.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for modeljar unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// builds zip and tar fixtures in memory.
#[cfg(test)]
pub mod test_support;

pub use self::core::{
    descriptor::{DescriptorData, ManifestSettings},
    identity::{module_name, ModuleIdentity},
    source::SourceArchive,
    version::{increment_version, resolve_version, VersionLookup},
};

pub use ops::{repackage, RepackError, RepackOptions, RepackReport};
pub use util::config::Config;
