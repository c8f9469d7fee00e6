//! High-level operations.
//!
//! This module contains the repackaging pipeline and its stages.

pub mod assemble;
pub mod errors;
pub mod repackage;
pub mod scan;

pub use assemble::{assemble, write_module_archive, AssemblyReport};
pub use errors::RepackError;
pub use repackage::{remove_partial_output, repackage, RepackOptions, RepackReport};
pub use scan::{scan_models, MatchedEntry};
