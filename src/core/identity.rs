//! Module identity: the (name, version) pair embedded in every generated file.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::util::fs::entry_base_name;

/// Trailing version token: `-1.0.0`, `_v2`, `-1.2-SNAPSHOT`, ...
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-_]v?[0-9]+(\.[0-9]+)*(-SNAPSHOT)?$").expect("version suffix regex is valid")
});

/// Derive a module name from an archive file name.
///
/// Directory components (either separator style) and the final extension
/// are dropped, then one trailing version token is stripped:
///
/// ```
/// use modeljar::core::identity::module_name;
///
/// assert_eq!(module_name("dist/addon-2.3.1.jar"), "addon");
/// assert_eq!(module_name("my_models_v1.2-SNAPSHOT.zip"), "my_models");
/// assert_eq!(module_name("plain.zip"), "plain");
/// ```
///
/// A file name made only of a version token (`-1.0.zip`) yields an empty
/// string; callers decide what to do with it.
pub fn module_name(file_name: &str) -> String {
    let base = entry_base_name(file_name);
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    VERSION_SUFFIX.replace(&stem, "").into_owned()
}

/// Name and version of the module being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    name: String,
    version: String,
}

impl ModuleIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        ModuleIdentity {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory holding the module's descriptors: `alfresco/module/<name>`.
    pub fn module_dir(&self) -> String {
        format!("{}/module/{}", super::NAMESPACE, self.name)
    }

    /// Directory holding the copied model files.
    pub fn model_dir(&self) -> String {
        format!("{}/model", self.module_dir())
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
