//! Generated descriptor members.
//!
//! The formats are fixed: `module.properties`, `module-context.xml` and the
//! jar manifest are rendered from plain data with `format!`, never from
//! user-supplied templates.

use crate::core::identity::ModuleIdentity;

/// Bean that parents the module's model bean.
pub const MODEL_BOOTSTRAP_PARENT: &str = "dictionaryModelBootstrap";

/// Bean the module's model bean depends on.
pub const MODEL_BOOTSTRAP_DEPENDENCY: &str = "dictionaryBootstrap";

/// Rendering context for `module.properties` and `module-context.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorData {
    pub name: String,
    pub version: String,
    /// Output paths of the packaged models, sorted ascending
    pub model_paths: Vec<String>,
}

impl DescriptorData {
    /// Build the context; `model_paths` is sorted here so output is
    /// reproducible regardless of scan order.
    pub fn new(identity: &ModuleIdentity, mut model_paths: Vec<String>) -> Self {
        model_paths.sort();
        DescriptorData {
            name: identity.name().to_string(),
            version: identity.version().to_string(),
            model_paths,
        }
    }

    /// Render `module.properties`.
    pub fn render_properties(&self) -> String {
        format!(
            "module.id={name}\n\
             module.title={name}\n\
             module.description={name}\n\
             module.version={version}\n",
            name = self.name,
            version = self.version
        )
    }

    /// Render `module-context.xml`.
    pub fn render_module_context(&self) -> String {
        let values: String = self
            .model_paths
            .iter()
            .map(|path| format!("\n                <value>{}</value>", xml_escape(path)))
            .collect();

        format!(
            "<?xml version='1.0' encoding='UTF-8'?>\n\
             <beans xmlns=\"http://www.springframework.org/schema/beans\"\n       \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n       \
             xsi:schemaLocation=\"http://www.springframework.org/schema/beans\n          \
             http://www.springframework.org/schema/beans/spring-beans-3.0.xsd\">\n    \
             <bean id=\"{}\" parent=\"{}\" depends-on=\"{}\">\n        \
             <property name=\"models\">\n            \
             <list>{}\n            \
             </list>\n        \
             </property>\n    \
             </bean>\n\
             </beans>",
            xml_escape(&self.name),
            MODEL_BOOTSTRAP_PARENT,
            MODEL_BOOTSTRAP_DEPENDENCY,
            values
        )
    }
}

/// Values written into `META-INF/MANIFEST.MF`.
///
/// `built_by` is passed in explicitly; the assembler never reads the
/// process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSettings {
    pub created_by: String,
    pub built_by: String,
    pub build_jdk: String,
    pub package: String,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        ManifestSettings {
            created_by: "Alfresco Model Extractor".to_string(),
            built_by: String::new(),
            build_jdk: "17.0.5".to_string(),
            package: "org.alfresco.module".to_string(),
        }
    }
}

impl ManifestSettings {
    /// Render the manifest for a module. The blank last line terminates the
    /// main section.
    pub fn render(&self, identity: &ModuleIdentity) -> String {
        format!(
            "Manifest-Version: 1.0\n\
             Created-By: {}\n\
             Built-By: {}\n\
             Build-Jdk: {}\n\
             Package: {}\n\
             Implementation-Version: {}\n\
             Implementation-Title: {}\n\n",
            self.created_by,
            self.built_by,
            self.build_jdk,
            self.package,
            identity.version(),
            identity.name()
        )
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
