//! Test fixtures for common test scenarios.
//!
//! Sample model documents and an in-memory description of an archive's
//! entries that can be rendered as zip or tar.

/// A content model declaring `<model ... name=`.
pub const MODEL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model name="acme:contentModel" xmlns="http://www.alfresco.org/model/dictionary/1.0">
    <description>ACME content model</description>
    <imports>
        <import uri="http://www.alfresco.org/model/dictionary/1.0" prefix="d"/>
    </imports>
</model>
"#;

/// Second model, used to check ordering.
pub const WORKFLOW_MODEL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model name="acmewf:workflowModel" xmlns="http://www.alfresco.org/model/dictionary/1.0">
    <types/>
</model>
"#;

/// XML that is not a content model.
pub const SPRING_CONTEXT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<beans xmlns="http://www.springframework.org/schema/beans">
    <bean id="acme.dictionaryBootstrap" class="org.example.Bootstrap"/>
</beans>
"#;

/// One entry of an [`ArchiveFixture`].
#[derive(Debug, Clone)]
pub enum FixtureEntry {
    Dir(String),
    File(String, Vec<u8>),
}

/// Ordered list of entries to render into a test archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFixture {
    pub entries: Vec<FixtureEntry>,
}

impl ArchiveFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        ArchiveFixture::default()
    }

    /// Add a directory entry (the trailing `/` is added if missing).
    pub fn dir(mut self, path: &str) -> Self {
        let path = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{}/", path)
        };
        self.entries.push(FixtureEntry::Dir(path));
        self
    }

    /// Add a file entry.
    pub fn file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.entries
            .push(FixtureEntry::File(path.to_string(), content.into()));
        self
    }

    /// Archive shaped like a packaged module: a properties member with a
    /// version, two models and some unrelated XML.
    pub fn module(name: &str, version: &str) -> Self {
        ArchiveFixture::new()
            .dir(&format!("alfresco/module/{}", name))
            .file(
                &format!("alfresco/module/{}/module.properties", name),
                format!("module.id={}\nmodule.version={}\n", name, version),
            )
            .file(
                &format!("alfresco/module/{}/context/bootstrap-context.xml", name),
                SPRING_CONTEXT_XML,
            )
            .file(
                &format!("alfresco/module/{}/model/workflowModel.xml", name),
                WORKFLOW_MODEL_XML,
            )
            .file(
                &format!("alfresco/module/{}/model/contentModel.xml", name),
                MODEL_XML,
            )
    }
}
