//! Format lookup by name or file extension
//!
//! The registry is what the command line talks to: it picks a [`Format`] and checks that the
//! format can run in the requested direction before handing the documents over.

use crate::bdt::PutStats;
use crate::dom::Document;
use crate::error::FormatError;
use crate::format::{ConvertOptions, Format};
use std::collections::BTreeMap;
use std::path::Path;

/// Which way a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Get,
    Put,
    Create,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Get => "get",
            Direction::Put => "put",
            Direction::Create => "create",
        }
    }

    fn supported_by(self, format: &dyn Format) -> bool {
        match self {
            Direction::Get => format.supports_get(),
            Direction::Put | Direction::Create => format.supports_put(),
        }
    }
}

/// Named set of concrete formats, kept in name order.
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let concrete = registry.get("word")?.parse_concrete(&source)?;
/// let abstract_doc = registry.get_abstract(&concrete, "word", &ConvertOptions::default())?;
/// ```
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatRegistry {
            formats: BTreeMap::new(),
        }
    }

    /// Add `format`, replacing any format registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        self.formats.insert(name, Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        match self.formats.get(name) {
            Some(format) => Ok(format.as_ref()),
            None => Err(FormatError::FormatNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// First format (by name) claiming the extension of `filename`.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.formats
            .iter()
            .find(|(_, format)| format.file_extensions().contains(&extension))
            .map(|(name, _)| name.clone())
    }

    fn format_for(&self, name: &str, direction: Direction) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        if direction.supported_by(format) {
            Ok(format)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{name}' does not support {}",
                direction.label()
            )))
        }
    }

    /// Derive the abstract tree of a concrete document.
    pub fn get_abstract(
        &self,
        concrete: &Document,
        format: &str,
        options: &ConvertOptions,
    ) -> Result<Document, FormatError> {
        self.format_for(format, Direction::Get)?
            .get(concrete, options)
    }

    /// Write an edited abstract tree back into `concrete`.
    pub fn put_abstract(
        &self,
        concrete: &mut Document,
        abstract_doc: &Document,
        format: &str,
        options: &ConvertOptions,
    ) -> Result<PutStats, FormatError> {
        self.format_for(format, Direction::Put)?
            .put(concrete, abstract_doc, options)
    }

    /// Build a fresh concrete document from an abstract tree.
    pub fn create_concrete(
        &self,
        abstract_doc: &Document,
        format: &str,
        options: &ConvertOptions,
    ) -> Result<Document, FormatError> {
        self.format_for(format, Direction::Create)?
            .create(abstract_doc, options)
    }

    /// Registry holding every built-in format.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::word::WordFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::names::{HTML_HTML, HTML_P};

    /// Read-only format used to exercise direction checks.
    struct ReadOnly;

    impl Format for ReadOnly {
        fn name(&self) -> &str {
            "readonly"
        }
        fn file_extensions(&self) -> &[&str] {
            &["ro", "xml"]
        }
        fn supports_get(&self) -> bool {
            true
        }
        fn get(&self, _concrete: &Document, _options: &ConvertOptions) -> Result<Document, FormatError> {
            Ok(Document::with_root(HTML_P))
        }
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = FormatRegistry::new();
        assert!(registry.list_formats().is_empty());
        assert!(matches!(
            registry.get("word"),
            Err(FormatError::FormatNotFound(name)) if name == "word"
        ));
    }

    #[test]
    fn test_registering_twice_keeps_one_entry() {
        let mut registry = FormatRegistry::new();
        registry.register(ReadOnly);
        registry.register(ReadOnly);
        assert_eq!(registry.list_formats(), vec!["readonly"]);
    }

    #[test]
    fn test_get_runs_through_the_format() {
        let mut registry = FormatRegistry::new();
        registry.register(ReadOnly);

        let concrete = Document::with_root(HTML_HTML);
        let doc = registry
            .get_abstract(&concrete, "readonly", &ConvertOptions::default())
            .unwrap();
        assert_eq!(doc.tag(doc.root().unwrap()), HTML_P);
    }

    #[test]
    fn test_put_and_create_are_refused_by_a_read_only_format() {
        let mut registry = FormatRegistry::new();
        registry.register(ReadOnly);
        let options = ConvertOptions::default();

        let mut concrete = Document::with_root(HTML_HTML);
        let abstract_doc = Document::with_root(HTML_HTML);
        match registry.put_abstract(&mut concrete, &abstract_doc, "readonly", &options) {
            Err(FormatError::NotSupported(message)) => assert!(message.ends_with("support put")),
            other => panic!("expected NotSupported, got {other:?}"),
        }
        match registry.create_concrete(&abstract_doc, "readonly", &options) {
            Err(FormatError::NotSupported(message)) => assert!(message.ends_with("support create")),
            other => panic!("expected NotSupported, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_include_word() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["word"]);
        assert!(registry.get("word").unwrap().supports_put());
    }

    #[test]
    fn test_extension_detection_prefers_the_first_name() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(ReadOnly);

        assert_eq!(
            registry.detect_format_from_filename("/tmp/word/document.xml"),
            Some("readonly".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("notes.ro"),
            Some("readonly".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
        assert_eq!(registry.detect_format_from_filename("doc"), None);
    }
}
