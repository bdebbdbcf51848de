//! Format trait definition
//!
//! A format ties one concrete document shape to the abstract XHTML tree. It owns the root lens
//! for its shape and knows how to read and write its concrete files; the engine in
//! [`crate::bdt`] does the reconciliation.

use crate::bdt::PutStats;
use crate::dom::Document;
use crate::error::FormatError;
use crate::identity::DEFAULT_ID_PREFIX;
use crate::xml::{parse_xml, serialize_xml, ParseOptions, WriteOptions};

/// Per-conversion settings shared by every format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Prefix of the `id` values that carry concrete identity in the abstract tree.
    pub id_prefix: String,
    /// Normalize the abstract tree before a put or create.
    pub normalize: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            normalize: true,
        }
    }
}

/// Trait for concrete document formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_get(&self) -> bool {
///         true
///     }
///
///     fn get(&self, concrete: &Document, options: &ConvertOptions) -> Result<Document, FormatError> {
///         // Build the abstract tree
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "word")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format can derive an abstract tree (concrete → abstract)
    fn supports_get(&self) -> bool {
        false
    }

    /// Whether this format can write an abstract tree back (abstract → concrete)
    fn supports_put(&self) -> bool {
        false
    }

    /// Read concrete source text.
    fn parse_concrete(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_xml(source, &ParseOptions::data())?)
    }

    /// Write a concrete document as text.
    fn serialize_concrete(&self, doc: &Document, options: &WriteOptions) -> String {
        serialize_xml(doc, options)
    }

    /// Derive the abstract tree of `concrete`, stamping every element with its identity.
    fn get(&self, _concrete: &Document, _options: &ConvertOptions) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support get",
            self.name()
        )))
    }

    /// Write an edited abstract tree back into `concrete` in place.
    fn put(
        &self,
        _concrete: &mut Document,
        _abstract_doc: &Document,
        _options: &ConvertOptions,
    ) -> Result<PutStats, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support put",
            self.name()
        )))
    }

    /// Build a new concrete document from an abstract tree.
    fn create(
        &self,
        _abstract_doc: &Document,
        _options: &ConvertOptions,
    ) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support create",
            self.name()
        )))
    }
}
