//! WordprocessingML body format
//!
//!     The concrete document is the `word/document.xml` part of a `.docx` package; packaging
//!     (zip, relationships, styles part) is out of scope. The abstract document is XHTML:
//!
//!         w:document              html
//!         └─ w:body           ↔   ├─ head
//!            ├─ w:p               └─ body
//!            │  ├─ w:pPr             ├─ p | h1..h6
//!            │  └─ w:r               │  └─ span style="…"
//!            │     ├─ w:rPr          │     ├─ #text
//!            │     └─ w:t            │     └─ span.doclens-tab
//!            ├─ w:tbl                │
//!            └─ w:sectPr             (invisible: no counterpart)
//!
//!     - context.rs:    conversion state, identity resolution, put statistics
//!     - block.rs:      body, block dispatcher and paragraph lenses
//!     - run.rs:        paragraph content, run and run content lenses
//!     - properties.rs: `w:pPr` / `w:rPr` ↔ paragraph class and CSS

pub mod block;
pub mod context;
pub mod properties;
pub mod run;

use crate::bdt::{container_get, PutStats};
use crate::dom::names::*;
use crate::dom::{Document, NodeId};
use crate::error::{DocError, FormatError};
use crate::format::{ConvertOptions, Format};
use crate::html::find_body;
use crate::identity::IdScheme;
use crate::lens::Lens;
use crate::normalize::{normalize_document, push_down_inline_properties};
use block::BodyLens;
pub use context::WordContext;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct WordFormat;

fn concrete_body(doc: &Document) -> Result<NodeId, FormatError> {
    let root = doc
        .root()
        .filter(|r| doc.tag(*r) == WORD_DOCUMENT)
        .ok_or_else(|| FormatError::MissingElement("w:document".to_string()))?;
    doc.child_with_tag(root, WORD_BODY)
        .ok_or_else(|| FormatError::MissingElement("w:body".to_string()))
}

/// Copy of `abstract_doc` in the shape the lenses expect.
fn prepare_abstract(abstract_doc: &Document, options: &ConvertOptions) -> Result<(Document, NodeId), FormatError> {
    let mut doc = abstract_doc.clone();
    if options.normalize {
        normalize_document(&mut doc);
        if let Some(root) = doc.root() {
            push_down_inline_properties(&mut doc, root);
        }
    }
    let body = find_body(&doc).ok_or_else(|| FormatError::MissingElement("body".to_string()))?;
    Ok((doc, body))
}

impl Format for WordFormat {
    fn name(&self) -> &str {
        "word"
    }

    fn description(&self) -> &str {
        "WordprocessingML main document part (word/document.xml)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn supports_get(&self) -> bool {
        true
    }

    fn supports_put(&self) -> bool {
        true
    }

    fn get(&self, concrete: &Document, options: &ConvertOptions) -> Result<Document, FormatError> {
        let cdoc = concrete.root().ok_or(DocError::NoRoot)?;
        concrete_body(concrete)?;

        let mut abstract_doc = Document::with_root(HTML_HTML);
        let html = abstract_doc.root().ok_or(DocError::NoRoot)?;
        abstract_doc.append_element(html, HTML_HEAD);

        let mut ctx = WordContext::new(
            abstract_doc,
            concrete.clone(),
            IdScheme::new(options.id_prefix.as_str()),
        );
        container_get(&mut ctx, &BodyLens, html, cdoc);
        let (abstract_doc, _) = ctx.into_documents();
        debug!(nodes = abstract_doc.node_count(), "word get");
        Ok(abstract_doc)
    }

    fn put(
        &self,
        concrete: &mut Document,
        abstract_doc: &Document,
        options: &ConvertOptions,
    ) -> Result<PutStats, FormatError> {
        let cbody = concrete_body(concrete)?;
        let (prepared, abody) = prepare_abstract(abstract_doc, options)?;

        let mut ctx = WordContext::new(
            prepared,
            std::mem::take(concrete),
            IdScheme::new(options.id_prefix.as_str()),
        );
        BodyLens.put(&mut ctx, abody, cbody);
        let stats = ctx.stats();
        let (_, updated) = ctx.into_documents();
        *concrete = updated;

        info!(
            retained = stats.retained,
            created = stats.created,
            removed = stats.removed,
            dropped = stats.dropped,
            "word put"
        );
        Ok(stats)
    }

    fn create(&self, abstract_doc: &Document, options: &ConvertOptions) -> Result<Document, FormatError> {
        let mut concrete = Document::with_root(WORD_DOCUMENT);
        let root = concrete.root().ok_or(DocError::NoRoot)?;
        concrete.append_element(root, WORD_BODY);

        // Ids left over from another document must not resolve against this one.
        let mut fresh = abstract_doc.clone();
        if let Some(root) = fresh.root() {
            fresh.strip_ids(root);
        }
        self.put(&mut concrete, &fresh, options)?;
        Ok(concrete)
    }
}
