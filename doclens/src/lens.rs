//! Lens trait definition
//!
//! A lens handles one shape of concrete node (a paragraph, a run, a table row) in both
//! directions. The reconciliation engine in [`crate::bdt`] applies a lens across every child of
//! a container; lenses recurse into their own children by calling the engine again with a
//! sub-lens.
//!
//! Every operation has a default that behaves as if the shape had no support for it: nodes are
//! invisible, nothing is produced, puts and removals do nothing. A lens overrides only what its
//! shape needs.
//!
//! # Examples
//!
//! ```ignore
//! struct ItemLens;
//!
//! impl<C: LensContext> Lens<C> for ItemLens {
//!     fn is_visible(&self, ctx: &mut C, concrete: NodeId) -> bool {
//!         ctx.concrete_doc().tag(concrete) == ITEM
//!     }
//!
//!     fn get(&self, ctx: &mut C, concrete: NodeId) -> Option<NodeId> {
//!         let text = ctx.concrete_doc().text_content(concrete);
//!         let doc = ctx.abstract_doc_mut();
//!         let node = doc.create_element(HTML_P);
//!         doc.append_text(node, text);
//!         Some(node)
//!     }
//! }
//! ```

use crate::dom::{Document, NodeId};

/// The per-conversion state threaded through every lens call.
///
/// The engine only touches the two documents; implementors carry whatever else their lenses
/// need (identity prefixes, numbering tables, bookmark records).
pub trait LensContext {
    fn abstract_doc(&self) -> &Document;
    fn abstract_doc_mut(&mut self) -> &mut Document;
    fn concrete_doc(&self) -> &Document;
    fn concrete_doc_mut(&mut self) -> &mut Document;
}

/// Bidirectional mapping for one concrete element shape.
pub trait Lens<C: LensContext> {
    /// Whether `concrete` has any representation in the abstract tree.
    fn is_visible(&self, _ctx: &mut C, _concrete: NodeId) -> bool {
        false
    }

    /// Build the abstract counterpart of a visible concrete node.
    ///
    /// The returned node is detached; the caller appends it.
    fn get(&self, _ctx: &mut C, _concrete: NodeId) -> Option<NodeId> {
        None
    }

    /// Materialize a new concrete node for an abstract node that has no counterpart yet.
    ///
    /// Implementations normally create the bare element and then delegate to [`Lens::put`].
    /// `None` means the concrete format cannot express the shape.
    fn create(&self, _ctx: &mut C, _abstract_node: NodeId) -> Option<NodeId> {
        None
    }

    /// Update an existing concrete node from its (possibly edited) abstract counterpart.
    fn put(&self, _ctx: &mut C, _abstract_node: NodeId, _concrete: NodeId) {}

    /// Shape-specific cleanup before the engine detaches `concrete`.
    fn remove(&self, _ctx: &mut C, _concrete: NodeId) {}
}

/// A context owning both documents outright.
///
/// Used by the demonstration harness and tests; format converters define their own contexts.
#[derive(Debug, Clone, Default)]
pub struct SimpleContext {
    pub abstract_doc: Document,
    pub concrete_doc: Document,
}

impl SimpleContext {
    pub fn new(abstract_doc: Document, concrete_doc: Document) -> Self {
        SimpleContext {
            abstract_doc,
            concrete_doc,
        }
    }
}

impl LensContext for SimpleContext {
    fn abstract_doc(&self) -> &Document {
        &self.abstract_doc
    }

    fn abstract_doc_mut(&mut self) -> &mut Document {
        &mut self.abstract_doc
    }

    fn concrete_doc(&self) -> &Document {
        &self.concrete_doc
    }

    fn concrete_doc_mut(&mut self) -> &mut Document {
        &mut self.concrete_doc
    }
}
