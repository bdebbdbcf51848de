//! Conversion state shared by the Word lenses

use crate::bdt::{container_put, PutStats};
use crate::dom::names::HTML_ID;
use crate::dom::{Document, NodeId};
use crate::identity::IdScheme;
use crate::lens::{Lens, LensContext};

pub struct WordContext {
    pub abstract_doc: Document,
    pub concrete_doc: Document,
    ids: IdScheme,
    stats: PutStats,
}

impl WordContext {
    pub fn new(abstract_doc: Document, concrete_doc: Document, ids: IdScheme) -> Self {
        WordContext {
            abstract_doc,
            concrete_doc,
            ids,
            stats: PutStats::default(),
        }
    }

    /// Stamp `abstract_node` with the identity of `concrete`.
    pub fn assign_id(&mut self, abstract_node: NodeId, concrete: NodeId) {
        self.ids
            .assign(&mut self.abstract_doc, abstract_node, concrete);
    }

    /// The concrete node named by the `id` of `abstract_node`.
    pub fn lookup(&self, abstract_node: NodeId) -> Option<NodeId> {
        let value = self.abstract_doc.get_attribute(abstract_node, HTML_ID)?;
        self.ids.resolve(&self.concrete_doc, value)
    }

    /// Reconcile the children of one container pair, resolving identity through `id`s.
    pub fn put_children<L: Lens<WordContext>>(&mut self, lens: &L, abstract_node: NodeId, concrete: NodeId) {
        self.put_children_with(lens, abstract_node, concrete, |ctx, node| ctx.lookup(node));
    }

    pub fn put_children_with<L, F>(&mut self, lens: &L, abstract_node: NodeId, concrete: NodeId, lookup: F)
    where
        L: Lens<WordContext>,
        F: FnMut(&mut WordContext, NodeId) -> Option<NodeId>,
    {
        let stats = container_put(self, lens, abstract_node, concrete, lookup);
        self.stats += stats;
    }

    /// Totals over every container reconciled so far.
    pub fn stats(&self) -> PutStats {
        self.stats
    }

    pub fn into_documents(self) -> (Document, Document) {
        (self.abstract_doc, self.concrete_doc)
    }
}

impl LensContext for WordContext {
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
