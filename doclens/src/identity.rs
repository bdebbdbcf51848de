//! seqNo identity scheme
//!
//! Every abstract element produced by a `get` carries an `id` attribute of the form
//! `<prefix><seqNo>`, naming the concrete node it was derived from. During a `put` the id is
//! decoded back into a concrete node. Abstract nodes added by the user have no id (or one that
//! does not decode) and are therefore created fresh.
//!
//! Because seqNos are never reused, an id can only ever name the node it was minted for.
//! Removed nodes stay resolvable, which lets an abstract node survive being cut from one place
//! and pasted elsewhere.

use crate::dom::names::HTML_ID;
use crate::dom::{Document, NodeId};
use crate::lens::LensContext;

pub const DEFAULT_ID_PREFIX: &str = "word";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    prefix: String,
}

impl IdScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        IdScheme {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, concrete: NodeId) -> String {
        format!("{}{}", self.prefix, concrete.seq_no())
    }

    /// Parse `<prefix><digits>` into a seqNo.
    pub fn decode(&self, value: &str) -> Option<u32> {
        let digits = value.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Resolve an id value to an element of `concrete_doc`.
    pub fn resolve(&self, concrete_doc: &Document, value: &str) -> Option<NodeId> {
        let node = concrete_doc.node_for_seq_no(self.decode(value)?)?;
        concrete_doc.is_element(node).then_some(node)
    }

    /// Stamp `abstract_node` with the identity of `concrete`.
    pub fn assign(&self, abstract_doc: &mut Document, abstract_node: NodeId, concrete: NodeId) {
        abstract_doc.set_attribute(abstract_node, HTML_ID, self.encode(concrete));
    }

    /// Lookup callback for [`crate::bdt::container_put`].
    pub fn lookup<C: LensContext>(&self, ctx: &C, abstract_node: NodeId) -> Option<NodeId> {
        let value = ctx.abstract_doc().get_attribute(abstract_node, HTML_ID)?;
        self.resolve(ctx.concrete_doc(), value)
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        IdScheme::new(DEFAULT_ID_PREFIX)
    }
}
