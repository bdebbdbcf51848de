//! Node records stored in a document arena

use super::names::Tag;

/// Handle to a node in a [`super::Document`].
///
/// The handle value is the node's sequence number: it is assigned once when the node is
/// created, is never reused, and doubles as the index into the document arena. A handle stays
/// valid after the node is detached from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn seq_no(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An attribute on an element, keyed by interned tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub tag: Tag,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element { attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
    Cdata(String),
    ProcessingInstruction { target: String, data: String },
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) tag: Tag,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}
