//! Arena-owned document tree
//!
//!     A [`Document`] owns every node it has ever created. Nodes are addressed by [`NodeId`]
//!     handles whose value is the node's sequence number, so `node_for_seq_no` is a bounds
//!     check and an index. Nothing is ever freed individually: removing a node from the tree only
//!     clears its parent link, and the record stays in the arena until the document is dropped.
//!
//!     Children are an ordered `Vec` owned by the parent plus a single back-reference on the
//!     child. Every mutation below keeps the two in agreement before returning.
//!
//!     Handles from another document are a caller error. Indexing with one either panics or
//!     silently addresses an unrelated node; neither is checked.

use super::names::{self, NameMap, NamespaceId, Tag, HTML_ID};
use super::node::{Attribute, NodeData, NodeId, NodeKind};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    names: NameMap,
    ids: HashMap<String, NodeId>,
}

impl Document {
    /// Create an empty document holding only its document node (seqNo 0).
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            names: NameMap::new(),
            ids: HashMap::new(),
        };
        doc.alloc(names::DOCUMENT, NodeKind::Document);
        doc
    }

    /// Create a document whose root element has the given tag.
    pub fn with_root(tag: Tag) -> Self {
        let mut doc = Document::new();
        let root = doc.create_element(tag);
        doc.set_root(root);
        doc
    }

    fn alloc(&mut self, tag: Tag, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            tag,
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub fn names(&self) -> &NameMap {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameMap {
        &mut self.names
    }

    /// Intern a name in this document's table.
    pub fn tag_for(&mut self, namespace: NamespaceId, local_name: &str) -> Tag {
        self.names.tag_for(namespace, local_name)
    }

    // Factories

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        debug_assert!(tag >= names::MIN_ELEMENT_TAG);
        self.alloc(tag, NodeKind::Element { attrs: Vec::new() })
    }

    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(names::TEXT, NodeKind::Text(value.into()))
    }

    pub fn create_comment(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(names::COMMENT, NodeKind::Comment(value.into()))
    }

    pub fn create_cdata(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(names::CDATA, NodeKind::Cdata(value.into()))
    }

    pub fn create_processing_instruction(
        &mut self,
        target: impl Into<String>,
        data: impl Into<String>,
    ) -> NodeId {
        self.alloc(
            names::PROCESSING_INSTRUCTION,
            NodeKind::ProcessingInstruction {
                target: target.into(),
                data: data.into(),
            },
        )
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, value: impl Into<String>) -> NodeId {
        let text = self.create_text(value);
        self.append_child(parent, text);
        text
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: Tag) -> NodeId {
        let element = self.create_element(tag);
        self.append_child(parent, element);
        element
    }

    // Identity

    /// Number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_for_seq_no(&self, seq_no: u32) -> Option<NodeId> {
        ((seq_no as usize) < self.nodes.len()).then_some(NodeId(seq_no))
    }

    pub fn element_for_id_attr(&self, value: &str) -> Option<NodeId> {
        self.ids.get(value).copied()
    }

    /// Iterate every node the document owns, in creation order.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    // Node accessors

    pub fn document_node(&self) -> NodeId {
        NodeId(0)
    }

    /// The first element child of the document node.
    pub fn root(&self) -> Option<NodeId> {
        self.data(self.document_node())
            .children
            .iter()
            .copied()
            .find(|c| self.is_element(*c))
    }

    /// Replace the root element, keeping any prolog comments or processing instructions.
    pub fn set_root(&mut self, element: NodeId) {
        if let Some(old) = self.root() {
            if old == element {
                return;
            }
            let doc_node = self.document_node();
            self.insert_before(doc_node, element, Some(old));
            self.remove_node(old);
        } else {
            let doc_node = self.document_node();
            self.append_child(doc_node, element);
        }
    }

    pub fn tag(&self, id: NodeId) -> Tag {
        self.data(id).tag
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Text(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.last().copied()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.data(id).parent?;
        self.data(parent).children.iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.data(id).parent?;
        let index = self.index_in_parent(id)?;
        self.data(parent).children.get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.data(id).parent?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.data(parent).children.get(i).copied())
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.data(n).parent;
        }
        false
    }

    /// Whether the node is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.document_node(), id)
    }

    // Tree edits

    /// Move `node` into `parent` immediately before `ref_child`, or to the end when `ref_child`
    /// is `None` or not a child of `parent`.
    ///
    /// Inserting a node before itself leaves the tree untouched.
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, ref_child: Option<NodeId>) {
        if Some(node) == ref_child {
            return;
        }
        if self.is_ancestor_or_self(node, parent) {
            warn!(%node, %parent, "refusing to insert a node into its own subtree");
            return;
        }

        self.detach(node);

        let position = ref_child
            .and_then(|r| self.data(parent).children.iter().position(|c| *c == r))
            .unwrap_or(self.data(parent).children.len());
        self.data_mut(parent).children.insert(position, node);
        self.data_mut(node).parent = Some(parent);
    }

    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        self.insert_before(parent, node, None);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.data(node).parent {
            self.data_mut(parent).children.retain(|c| *c != node);
            self.data_mut(node).parent = None;
        }
    }

    /// Detach `node` from the tree. It remains allocated and resolvable by seqNo.
    pub fn remove_node(&mut self, node: NodeId) {
        self.detach(node);
    }

    /// Replace `node` by its children, in place.
    pub fn remove_node_keep_children(&mut self, node: NodeId) {
        let Some(parent) = self.data(node).parent else {
            return;
        };
        let children = std::mem::take(&mut self.data_mut(node).children);
        let index = self.index_in_parent(node).unwrap_or(0);
        for child in &children {
            self.data_mut(*child).parent = Some(parent);
        }
        self.data_mut(parent)
            .children
            .splice(index..index, children.iter().copied());
        self.detach(node);
    }

    pub fn remove_all_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.data_mut(node).children);
        for child in children {
            self.data_mut(child).parent = None;
        }
    }

    // Attributes

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.data(id).kind {
            NodeKind::Element { attrs } => attrs,
            _ => &[],
        }
    }

    pub fn get_attribute(&self, id: NodeId, tag: Tag) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.tag == tag)
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, tag: Tag) -> bool {
        self.get_attribute(id, tag).is_some()
    }

    /// Set an attribute, replacing any existing value for the same tag in place.
    /// Ignored on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, tag: Tag, value: impl Into<String>) {
        let value = value.into();
        if !self.is_element(id) {
            return;
        }
        if tag == HTML_ID {
            if let Some(old) = self.get_attribute(id, HTML_ID).map(str::to_string) {
                self.unindex_id(&old, id);
            }
            self.ids.insert(value.clone(), id);
        }
        if let NodeKind::Element { attrs } = &mut self.data_mut(id).kind {
            match attrs.iter_mut().find(|a| a.tag == tag) {
                Some(existing) => existing.value = value,
                None => attrs.push(Attribute { tag, value }),
            }
        }
    }

    /// Set the attribute when `value` is `Some`, remove it otherwise.
    pub fn set_or_remove_attribute(&mut self, id: NodeId, tag: Tag, value: Option<&str>) {
        match value {
            Some(v) => self.set_attribute(id, tag, v),
            None => self.remove_attribute(id, tag),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, tag: Tag) {
        if tag == HTML_ID {
            if let Some(old) = self.get_attribute(id, HTML_ID).map(str::to_string) {
                self.unindex_id(&old, id);
            }
        }
        if let NodeKind::Element { attrs } = &mut self.data_mut(id).kind {
            attrs.retain(|a| a.tag != tag);
        }
    }

    pub fn remove_all_attributes(&mut self, id: NodeId) {
        let tags: Vec<Tag> = self.attributes(id).iter().map(|a| a.tag).collect();
        for tag in tags {
            self.remove_attribute(id, tag);
        }
    }

    fn unindex_id(&mut self, value: &str, id: NodeId) {
        if self.ids.get(value) == Some(&id) {
            self.ids.remove(value);
        }
    }

    // Values

    /// The string value of a text, comment, CDATA or processing-instruction node.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(v) | NodeKind::Comment(v) | NodeKind::Cdata(v) => Some(v),
            NodeKind::ProcessingInstruction { data, .. } => Some(data),
            NodeKind::Document | NodeKind::Element { .. } => None,
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        match &mut self.data_mut(id).kind {
            NodeKind::Text(v) | NodeKind::Comment(v) | NodeKind::Cdata(v) => *v = value.into(),
            NodeKind::ProcessingInstruction { data, .. } => *data = value.into(),
            NodeKind::Document | NodeKind::Element { .. } => {}
        }
    }

    /// `#document`, `#text`, `#comment`, `#cdata-section`, the PI target, or the qualified
    /// element name.
    pub fn node_name(&self, id: NodeId) -> String {
        match &self.data(id).kind {
            NodeKind::Document => "#document".to_string(),
            NodeKind::Text(_) => "#text".to_string(),
            NodeKind::Comment(_) => "#comment".to_string(),
            NodeKind::Cdata(_) => "#cdata-section".to_string(),
            NodeKind::ProcessingInstruction { target, .. } => target.clone(),
            NodeKind::Element { .. } => self.names.qualified_name(self.data(id).tag),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
