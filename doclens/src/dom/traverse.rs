//! Traversal and whole-subtree helpers

use super::document::Document;
use super::names::{Tag, HTML_ID, XML_SPACE};
use super::node::{NodeId, NodeKind};

/// Whitespace that HTML rendering collapses. Non-breaking spaces are content.
pub fn is_collapsible_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\u{a0}'
}

impl Document {
    /// Next node in document order, without leaving the subtree of `bound`.
    pub fn next_node_within(&self, node: NodeId, bound: NodeId) -> Option<NodeId> {
        if let Some(first) = self.first_child(node) {
            return Some(first);
        }
        let mut current = node;
        while current != bound {
            if let Some(next) = self.next_sibling(current) {
                return Some(next);
            }
            current = self.parent(current)?;
        }
        None
    }

    /// Next node in document order.
    pub fn next_node(&self, node: NodeId) -> Option<NodeId> {
        self.next_node_within(node, self.document_node())
    }

    /// Previous node in document order.
    pub fn prev_node(&self, node: NodeId) -> Option<NodeId> {
        match self.prev_sibling(node) {
            Some(mut prev) => {
                while let Some(last) = self.last_child(prev) {
                    prev = last;
                }
                Some(prev)
            }
            None => self.parent(node),
        }
    }

    /// Pre-order walk over the descendants of `node`, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            bound: node,
            next: self.first_child(node),
        }
    }

    /// Parent chain, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    pub fn child_with_tag(&self, node: NodeId, tag: Tag) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|c| self.tag(*c) == tag)
    }

    /// Concatenated text of every text and CDATA descendant.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Text(v) | NodeKind::Cdata(v) => out.push_str(v),
            _ => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replace all children of `node` by a single text node.
    pub fn set_text_content(&mut self, node: NodeId, value: &str) {
        self.remove_all_children(node);
        if !value.is_empty() {
            self.append_text(node, value);
        }
    }

    pub fn is_whitespace_node(&self, node: NodeId) -> bool {
        match self.kind(node) {
            NodeKind::Text(v) => v.chars().all(is_collapsible_whitespace),
            _ => false,
        }
    }

    /// Remove whitespace-only text children of `node` (one level).
    pub fn remove_whitespace_nodes(&mut self, node: NodeId) {
        let children = self.children(node).to_vec();
        for child in children {
            if self.is_whitespace_node(child) {
                self.remove_node(child);
            }
        }
    }

    /// Recursively remove whitespace-only text, except under `xml:space="preserve"`.
    pub fn strip_whitespace(&mut self, node: NodeId) {
        if self.get_attribute(node, XML_SPACE) == Some("preserve") {
            return;
        }
        let children = self.children(node).to_vec();
        for child in children {
            if self.is_whitespace_node(child) {
                self.remove_node(child);
            } else {
                self.strip_whitespace(child);
            }
        }
    }

    /// Recursively remove `id` attributes.
    pub fn strip_ids(&mut self, node: NodeId) {
        self.remove_attribute(node, HTML_ID);
        let children = self.children(node).to_vec();
        for child in children {
            self.strip_ids(child);
        }
    }

    /// Whether `a` and `b` carry the same attribute set, ignoring `except`. Order is irrelevant.
    pub fn identical_attributes_except(&self, a: NodeId, b: NodeId, except: Tag) -> bool {
        let count = |n: NodeId| {
            self.attributes(n)
                .iter()
                .filter(|attr| attr.tag != except)
                .count()
        };
        if count(a) != count(b) {
            return false;
        }
        self.attributes(a)
            .iter()
            .filter(|attr| attr.tag != except)
            .all(|attr| self.get_attribute(b, attr.tag) == Some(attr.value.as_str()))
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    bound: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_node_within(current, self.bound);
        Some(current)
    }
}
