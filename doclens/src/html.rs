//! Predicates over the abstract (XHTML) tree

use crate::dom::names::*;
use crate::dom::{Document, NodeId, Tag};

/// Class prefix of spans that stand for a non-text concrete object (tabs, placeholders).
pub const SPECIAL_CLASS_PREFIX: &str = "doclens-";
pub const TAB_CLASS: &str = "doclens-tab";
pub const PLACEHOLDER_CLASS: &str = "doclens-placeholder";
pub const CONTAINER_CLASS: &str = "doclens-container";

pub fn is_block_level_tag(tag: Tag) -> bool {
    matches!(
        tag,
        HTML_H1
            | HTML_H2
            | HTML_H3
            | HTML_H4
            | HTML_H5
            | HTML_H6
            | HTML_P
            | HTML_UL
            | HTML_OL
            | HTML_LI
            | HTML_TABLE
            | HTML_CAPTION
            | HTML_THEAD
            | HTML_TBODY
            | HTML_TFOOT
            | HTML_TR
            | HTML_TD
            | HTML_TH
            | HTML_FIGURE
            | HTML_FIGCAPTION
            | HTML_PRE
            | HTML_BLOCKQUOTE
    ) || is_container_tag(tag)
}

pub fn is_paragraph_tag(tag: Tag) -> bool {
    matches!(
        tag,
        HTML_H1 | HTML_H2 | HTML_H3 | HTML_H4 | HTML_H5 | HTML_H6 | HTML_P
    )
}

/// Sectioning elements that only group other blocks.
pub fn is_container_tag(tag: Tag) -> bool {
    matches!(
        tag,
        HTML_ARTICLE
            | HTML_SECTION
            | HTML_NAV
            | HTML_ASIDE
            | HTML_HGROUP
            | HTML_HEADER
            | HTML_FOOTER
            | HTML_ADDRESS
            | HTML_DIV
    )
}

/// Inline elements; whitespace between them is significant.
pub fn is_phrasing_tag(tag: Tag) -> bool {
    matches!(
        tag,
        HTML_A
            | HTML_B
            | HTML_BR
            | HTML_DEL
            | HTML_EM
            | HTML_I
            | HTML_IMG
            | HTML_INS
            | HTML_S
            | HTML_SPAN
            | HTML_STRONG
            | HTML_SUB
            | HTML_SUP
            | HTML_U
    )
}

/// `h1`..`h6` → 1..6.
pub fn heading_level(tag: Tag) -> Option<u8> {
    match tag {
        HTML_H1 => Some(1),
        HTML_H2 => Some(2),
        HTML_H3 => Some(3),
        HTML_H4 => Some(4),
        HTML_H5 => Some(5),
        HTML_H6 => Some(6),
        _ => None,
    }
}

pub fn heading_tag(level: u8) -> Option<Tag> {
    match level {
        1 => Some(HTML_H1),
        2 => Some(HTML_H2),
        3 => Some(HTML_H3),
        4 => Some(HTML_H4),
        5 => Some(HTML_H5),
        6 => Some(HTML_H6),
        _ => None,
    }
}

pub fn class_of(doc: &Document, node: NodeId) -> Option<&str> {
    doc.get_attribute(node, HTML_CLASS)
}

pub fn is_special_span(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == HTML_SPAN
        && class_of(doc, node).is_some_and(|c| c.starts_with(SPECIAL_CLASS_PREFIX))
}

/// Nodes that render as something on their own: text, images, line breaks, special spans.
pub fn is_content_node(doc: &Document, node: NodeId) -> bool {
    match doc.tag(node) {
        TEXT | HTML_IMG | HTML_BR => true,
        HTML_SPAN => is_special_span(doc, node),
        _ => false,
    }
}

pub fn node_has_content(doc: &Document, node: NodeId) -> bool {
    if doc.is_whitespace_node(node) {
        return false;
    }
    is_content_node(doc, node)
        || doc
            .children(node)
            .iter()
            .any(|c| node_has_content(doc, *c))
}

/// An `a` with an external target. In-document links (`#anchor`) are not hyperlinks.
pub fn node_is_hyperlink(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == HTML_A
        && doc
            .get_attribute(node, HTML_HREF)
            .is_some_and(|href| !href.starts_with('#'))
}

pub fn find_head(doc: &Document) -> Option<NodeId> {
    doc.child_with_tag(doc.root()?, HTML_HEAD)
}

pub fn find_body(doc: &Document) -> Option<NodeId> {
    doc.child_with_tag(doc.root()?, HTML_BODY)
}

/// A fresh `html/head + body` document; returns the document and its body.
pub fn new_html_document() -> (Document, NodeId) {
    let mut doc = Document::with_root(HTML_HTML);
    let mut body = doc.document_node();
    if let Some(html) = doc.root() {
        doc.append_element(html, HTML_HEAD);
        body = doc.append_element(html, HTML_BODY);
    }
    (doc, body)
}
