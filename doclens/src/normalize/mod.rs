//! Canonical shape of the abstract tree
//!
//!     Lenses and the identity scheme assume the abstract document is in a fixed shape before
//!     a `put`: block containers hold only blocks, paragraphs hold only flat styled spans, and
//!     whitespace is collapsed the way a browser would render it. Editors produce whatever HTML
//!     they like, so [`normalize_document`] establishes that shape first.
//!
//!     - style.rs:      inline `style` attribute model
//!     - whitespace.rs: text merging and paragraph whitespace
//!     - inline.rs:     inline flattening and span merging

pub mod inline;
pub mod style;
pub mod whitespace;

use crate::dom::names::*;
use crate::dom::{Document, NodeId};
use crate::html::{is_block_level_tag, is_paragraph_tag};
pub use style::InlineStyle;
use tracing::debug;

/// Bring the whole document into canonical shape.
pub fn normalize_document(doc: &mut Document) {
    let Some(root) = doc.root() else {
        return;
    };
    whitespace::merge_adjacent_text_nodes(doc, root);
    normalize_container(doc, root);
    debug!(nodes = doc.node_count(), "normalized document");
}

fn normalize_container(doc: &mut Document, container: NodeId) {
    let children = doc.children(container).to_vec();
    for child in children {
        match doc.tag(child) {
            HTML_H1 | HTML_H2 | HTML_H3 | HTML_H4 | HTML_H5 | HTML_H6 | HTML_P | HTML_CAPTION
            | HTML_FIGCAPTION => normalize_paragraph(doc, child),
            HTML_BODY | HTML_TD | HTML_TH | HTML_LI | HTML_FIGURE => {
                wrap_anonymous_child_paragraphs(doc, child);
                doc.remove_whitespace_nodes(child);
                normalize_container(doc, child);
            }
            HTML_TABLE | HTML_THEAD | HTML_TBODY | HTML_TFOOT | HTML_TR | HTML_UL | HTML_OL => {
                doc.remove_whitespace_nodes(child);
                normalize_container(doc, child);
            }
            HTML_HEAD => {}
            _ => normalize_unknown_container(doc, child),
        }
    }
}

/// Unknown wrappers (`div`, `section`, stray inline content) dissolve into their parent once
/// their own content is in shape.
fn normalize_unknown_container(doc: &mut Document, node: NodeId) {
    wrap_anonymous_child_paragraphs(doc, node);
    doc.remove_whitespace_nodes(node);
    normalize_container(doc, node);
    doc.remove_node_keep_children(node);
}

/// Wrap each run of non-block children in a `p`, unless the run is only whitespace.
pub fn wrap_anonymous_child_paragraphs(doc: &mut Document, node: NodeId) {
    let children = doc.children(node).to_vec();
    let mut run: Vec<NodeId> = Vec::new();
    let mut only_whitespace = true;

    let flush = |doc: &mut Document, run: &mut Vec<NodeId>, only_whitespace: &mut bool| {
        if let (Some(first), false) = (run.first().copied(), *only_whitespace) {
            let wrapper = doc.create_element(HTML_P);
            doc.insert_before(node, wrapper, Some(first));
            for n in run.iter() {
                doc.append_child(wrapper, *n);
            }
        }
        run.clear();
        *only_whitespace = true;
    };

    for child in children {
        if is_block_level_tag(doc.tag(child)) {
            flush(doc, &mut run, &mut only_whitespace);
        } else {
            if !doc.is_whitespace_node(child) {
                only_whitespace = false;
            }
            run.push(child);
        }
    }
    flush(doc, &mut run, &mut only_whitespace);
}

fn normalize_paragraph(doc: &mut Document, paragraph: NodeId) {
    let children = doc.children(paragraph).to_vec();
    for child in children {
        if doc.is_whitespace_node(child) {
            let span = doc.create_element(HTML_SPAN);
            doc.insert_before(paragraph, span, Some(child));
            doc.append_child(span, child);
        }
    }

    whitespace::fix_paragraph_whitespace(doc, paragraph);

    let mut pending_id = None;
    inline::normalize_inline(
        doc,
        paragraph,
        paragraph,
        &InlineStyle::new(),
        0,
        &mut pending_id,
        None,
    );
    inline::fix_run_content_hierarchy(doc, paragraph);
    inline::merge_spans(doc, paragraph);
}

/// Move inline properties declared on paragraphs down onto their spans.
pub fn push_down_inline_properties(doc: &mut Document, node: NodeId) {
    if !is_paragraph_tag(doc.tag(node)) {
        let children = doc.children(node).to_vec();
        for child in children {
            push_down_inline_properties(doc, child);
        }
        return;
    }

    let Some(text) = doc.get_attribute(node, HTML_STYLE) else {
        return;
    };
    let (inline, block) = InlineStyle::parse(text).partition_inline();
    if inline.is_empty() {
        return;
    }
    if block.is_empty() {
        doc.remove_attribute(node, HTML_STYLE);
    } else {
        doc.set_attribute(node, HTML_STYLE, block.to_string());
    }

    let spans: Vec<NodeId> = doc
        .children(node)
        .iter()
        .copied()
        .filter(|c| doc.tag(*c) == HTML_SPAN)
        .collect();
    for span in spans {
        let mut style = InlineStyle::parse(doc.get_attribute(span, HTML_STYLE).unwrap_or_default());
        for (name, value) in inline.iter() {
            style.set(name, value);
        }
        doc.set_attribute(span, HTML_STYLE, style.to_string());
    }
}
