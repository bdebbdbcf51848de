//! Flattening of inline formatting into a single level of styled spans
//!
//!     After this pass a paragraph holds only `span`s (each wrapping one leaf: text, image or
//!     break), links and change markers (whose content is flattened the same way), and possibly
//!     one trailing bare `br`. Formatting elements such as `b` or `em` disappear: their meaning
//!     moves into the `style` attribute of every span below them.
//!
//!     Identity survives flattening: the id of a span directly inside the paragraph moves onto
//!     the first span produced from its content, so the concrete run it came from is still
//!     found on the way back. A span whose content vanished keeps its id on an empty span, since
//!     its concrete run may hold things the abstract side never sees.

use super::style::InlineStyle;
use crate::dom::names::*;
use crate::dom::{Document, NodeId};
use crate::html::{is_paragraph_tag, is_special_span, CONTAINER_CLASS, PLACEHOLDER_CLASS, TAB_CLASS};

/// Identity waiting to be attached to the next emitted span.
type PendingId = Option<String>;

/// Wrap `node` (or nothing) in a new span carrying the current style, class and pending id,
/// and append it to `dest`.
fn add_leaf(
    doc: &mut Document,
    node: Option<NodeId>,
    dest: NodeId,
    style: &InlineStyle,
    pending_id: &mut PendingId,
    class: Option<&str>,
) {
    let span = doc.create_element(HTML_SPAN);
    if !style.is_empty() {
        doc.set_attribute(span, HTML_STYLE, style.to_string());
    }
    if let Some(class) = class {
        doc.set_attribute(span, HTML_CLASS, class);
    }
    if let Some(id) = pending_id.take() {
        let node_id = node.and_then(|n| doc.get_attribute(n, HTML_ID));
        if node_id != Some(id.as_str()) {
            doc.set_attribute(span, HTML_ID, id);
        }
    }
    if let Some(node) = node {
        doc.append_child(span, node);
    }
    doc.append_child(dest, span);
}

/// Move the inline content of `source` into `dest` in canonical form.
///
/// `source == dest` rewrites an element in place.
pub fn normalize_inline(
    doc: &mut Document,
    source: NodeId,
    dest: NodeId,
    style: &InlineStyle,
    depth: usize,
    pending_id: &mut PendingId,
    class: Option<&str>,
) {
    let children = doc.children(source).to_vec();
    if source == dest {
        doc.remove_all_children(dest);
    }
    let source_is_paragraph = is_paragraph_tag(doc.tag(source));

    for (index, node) in children.iter().copied().enumerate() {
        let node_class = doc.get_attribute(node, HTML_CLASS).map(str::to_string);
        let is_container = node_class.as_deref() == Some(CONTAINER_CLASS);
        let is_placeholder = node_class.as_deref() == Some(PLACEHOLDER_CLASS);
        let class = match node_class.as_deref() {
            Some(c) if !is_container && !is_placeholder => Some(c.to_string()),
            _ => class.map(str::to_string),
        };
        let class = class.as_deref();

        let mut style = style.clone();
        if let Some(text) = doc.get_attribute(node, HTML_STYLE) {
            style.extend_from_str(text);
        }

        match doc.tag(node) {
            HTML_B | HTML_STRONG => {
                style.set_bold(true);
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
            }
            HTML_I | HTML_EM => {
                style.set_italic(true);
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
            }
            HTML_U => {
                style.set_decoration("underline", true);
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
            }
            HTML_S => {
                style.set_decoration("line-through", true);
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
            }
            HTML_SUB | HTML_SUP => {
                let align = if doc.tag(node) == HTML_SUB { "sub" } else { "super" };
                style.set(super::style::VERTICAL_ALIGN, align);
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
            }
            HTML_SPAN => {
                if is_placeholder {
                    add_leaf(doc, Some(node), dest, &style, pending_id, class);
                    continue;
                }
                let this_id = doc.get_attribute(node, HTML_ID).map(str::to_string);
                if depth == 0 && !is_container {
                    *pending_id = this_id.clone();
                }
                let empty = doc.children(node).is_empty();
                if is_special_span(doc, node) && (is_container || empty) {
                    normalize_inline(doc, node, node, &style, depth + 1, pending_id, class);
                    if !style.is_empty() || pending_id.is_some() {
                        add_leaf(doc, Some(node), dest, &style, pending_id, None);
                    } else {
                        doc.append_child(dest, node);
                    }
                } else {
                    normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
                }

                if pending_id.is_some() && *pending_id == this_id {
                    add_leaf(doc, None, dest, &style, pending_id, class);
                }
            }
            HTML_INS | HTML_DEL | HTML_A => {
                // Content is rewritten in place, so its top-level spans keep their ids.
                normalize_inline(doc, node, node, &style, 0, pending_id, class);
                doc.append_child(dest, node);
            }
            TEXT | HTML_IMG => {
                add_leaf(doc, Some(node), dest, &style, pending_id, class);
            }
            HTML_BR => {
                // A trailing break only gives an otherwise empty paragraph its height.
                if source_is_paragraph && index + 1 == children.len() {
                    doc.append_child(dest, node);
                } else {
                    add_leaf(doc, Some(node), dest, &style, pending_id, class);
                }
            }
            _ => {
                normalize_inline(doc, node, dest, &style, depth + 1, pending_id, class);
                doc.append_child(dest, node);
            }
        }
    }
}

/// Tab spans must sit inside a run span.
pub fn fix_run_content_hierarchy(doc: &mut Document, node: NodeId) {
    if doc.tag(node) == HTML_SPAN && doc.get_attribute(node, HTML_CLASS) == Some(TAB_CLASS) {
        if let Some(parent) = doc.parent(node) {
            if doc.tag(parent) != HTML_SPAN {
                let wrapper = doc.create_element(HTML_SPAN);
                doc.insert_before(parent, wrapper, Some(node));
                doc.append_child(wrapper, node);
            }
        }
    }

    let children = doc.children(node).to_vec();
    for child in children {
        fix_run_content_hierarchy(doc, child);
    }
}

fn contains_image(doc: &Document, node: NodeId) -> bool {
    doc.children(node).iter().any(|c| doc.tag(*c) == HTML_IMG)
}

fn can_merge_text(doc: &Document, a: NodeId, b: NodeId) -> bool {
    doc.last_child(a).is_some_and(|n| doc.is_text(n)) && doc.first_child(b).is_some_and(|n| doc.is_text(n))
}

fn merge_with_prev(doc: &mut Document, node: NodeId, prev: NodeId) {
    while let Some(first) = doc.first_child(node) {
        match doc.last_child(prev) {
            Some(last) if doc.is_text(last) && doc.is_text(first) => {
                let merged = format!(
                    "{}{}",
                    doc.value(last).unwrap_or_default(),
                    doc.value(first).unwrap_or_default()
                );
                doc.set_value(last, merged);
                doc.remove_node(first);
            }
            _ => doc.append_child(prev, first),
        }
    }
    doc.remove_node(node);
}

fn merge_with_next(doc: &mut Document, node: NodeId, next: NodeId) {
    while let Some(last) = doc.last_child(node) {
        match doc.first_child(next) {
            Some(first) if doc.is_text(first) && doc.is_text(last) => {
                let merged = format!(
                    "{}{}",
                    doc.value(last).unwrap_or_default(),
                    doc.value(first).unwrap_or_default()
                );
                doc.set_value(first, merged);
                doc.remove_node(last);
            }
            first => doc.insert_before(next, last, first),
        }
    }
    doc.remove_node(node);
}

fn mergeable_neighbour(doc: &Document, neighbour: Option<NodeId>, span: NodeId) -> Option<NodeId> {
    neighbour.filter(|n| {
        doc.tag(*n) == HTML_SPAN
            && !is_special_span(doc, *n)
            && doc.identical_attributes_except(*n, span, HTML_ID)
            && !contains_image(doc, *n)
    })
}

/// Fold id-less spans into an adjacent span with the same attributes.
pub fn merge_spans(doc: &mut Document, node: NodeId) {
    let children = doc.children(node).to_vec();
    for child in children {
        if doc.tag(child) != HTML_SPAN
            || doc.has_attribute(child, HTML_ID)
            || contains_image(doc, child)
            || doc.parent(child) != Some(node)
        {
            continue;
        }

        let before = mergeable_neighbour(doc, doc.prev_sibling(child), child);
        let after = mergeable_neighbour(doc, doc.next_sibling(child), child);

        match (before, after) {
            (Some(b), _) if can_merge_text(doc, b, child) => merge_with_prev(doc, child, b),
            (_, Some(a)) if can_merge_text(doc, child, a) => merge_with_next(doc, child, a),
            (Some(b), _) => merge_with_prev(doc, child, b),
            (None, Some(a)) => merge_with_next(doc, child, a),
            (None, None) => {}
        }
    }
}
