//! Text merging and whitespace collapsing inside paragraphs

use crate::dom::names::{HTML_BR, TEXT};
use crate::dom::{is_collapsible_whitespace, Document, NodeId};

/// Join runs of adjacent text nodes, recursively.
pub fn merge_adjacent_text_nodes(doc: &mut Document, node: NodeId) {
    let mut index = 0;
    while index + 1 < doc.children(node).len() {
        let child = doc.children(node)[index];
        let next = doc.children(node)[index + 1];
        if doc.is_text(child) && doc.is_text(next) {
            let merged = format!(
                "{}{}",
                doc.value(child).unwrap_or_default(),
                doc.value(next).unwrap_or_default()
            );
            doc.set_value(child, merged);
            doc.remove_node(next);
        } else {
            index += 1;
        }
    }

    let children = doc.children(node).to_vec();
    for child in children {
        merge_adjacent_text_nodes(doc, child);
    }
}

struct Leaf {
    node: NodeId,
    depth: usize,
    space_at_start: bool,
    space_at_end: bool,
}

fn find_leaves(doc: &Document, node: NodeId, depth: usize, leaves: &mut Vec<Leaf>) {
    if doc.children(node).is_empty() {
        leaves.push(Leaf {
            node,
            depth,
            space_at_start: false,
            space_at_end: false,
        });
    } else {
        for child in doc.children(node) {
            find_leaves(doc, *child, depth + 1, leaves);
        }
    }
}

/// Collapse whitespace runs to their first character.
pub fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut have_space = false;
    for c in value.chars() {
        if is_collapsible_whitespace(c) {
            if !have_space {
                out.push(c);
            }
            have_space = true;
        } else {
            out.push(c);
            have_space = false;
        }
    }
    out
}

/// Collapse and trim whitespace across all text leaves of a paragraph.
///
/// Leading space is dropped at the start of the paragraph and after a `br`; trailing space at
/// the end and before a `br`. Where two leaves meet with a space on both sides, the space in
/// the more deeply nested leaf goes. Text left empty is removed.
pub fn fix_paragraph_whitespace(doc: &mut Document, paragraph: NodeId) {
    let mut leaves = Vec::new();
    find_leaves(doc, paragraph, 0, &mut leaves);

    for leaf in leaves.iter_mut() {
        if doc.tag(leaf.node) != TEXT {
            continue;
        }
        let collapsed = collapse_whitespace(doc.value(leaf.node).unwrap_or_default());
        leaf.space_at_start = collapsed.chars().next().is_some_and(is_collapsible_whitespace);
        leaf.space_at_end = collapsed
            .chars()
            .next_back()
            .is_some_and(is_collapsible_whitespace);
        doc.set_value(leaf.node, collapsed);
    }

    let count = leaves.len();
    for i in 0..count {
        let leaf = &leaves[i];
        if doc.tag(leaf.node) != TEXT {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| &leaves[p]);
        let next = leaves.get(i + 1);

        let trim_start = i == 0
            || prev.is_some_and(|p| doc.tag(p.node) == HTML_BR)
            || prev.is_some_and(|p| leaf.space_at_start && p.space_at_end && leaf.depth >= p.depth);
        let trim_end = i + 1 == count
            || next.is_some_and(|n| doc.tag(n.node) == HTML_BR)
            || next.is_some_and(|n| leaf.space_at_end && n.space_at_start && leaf.depth > n.depth);

        let mut value = doc.value(leaf.node).unwrap_or_default();
        if trim_start {
            value = value.trim_start_matches(is_collapsible_whitespace);
        }
        if trim_end {
            value = value.trim_end_matches(is_collapsible_whitespace);
        }
        let value = value.to_string();
        doc.set_value(leaf.node, value);
    }

    for leaf in &leaves {
        if doc.tag(leaf.node) == TEXT && doc.value(leaf.node).is_some_and(str::is_empty) {
            doc.remove_node(leaf.node);
        }
    }
}
