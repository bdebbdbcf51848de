//! Debug views of a document tree
//!
//! Treeviz draws one node per line, with the structure encoded as box-drawing connectors:
//!
//!     └─ w:document #1
//!       └─ w:body #2
//!         ├─ w:p #3
//!         │ └─ w:r #4
//!         │   └─ w:t #5
//!         │     └─ "Hello"
//!         └─ w:sectPr #6
//!
//! Text is quoted and truncated to 30 characters. The JSON view carries the same information
//! in a form other tools can consume.

use crate::dom::{Document, NodeId, NodeKind};
use serde::Serialize;

const MAX_TEXT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreevizOptions {
    pub show_seq_no: bool,
    pub show_attributes: bool,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        TreevizOptions {
            show_seq_no: true,
            show_attributes: false,
        }
    }
}

fn truncate(text: &str) -> String {
    let escaped = text.replace('\n', "\\n");
    if escaped.chars().count() > MAX_TEXT {
        let cut: String = escaped.chars().take(MAX_TEXT - 1).collect();
        format!("{cut}…")
    } else {
        escaped
    }
}

fn label(doc: &Document, node: NodeId, options: &TreevizOptions) -> String {
    let mut out = match doc.kind(node) {
        NodeKind::Text(value) => format!("\"{}\"", truncate(value)),
        NodeKind::Comment(value) => format!("<!--{}-->", truncate(value)),
        NodeKind::Cdata(value) => format!("<![CDATA[{}]]>", truncate(value)),
        _ => doc.node_name(node),
    };
    if options.show_seq_no && doc.is_element(node) {
        out.push_str(&format!(" {node}"));
    }
    if options.show_attributes {
        for attr in doc.attributes(node) {
            out.push_str(&format!(
                " {}=\"{}\"",
                doc.names().qualified_name(attr.tag),
                truncate(&attr.value)
            ));
        }
    }
    out
}

fn format_node(
    doc: &Document,
    node: NodeId,
    prefix: &str,
    is_last: bool,
    options: &TreevizOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{prefix}{connector} {}\n", label(doc, node, options)));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let children = doc.children(node);
    for (i, child) in children.iter().enumerate() {
        format_node(doc, *child, &child_prefix, i + 1 == children.len(), options, output);
    }
}

/// Render the tree below the document node.
pub fn treeviz(doc: &Document, options: &TreevizOptions) -> String {
    let mut output = String::new();
    let top = doc.children(doc.document_node());
    for (i, child) in top.iter().enumerate() {
        format_node(doc, *child, "", i + 1 == top.len(), options, &mut output);
    }
    output
}

/// Serializable snapshot of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub seq_no: u32,
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn capture(doc: &Document, node: NodeId) -> Self {
        let kind = match doc.kind(node) {
            NodeKind::Document => "document",
            NodeKind::Element { .. } => "element",
            NodeKind::Text(_) => "text",
            NodeKind::Comment(_) => "comment",
            NodeKind::Cdata(_) => "cdata",
            NodeKind::ProcessingInstruction { .. } => "processing-instruction",
        };
        NodeSnapshot {
            seq_no: node.seq_no(),
            kind,
            name: doc.node_name(node),
            attributes: doc
                .attributes(node)
                .iter()
                .map(|a| (doc.names().qualified_name(a.tag), a.value.clone()))
                .collect(),
            value: doc.value(node).map(str::to_string),
            children: doc
                .children(node)
                .iter()
                .map(|c| NodeSnapshot::capture(doc, *c))
                .collect(),
        }
    }
}

/// Pretty-printed JSON of the whole document.
pub fn json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&NodeSnapshot::capture(doc, doc.document_node()))
}
