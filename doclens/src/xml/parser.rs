//! XML reader built on roxmltree
//!
//! roxmltree gives a read-only tree with namespaces already resolved; this module copies it into
//! an arena [`Document`], interning every name on the way. Namespace prefixes seen in the source
//! are remembered so the writer can reuse them.

use crate::dom::names::{HTML_NAMESPACE, NULL_NS};
use crate::dom::{Document, NamespaceId, NodeId};
use crate::error::DocError;
use roxmltree::{Node, NodeType, ParsingOptions};

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Namespace for elements that have none in the source.
    pub default_namespace: Option<String>,
    /// Unprefixed attributes take the namespace of their element (HTML convention) instead of
    /// the null namespace (XML convention).
    pub attributes_inherit_namespace: bool,
    /// Drop whitespace-only text, except under `xml:space="preserve"`.
    pub strip_whitespace: bool,
}

impl ParseOptions {
    /// Options for XHTML input: un-namespaced elements and attributes are HTML.
    pub fn html() -> Self {
        ParseOptions {
            default_namespace: Some(HTML_NAMESPACE.to_string()),
            attributes_inherit_namespace: true,
            strip_whitespace: false,
        }
    }

    /// Options for data-oriented XML (e.g. `document.xml`): indentation is insignificant.
    pub fn data() -> Self {
        ParseOptions {
            default_namespace: None,
            attributes_inherit_namespace: false,
            strip_whitespace: true,
        }
    }
}

pub fn parse_xml(source: &str, options: &ParseOptions) -> Result<Document, DocError> {
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let input = roxmltree::Document::parse_with_options(source, parsing)?;

    let mut doc = Document::new();
    let doc_node = doc.document_node();
    for child in input.root().children() {
        if let Some(node) = copy_node(&mut doc, child, options) {
            doc.append_child(doc_node, node);
        }
    }

    let root = doc.root().ok_or(DocError::NoRoot)?;
    if options.strip_whitespace {
        doc.strip_whitespace(root);
    }
    Ok(doc)
}

/// Parse XHTML markup into an abstract document.
pub fn parse_html(source: &str) -> Result<Document, DocError> {
    parse_xml(source, &ParseOptions::html())
}

fn element_namespace(doc: &mut Document, node: Node, options: &ParseOptions) -> NamespaceId {
    match node.tag_name().namespace() {
        Some(uri) => doc.names_mut().namespace_id(uri, node.lookup_prefix(uri)),
        None => match &options.default_namespace {
            Some(uri) => doc.names_mut().namespace_id(uri, None),
            None => NULL_NS,
        },
    }
}

fn copy_node(doc: &mut Document, node: Node, options: &ParseOptions) -> Option<NodeId> {
    match node.node_type() {
        NodeType::Element => Some(copy_element(doc, node, options)),
        NodeType::Text => Some(doc.create_text(node.text().unwrap_or_default())),
        NodeType::Comment => Some(doc.create_comment(node.text().unwrap_or_default())),
        NodeType::PI => {
            let pi = node.pi()?;
            Some(doc.create_processing_instruction(pi.target, pi.value.unwrap_or_default()))
        }
        NodeType::Root => None,
    }
}

fn copy_element(doc: &mut Document, node: Node, options: &ParseOptions) -> NodeId {
    for ns in node.namespaces() {
        doc.names_mut().namespace_id(ns.uri(), ns.name());
    }

    let ns = element_namespace(doc, node, options);
    let tag = doc.tag_for(ns, node.tag_name().name());
    let element = doc.create_element(tag);

    for attr in node.attributes() {
        let attr_ns = match attr.namespace() {
            Some(uri) => doc.names_mut().namespace_id(uri, node.lookup_prefix(uri)),
            None if options.attributes_inherit_namespace => ns,
            None => NULL_NS,
        };
        let attr_tag = doc.tag_for(attr_ns, attr.name());
        doc.set_attribute(element, attr_tag, attr.value());
    }

    for child in node.children() {
        if let Some(copy) = copy_node(doc, child, options) {
            doc.append_child(element, copy);
        }
    }
    element
}
