//! Shared fixtures for the integration tests.

use doclens::dom::names::*;
use doclens::xml::{parse_xml, serialize_xml, ParseOptions, WriteOptions};
use doclens::{Document, NodeId};

pub const WORD_FIXTURE: &str = include_str!("../fixtures/document.xml");

pub fn word_fixture() -> Document {
    parse_xml(WORD_FIXTURE, &ParseOptions::data()).unwrap()
}

/// Serialization without declaration or indentation, for byte comparisons.
pub fn compact(doc: &Document) -> String {
    let options = WriteOptions {
        xml_declaration: false,
        ..WriteOptions::default()
    };
    serialize_xml(doc, &options)
}

pub fn word_body(doc: &Document) -> NodeId {
    let root = doc.root().unwrap();
    doc.child_with_tag(root, WORD_BODY).unwrap()
}

/// `w:p` children of the body, in order.
pub fn word_paragraphs(doc: &Document) -> Vec<NodeId> {
    let body = word_body(doc);
    doc.children(body)
        .iter()
        .copied()
        .filter(|c| doc.tag(*c) == WORD_P)
        .collect()
}

pub fn html_body(doc: &Document) -> NodeId {
    doclens::html::find_body(doc).unwrap()
}

pub fn first_text(doc: &Document, node: NodeId) -> NodeId {
    doc.descendants(node).find(|n| doc.is_text(*n)).unwrap()
}
