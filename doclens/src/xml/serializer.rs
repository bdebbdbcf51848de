//! XML writer
//!
//! Namespace declarations are hoisted onto the root element. In HTML mode the XHTML namespace is
//! the default namespace and HTML elements and attributes are written without a prefix;
//! everything else is written with the prefix recorded in the document's name table.
//!
//! Indentation is only ever added inside elements whose children are all elements, comments or
//! processing instructions, so text content is written exactly as stored. In HTML mode an
//! element holding spans, links or breaks is written on one line as well.

use crate::dom::names::{HTML_NS, NULL_NS, XML_NS};
use crate::dom::{Document, NamespaceId, NodeId, NodeKind, Tag};
use crate::html::is_phrasing_tag;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub xml_declaration: bool,
    pub indent: bool,
    pub indent_string: String,
    pub html: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            xml_declaration: true,
            indent: false,
            indent_string: "  ".to_string(),
            html: false,
        }
    }
}

impl WriteOptions {
    pub fn html() -> Self {
        WriteOptions {
            xml_declaration: false,
            indent: true,
            html: true,
            ..WriteOptions::default()
        }
    }
}

pub fn serialize_xml(doc: &Document, options: &WriteOptions) -> String {
    let mut writer = Writer {
        doc,
        options,
        out: String::new(),
    };
    writer.write_document();
    writer.out
}

/// Serialize a single subtree, without declarations.
pub fn serialize_node(doc: &Document, node: NodeId, options: &WriteOptions) -> String {
    let mut writer = Writer {
        doc,
        options,
        out: String::new(),
    };
    writer.write_node(node, 0, None);
    writer.out
}

struct Writer<'a> {
    doc: &'a Document,
    options: &'a WriteOptions,
    out: String,
}

impl Writer<'_> {
    fn write_document(&mut self) {
        if self.options.xml_declaration {
            self.out
                .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        }
        let root = self.doc.root();
        let declarations = self.namespace_declarations();
        for child in self.doc.children(self.doc.document_node()) {
            let decls = (Some(*child) == root).then_some(declarations.as_str());
            self.write_node(*child, 0, decls);
            self.out.push('\n');
        }
    }

    /// Namespaces used anywhere in the document plus every non-builtin namespace the document
    /// knows of, in registration order.
    fn namespace_declarations(&self) -> String {
        let mut used: BTreeSet<NamespaceId> = BTreeSet::new();
        for node in self.doc.all_nodes() {
            if self.doc.is_attached(node) && self.doc.is_element(node) {
                used.insert(self.doc.names().namespace_of(self.doc.tag(node)));
                for attr in self.doc.attributes(node) {
                    used.insert(self.doc.names().namespace_of(attr.tag));
                }
            }
        }

        let mut decls = String::new();
        for (id, info) in self.doc.names().namespaces() {
            if id == XML_NS {
                continue;
            }
            let builtin = id.0 <= crate::dom::names::WORD_NS.0;
            if builtin && !used.contains(&id) {
                continue;
            }
            if self.options.html && id == HTML_NS {
                decls.push_str(&format!(" xmlns=\"{}\"", escape_attr(&info.uri)));
            } else {
                decls.push_str(&format!(
                    " xmlns:{}=\"{}\"",
                    info.prefix,
                    escape_attr(&info.uri)
                ));
            }
        }
        decls
    }

    fn name(&self, tag: Tag) -> String {
        let names = self.doc.names();
        let ns = names.namespace_of(tag);
        if ns == NULL_NS || (self.options.html && ns == HTML_NS) {
            names.local_name(tag).to_string()
        } else {
            names.qualified_name(tag)
        }
    }

    fn indent(&mut self, depth: usize) {
        if self.options.indent {
            for _ in 0..depth {
                self.out.push_str(&self.options.indent_string);
            }
        }
    }

    /// Children may be put on lines of their own: no text, and in HTML mode no inline
    /// elements either.
    fn element_only(&self, node: NodeId) -> bool {
        self.doc.children(node).iter().all(|c| {
            !matches!(self.doc.kind(*c), NodeKind::Text(_) | NodeKind::Cdata(_))
                && !(self.options.html && is_phrasing_tag(self.doc.tag(*c)))
        })
    }

    fn write_node(&mut self, node: NodeId, depth: usize, declarations: Option<&str>) {
        match self.doc.kind(node) {
            NodeKind::Document => {
                for child in self.doc.children(node) {
                    self.write_node(*child, depth, None);
                }
            }
            NodeKind::Text(value) => self.out.push_str(&escape_text(value)),
            NodeKind::Cdata(value) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(value);
                self.out.push_str("]]>");
            }
            NodeKind::Comment(value) => {
                self.out.push_str("<!--");
                self.out.push_str(value);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction { target, data } => {
                self.out.push_str("<?");
                self.out.push_str(target);
                if !data.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(data);
                }
                self.out.push_str("?>");
            }
            NodeKind::Element { attrs } => {
                let name = self.name(self.doc.tag(node));
                self.out.push('<');
                self.out.push_str(&name);
                if let Some(decls) = declarations {
                    self.out.push_str(decls);
                }
                for attr in attrs {
                    let attr_name = self.name(attr.tag);
                    self.out.push(' ');
                    self.out.push_str(&attr_name);
                    self.out.push_str("=\"");
                    self.out.push_str(&escape_attr(&attr.value));
                    self.out.push('"');
                }

                let children = self.doc.children(node);
                if children.is_empty() {
                    self.out.push_str("/>");
                    return;
                }
                self.out.push('>');

                let pretty = self.options.indent && self.element_only(node);
                for child in children {
                    if pretty {
                        self.out.push('\n');
                        self.indent(depth + 1);
                    }
                    let child_depth = if pretty { depth + 1 } else { 0 };
                    self.write_node(*child, child_depth, None);
                }
                if pretty {
                    self.out.push('\n');
                    self.indent(depth);
                }

                self.out.push_str("</");
                self.out.push_str(&name);
                self.out.push('>');
            }
        }
    }
}

pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}
