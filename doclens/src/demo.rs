//! Move and remove scenarios for the reconciliation engine
//!
//! The concrete side is an XHTML body whose children are named items: a one-character name
//! becomes a visible `p`, anything longer an invisible `div`. The abstract side is a `ul` of
//! `h1`s, one per visible item. A scenario edits the abstract list, puts it back, derives the
//! list again and reports whether the result matches the edit:
//!
//!     <html xmlns="…">                <html xmlns="…">
//!       <ul>                            <body>
//!                                         <div>start1</div>
//!                                         <div>start2</div>
//!         <h1>a</h1>                      <p>a</p>
//!     …
//!     Match? true

use crate::bdt::{container_get, container_put, PutStats};
use crate::dom::names::*;
use crate::dom::{Document, NodeId};
use crate::identity::IdScheme;
use crate::lens::{Lens, LensContext, SimpleContext};
use crate::xml::{serialize_node, serialize_xml, WriteOptions};
use std::fmt;

/// The fourteen children the scenarios run against.
pub const DEFAULT_ITEMS: &[&str] = &[
    "start1", "start2", "a", "b", "mid1", "mid2", "c", "d", "mid3", "mid4", "e", "f", "end1", "end2",
];

pub const ITEM_ID_PREFIX: &str = "x";

/// `p` ↔ `h1 id="x<seqNo>"`, text copied both ways.
pub struct ItemLens {
    ids: IdScheme,
}

impl ItemLens {
    pub fn new() -> Self {
        ItemLens {
            ids: IdScheme::new(ITEM_ID_PREFIX),
        }
    }

    pub fn ids(&self) -> &IdScheme {
        &self.ids
    }
}

impl Default for ItemLens {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LensContext> Lens<C> for ItemLens {
    fn is_visible(&self, ctx: &mut C, concrete: NodeId) -> bool {
        ctx.concrete_doc().tag(concrete) == HTML_P
    }

    fn get(&self, ctx: &mut C, concrete: NodeId) -> Option<NodeId> {
        let text = ctx.concrete_doc().text_content(concrete);
        let doc = ctx.abstract_doc_mut();
        let item = doc.create_element(HTML_H1);
        self.ids.assign(doc, item, concrete);
        doc.append_text(item, text);
        Some(item)
    }

    fn create(&self, ctx: &mut C, abstract_node: NodeId) -> Option<NodeId> {
        let text = ctx.abstract_doc().text_content(abstract_node);
        let doc = ctx.concrete_doc_mut();
        let p = doc.create_element(HTML_P);
        doc.append_text(p, text);
        self.ids.assign(ctx.abstract_doc_mut(), abstract_node, p);
        Some(p)
    }

    fn put(&self, ctx: &mut C, abstract_node: NodeId, concrete: NodeId) {
        let text = ctx.abstract_doc().text_content(abstract_node);
        if ctx.concrete_doc().text_content(concrete) != text {
            ctx.concrete_doc_mut().set_text_content(concrete, &text);
        }
    }
}

/// Build `html/body` with one child per name; returns the document and the body.
pub fn concrete_items(names: &[&str]) -> (Document, NodeId) {
    let mut doc = Document::with_root(HTML_HTML);
    let mut body = doc.document_node();
    if let Some(html) = doc.root() {
        body = doc.append_element(html, HTML_BODY);
    }
    for name in names {
        let tag = if name.chars().count() == 1 { HTML_P } else { HTML_DIV };
        let item = doc.append_element(body, tag);
        doc.append_text(item, *name);
    }
    (doc, body)
}

/// One scenario: a concrete body, the abstract list derived from it, and the lens between.
pub struct BdtDemo {
    ctx: SimpleContext,
    lens: ItemLens,
    body: NodeId,
    list: NodeId,
}

impl BdtDemo {
    pub fn new(names: &[&str]) -> Self {
        let (concrete, body) = concrete_items(names);
        let lens = ItemLens::new();
        let mut ctx = SimpleContext::new(Document::with_root(HTML_HTML), concrete);
        let list = derive_list(&mut ctx, &lens, body);
        BdtDemo {
            ctx,
            lens,
            body,
            list,
        }
    }

    pub fn context(&self) -> &SimpleContext {
        &self.ctx
    }

    /// The concrete container.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The abstract `ul`.
    pub fn list(&self) -> NodeId {
        self.list
    }

    /// Move `count` abstract items starting at `from` to before the item currently at `to`.
    ///
    /// A target inside the moved block (or right after it) leaves the list unchanged.
    pub fn move_items(&mut self, count: usize, from: usize, to: usize) {
        if to >= from && to <= from + count {
            return;
        }
        let doc = &mut self.ctx.abstract_doc;
        let children = doc.children(self.list).to_vec();
        let next = children.get(to).copied();
        let moving: Vec<NodeId> = children.iter().skip(from).take(count).copied().collect();
        for child in moving {
            doc.insert_before(self.list, child, next);
        }
    }

    /// Remove the abstract items at `indices`.
    pub fn remove_items(&mut self, indices: &[usize]) {
        let doc = &mut self.ctx.abstract_doc;
        let children = doc.children(self.list).to_vec();
        for (index, child) in children.into_iter().enumerate() {
            if indices.contains(&index) {
                doc.remove_node(child);
            }
        }
    }

    /// Write the abstract list back into the concrete body.
    pub fn put(&mut self) -> PutStats {
        let ids = self.lens.ids().clone();
        container_put(&mut self.ctx, &self.lens, self.list, self.body, |ctx, node| {
            ids.lookup(&*ctx, node)
        })
    }

    /// Put, derive the list again and compare it with the edited one.
    pub fn finish(mut self) -> DemoReport {
        let options = WriteOptions::html();
        let stats = self.put();
        let expected = serialize_node(&self.ctx.abstract_doc, self.list, &options);

        let mut check = SimpleContext::new(Document::with_root(HTML_HTML), self.ctx.concrete_doc.clone());
        let relist = derive_list(&mut check, &self.lens, self.body);
        let actual = serialize_node(&check.abstract_doc, relist, &options);

        let mut abstract_doc = self.ctx.abstract_doc;
        if let Some(root) = abstract_doc.root() {
            abstract_doc.strip_ids(root);
        }
        let listing = combined_listing(
            &serialize_xml(&abstract_doc, &options),
            &serialize_xml(&self.ctx.concrete_doc, &options),
        );

        DemoReport {
            listing,
            matched: expected == actual,
            stats,
        }
    }
}

fn derive_list(ctx: &mut SimpleContext, lens: &ItemLens, body: NodeId) -> NodeId {
    let list = ctx.abstract_doc.create_element(HTML_UL);
    container_get(ctx, lens, list, body);
    if let Some(html) = ctx.abstract_doc.root() {
        ctx.abstract_doc.append_child(html, list);
    }
    list
}

/// Side-by-side listing; concrete `div` lines have no abstract counterpart and get an empty
/// left column.
pub fn combined_listing(abstract_text: &str, concrete_text: &str) -> String {
    let abstract_lines: Vec<&str> = abstract_text.lines().collect();
    let concrete_lines: Vec<&str> = concrete_text.lines().collect();
    let mut out = String::new();
    let mut push = |left: &str, right: &str| {
        let line = format!("{left:<30} {right}");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    let (mut a, mut c) = (0, 0);
    while a < abstract_lines.len() && c < concrete_lines.len() {
        if concrete_lines[c].ends_with("</div>") {
            push("", concrete_lines[c]);
        } else {
            push(abstract_lines[a], concrete_lines[c]);
            a += 1;
        }
        c += 1;
    }
    for line in &abstract_lines[a..] {
        push(line, "");
    }
    for line in &concrete_lines[c..] {
        push("", line);
    }
    out
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub listing: String,
    pub matched: bool,
    pub stats: PutStats,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing)?;
        writeln!(f, "Match? {}", self.matched)
    }
}

/// Move `count` items from `from` to `to` over [`DEFAULT_ITEMS`].
pub fn run_move(count: usize, from: usize, to: usize) -> DemoReport {
    let mut demo = BdtDemo::new(DEFAULT_ITEMS);
    demo.move_items(count, from, to);
    demo.finish()
}

/// Remove the items at `indices` from [`DEFAULT_ITEMS`].
pub fn run_remove(indices: &[usize]) -> DemoReport {
    let mut demo = BdtDemo::new(DEFAULT_ITEMS);
    demo.remove_items(indices);
    demo.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_text(demo: &BdtDemo) -> Vec<String> {
        let doc = &demo.context().concrete_doc;
        doc.children(demo.body())
            .iter()
            .map(|c| doc.text_content(*c))
            .collect()
    }

    #[test]
    fn untouched_list_is_a_no_op() {
        let report = run_move(2, 0, 1);
        assert!(report.matched);
        assert_eq!(report.stats.retained, 6);
        assert_eq!(report.stats.created + report.stats.removed, 0);
    }

    #[test]
    fn move_keeps_hidden_neighbours() {
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        demo.move_items(2, 0, 6);
        demo.put();
        assert_eq!(
            visible_text(&demo),
            vec![
                "start1", "start2", "mid1", "mid2", "c", "d", "mid3", "mid4", "e", "f", "a", "b",
                "end1", "end2"
            ]
        );
    }

    #[test]
    fn move_to_end_and_report() {
        let report = run_move(1, 0, 12);
        assert!(report.matched);
        assert!(report.to_string().ends_with("Match? true\n"));
        let first = report.listing.lines().next().unwrap();
        assert!(first.starts_with("<html"));
    }

    #[test]
    fn remove_drops_exactly_the_named_items() {
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        demo.remove_items(&[2, 5]);
        let stats = demo.put();
        assert_eq!(stats.removed, 2);
        assert_eq!(
            visible_text(&demo),
            vec![
                "start1", "start2", "a", "b", "mid1", "mid2", "d", "mid3", "mid4", "e", "end1",
                "end2"
            ]
        );
    }

    #[test]
    fn listing_aligns_invisible_lines() {
        let listing = combined_listing("<a>\n  <x/>\n</a>", "<b>\n  <div>h</div>\n  <p/>\n</b>");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[1], format!("{:30}   <div>h</div>", ""));
        assert!(lines[2].starts_with("  <x/>"));
    }
}
