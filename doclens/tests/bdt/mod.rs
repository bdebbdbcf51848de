//! Reconciliation engine tests over the item lens.

use doclens::demo::{concrete_items, BdtDemo, ItemLens, DEFAULT_ITEMS};
use doclens::dom::names::*;
use doclens::{container_get, container_put, Document, Lens, NodeId, SimpleContext};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Item lens that records every call the engine makes.
#[derive(Default)]
struct RecordingLens {
    inner: ItemLens,
    removed: RefCell<Vec<NodeId>>,
    created: RefCell<Vec<NodeId>>,
    put: RefCell<Vec<(NodeId, NodeId)>>,
}

impl Lens<SimpleContext> for RecordingLens {
    fn is_visible(&self, ctx: &mut SimpleContext, concrete: NodeId) -> bool {
        self.inner.is_visible(ctx, concrete)
    }

    fn get(&self, ctx: &mut SimpleContext, concrete: NodeId) -> Option<NodeId> {
        self.inner.get(ctx, concrete)
    }

    fn create(&self, ctx: &mut SimpleContext, abstract_node: NodeId) -> Option<NodeId> {
        let created = self.inner.create(ctx, abstract_node);
        if let Some(node) = created {
            self.created.borrow_mut().push(node);
        }
        created
    }

    fn put(&self, ctx: &mut SimpleContext, abstract_node: NodeId, concrete: NodeId) {
        self.put.borrow_mut().push((abstract_node, concrete));
        self.inner.put(ctx, abstract_node, concrete);
    }

    fn remove(&self, _ctx: &mut SimpleContext, concrete: NodeId) {
        self.removed.borrow_mut().push(concrete);
    }
}

struct Scenario {
    ctx: SimpleContext,
    lens: RecordingLens,
    body: NodeId,
    list: NodeId,
    items: Vec<NodeId>,
}

impl Scenario {
    fn new(names: &[&str]) -> Self {
        let (concrete, body) = concrete_items(names);
        let items = concrete.children(body).to_vec();
        let mut ctx = SimpleContext::new(Document::with_root(HTML_HTML), concrete);
        let lens = RecordingLens::default();
        let list = ctx.abstract_doc.create_element(HTML_UL);
        container_get(&mut ctx, &lens, list, body);
        Scenario {
            ctx,
            lens,
            body,
            list,
            items,
        }
    }

    fn abstract_item(&self, index: usize) -> NodeId {
        self.ctx.abstract_doc.children(self.list)[index]
    }

    fn put(&mut self) -> doclens::PutStats {
        let ids = self.lens.inner.ids().clone();
        container_put(&mut self.ctx, &self.lens, self.list, self.body, |ctx, node| {
            ids.lookup(&*ctx, node)
        })
    }

    fn concrete_text(&self) -> Vec<String> {
        let doc = &self.ctx.concrete_doc;
        doc.children(self.body)
            .iter()
            .map(|c| doc.text_content(*c))
            .collect()
    }

    fn hidden(&self) -> Vec<NodeId> {
        let doc = &self.ctx.concrete_doc;
        doc.children(self.body)
            .iter()
            .copied()
            .filter(|c| doc.tag(*c) == HTML_DIV)
            .collect()
    }
}

#[test]
fn test_get_maps_visible_children_only() {
    let scenario = Scenario::new(&["head", "a", "b", "tail"]);
    let doc = &scenario.ctx.abstract_doc;
    let items = doc.children(scenario.list);
    assert_eq!(items.len(), 2);
    assert_eq!(doc.text_content(items[0]), "a");
    assert_eq!(
        doc.get_attribute(items[1], HTML_ID),
        Some(format!("x{}", scenario.items[2].seq_no()).as_str())
    );
}

#[test]
fn test_unedited_put_touches_nothing() {
    let mut scenario = Scenario::new(DEFAULT_ITEMS);
    let before = scenario.ctx.concrete_doc.children(scenario.body).to_vec();

    let stats = scenario.put();

    assert_eq!(stats.retained, 6);
    assert_eq!(stats.created + stats.removed + stats.dropped, 0);
    assert_eq!(scenario.ctx.concrete_doc.children(scenario.body), before.as_slice());
    assert!(scenario.lens.created.borrow().is_empty());
    assert!(scenario.lens.removed.borrow().is_empty());
    assert_eq!(scenario.lens.put.borrow().len(), 6);
}

#[test]
fn test_remove_create_and_put_are_called_once_each() {
    let mut scenario = Scenario::new(&["head", "a", "b", "c", "tail"]);
    let b = scenario.abstract_item(1);
    scenario.ctx.abstract_doc.remove_node(b);
    let fresh = scenario.ctx.abstract_doc.create_element(HTML_H1);
    scenario.ctx.abstract_doc.append_text(fresh, "z");
    let first = scenario.abstract_item(0);
    scenario
        .ctx
        .abstract_doc
        .insert_before(scenario.list, fresh, Some(first));

    let stats = scenario.put();

    assert_eq!((stats.retained, stats.created, stats.removed), (2, 1, 1));
    assert_eq!(*scenario.lens.removed.borrow(), vec![scenario.items[2]]);
    assert_eq!(scenario.lens.created.borrow().len(), 1);
    let puts: Vec<NodeId> = scenario.lens.put.borrow().iter().map(|(_, c)| *c).collect();
    assert_eq!(puts, vec![scenario.items[1], scenario.items[3]]);
    assert_eq!(scenario.concrete_text(), vec!["head", "z", "a", "c", "tail"]);
}

#[test]
fn test_created_node_gets_an_identity() {
    let mut scenario = Scenario::new(&["a"]);
    let fresh = scenario.ctx.abstract_doc.create_element(HTML_H1);
    scenario.ctx.abstract_doc.append_text(fresh, "b");
    scenario.ctx.abstract_doc.append_child(scenario.list, fresh);

    scenario.put();

    let created = scenario.lens.created.borrow()[0];
    assert_eq!(
        scenario.ctx.abstract_doc.get_attribute(fresh, HTML_ID),
        Some(format!("x{}", created.seq_no()).as_str())
    );
}

#[test]
fn test_moved_items_keep_their_concrete_nodes() {
    let mut scenario = Scenario::new(&["head", "a", "mid", "b", "c", "tail"]);
    let c = scenario.abstract_item(2);
    let a = scenario.abstract_item(0);
    scenario
        .ctx
        .abstract_doc
        .insert_before(scenario.list, c, Some(a));

    let stats = scenario.put();

    assert_eq!(stats.retained, 3);
    assert_eq!(stats.created + stats.removed, 0);
    assert_eq!(scenario.concrete_text(), vec!["head", "mid", "c", "a", "b", "tail"]);
    let doc = &scenario.ctx.concrete_doc;
    assert_eq!(doc.children(scenario.body)[2], scenario.items[4]);
    assert_eq!(doc.children(scenario.body)[3], scenario.items[1]);
}

#[test]
fn test_text_edit_goes_through_put() {
    let mut scenario = Scenario::new(&["head", "a"]);
    let a = scenario.abstract_item(0);
    let text = scenario.ctx.abstract_doc.children(a)[0];
    scenario.ctx.abstract_doc.set_value(text, "edited");

    scenario.put();

    assert_eq!(scenario.concrete_text(), vec!["head", "edited"]);
    assert_eq!(
        scenario.ctx.concrete_doc.children(scenario.body)[1],
        scenario.items[1]
    );
}

#[test]
fn test_emptied_list_keeps_hidden_children() {
    let mut scenario = Scenario::new(DEFAULT_ITEMS);
    let hidden = scenario.hidden();
    scenario.ctx.abstract_doc.remove_all_children(scenario.list);

    let stats = scenario.put();

    assert_eq!(stats.removed, 6);
    assert_eq!(scenario.hidden(), hidden);
    assert_eq!(
        scenario.ctx.concrete_doc.children(scenario.body).len(),
        hidden.len()
    );
}

#[test]
fn test_removed_nodes_stay_resolvable() {
    let mut scenario = Scenario::new(&["a", "b"]);
    let a = scenario.abstract_item(0);
    scenario.ctx.abstract_doc.remove_node(a);
    scenario.put();

    let doc = &scenario.ctx.concrete_doc;
    let removed = scenario.items[0];
    assert_eq!(doc.node_for_seq_no(removed.seq_no()), Some(removed));
    assert!(!doc.is_attached(removed));
}

#[test]
fn test_removing_items_two_and_five_retires_exactly_those_nodes() {
    let mut scenario = Scenario::new(DEFAULT_ITEMS);
    let doomed = [scenario.abstract_item(2), scenario.abstract_item(5)];
    for item in doomed {
        scenario.ctx.abstract_doc.remove_node(item);
    }

    let stats = scenario.put();

    let c = scenario.items[6];
    let f = scenario.items[11];
    let mut removed = scenario.lens.removed.borrow().clone();
    removed.sort();
    assert_eq!(removed, vec![c, f]);
    assert_eq!((stats.removed, stats.retained, stats.created), (2, 4, 0));

    let survivors: Vec<NodeId> = scenario
        .items
        .iter()
        .copied()
        .filter(|n| *n != c && *n != f)
        .collect();
    assert_eq!(scenario.ctx.concrete_doc.children(scenario.body), survivors.as_slice());
    assert!(scenario
        .lens
        .put
        .borrow()
        .iter()
        .all(|(_, concrete)| *concrete != c && *concrete != f));
}

/// Visible (`p`) children of the demo body, in document order.
fn visible_items(demo: &BdtDemo) -> Vec<NodeId> {
    let doc = &demo.context().concrete_doc;
    doc.children(demo.body())
        .iter()
        .copied()
        .filter(|c| doc.tag(*c) == HTML_P)
        .collect()
}

proptest! {
    #[test]
    fn test_any_move_round_trips(count in 1usize..=3, from in 0usize..6, to in 0usize..=6) {
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        demo.move_items(count, from, to);
        let report = demo.finish();
        prop_assert!(report.matched);
        prop_assert_eq!(report.stats.created + report.stats.removed, 0);
    }

    #[test]
    fn test_any_move_keeps_concrete_identity(count in 1usize..=3, from in 0usize..6, to in 0usize..=6) {
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        let before = visible_items(&demo);
        let abstract_before = demo.context().abstract_doc.children(demo.list()).to_vec();
        let concrete_of: HashMap<NodeId, NodeId> =
            abstract_before.iter().copied().zip(before.iter().copied()).collect();
        let moved: HashSet<NodeId> = before.iter().skip(from).take(count).copied().collect();

        demo.move_items(count, from, to);
        let expected: Vec<NodeId> = demo
            .context()
            .abstract_doc
            .children(demo.list())
            .iter()
            .map(|item| concrete_of[item])
            .collect();
        let stats = demo.put();

        prop_assert_eq!(stats.created + stats.removed, 0);
        let after = visible_items(&demo);
        prop_assert_eq!(&after, &expected);
        let untouched: Vec<u32> = after
            .iter()
            .filter(|n| !moved.contains(*n))
            .map(|n| n.seq_no())
            .collect();
        prop_assert!(untouched.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_any_move_keeps_hidden_order(count in 1usize..=3, from in 0usize..6, to in 0usize..=6) {
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        let doc = &demo.context().concrete_doc;
        let hidden_before: Vec<String> = doc
            .children(demo.body())
            .iter()
            .filter(|c| doc.tag(**c) == HTML_DIV)
            .map(|c| doc.text_content(*c))
            .collect();

        demo.move_items(count, from, to);
        demo.put();

        let doc = &demo.context().concrete_doc;
        let hidden_after: Vec<String> = doc
            .children(demo.body())
            .iter()
            .filter(|c| doc.tag(**c) == HTML_DIV)
            .map(|c| doc.text_content(*c))
            .collect();
        prop_assert_eq!(hidden_before, hidden_after);
        prop_assert_eq!(doc.children(demo.body()).len(), DEFAULT_ITEMS.len());
    }

    #[test]
    fn test_any_removal_drops_exactly_those_items(mask in proptest::collection::vec(any::<bool>(), 6)) {
        let indices: Vec<usize> = mask.iter().enumerate().filter(|(_, r)| **r).map(|(i, _)| i).collect();
        let mut demo = BdtDemo::new(DEFAULT_ITEMS);
        demo.remove_items(&indices);
        let stats = demo.put();
        prop_assert_eq!(stats.removed, indices.len());
        prop_assert_eq!(stats.retained, 6 - indices.len());

        let doc = &demo.context().concrete_doc;
        prop_assert_eq!(doc.children(demo.body()).len(), DEFAULT_ITEMS.len() - indices.len());
    }

    #[test]
    fn test_seq_nos_are_never_reused(
        ops in proptest::collection::vec((0u8..3, any::<prop::sample::Index>()), 1..40)
    ) {
        let mut doc = Document::with_root(HTML_DIV);
        let root = doc.root().unwrap();
        let mut seen: HashSet<u32> = HashSet::new();
        seen.insert(doc.document_node().seq_no());
        seen.insert(root.seq_no());

        for (op, pick) in ops {
            let children = doc.children(root).to_vec();
            match op {
                0 => {
                    let node = doc.append_element(root, HTML_P);
                    prop_assert!(seen.insert(node.seq_no()));
                }
                1 if !children.is_empty() => doc.remove_node(children[pick.index(children.len())]),
                _ => {
                    let node = doc.create_text("t");
                    prop_assert!(seen.insert(node.seq_no()));
                    doc.append_child(root, node);
                }
            }
        }

        for seq_no in &seen {
            prop_assert_eq!(doc.node_for_seq_no(*seq_no).map(|n| n.seq_no()), Some(*seq_no));
        }
    }
}
