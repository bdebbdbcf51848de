//! Container reconciliation
//!
//!     The two procedures here apply a [`Lens`] across every child of one container.
//!
//!     Get direction is a plain map and filter: each visible concrete child is handed to
//!     `lens.get` and the result appended to the abstract container, in order.
//!
//!     Put direction brings an existing concrete container in line with an abstract container
//!     the user may have edited. Concrete nodes the lens cannot see (properties elements,
//!     bookmarks, shapes the abstract model has no equivalent for) are never moved, removed or
//!     passed to the lens, so they survive any edit. The pass runs as:
//!
//!         1. identity    every abstract child is resolved through the caller's lookup. A
//!                        resolution that is invisible, would create a cycle, or claims a node
//!                        already claimed by an earlier sibling is rejected and the child is
//!                        treated as new.
//!         2. hidden map  each claimed child remembers the nearest invisible sibling before
//!                        it, skipping visible ones.
//!         3. removal     visible children nobody claimed go through `lens.remove` and are
//!                        detached.
//!         4. creation    unresolved children go through `lens.create`; `None` drops the child.
//!         5. placement   the concrete nodes are visited back to front. A node whose next
//!                        visible sibling is already its successor stays where it is; any other
//!                        is inserted right before its successor, the last one before the
//!                        trailing run of invisible children.
//!         6. fixup       a visible node whose remembered hidden sibling is still behind it,
//!                        with no visible node in between, is moved back to sit right after
//!                        that hidden run again.
//!         7. put         retained pairs go through `lens.put`, which may recurse.
//!
//!     With an unedited abstract container step 5 moves nothing and step 6 has nothing to move,
//!     so a get followed by a put is a no-op on the concrete tree, invisible children in the
//!     middle of the container included.

use crate::dom::NodeId;
use crate::lens::{Lens, LensContext};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Summary of one [`container_put`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutStats {
    /// Abstract children matched to an existing concrete node.
    pub retained: usize,
    /// Concrete nodes produced by `lens.create`.
    pub created: usize,
    /// Visible concrete children removed because nothing claimed them.
    pub removed: usize,
    /// Abstract children the lens could not create a concrete node for.
    pub dropped: usize,
}

impl std::ops::AddAssign for PutStats {
    fn add_assign(&mut self, other: PutStats) {
        self.retained += other.retained;
        self.created += other.created;
        self.removed += other.removed;
        self.dropped += other.dropped;
    }
}

/// Append the abstract counterpart of every visible child of `concrete_parent` to
/// `abstract_parent`, in order.
pub fn container_get<C, L>(ctx: &mut C, lens: &L, abstract_parent: NodeId, concrete_parent: NodeId)
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    let children = ctx.concrete_doc().children(concrete_parent).to_vec();
    for child in children {
        if !lens.is_visible(ctx, child) {
            continue;
        }
        match lens.get(ctx, child) {
            Some(abstract_child) => ctx
                .abstract_doc_mut()
                .append_child(abstract_parent, abstract_child),
            None => debug!(concrete = %child, "visible node produced no abstract counterpart"),
        }
    }
}

struct Slot {
    abstract_node: NodeId,
    concrete: Option<NodeId>,
    created: bool,
}

/// Bring the children of `concrete_parent` in line with the children of `abstract_parent`.
///
/// `lookup` is called exactly once per abstract child, in order, and returns the concrete node
/// that child was derived from, if any.
pub fn container_put<C, L, F>(
    ctx: &mut C,
    lens: &L,
    abstract_parent: NodeId,
    concrete_parent: NodeId,
    mut lookup: F,
) -> PutStats
where
    C: LensContext,
    L: Lens<C> + ?Sized,
    F: FnMut(&mut C, NodeId) -> Option<NodeId>,
{
    let mut stats = PutStats::default();
    let mut visibility: HashMap<NodeId, bool> = HashMap::new();

    // Identity
    let abstract_children = ctx.abstract_doc().children(abstract_parent).to_vec();
    let mut claimed: HashSet<NodeId> = HashSet::new();
    let mut slots: Vec<Slot> = Vec::with_capacity(abstract_children.len());
    for abstract_node in abstract_children {
        let concrete = lookup(ctx, abstract_node).filter(|con| {
            accept_resolution(ctx, lens, &mut visibility, &claimed, concrete_parent, *con)
        });
        if let Some(con) = concrete {
            claimed.insert(con);
        }
        slots.push(Slot {
            abstract_node,
            concrete,
            created: false,
        });
    }

    // Nearest preceding invisible sibling of every claimed child
    let children = ctx.concrete_doc().children(concrete_parent).to_vec();
    let mut prev_hidden: HashMap<NodeId, NodeId> = HashMap::new();
    let mut last_hidden: Option<NodeId> = None;
    for child in &children {
        if is_visible(ctx, lens, &mut visibility, *child) {
            if let (true, Some(hidden)) = (claimed.contains(child), last_hidden) {
                prev_hidden.insert(*child, hidden);
            }
        } else {
            last_hidden = Some(*child);
        }
    }

    // Removal
    for child in &children {
        if is_visible(ctx, lens, &mut visibility, *child) && !claimed.contains(child) {
            lens.remove(ctx, *child);
            ctx.concrete_doc_mut().remove_node(*child);
            stats.removed += 1;
        }
    }

    // Creation
    for slot in slots.iter_mut().filter(|s| s.concrete.is_none()) {
        match lens.create(ctx, slot.abstract_node) {
            Some(con) => {
                slot.concrete = Some(con);
                slot.created = true;
                stats.created += 1;
            }
            None => {
                debug!(abstract_node = %slot.abstract_node, "shape not representable, dropped");
                stats.dropped += 1;
            }
        }
    }

    // Placement
    let anchor = trailing_hidden_start(ctx, lens, &mut visibility, concrete_parent);
    let ordered: Vec<NodeId> = slots.iter().filter_map(|s| s.concrete).collect();
    for (i, con) in ordered.iter().enumerate().rev() {
        let successor = ordered.get(i + 1).copied();
        let in_place = ctx.concrete_doc().parent(*con) == Some(concrete_parent)
            && next_visible(ctx, lens, &mut visibility, *con) == successor;
        if !in_place {
            ctx.concrete_doc_mut()
                .insert_before(concrete_parent, *con, successor.or(anchor));
        }
    }

    // Fixup
    if !prev_hidden.is_empty() {
        let snapshot = ctx.concrete_doc().children(concrete_parent).to_vec();
        for con in snapshot {
            let Some(hidden) = prev_hidden.get(&con).copied() else {
                continue;
            };
            if let Some(point) =
                restore_point(ctx, lens, &mut visibility, concrete_parent, con, hidden)
            {
                ctx.concrete_doc_mut()
                    .insert_before(concrete_parent, con, Some(point));
            }
        }
    }

    // Recursive put
    for slot in &slots {
        if let (Some(con), false) = (slot.concrete, slot.created) {
            lens.put(ctx, slot.abstract_node, con);
            stats.retained += 1;
        }
    }

    debug!(
        retained = stats.retained,
        created = stats.created,
        removed = stats.removed,
        dropped = stats.dropped,
        "container put"
    );
    stats
}

fn is_visible<C, L>(
    ctx: &mut C,
    lens: &L,
    cache: &mut HashMap<NodeId, bool>,
    node: NodeId,
) -> bool
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    if let Some(visible) = cache.get(&node) {
        return *visible;
    }
    let visible = lens.is_visible(ctx, node);
    cache.insert(node, visible);
    visible
}

fn accept_resolution<C, L>(
    ctx: &mut C,
    lens: &L,
    cache: &mut HashMap<NodeId, bool>,
    claimed: &HashSet<NodeId>,
    concrete_parent: NodeId,
    con: NodeId,
) -> bool
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    if claimed.contains(&con) {
        warn!(concrete = %con, "identity claimed twice, creating a fresh node");
        return false;
    }
    if ctx.concrete_doc().is_ancestor_or_self(con, concrete_parent) {
        warn!(concrete = %con, "identity resolves to an enclosing container, ignored");
        return false;
    }
    if !is_visible(ctx, lens, cache, con) {
        warn!(concrete = %con, "identity resolves to a node this lens cannot see, ignored");
        return false;
    }
    true
}

/// Next visible sibling of `node`, skipping invisible ones.
fn next_visible<C, L>(
    ctx: &mut C,
    lens: &L,
    cache: &mut HashMap<NodeId, bool>,
    node: NodeId,
) -> Option<NodeId>
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    let mut current = ctx.concrete_doc().next_sibling(node);
    while let Some(sibling) = current {
        if is_visible(ctx, lens, cache, sibling) {
            return Some(sibling);
        }
        current = ctx.concrete_doc().next_sibling(sibling);
    }
    None
}

/// First node of the run of invisible children at the end of the container, or `None` when
/// the last child is visible (or there are no children).
fn trailing_hidden_start<C, L>(
    ctx: &mut C,
    lens: &L,
    cache: &mut HashMap<NodeId, bool>,
    concrete_parent: NodeId,
) -> Option<NodeId>
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    let children = ctx.concrete_doc().children(concrete_parent).to_vec();
    let mut start = None;
    for child in children.iter().rev() {
        if is_visible(ctx, lens, cache, *child) {
            break;
        }
        start = Some(*child);
    }
    start
}

/// The child `con` should be reinserted before so that it follows `hidden` again, if `hidden`
/// is still behind it.
fn restore_point<C, L>(
    ctx: &mut C,
    lens: &L,
    cache: &mut HashMap<NodeId, bool>,
    concrete_parent: NodeId,
    con: NodeId,
    hidden: NodeId,
) -> Option<NodeId>
where
    C: LensContext,
    L: Lens<C> + ?Sized,
{
    let children = ctx.concrete_doc().children(concrete_parent).to_vec();
    let position = children.iter().position(|c| *c == con)?;

    // The insertion point follows the walk until the first visible node is passed; the walk
    // itself continues so a hidden sibling further back is still found.
    let mut insertion_point = con;
    let mut blocked = false;
    for j in (0..position).rev() {
        let actual = children[j];
        if !blocked {
            insertion_point = children[j + 1];
        }
        if is_visible(ctx, lens, cache, actual) {
            blocked = true;
        }
        if actual == hidden {
            return Some(insertion_point);
        }
    }
    None
}
