//! # The Node
//! The workhorse of the library. Each node owns exactly one point and a map from level to
//! the (non-self) children it covers at that level. Nodes are never addressed directly;
//! the tree hands out `NodeId`s, arena indexes into `CoverTree::arena`.

use fxhash::FxHashMap;
use smallvec::SmallVec;

/// An arena index. Stable for the lifetime of the tree: nodes are never removed or
/// reordered, so a `NodeId` handed out by `insert` stays valid until the tree is dropped.
pub type NodeId = usize;

/// A single node of the cover tree. Wraps one point, a non-owning back-reference to its
/// parent, and the per-level lists of non-self children.
///
/// The node is implicitly present in its own child list at every level down to the
/// deepest level it covers (the "self-child" convention). That presence is never
/// materialized here: a `Node` doesn't know its own `NodeId`, so the self-inclusive cover
/// (`node` prepended to its stored children) is assembled by callers that already hold the
/// id, e.g. [`crate::covertree::CoverTree::sweep`] and the invariant checker.
#[derive(Debug, Clone)]
pub struct Node<P> {
    point: P,
    parent: Option<NodeId>,
    children: FxHashMap<i32, SmallVec<[NodeId; 4]>>,
}

impl<P> Node<P> {
    /// Creates a new, childless node wrapping `point`.
    pub(crate) fn new(point: P, parent: Option<NodeId>) -> Self {
        Node {
            point,
            parent,
            children: FxHashMap::default(),
        }
    }

    /// The point this node wraps.
    pub fn point(&self) -> &P {
        &self.point
    }

    /// The non-owning back-reference to this node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Just the stored non-self children at level `i`, or an empty slice if there are none.
    pub fn only_children_at_level(&self, level: i32) -> &[NodeId] {
        self.children
            .get(&level)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Appends `child` to this node's level-`i` child list. No-op if already present.
    /// Does not touch `child`'s parent back-reference; the tree sets that separately since
    /// it requires mutable access to a different arena slot.
    pub(crate) fn add_child_at_level(&mut self, level: i32, child: NodeId) {
        let children = self.children.entry(level).or_insert_with(SmallVec::new);
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// The number of distinct levels at which this node has at least one stored child.
    #[cfg(test)]
    pub(crate) fn child_level_count(&self) -> usize {
        self.children.len()
    }

    /// Drops every stored child at `level`. Test-only, for exercising the invariant
    /// checker against a deliberately malformed tree.
    #[cfg(test)]
    pub(crate) fn clear_children_at_level(&mut self, level: i32) {
        self.children.remove(&level);
    }
}
