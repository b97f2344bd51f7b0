//! # The Cover Tree
//! The owning container: an arena of [`Node`]s, a root, and the level bookkeeping
//! (`min_level`/`max_level`) that the rest of the algorithms in this module rely on.
//!
//! Unlike the lock-free, reader/writer-split tree this crate grew out of, this is a plain
//! single-writer structure (see the crate's concurrency notes): there is one owner, no
//! `Arc`/`RwLock` anywhere, and mutation is just `&mut self`.

use crate::errors::{CoverTreeError, CoverTreeResult};
use crate::metric::Metric;
use crate::node::{Node, NodeId};
use rand::rngs::SmallRng;
use rand::SeedableRng;

mod insert;
mod invariants;
mod knn;

/// A cover set entry paired with the query's distance to it. Produced and consumed by
/// [`CoverTree::sweep`], the single place in the crate that issues distance calls.
pub(crate) type CoverSet = Vec<(NodeId, f64)>;

/// An in-memory cover tree over points of type `P`, under the metric `M`.
///
/// See the crate documentation for the structural invariants this type maintains across
/// `insert` calls, and [`CoverTree::check_invariants`] for the diagnostic that verifies them.
#[derive(Debug)]
pub struct CoverTree<P, M> {
    metric: M,
    base: f64,
    max_level: i32,
    min_level: i32,
    arena: Vec<Node<P>>,
    root: Option<NodeId>,
    rng: SmallRng,
}

impl<P, M: Metric<P>> CoverTree<P, M> {
    /// Creates an empty cover tree. `base` must be strictly greater than 1; `max_level`
    /// should be chosen so that `base^max_level` exceeds the diameter of the data you
    /// expect to insert.
    pub fn new(metric: M, base: f64, max_level: i32) -> CoverTreeResult<Self> {
        Self::with_rng(metric, base, max_level, SmallRng::from_entropy())
    }

    pub(crate) fn with_rng(
        metric: M,
        base: f64,
        max_level: i32,
        rng: SmallRng,
    ) -> CoverTreeResult<Self> {
        if !(base > 1.0) {
            return Err(CoverTreeError::InvalidBase(base));
        }
        Ok(CoverTree {
            metric,
            base,
            max_level,
            min_level: max_level,
            arena: Vec::new(),
            root: None,
            rng,
        })
    }

    /// The number of points currently held by the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True iff no point has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The geometric shrink factor between levels.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// The top level index; never changes after construction.
    pub fn max_level(&self) -> i32 {
        self.max_level
    }

    /// The lowest level at which any point is currently represented. Only ever decreases.
    pub fn min_level(&self) -> i32 {
        self.min_level
    }

    fn push_node(&mut self, point: P, parent: Option<NodeId>) -> NodeId {
        let id = self.arena.len();
        self.arena.push(Node::new(point, parent));
        id
    }

    /// The cover-set sweep kernel (shared by insert, knn and knn_insert): expands `cover`
    /// at `level` by pulling in each cover member's stored non-self children at that level,
    /// computing the query's distance to each newly introduced child exactly once. Distances
    /// already known for `cover` are carried over unchanged.
    pub(crate) fn sweep(&self, query: &P, cover: &CoverSet, level: i32) -> CoverSet {
        let mut expanded = Vec::with_capacity(cover.len());
        expanded.extend_from_slice(cover);
        for &(node_id, _) in cover {
            for &child_id in self.arena[node_id].only_children_at_level(level) {
                let d = self.metric.distance(query, self.arena[child_id].point());
                expanded.push((child_id, d));
            }
        }
        log::trace!(
            "sweep at level {}: {} -> {} cover members",
            level,
            cover.len(),
            expanded.len()
        );
        expanded
    }

    /// The k-th smallest distance in `cover`, or the largest distance present if `cover`
    /// has fewer than `k` members. Used as the kNN pruning bound (see [`knn`](Self::knn)).
    pub(crate) fn kth_smallest_distance(cover: &CoverSet, k: usize) -> f64 {
        let mut dists: Vec<f64> = cover.iter().map(|&(_, d)| d).collect();
        dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
        if dists.len() < k {
            *dists.last().expect("cover set is never empty")
        } else {
            dists[k - 1]
        }
    }

    pub(crate) fn min_distance(cover: &CoverSet) -> f64 {
        cover
            .iter()
            .map(|&(_, d)| d)
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn l2(a: &(f64, f64), b: &(f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    pub(crate) fn test_tree() -> CoverTree<(f64, f64), fn(&(f64, f64), &(f64, f64)) -> f64> {
        CoverTree::with_rng(
            l2 as fn(&(f64, f64), &(f64, f64)) -> f64,
            2.0,
            10,
            SmallRng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_base() {
        let result = CoverTree::new(l2 as fn(&(f64, f64), &(f64, f64)) -> f64, 1.0, 10);
        assert_eq!(result.unwrap_err(), CoverTreeError::InvalidBase(1.0));
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = test_tree();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.min_level(), tree.max_level());
    }
}
