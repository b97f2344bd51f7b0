//! The invariant checker: walks every level of the tree and verifies nesting, covering and
//! separation hold between it and the level below. Intended for tests and debugging, not
//! for use on a hot path.

use super::CoverTree;
use crate::metric::Metric;
use crate::node::NodeId;
use std::collections::HashSet;

impl<P, M: Metric<P>> CoverTree<P, M> {
    /// Checks nesting, covering and separation across every level the tree currently
    /// spans. Logs a warning naming the offending level and invariant for each violation
    /// found, and returns `true` only if none were found.
    pub fn check_invariants(&self) -> bool {
        let root = match self.root {
            None => return true,
            Some(root) => root,
        };

        let mut ok = true;
        let mut present: HashSet<NodeId> = HashSet::new();
        present.insert(root);

        for level in (self.min_level..self.max_level).rev() {
            let next: HashSet<NodeId> = present
                .iter()
                .flat_map(|&id| {
                    std::iter::once(id).chain(self.arena[id].only_children_at_level(level).iter().copied())
                })
                .collect();

            if !self.check_nesting(&present, &next, level) {
                ok = false;
            }
            if !self.check_covering(&present, &next, level) {
                ok = false;
            }
            if !self.check_separation(&next, level) {
                ok = false;
            }

            present = next;
        }

        ok
    }

    /// `C_{i-1}` must contain `C_i`: every point present at `level + 1` stays present at
    /// `level` (a node is always its own implicit child).
    fn check_nesting(&self, current: &HashSet<NodeId>, next: &HashSet<NodeId>, level: i32) -> bool {
        let holds = current.is_subset(next);
        if !holds {
            log::warn!("nesting violated at level {}: C_i is not a subset of C_{{i-1}}", level);
        }
        holds
    }

    /// Every point of the lower set `next` (`C_level`) must be covered by exactly one point
    /// of the upper set `current` (`C_{level+1}`): within `base^(level+1)` of it, and
    /// structurally registered as that point's level-`(level+1)` child (or the same node,
    /// for the self-child case). Proximity alone isn't enough — two candidate parents can
    /// both be close without either actually being the registered parent.
    fn check_covering(&self, current: &HashSet<NodeId>, next: &HashSet<NodeId>, level: i32) -> bool {
        let radius = self.base.powi(level + 1);
        let mut holds = true;
        for &p in next {
            let covering_parents = current.iter().copied().filter(|&q| {
                let within_radius =
                    self.metric.distance(self.arena[p].point(), self.arena[q].point()) <= radius;
                let is_registered_child = p == q || self.arena[q].only_children_at_level(level + 1).contains(&p);
                within_radius && is_registered_child
            });
            let count = covering_parents.count();
            if count != 1 {
                log::warn!(
                    "covering violated at level {}: node {} has {} qualifying cover parents, expected exactly 1",
                    level, p, count
                );
                holds = false;
            }
        }
        holds
    }

    /// Distinct points of `C_i` must be separated by more than `base^i`.
    fn check_separation(&self, level_set: &HashSet<NodeId>, level: i32) -> bool {
        let radius = self.base.powi(level);
        let members: Vec<NodeId> = level_set.iter().copied().collect();
        let mut holds = true;
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let d = self.metric.distance(self.arena[members[i]].point(), self.arena[members[j]].point());
                if d <= radius {
                    log::warn!(
                        "separation violated at level {}: nodes {} and {} are within {}",
                        level, members[i], members[j], radius
                    );
                    holds = false;
                }
            }
        }
        holds
    }
}
