//! Incremental insertion: the iterative cover-set descent that finds the correct parent
//! level for a new point and wires it in while maintaining nesting, covering and separation.

use super::CoverSet;
use crate::metric::Metric;
use crate::node::NodeId;
use crate::covertree::CoverTree;
use rand::Rng;

impl<P, M: Metric<P>> CoverTree<P, M> {
    /// Inserts `point` into the tree. A no-op if an existing point is at distance exactly
    /// 0 from `point` (duplicate points are silently rejected, see the module docs).
    pub fn insert(&mut self, point: P) {
        let root = match self.root {
            None => {
                let id = self.push_node(point, None);
                self.root = Some(id);
                self.min_level = self.max_level;
                log::debug!("inserted root node at level {}", self.max_level);
                return;
            }
            Some(root) => root,
        };

        let mut level = self.max_level;
        let mut cover: CoverSet = vec![(root, self.metric.distance(&point, self.arena[root].point()))];

        loop {
            let expanded = self.sweep(&point, &cover, level);
            let d_min = Self::min_distance(&expanded);

            if d_min == 0.0 {
                log::debug!("duplicate of an existing point, insert skipped");
                return;
            }

            let radius = self.base.powi(level);
            if d_min > radius {
                let parent_radius = self.base.powi(level + 1);
                let parent = Self::choose_parent(&mut self.rng, &cover, parent_radius)
                    .expect("current cover set always has a member within the parent radius");
                self.attach_child(parent, level + 1, point);
                self.min_level = self.min_level.min(level);
                log::debug!("inserted point under parent at level {}", level + 1);
                return;
            }

            cover = expanded
                .into_iter()
                .filter(|&(_, d)| d <= radius)
                .collect();
            level -= 1;
        }
    }

    /// Picks one element of `cover` within `radius`, uniformly at random. `None` only if no
    /// element qualifies, which a correct descent never hits (see `insert`'s doc comment).
    pub(crate) fn choose_parent(
        rng: &mut rand::rngs::SmallRng,
        cover: &CoverSet,
        radius: f64,
    ) -> Option<NodeId> {
        let candidates: Vec<NodeId> = cover
            .iter()
            .filter(|&&(_, d)| d <= radius)
            .map(|&(id, _)| id)
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    fn attach_child(&mut self, parent: NodeId, level: i32, point: P) {
        let child = self.push_node(point, Some(parent));
        self.arena[parent].add_child_at_level(level, child);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_tree;

    #[test]
    fn first_insert_becomes_root() {
        let mut tree = test_tree();
        tree.insert((3.0, 4.0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.min_level(), tree.max_level());
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut tree = test_tree();
        tree.insert((1.0, 1.0));
        tree.insert((1.0, 1.0));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn distinct_points_both_land() {
        let mut tree = test_tree();
        tree.insert((0.0, 0.0));
        tree.insert((1.0, 0.0));
        tree.insert((2.0, 0.0));
        assert_eq!(tree.len(), 3);
        assert!(tree.min_level() <= tree.max_level());
    }

    #[test]
    fn min_level_only_decreases() {
        let mut tree = test_tree();
        let mut prev = tree.min_level();
        for i in 0..50 {
            tree.insert((i as f64 * 0.01, 0.0));
            let cur = tree.min_level();
            assert!(cur <= prev);
            prev = cur;
        }
    }
}
