//! k-nearest-neighbor query, and the combined knn-then-insert descent that answers a query
//! and inserts the query point in a single pass.

use super::{CoverSet, CoverTree};
use crate::errors::{CoverTreeError, CoverTreeResult};
use crate::metric::Metric;
use crate::node::NodeId;

impl<P: Clone, M: Metric<P>> CoverTree<P, M> {
    /// The `k` nearest neighbors of `point`, sorted ascending by distance. Returns fewer
    /// than `k` pairs if the tree holds fewer than `k` points, and an empty sequence if the
    /// tree is empty. Errors only on `k == 0`.
    pub fn knn(&self, k: usize, point: &P) -> CoverTreeResult<Vec<(P, f64)>> {
        if k == 0 {
            return Err(CoverTreeError::InvalidK(k));
        }
        let root = match self.root {
            None => return Ok(Vec::new()),
            Some(root) => root,
        };

        let mut cover: CoverSet = vec![(root, self.metric.distance(point, self.arena[root].point()))];
        for level in (self.min_level..=self.max_level).rev() {
            let expanded = self.sweep(point, &cover, level);
            let d_k = Self::kth_smallest_distance(&expanded, k);
            let radius = self.base.powi(level);
            cover = expanded
                .into_iter()
                .filter(|&(_, d)| d <= d_k + radius)
                .collect();
        }

        Ok(self.finalize(cover, k))
    }

    /// Computes `knn(k, &point)` against the tree as it stood before this call, then
    /// inserts `point`, unless it was already present. Equivalent to
    /// `let r = knn(k, &point); insert(point); r`, but shares the descent's distance
    /// computations between the two operations.
    pub fn knn_insert(&mut self, k: usize, point: P) -> CoverTreeResult<Vec<(P, f64)>> {
        if k == 0 {
            return Err(CoverTreeError::InvalidK(k));
        }
        let root = match self.root {
            None => {
                let id = self.push_node(point, None);
                self.root = Some(id);
                self.min_level = self.max_level;
                return Ok(Vec::new());
            }
            Some(root) => root,
        };

        let mut level = self.max_level;
        let mut found_parent = false;
        let mut already_there = false;
        let mut parent: Option<(NodeId, i32)> = None;
        let mut cover: CoverSet = vec![(root, self.metric.distance(&point, self.arena[root].point()))];

        while (!already_there && !found_parent) || level >= self.min_level {
            let expanded = self.sweep(&point, &cover, level);
            let d_high = Self::kth_smallest_distance(&expanded, k);
            let d_min = Self::min_distance(&expanded);

            if d_min == 0.0 {
                already_there = true;
            } else if !already_there && !found_parent && d_min > self.base.powi(level - 1) {
                found_parent = true;
            }

            let radius = self.base.powi(level);
            if let Some(chosen) = Self::choose_parent(&mut self.rng, &cover, radius) {
                parent = Some((chosen, level));
            }

            cover = expanded
                .into_iter()
                .filter(|&(_, d)| d <= d_high + radius)
                .collect();
            level -= 1;
        }

        if !already_there && found_parent {
            if let Some((parent_id, parent_level)) = parent {
                let child = self.push_node(point, Some(parent_id));
                self.arena[parent_id].add_child_at_level(parent_level, child);
                self.min_level = self.min_level.min(parent_level - 1);
                log::debug!("knn_insert placed point under parent at level {}", parent_level);
            }
        } else if already_there {
            log::debug!("knn_insert found an existing duplicate, insert skipped");
        }

        Ok(self.finalize(cover, k))
    }

    /// `true` iff some inserted point is at distance exactly 0 from `point`.
    pub fn find(&self, point: &P) -> CoverTreeResult<bool> {
        let nearest = self.knn(1, point)?;
        Ok(nearest.first().map(|&(_, d)| d == 0.0).unwrap_or(false))
    }

    fn finalize(&self, cover: CoverSet, k: usize) -> Vec<(P, f64)> {
        let mut results: Vec<(P, f64)> = cover
            .into_iter()
            .map(|(id, d)| (self.arena[id].point().clone(), d))
            .collect();
        results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        results.truncate(k);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_tree;

    #[test]
    fn empty_tree_knn_is_empty() {
        let tree = test_tree();
        let result = tree.knn(1, &(0.0, 0.0)).unwrap();
        assert!(result.is_empty());
        assert!(!tree.find(&(0.0, 0.0)).unwrap());
    }

    #[test]
    fn rejects_zero_k() {
        let tree = test_tree();
        assert!(tree.knn(0, &(0.0, 0.0)).is_err());
    }

    #[test]
    fn single_point_nearest_neighbor() {
        let mut tree = test_tree();
        tree.insert((3.0, 4.0));
        let result = tree.knn(1, &(0.0, 0.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].0, (3.0, 4.0));
        assert_approx_eq::assert_approx_eq!(result[0].1, 5.0);
        assert!(tree.find(&(3.0, 4.0)).unwrap());
    }

    #[test]
    fn knn_returns_fewer_than_k_when_tree_is_small() {
        let mut tree = test_tree();
        tree.insert((0.0, 0.0));
        tree.insert((1.0, 0.0));
        let result = tree.knn(5, &(0.0, 0.0)).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn knn_insert_matches_separate_knn_then_insert() {
        let mut a = test_tree();
        let mut b = test_tree();
        let points = [(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (-1.0, 3.0), (0.5, 0.5)];
        for &p in &points[..3] {
            a.insert(p);
            b.insert(p);
        }
        let query = (0.5, 0.5);
        let mut expected = a.knn(2, &query).unwrap();
        a.insert(query);
        let mut actual = b.knn_insert(2, query).unwrap();

        expected.sort_by(|x, y| x.1.partial_cmp(&y.1).unwrap());
        actual.sort_by(|x, y| x.1.partial_cmp(&y.1).unwrap());
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual.iter()) {
            assert_eq!(e.0, a.0);
            assert_approx_eq::assert_approx_eq!(e.1, a.1);
        }
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn knn_insert_skips_duplicate() {
        let mut tree = test_tree();
        tree.insert((1.0, 1.0));
        tree.knn_insert(1, (1.0, 1.0)).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
