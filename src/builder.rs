//! A construction object for a [`CoverTree`]. See the field docs below for what each
//! parameter controls.

use crate::covertree::CoverTree;
use crate::errors::{CoverTreeError, CoverTreeResult};
use crate::metric::Metric;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs::read_to_string;
use std::path::Path;
use yaml_rust::YamlLoader;

/// Builds a [`CoverTree`] with explicit control over its shrink factor, level range and
/// source of randomness. Defaults to `base = 2.0`, `max_level = 10`, and an entropy-seeded
/// RNG.
#[derive(Debug, Clone, Copy)]
pub struct CoverTreeBuilder {
    base: f64,
    max_level: i32,
    rng_seed: Option<u64>,
}

impl Default for CoverTreeBuilder {
    fn default() -> Self {
        CoverTreeBuilder {
            base: 2.0,
            max_level: 10,
            rng_seed: None,
        }
    }
}

impl CoverTreeBuilder {
    /// Creates a new builder with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an open yaml object. Missing keys fall back to the builder's
    /// defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Self {
        let config = read_to_string(&path).expect("unable to read config file");
        let loaded = YamlLoader::load_from_str(&config).unwrap();
        let params = &loaded[0];
        let mut builder = Self::default();
        if let Some(base) = params["base"].as_f64() {
            builder.set_base(base);
        }
        if let Some(max_level) = params["max_level"].as_i64() {
            builder.set_max_level(max_level as i32);
        }
        if let Some(seed) = params["rng_seed"].as_i64() {
            builder.set_rng_seed(seed as u64);
        }
        builder
    }

    /// The geometric shrink factor between levels. Must be greater than 1.
    pub fn set_base(&mut self, x: f64) -> &mut Self {
        self.base = x;
        self
    }

    /// The top level index the tree's root is assumed to live at.
    pub fn set_max_level(&mut self, x: i32) -> &mut Self {
        self.max_level = x;
        self
    }

    /// Seeds the tree's RNG for reproducible parent tie-breaking. Without this, the tree
    /// seeds from entropy.
    pub fn set_rng_seed(&mut self, x: u64) -> &mut Self {
        self.rng_seed = Some(x);
        self
    }

    /// Builds the tree over `metric`. Fails if `base` is not greater than 1.
    pub fn build<P, M: Metric<P>>(&self, metric: M) -> CoverTreeResult<CoverTree<P, M>> {
        if !(self.base > 1.0) {
            return Err(CoverTreeError::InvalidBase(self.base));
        }
        let rng = match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        CoverTree::with_rng(metric, self.base, self.max_level, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2(a: &(f64, f64), b: &(f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn defaults_build_a_usable_tree() {
        let tree = CoverTreeBuilder::new().build(l2 as fn(&(f64, f64), &(f64, f64)) -> f64).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.base(), 2.0);
        assert_eq!(tree.max_level(), 10);
    }

    #[test]
    fn rejects_invalid_base() {
        let mut builder = CoverTreeBuilder::new();
        builder.set_base(0.5);
        let result = builder.build(l2 as fn(&(f64, f64), &(f64, f64)) -> f64);
        assert_eq!(result.unwrap_err(), CoverTreeError::InvalidBase(0.5));
    }

    #[test]
    fn seeded_builds_are_deterministic() {
        let mut a = CoverTreeBuilder::new();
        a.set_rng_seed(7);
        let mut b = CoverTreeBuilder::new();
        b.set_rng_seed(7);
        let mut ta = a.build(l2 as fn(&(f64, f64), &(f64, f64)) -> f64).unwrap();
        let mut tb = b.build(l2 as fn(&(f64, f64), &(f64, f64)) -> f64).unwrap();
        for p in [(0.0, 0.0), (1.0, 1.0), (2.0, -1.0), (0.5, 0.5), (3.0, 3.0)] {
            ta.insert(p);
            tb.insert(p);
        }
        assert_eq!(ta.len(), tb.len());
        assert!(ta.check_invariants());
        assert!(tb.check_invariants());
    }
}
