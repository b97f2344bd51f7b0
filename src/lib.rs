#![deny(warnings)]

//! # covertree
//! An in-memory cover tree over an arbitrary metric space, for incremental insertion and
//! exact k-nearest-neighbor queries.
//!
//! ## Parameter guide
//! A tree is controlled by two parameters: `base`, the geometric shrink factor between
//! levels, and `max_level`, the top level its root is assumed to live at. `base` should sit
//! somewhere between 1.2 and 2; higher values create wider, shallower trees at the cost of
//! looser separation between sibling points. `max_level` only needs to be large enough that
//! `base^max_level` exceeds the diameter of the data you plan to insert — points are placed
//! as deep as they need to be regardless, so an overestimate costs nothing but a few empty
//! levels at the top.
//!
//! Build one with [`CoverTreeBuilder`], or call [`CoverTree::new`] directly if the defaults
//! don't fit.

pub mod builder;
pub mod covertree;
pub mod errors;
pub mod metric;
pub mod node;

pub use builder::CoverTreeBuilder;
pub use covertree::CoverTree;
pub use errors::{CoverTreeError, CoverTreeResult};
pub use metric::Metric;
pub use node::{Node, NodeId};
