//! The errors that can occur when building or querying a covertree.
//! These are all precondition violations: the algorithms themselves never fail at runtime.

use std::error::Error;
use std::fmt;

/// Helper type for a call that could go wrong.
pub type CoverTreeResult<T> = Result<T, CoverTreeError>;

/// Error type for the covertree. All variants are programmer errors: a badly chosen
/// parameter, or a query issued before the tree holds any points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverTreeError {
    /// `base` must be strictly greater than 1, see the module docs for why.
    InvalidBase(f64),
    /// `k` must be at least 1 for a knn query to make sense.
    InvalidK(usize),
    /// Raised internally when an operation that requires a root is called on an
    /// empty tree in a context where an empty result isn't a valid answer.
    EmptyTree,
}

impl fmt::Display for CoverTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CoverTreeError::InvalidBase(base) => {
                write!(f, "base must be > 1.0, got {}", base)
            }
            CoverTreeError::InvalidK(k) => write!(f, "k must be >= 1, got {}", k),
            CoverTreeError::EmptyTree => write!(f, "operation requires at least one inserted point"),
        }
    }
}

#[allow(deprecated)]
impl Error for CoverTreeError {
    fn description(&self) -> &str {
        match *self {
            CoverTreeError::InvalidBase(_) => "base must be > 1.0",
            CoverTreeError::InvalidK(_) => "k must be >= 1",
            CoverTreeError::EmptyTree => "operation requires at least one inserted point",
        }
    }
}
