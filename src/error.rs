//! Error definitions for the crate.
use thiserror::Error;

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntervalTreeError {
    /// Returned by [`remove`](crate::IntervalTree::remove) when no interval with the same
    /// bounds and data is stored in the tree.
    #[error("interval not found in the tree")]
    NotFound,
    #[error("an Interval must have its begin bound lower than or equal to its end bound")]
    InvalidInterval,
}

pub type Result<T, E = IntervalTreeError> = std::result::Result<T, E>;
