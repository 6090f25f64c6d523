//! Error types shared across the Mirage crates.

use thiserror::Error;

/// Errors produced while resolving shapes or materializing expressions.
///
/// Numerical conditions (division by zero, log/sqrt of non-positive values)
/// are never errors: they propagate as IEEE NaN/infinity through element
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirageError {
    #[error("cannot broadcast shape {lhs:?} with shape {rhs:?}")]
    Broadcast { lhs: Vec<usize>, rhs: Vec<usize> },

    #[error("destination holds {got} elements, expression produces {expected}")]
    ElementCount { expected: usize, got: usize },
}
