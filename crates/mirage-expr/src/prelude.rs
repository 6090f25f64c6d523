//! Convenience re-exports for common mirage-expr types.
//!
//! ```rust
//! use mirage_expr::prelude::*;
//! ```

pub use crate::expr::{constant, scalar, Expr, Node};
pub use crate::tensor::Tensor;
pub use crate::{BroadcastIndex, MirageError, Result, Shape};
