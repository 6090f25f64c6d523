//! # mirage-expr
//!
//! Lazy elementwise expression engine for the Mirage tensor library.
//!
//! Arithmetic over tensors, scalars, and shaped constants builds an
//! expression tree instead of computing anything; the whole tree is
//! evaluated in a single per-element pass when materialized, so no
//! intermediate result is ever allocated. Operands of different shapes
//! combine under NumPy-style broadcasting.
//!
//! ```
//! use mirage_expr::prelude::*;
//!
//! let a = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
//! let row = Tensor::from_f32(&[10.0, 20.0, 30.0], &[3]);
//! let bias = 0.5f32;
//!
//! // One fused pass over 2x3 outputs; `row` broadcasts across rows.
//! let y = ((&a * &row) + scalar(&bias)).to_tensor().unwrap();
//! assert_eq!(y.shape().dims(), &[2, 3]);
//! assert_eq!(y.as_f32_slice(), &[10.5, 40.5, 90.5, 40.5, 100.5, 180.5]);
//! ```

pub mod expr;
pub mod ops;
pub mod prelude;
pub mod tensor;

pub use expr::{binary, constant, scalar, unary, Expr, Node};
pub use tensor::Tensor;

pub use mirage_core::{BroadcastIndex, MirageError, Result, Shape};
