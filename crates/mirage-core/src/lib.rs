//! # mirage-core
//!
//! Foundations for the Mirage lazy tensor engine:
//! - `Shape`: dimension extents with NumPy-style broadcasting
//! - `BroadcastIndex`: per-output-shape translation of linear positions
//!   into each operand's own coordinate space
//! - `math`: scalar transcendental primitives shared by elementwise ops
//!
//! The expression engine itself lives in `mirage-expr`; this crate only
//! answers shape and coordinate questions and never touches tensor data.

pub mod error;
pub mod index;
pub mod math;
pub mod shape;

pub use error::MirageError;
pub use index::BroadcastIndex;
pub use shape::Shape;

pub type Result<T> = std::result::Result<T, MirageError>;
