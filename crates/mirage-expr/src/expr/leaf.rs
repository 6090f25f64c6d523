//! Terminal expression nodes: scalars, shaped constants, and tensors.

use mirage_core::{BroadcastIndex, Result, Shape};

use super::{Expr, Node};
use crate::tensor::Tensor;

/// A borrowed scalar value broadcast against anything.
///
/// The node holds a reference, never a copy, so the value must outlive
/// every tree built from it; the borrow checker enforces this.
#[derive(Clone, Copy, Debug)]
pub struct ScalarNode<'a> {
    value: &'a f32,
}

impl Node for ScalarNode<'_> {
    #[inline]
    fn eval(&self, _pos: usize, _index: &BroadcastIndex) -> f32 {
        *self.value
    }

    fn shape(&self) -> Result<Shape> {
        Ok(Shape::scalar())
    }
}

/// An owned value conceptually replicated across an explicit shape.
#[derive(Clone, Debug)]
pub struct ConstantNode {
    value: f32,
    shape: Shape,
}

impl Node for ConstantNode {
    #[inline]
    fn eval(&self, _pos: usize, _index: &BroadcastIndex) -> f32 {
        self.value
    }

    fn shape(&self) -> Result<Shape> {
        Ok(self.shape.clone())
    }
}

/// A borrowed tensor participating in an expression.
///
/// Evaluation translates the output position into the tensor's own
/// coordinate space, so tensors of any broadcast-compatible shape can
/// appear anywhere in a tree.
#[derive(Clone, Copy, Debug)]
pub struct TensorNode<'a> {
    tensor: &'a Tensor,
}

impl<'a> TensorNode<'a> {
    pub(crate) fn new(tensor: &'a Tensor) -> Self {
        Self { tensor }
    }
}

impl Node for TensorNode<'_> {
    #[inline]
    fn eval(&self, pos: usize, index: &BroadcastIndex) -> f32 {
        let own = index.translate(pos, self.tensor.shape());
        self.tensor.as_f32_slice()[own]
    }

    fn shape(&self) -> Result<Shape> {
        Ok(self.tensor.shape().clone())
    }
}

/// Lift a borrowed scalar into an expression of shape `[1]`.
pub fn scalar(value: &f32) -> Expr<ScalarNode<'_>> {
    Expr(ScalarNode { value })
}

/// Build a constant expression with an explicit shape.
///
/// Accepts a `Shape`, an array literal, a slice, or a `Vec` of extents;
/// every form produces an identical shape.
pub fn constant(value: f32, shape: impl Into<Shape>) -> Expr<ConstantNode> {
    Expr(ConstantNode {
        value,
        shape: shape.into(),
    })
}
