use std::marker::PhantomData;

use mirage_core::{BroadcastIndex, Result, Shape};

use super::Node;
use crate::ops::UnaryOp;

/// Composite node applying a unary functor to one child.
///
/// Shape passes through unchanged.
#[derive(Clone, Copy, Debug)]
pub struct UnaryNode<Op, P> {
    param: P,
    op: PhantomData<Op>,
}

impl<Op, P> UnaryNode<Op, P> {
    pub(crate) fn new(param: P) -> Self {
        Self {
            param,
            op: PhantomData,
        }
    }
}

impl<Op, P> Node for UnaryNode<Op, P>
where
    Op: UnaryOp,
    P: Node,
{
    #[inline]
    fn eval(&self, pos: usize, index: &BroadcastIndex) -> f32 {
        Op::apply(self.param.eval(pos, index))
    }

    fn shape(&self) -> Result<Shape> {
        self.param.shape()
    }
}
