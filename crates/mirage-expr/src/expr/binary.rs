use std::marker::PhantomData;

use mirage_core::{BroadcastIndex, MirageError, Result, Shape};

use super::Node;
use crate::ops::BinaryOp;

/// Composite node combining two children through a binary functor.
///
/// The functor is a zero-sized type parameter, so evaluation is a direct
/// call with no dispatch table and no per-node closure. Children are moved
/// in as values; leaf data underneath them stays borrowed.
#[derive(Clone, Copy, Debug)]
pub struct BinaryNode<Op, L, R> {
    lhs: L,
    rhs: R,
    op: PhantomData<Op>,
}

impl<Op, L, R> BinaryNode<Op, L, R> {
    pub(crate) fn new(lhs: L, rhs: R) -> Self {
        Self {
            lhs,
            rhs,
            op: PhantomData,
        }
    }
}

impl<Op, L, R> Node for BinaryNode<Op, L, R>
where
    Op: BinaryOp,
    L: Node,
    R: Node,
{
    #[inline]
    fn eval(&self, pos: usize, index: &BroadcastIndex) -> f32 {
        Op::apply(self.lhs.eval(pos, index), self.rhs.eval(pos, index))
    }

    fn shape(&self) -> Result<Shape> {
        let lhs = self.lhs.shape()?;
        let rhs = self.rhs.shape()?;
        lhs.broadcast_with(&rhs).ok_or_else(|| MirageError::Broadcast {
            lhs: lhs.dims().to_vec(),
            rhs: rhs.dims().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{constant, scalar};
    use crate::ops::AddOp;

    #[test]
    fn test_eval_applies_functor() {
        let a = 2.0f32;
        let b = 4.0f32;
        let node = BinaryNode::<AddOp, _, _>::new(scalar(&a).0, scalar(&b).0);
        let idx = BroadcastIndex::new(&Shape::scalar());
        assert_eq!(node.eval(0, &idx), 6.0);
    }

    #[test]
    fn test_shape_resolves_broadcast() {
        let e = constant(1.0, [3, 1]) + constant(2.0, [1, 4]);
        assert_eq!(e.shape().unwrap().dims(), &[3, 4]);
    }

    #[test]
    fn test_shape_error_names_both_shapes() {
        let e = constant(1.0, [2, 3]) + constant(2.0, [4, 5]);
        let err = e.shape().unwrap_err();
        assert_eq!(
            err,
            MirageError::Broadcast {
                lhs: vec![2, 3],
                rhs: vec![4, 5],
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("[2, 3]"));
        assert!(msg.contains("[4, 5]"));
    }

    #[test]
    fn test_construction_never_fails() {
        // Incompatible operands still build; the error surfaces at shape().
        let v = 1.0f32;
        let e = (constant(1.0, [2, 3]) + constant(2.0, [4, 5])) * scalar(&v);
        assert!(e.shape().is_err());
    }

    #[test]
    fn test_error_surfaces_from_nested_subtree() {
        let bad = constant(1.0, [2]) / constant(1.0, [3]);
        let e = bad + constant(0.0, [6]);
        let err = e.shape().unwrap_err();
        assert_eq!(
            err,
            MirageError::Broadcast {
                lhs: vec![2],
                rhs: vec![3],
            }
        );
    }
}
