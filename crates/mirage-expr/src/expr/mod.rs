//! Lazy expression trees over tensor-like operands.
//!
//! An expression is a tree of lightweight value-type nodes assembled by
//! operator overloads. Nothing is computed at construction time: the tree
//! only answers two questions, the shape of the whole expression and the
//! value at one output position. The materializer in `tensor.rs` asks the
//! shape question once and the value question once per output position.

mod binary;
mod leaf;
mod unary;

pub use binary::BinaryNode;
pub use leaf::{constant, scalar, ConstantNode, ScalarNode, TensorNode};
pub use unary::UnaryNode;

use mirage_core::{BroadcastIndex, Result, Shape};

use crate::ops::{
    AbsOp, AddOp, BinaryOp, DivOp, ExpOp, LogOp, MulOp, ReluOp, SqrtOp, SquareOp, SubOp, UnaryOp,
};
use crate::tensor::Tensor;

/// Capability of an expression node: evaluate one output position, and
/// report the node's shape.
///
/// Both operations are pure: repeated calls with the same arguments return
/// identical results as long as borrowed leaf data is not mutated.
pub trait Node {
    /// Evaluate this node at a linear output position. The translator maps
    /// the position into each operand's own coordinate space; composite
    /// nodes thread it through unchanged.
    fn eval(&self, pos: usize, index: &BroadcastIndex) -> f32;

    /// The shape of this node, resolving broadcasts on demand.
    ///
    /// Fails on the first structurally incompatible pair of operand shapes
    /// anywhere in the subtree. Resolution is not cached; callers resolve
    /// once per evaluation sweep.
    fn shape(&self) -> Result<Shape>;
}

/// Public handle for an expression node.
///
/// All operator overloads and unary builder methods live on this wrapper,
/// so any two expression-typed operands compose regardless of their
/// concrete node types. The wrapper is a plain value: cloning or moving it
/// copies a handful of words and never touches operand data.
#[derive(Clone, Copy, Debug)]
pub struct Expr<N>(pub(crate) N);

impl<N: Node> Expr<N> {
    /// Evaluate the expression at one linear output position.
    #[inline]
    pub fn eval(&self, pos: usize, index: &BroadcastIndex) -> f32 {
        self.0.eval(pos, index)
    }

    /// Resolve the shape of the whole expression.
    pub fn shape(&self) -> Result<Shape> {
        self.0.shape()
    }

    /// Lazy elementwise `e^x`.
    pub fn exp(self) -> Expr<UnaryNode<ExpOp, N>> {
        unary(self)
    }

    /// Lazy elementwise square root.
    pub fn sqrt(self) -> Expr<UnaryNode<SqrtOp, N>> {
        unary(self)
    }

    /// Lazy elementwise square.
    pub fn square(self) -> Expr<UnaryNode<SquareOp, N>> {
        unary(self)
    }

    /// Lazy elementwise natural logarithm.
    pub fn log(self) -> Expr<UnaryNode<LogOp, N>> {
        unary(self)
    }

    /// Lazy elementwise absolute value.
    pub fn abs(self) -> Expr<UnaryNode<AbsOp, N>> {
        unary(self)
    }

    /// Lazy elementwise ReLU.
    pub fn relu(self) -> Expr<UnaryNode<ReluOp, N>> {
        unary(self)
    }
}

/// Build the elementwise binary expression for any functor and operands.
///
/// Pure tree construction: no evaluation and no shape validation happen
/// here. Shape compatibility is checked on the first `shape()` call on the
/// resulting tree.
pub fn binary<Op, L, R>(lhs: Expr<L>, rhs: Expr<R>) -> Expr<BinaryNode<Op, L, R>>
where
    Op: BinaryOp,
    L: Node,
    R: Node,
{
    Expr(BinaryNode::new(lhs.0, rhs.0))
}

/// Build the elementwise unary expression for any functor and operand.
pub fn unary<Op, P>(param: Expr<P>) -> Expr<UnaryNode<Op, P>>
where
    Op: UnaryOp,
    P: Node,
{
    Expr(UnaryNode::new(param.0))
}

// Infix arithmetic over every pairing of expression handles and borrowed
// tensors. Each impl only constructs the corresponding composite node.
macro_rules! impl_arith_op {
    ($std_trait:ident, $method:ident, $op:ident) => {
        impl<L: Node, R: Node> std::ops::$std_trait<Expr<R>> for Expr<L> {
            type Output = Expr<BinaryNode<$op, L, R>>;

            #[inline]
            fn $method(self, rhs: Expr<R>) -> Self::Output {
                binary(self, rhs)
            }
        }

        impl<'a, R: Node> std::ops::$std_trait<Expr<R>> for &'a Tensor {
            type Output = Expr<BinaryNode<$op, TensorNode<'a>, R>>;

            #[inline]
            fn $method(self, rhs: Expr<R>) -> Self::Output {
                binary(self.as_expr(), rhs)
            }
        }

        impl<'a, L: Node> std::ops::$std_trait<&'a Tensor> for Expr<L> {
            type Output = Expr<BinaryNode<$op, L, TensorNode<'a>>>;

            #[inline]
            fn $method(self, rhs: &'a Tensor) -> Self::Output {
                binary(self, rhs.as_expr())
            }
        }

        impl<'a, 'b> std::ops::$std_trait<&'b Tensor> for &'a Tensor {
            type Output = Expr<BinaryNode<$op, TensorNode<'a>, TensorNode<'b>>>;

            #[inline]
            fn $method(self, rhs: &'b Tensor) -> Self::Output {
                binary(self.as_expr(), rhs.as_expr())
            }
        }
    };
}

impl_arith_op!(Add, add, AddOp);
impl_arith_op!(Sub, sub, SubOp);
impl_arith_op!(Mul, mul, MulOp);
impl_arith_op!(Div, div, DivOp);

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::BroadcastIndex;

    #[test]
    fn test_operator_tree_construction() {
        let x = 2.0f32;
        let y = 3.0f32;
        let e = scalar(&x) + scalar(&y);
        let shape = e.shape().unwrap();
        assert!(shape.is_scalar());

        let idx = BroadcastIndex::new(&shape);
        assert_eq!(e.eval(0, &idx), 5.0);
    }

    #[test]
    fn test_all_infix_operators() {
        let a = 8.0f32;
        let b = 2.0f32;
        let idx = BroadcastIndex::new(&Shape::scalar());

        assert_eq!((scalar(&a) + scalar(&b)).eval(0, &idx), 10.0);
        assert_eq!((scalar(&a) - scalar(&b)).eval(0, &idx), 6.0);
        assert_eq!((scalar(&a) * scalar(&b)).eval(0, &idx), 16.0);
        assert_eq!((scalar(&a) / scalar(&b)).eval(0, &idx), 4.0);
    }

    #[test]
    fn test_unary_builders() {
        let v = -3.0f32;
        let idx = BroadcastIndex::new(&Shape::scalar());

        assert_eq!(scalar(&v).square().eval(0, &idx), 9.0);
        assert_eq!(scalar(&v).abs().eval(0, &idx), 3.0);
        assert_eq!(scalar(&v).relu().eval(0, &idx), 0.0);
        assert!(scalar(&v).sqrt().eval(0, &idx).is_nan());
    }

    #[test]
    fn test_nesting_depth() {
        // Deep composition stays a plain value type and evaluates correctly.
        let v = 1.0f32;
        let e = ((scalar(&v) + scalar(&v)) * (scalar(&v) + scalar(&v))).square();
        let idx = BroadcastIndex::new(&Shape::scalar());
        assert_eq!(e.eval(0, &idx), 16.0);
    }

    #[test]
    fn test_generic_builder_matches_operator() {
        let a = 4.0f32;
        let b = 5.0f32;
        let idx = BroadcastIndex::new(&Shape::scalar());

        let built = binary::<MulOp, _, _>(scalar(&a), scalar(&b));
        let infix = scalar(&a) * scalar(&b);
        assert_eq!(built.eval(0, &idx), infix.eval(0, &idx));
    }
}
