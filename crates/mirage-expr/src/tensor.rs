use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use mirage_core::{BroadcastIndex, MirageError, Result, Shape};

use crate::expr::{Expr, Node, TensorNode};

/// Minimum output size before materialization uses rayon parallelism.
const PAR_THRESHOLD: usize = 8192;

/// A materialized f32 buffer with a shape — both the operand and the
/// destination of expression evaluation.
///
/// Storage is reference-counted, so cloning a tensor shares the underlying
/// data. Tensors are contiguous row-major and immutable once built; new
/// values come from materializing a new expression.
///
/// # Examples
///
/// ```
/// use mirage_expr::Tensor;
///
/// let a = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
/// let b = Tensor::full(&[2, 2], 10.0);
///
/// // Build a lazy expression; nothing evaluates yet.
/// let e = (&a + &b).square();
///
/// // One pass materializes every element.
/// let y = e.to_tensor().unwrap();
/// assert_eq!(y.as_f32_slice(), &[121.0, 144.0, 169.0, 196.0]);
/// ```
#[derive(Clone)]
pub struct Tensor {
    data: Arc<[f32]>,
    shape: Shape,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a tensor from f32 data with the given shape.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        assert_eq!(
            s.numel(),
            data.len(),
            "Shape {:?} requires {} elements, got {}",
            shape,
            s.numel(),
            data.len()
        );
        Self {
            data: data.into(),
            shape: s,
        }
    }

    pub(crate) fn from_parts(data: Vec<f32>, shape: Shape) -> Self {
        debug_assert_eq!(data.len(), shape.numel());
        Self {
            data: data.into(),
            shape,
        }
    }

    /// Create a tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    /// Create a tensor of ones.
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    /// Create a tensor filled with one value.
    pub fn full(shape: &[usize], value: f32) -> Self {
        let s = Shape::new(shape);
        let data = vec![value; s.numel()];
        Self::from_parts(data, s)
    }

    /// Create a scalar tensor of shape `[1]`.
    pub fn scalar(value: f32) -> Self {
        Self::from_parts(vec![value], Shape::scalar())
    }

    /// Create a tensor with values from the standard normal distribution.
    pub fn randn(shape: &[usize]) -> Self {
        use rand::Rng;
        let s = Shape::new(shape);
        let mut rng = rand::thread_rng();
        // Box-Muller transform for normal distribution
        let data: Vec<f32> = (0..s.numel())
            .map(|_| {
                let u1: f32 = rng.gen_range(1e-7f32..1.0f32);
                let u2: f32 = rng.gen_range(0.0f32..std::f32::consts::TAU);
                (-2.0 * u1.ln()).sqrt() * u2.cos()
            })
            .collect();
        Self::from_parts(data, s)
    }

    /// Create a tensor with values uniformly distributed in [low, high).
    pub fn rand_uniform(shape: &[usize], low: f32, high: f32) -> Self {
        use rand::Rng;
        let s = Shape::new(shape);
        let mut rng = rand::thread_rng();
        let data: Vec<f32> = (0..s.numel()).map(|_| rng.gen_range(low..high)).collect();
        Self::from_parts(data, s)
    }

    // =========================================================================
    // Properties and data access
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// The underlying data in row-major order.
    pub fn as_f32_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get a single element by linear position.
    pub fn get(&self, pos: usize) -> Option<f32> {
        self.data.get(pos).copied()
    }

    /// View this tensor as an expression leaf.
    ///
    /// The leaf borrows; building trees from it copies no data.
    pub fn as_expr(&self) -> Expr<TensorNode<'_>> {
        Expr(TensorNode::new(self))
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(shape={}, numel={})", self.shape, self.numel())
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.as_f32_slice();
        if self.numel() <= 20 {
            write!(f, "tensor({:?}, shape={})", data, self.shape)
        } else {
            write!(
                f,
                "tensor([{:.4}, {:.4}, ..., {:.4}], shape={})",
                data[0],
                data[1],
                data[self.numel() - 1],
                self.shape
            )
        }
    }
}

// =============================================================================
// Materialization: the single evaluation sweep over an expression
// =============================================================================

impl<N: Node> Expr<N> {
    /// Materialize the expression into a new tensor.
    ///
    /// Resolves the shape once, builds one position translator, then
    /// evaluates every linear output position. This is the only place the
    /// engine allocates: one destination buffer, sized by the resolved
    /// shape.
    pub fn to_tensor(&self) -> Result<Tensor> {
        let shape = self.shape()?;
        let index = BroadcastIndex::new(&shape);
        let mut data = vec![0.0f32; shape.numel()];
        for (pos, out) in data.iter_mut().enumerate() {
            *out = self.eval(pos, &index);
        }
        Ok(Tensor::from_parts(data, shape))
    }

    /// Materialize with rayon across output positions.
    ///
    /// Falls back to the sequential sweep below `PAR_THRESHOLD` elements.
    /// Safe because nodes are immutable and evaluation is pure; the result
    /// is identical to `to_tensor`.
    pub fn to_tensor_par(&self) -> Result<Tensor>
    where
        N: Sync,
    {
        let shape = self.shape()?;
        let numel = shape.numel();
        if numel < PAR_THRESHOLD {
            let index = BroadcastIndex::new(&shape);
            let mut data = vec![0.0f32; numel];
            for (pos, out) in data.iter_mut().enumerate() {
                *out = self.eval(pos, &index);
            }
            return Ok(Tensor::from_parts(data, shape));
        }

        let index = BroadcastIndex::new(&shape);
        let data: Vec<f32> = (0..numel)
            .into_par_iter()
            .map(|pos| self.eval(pos, &index))
            .collect();
        Ok(Tensor::from_parts(data, shape))
    }

    /// Evaluate into a caller-owned buffer, allocating nothing.
    ///
    /// The buffer length must match the expression's element count.
    pub fn eval_into(&self, out: &mut [f32]) -> Result<()> {
        let shape = self.shape()?;
        if out.len() != shape.numel() {
            return Err(MirageError::ElementCount {
                expected: shape.numel(),
                got: out.len(),
            });
        }
        let index = BroadcastIndex::new(&shape);
        for (pos, slot) in out.iter_mut().enumerate() {
            *slot = self.eval(pos, &index);
        }
        Ok(())
    }
}
