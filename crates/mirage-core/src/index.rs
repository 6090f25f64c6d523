use smallvec::SmallVec;

use crate::shape::Shape;

/// Translates linear positions in a broadcasted output into operand
/// positions.
///
/// Built once per output shape and threaded unchanged through an entire
/// evaluation sweep. For each output position the translator walks the
/// dimensions from the innermost outward, so an operand whose extent is 1
/// along a stretched dimension contributes stride 0 there.
#[derive(Clone, Debug)]
pub struct BroadcastIndex {
    dims: SmallVec<[usize; 4]>,
}

impl BroadcastIndex {
    /// Create a translator for the given output shape.
    pub fn new(output: &Shape) -> Self {
        Self {
            dims: SmallVec::from_slice(output.dims()),
        }
    }

    /// Number of output dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of output positions.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Map a linear output position to the operand's own linear position.
    ///
    /// The operand shape is right-aligned against the output shape; its
    /// rank must not exceed the output rank (it was an input to the
    /// broadcast that produced this output).
    ///
    /// Performs no allocation: coordinates and operand strides are derived
    /// incrementally while walking dimensions right to left.
    #[inline]
    pub fn translate(&self, pos: usize, operand: &Shape) -> usize {
        let src = operand.dims();

        // Operands covering the whole output map one-to-one.
        if src == self.dims.as_slice() {
            return pos;
        }

        let out_ndim = self.dims.len();
        let src_ndim = src.len();
        debug_assert!(src_ndim <= out_ndim, "operand rank exceeds output rank");
        let offset = out_ndim - src_ndim;

        let mut suffix = 1usize; // product of output extents right of dim k
        let mut stride = 1usize; // operand stride at the aligned dim
        let mut index = 0usize;

        for k in (0..out_ndim).rev() {
            let coord = (pos / suffix) % self.dims[k];
            suffix *= self.dims[k];
            if k >= offset {
                let extent = src[k - offset];
                if extent > 1 {
                    index += coord * stride;
                }
                stride *= extent;
            }
        }

        index
    }
}
