//! Elementwise broadcasting of parameter and input shapes.
//!
//! Shapes are aligned on their trailing axes; an axis of length 1 stretches to
//! match the other operand, any other mismatch is an error.

use crate::error::{Result, SstError};
use ndarray::{ArrayBase, ArrayViewD, Data, Dimension, IxDyn};

/// Computes the common shape of `lhs` and `rhs`.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let lhs_pad = ndim - lhs.len();
    let rhs_pad = ndim - rhs.len();

    let mut shape = Vec::with_capacity(ndim);
    for axis in 0..ndim {
        let l = if axis < lhs_pad { 1 } else { lhs[axis - lhs_pad] };
        let r = if axis < rhs_pad { 1 } else { rhs[axis - rhs_pad] };
        let len = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(SstError::IncompatibleShapes {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
        shape.push(len);
    }
    Ok(shape)
}

/// Common shape of every shape in `shapes`; the empty list yields a 0-d shape.
pub fn broadcast_all(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    shapes
        .iter()
        .try_fold(Vec::new(), |acc, shape| broadcast_shape(&acc, shape))
}

/// Returns a read-only view of `array` stretched to `shape`.
pub fn broadcast_view<'a, A, S, D>(
    array: &'a ArrayBase<S, D>,
    shape: &[usize],
) -> Result<ArrayViewD<'a, A>>
where
    S: Data<Elem = A>,
    D: Dimension,
{
    array
        .broadcast(IxDyn(shape))
        .ok_or_else(|| SstError::IncompatibleShapes {
            lhs: array.shape().to_vec(),
            rhs: shape.to_vec(),
        })
}
