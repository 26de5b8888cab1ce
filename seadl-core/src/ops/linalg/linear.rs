use crate::device::ensure_same_device;
use crate::error::SeaDlError;
use candle_core::{Tensor, D};
use log::trace;

/// Applies an affine transformation: `y = x W^T + b`.
///
/// # Arguments
/// * `input`: Tensor of shape `[*, in_features]` (rank >= 1).
/// * `weight`: Tensor of shape `[out_features, in_features]`.
/// * `bias`: Optional tensor of shape `[out_features]`.
///
/// # Returns
/// A tensor of shape `[*, out_features]`.
pub fn linear_op(
    input: &Tensor,
    weight: &Tensor,
    bias: Option<&Tensor>,
) -> Result<Tensor, SeaDlError> {
    let (out_features, in_features) = weight.dims2()?;
    if input.rank() == 0 {
        return Err(SeaDlError::RankMismatch {
            expected: vec![1, 2, 3, 4],
            actual: 0,
            operation: "linear_op".to_string(),
        });
    }
    let last = input.dim(D::Minus1)?;
    if last != in_features {
        let mut expected = input.dims().to_vec();
        if let Some(l) = expected.last_mut() {
            *l = in_features;
        }
        return Err(SeaDlError::ShapeMismatch {
            expected,
            actual: input.dims().to_vec(),
            operation: "linear_op".to_string(),
        });
    }
    ensure_same_device(weight, input, "linear_op")?;

    // Leading dims are folded into one batch dim so a single 2-D matmul covers every rank.
    let mut out_dims = input.dims().to_vec();
    if let Some(l) = out_dims.last_mut() {
        *l = out_features;
    }
    let rows = input.elem_count() / in_features.max(1);
    let output = input
        .reshape((rows, in_features))?
        .matmul(&weight.t()?)?
        .reshape(out_dims)?;

    let output = match bias {
        Some(b) => {
            if b.dims() != [out_features] {
                return Err(SeaDlError::ShapeMismatch {
                    expected: vec![out_features],
                    actual: b.dims().to_vec(),
                    operation: "linear_op (bias)".to_string(),
                });
            }
            output.broadcast_add(b)?
        }
        None => output,
    };
    trace!("linear_op: {:?} -> {:?}", input.dims(), output.dims());
    Ok(output)
}
