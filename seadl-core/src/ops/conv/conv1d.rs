use super::{conv_output_len, ensure_batched, ensure_weight_rank, window_indices};
use crate::device::ensure_same_device;
use crate::error::SeaDlError;
use candle_core::Tensor;
use log::trace;

/// 1-D convolution by strided windowing and a single matrix multiplication.
///
/// # Arguments
/// * `input`: `[B, C_in, L]`, or `[C_in, L]` for a single sample.
/// * `weight`: `[C_out, C_in, K]`.
/// * `stride`: step between consecutive windows (> 0).
/// * `padding`: zeros added on both ends of the length axis.
///
/// # Returns
/// `[B, C_out, L_out]` (or `[C_out, L_out]` for an unbatched input) with
/// `L_out = (L + 2 * padding - K) / stride + 1`. No bias is applied.
pub fn conv1d_strided(
    input: &Tensor,
    weight: &Tensor,
    stride: usize,
    padding: usize,
) -> Result<Tensor, SeaDlError> {
    const OP: &str = "conv1d_strided";
    let (input, unbatched) = ensure_batched(input, 1, OP)?;
    ensure_weight_rank(weight, 3, OP)?;
    let (c_out, c_in_weight, k) = weight.dims3()?;
    let (b, c_in, l) = input.dims3()?;
    if c_in != c_in_weight {
        return Err(SeaDlError::ShapeMismatch {
            expected: vec![b, c_in_weight, l],
            actual: input.dims().to_vec(),
            operation: OP.to_string(),
        });
    }
    ensure_same_device(weight, &input, OP)?;
    let l_out = conv_output_len(l, k, stride, padding, OP)?;

    let padded = if padding > 0 {
        input.pad_with_zeros(2, padding, padding)?
    } else {
        input
    };

    // [B, C_in, K * L_out] -> [B, C_in * K, L_out]
    let indices = window_indices(k, stride, l_out, padded.device())?;
    let columns = padded
        .index_select(&indices, 2)?
        .reshape((b, c_in * k, l_out))?;
    let kernel = weight.reshape((c_out, c_in * k))?;
    let output = kernel.broadcast_matmul(&columns)?;

    trace!(
        "{}: input [{}, {}, {}] -> output {:?} (stride {}, padding {})",
        OP,
        b,
        c_in,
        l,
        output.dims(),
        stride,
        padding
    );
    if unbatched {
        Ok(output.squeeze(0)?)
    } else {
        Ok(output)
    }
}

#[cfg(test)]
#[path = "conv1d_test.rs"]
mod tests;
