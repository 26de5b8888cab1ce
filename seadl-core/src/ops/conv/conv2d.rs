use super::{conv_output_len, ensure_batched, ensure_weight_rank, window_indices};
use crate::device::ensure_same_device;
use crate::error::SeaDlError;
use crate::ops::utils::IntoPair;
use candle_core::Tensor;
use log::trace;

/// 2-D convolution by strided windowing and a single matrix multiplication.
///
/// # Arguments
/// * `input`: `[B, C_in, H, W]`, or `[C_in, H, W]` for a single sample.
/// * `weight`: `[C_out, C_in, KH, KW]`.
/// * `stride`: `(SH, SW)`, or a scalar used for both axes.
/// * `padding`: `(PH, PW)` zeros on both sides of each axis, or a scalar.
///
/// # Returns
/// `[B, C_out, OH, OW]` (or `[C_out, OH, OW]` for an unbatched input) with
/// `OH = (H + 2 * PH - KH) / SH + 1` and likewise for `OW`. No bias is applied.
pub fn conv2d_strided(
    input: &Tensor,
    weight: &Tensor,
    stride: impl IntoPair,
    padding: impl IntoPair,
) -> Result<Tensor, SeaDlError> {
    const OP: &str = "conv2d_strided";
    let (sh, sw) = stride.into_pair();
    let (ph, pw) = padding.into_pair();
    let (input, unbatched) = ensure_batched(input, 2, OP)?;
    ensure_weight_rank(weight, 4, OP)?;
    let (c_out, c_in_weight, kh, kw) = weight.dims4()?;
    let (b, c_in, h, w) = input.dims4()?;
    if c_in != c_in_weight {
        return Err(SeaDlError::ShapeMismatch {
            expected: vec![b, c_in_weight, h, w],
            actual: input.dims().to_vec(),
            operation: OP.to_string(),
        });
    }
    ensure_same_device(weight, &input, OP)?;
    let oh = conv_output_len(h, kh, sh, ph, OP)?;
    let ow = conv_output_len(w, kw, sw, pw, OP)?;

    let mut padded = input;
    if ph > 0 {
        padded = padded.pad_with_zeros(2, ph, ph)?;
    }
    if pw > 0 {
        padded = padded.pad_with_zeros(3, pw, pw)?;
    }
    let wp = w + 2 * pw;
    let device = padded.device().clone();

    // Rows: [B, C_in, KH * OH, Wp] -> [B, C_in, KH, OH, Wp]
    let rows = padded
        .index_select(&window_indices(kh, sh, oh, &device)?, 2)?
        .reshape(vec![b, c_in, kh, oh, wp])?;
    // Columns: [B, C_in, KH, OH, KW * OW] -> [B, C_in, KH, OH, KW, OW]
    let windows = rows
        .index_select(&window_indices(kw, sw, ow, &device)?, 4)?
        .reshape(vec![b, c_in, kh, oh, kw, ow])?;
    // Kernel taps next to the channel axis, positions last.
    let columns = windows
        .permute(vec![0, 1, 2, 4, 3, 5])?
        .contiguous()?
        .reshape((b, c_in * kh * kw, oh * ow))?;

    let kernel = weight.reshape((c_out, c_in * kh * kw))?;
    let output = kernel
        .broadcast_matmul(&columns)?
        .reshape((b, c_out, oh, ow))?;

    trace!(
        "{}: input [{}, {}, {}, {}] -> output {:?} (stride ({}, {}), padding ({}, {}))",
        OP,
        b,
        c_in,
        h,
        w,
        output.dims(),
        sh,
        sw,
        ph,
        pw
    );
    if unbatched {
        Ok(output.squeeze(0)?)
    } else {
        Ok(output)
    }
}

#[cfg(test)]
#[path = "conv2d_test.rs"]
mod tests;
