// src/ops/conv/mod.rs

//! # Strided convolution kernels
//!
//! Convolutions are computed by windowing: the zero-padded input is gathered
//! into one column per kernel tap (`index_select` with the indices from
//! [`window_indices`]), and the weight, flattened to `[C_out, C_in * K...]`,
//! is applied to all columns with a single matmul. Dilation is fixed to 1 and
//! groups to 1.

pub mod conv1d;
pub mod conv2d;

pub use conv1d::conv1d_strided;
pub use conv2d::conv2d_strided;

use crate::error::SeaDlError;
use candle_core::{Device, Tensor};

/// Number of output positions along one spatial axis:
/// `(input + 2 * padding - kernel) / stride + 1`.
///
/// # Errors
/// * [`SeaDlError::InvalidConfig`] if `kernel` or `stride` is zero, or if the
///   padded size does not fit in `usize`.
/// * [`SeaDlError::EmptyOutput`] if the padded input is smaller than the kernel.
pub fn conv_output_len(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    operation: &str,
) -> Result<usize, SeaDlError> {
    if kernel == 0 {
        return Err(SeaDlError::invalid_config(operation, "kernel size must be > 0"));
    }
    if stride == 0 {
        return Err(SeaDlError::invalid_config(operation, "stride must be > 0"));
    }
    let padded = padding
        .checked_mul(2)
        .and_then(|p| p.checked_add(input))
        .ok_or_else(|| {
            SeaDlError::invalid_config(
                operation,
                format!("padded size overflows (input {}, padding {})", input, padding),
            )
        })?;
    if padded < kernel {
        return Err(SeaDlError::EmptyOutput {
            operation: operation.to_string(),
            input,
            kernel,
            padding,
        });
    }
    Ok((padded - kernel) / stride + 1)
}

/// Gather indices for the strided windows of one spatial axis.
///
/// Entry `k * out_len + o` is `o * stride + k`: the position in the padded
/// input read by kernel tap `k` for output position `o`. Selecting along an
/// axis of length `L` therefore yields `K * out_len` values that reshape to
/// `[K, out_len]`.
///
/// # Errors
/// [`SeaDlError::InvalidConfig`] if a position does not fit in a `u32` index.
pub fn window_indices(
    kernel: usize,
    stride: usize,
    out_len: usize,
    device: &Device,
) -> Result<Tensor, SeaDlError> {
    let too_large = || {
        SeaDlError::invalid_config(
            "window_indices",
            format!(
                "window positions exceed u32 (kernel {}, stride {}, output length {})",
                kernel, stride, out_len
            ),
        )
    };
    let count = kernel.checked_mul(out_len).ok_or_else(too_large)?;
    let mut indices = Vec::with_capacity(count);
    for k in 0..kernel {
        for o in 0..out_len {
            let position = o
                .checked_mul(stride)
                .and_then(|p| p.checked_add(k))
                .and_then(|p| u32::try_from(p).ok())
                .ok_or_else(too_large)?;
            indices.push(position);
        }
    }
    Ok(Tensor::from_vec(indices, count, device)?)
}

/// Adds a leading batch axis to unbatched inputs.
///
/// `spatial_rank` is the number of spatial axes (1 for conv1d, 2 for conv2d).
/// Returns the batched tensor and whether the batch axis was added.
pub(crate) fn ensure_batched(
    input: &Tensor,
    spatial_rank: usize,
    operation: &str,
) -> Result<(Tensor, bool), SeaDlError> {
    let batched_rank = spatial_rank + 2;
    match input.rank() {
        r if r == batched_rank => Ok((input.clone(), false)),
        r if r == batched_rank - 1 => Ok((input.unsqueeze(0)?, true)),
        r => Err(SeaDlError::RankMismatch {
            expected: vec![batched_rank - 1, batched_rank],
            actual: r,
            operation: operation.to_string(),
        }),
    }
}

/// Fails with [`SeaDlError::RankMismatch`] unless `weight` has rank `expected`.
pub(crate) fn ensure_weight_rank(
    weight: &Tensor,
    expected: usize,
    operation: &str,
) -> Result<(), SeaDlError> {
    if weight.rank() != expected {
        return Err(SeaDlError::RankMismatch {
            expected: vec![expected],
            actual: weight.rank(),
            operation: format!("{} (weight)", operation),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv_output_len() -> Result<(), SeaDlError> {
        assert_eq!(conv_output_len(5, 3, 1, 0, "test")?, 3);
        assert_eq!(conv_output_len(5, 3, 1, 1, "test")?, 5);
        assert_eq!(conv_output_len(7, 3, 2, 0, "test")?, 3);
        assert_eq!(conv_output_len(8, 3, 2, 1, "test")?, 4);
        assert_eq!(conv_output_len(3, 3, 5, 0, "test")?, 1);
        Ok(())
    }

    #[test]
    fn test_conv_output_len_errors() {
        assert!(matches!(
            conv_output_len(2, 3, 1, 0, "test"),
            Err(SeaDlError::EmptyOutput { input: 2, kernel: 3, padding: 0, .. })
        ));
        assert!(matches!(
            conv_output_len(5, 0, 1, 0, "test"),
            Err(SeaDlError::InvalidConfig { .. })
        ));
        assert!(matches!(
            conv_output_len(5, 3, 0, 0, "test"),
            Err(SeaDlError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_conv_output_len_padding_overflow() {
        assert!(matches!(
            conv_output_len(5, 3, 1, usize::MAX / 2 + 1, "test"),
            Err(SeaDlError::InvalidConfig { .. })
        ));
        assert!(matches!(
            conv_output_len(usize::MAX, 3, 1, 1, "test"),
            Err(SeaDlError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_window_indices_reject_positions_beyond_u32() -> Result<(), SeaDlError> {
        let max = u32::MAX as usize;
        assert!(matches!(
            window_indices(1, max + 1, 2, &Device::Cpu),
            Err(SeaDlError::InvalidConfig { .. })
        ));
        // The largest position that still fits is accepted.
        let idx = window_indices(2, max - 1, 2, &Device::Cpu)?;
        assert_eq!(idx.to_vec1::<u32>()?, vec![0, u32::MAX - 1, 1, u32::MAX]);
        Ok(())
    }

    #[test]
    fn test_window_indices_layout() -> Result<(), SeaDlError> {
        let idx = window_indices(3, 2, 2, &Device::Cpu)?;
        assert_eq!(idx.to_vec1::<u32>()?, vec![0, 2, 1, 3, 2, 4]);
        Ok(())
    }
}
