use super::conv1d_strided;
use crate::error::SeaDlError;
use crate::utils::testing::{assert_tensors_close, check_tensor_near};
use candle_core::{DType, Device, Tensor};

fn seq_tensor(dims: &[usize]) -> Result<Tensor, SeaDlError> {
    let n: usize = dims.iter().product();
    // sin() keeps values bounded and non-repeating.
    Ok(Tensor::arange(0f32, n as f32, &Device::Cpu)?
        .affine(0.37, 0.1)?
        .sin()?
        .reshape(dims)?)
}

#[test]
fn test_conv1d_manual_values() -> Result<(), SeaDlError> {
    let input = Tensor::new(&[[[1.0f32, 2.0, 3.0, 4.0, 5.0]]], &Device::Cpu)?;
    let weight = Tensor::new(&[[[1.0f32, 0.0, -1.0]]], &Device::Cpu)?;

    let out = conv1d_strided(&input, &weight, 1, 0)?;
    check_tensor_near(&out, &[1, 1, 3], &[-2.0, -2.0, -2.0], 1e-6);

    // padded: [0, 1, 2, 3, 4, 5, 0], windows start at 0, 2, 4
    let out = conv1d_strided(&input, &weight, 2, 1)?;
    check_tensor_near(&out, &[1, 1, 3], &[-2.0, -2.0, 4.0], 1e-6);
    Ok(())
}

#[test]
fn test_conv1d_multi_channel_sum() -> Result<(), SeaDlError> {
    // Two input channels, kernel of ones: each output sums a 2x2 window.
    let input = Tensor::new(&[[[1.0f32, 2.0, 3.0], [10.0, 20.0, 30.0]]], &Device::Cpu)?;
    let weight = Tensor::ones((1, 2, 2), DType::F32, &Device::Cpu)?;
    let out = conv1d_strided(&input, &weight, 1, 0)?;
    check_tensor_near(&out, &[1, 1, 2], &[33.0, 55.0], 1e-5);
    Ok(())
}

#[test]
fn test_conv1d_matches_native() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[2, 3, 11])?;
    let weight = seq_tensor(&[4, 3, 3])?;
    for (stride, padding) in [(1, 0), (1, 1), (2, 0), (2, 2), (3, 1)] {
        let ours = conv1d_strided(&input, &weight, stride, padding)?;
        let native = input.conv1d(&weight, padding, stride, 1, 1)?;
        assert_tensors_close(&ours, &native, 1e-4);
    }
    Ok(())
}

#[test]
fn test_conv1d_unbatched_input() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[3, 9])?;
    let weight = seq_tensor(&[5, 3, 4])?;
    let out = conv1d_strided(&input, &weight, 2, 1)?;
    assert_eq!(out.dims(), &[5, 4]);
    let batched = conv1d_strided(&input.unsqueeze(0)?, &weight, 2, 1)?;
    assert_tensors_close(&out, &batched.squeeze(0)?, 1e-6);
    Ok(())
}

#[test]
fn test_conv1d_channel_mismatch() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[1, 2, 8])?;
    let weight = seq_tensor(&[4, 3, 3])?;
    let result = conv1d_strided(&input, &weight, 1, 0);
    assert!(matches!(result, Err(SeaDlError::ShapeMismatch { .. })));
    Ok(())
}

#[test]
fn test_conv1d_rank_errors() -> Result<(), SeaDlError> {
    let weight = seq_tensor(&[4, 3, 3])?;
    let input = seq_tensor(&[1, 1, 3, 8])?;
    assert!(matches!(
        conv1d_strided(&input, &weight, 1, 0),
        Err(SeaDlError::RankMismatch { actual: 4, .. })
    ));
    let input = seq_tensor(&[1, 3, 8])?;
    let flat_weight = seq_tensor(&[4, 9])?;
    assert!(matches!(
        conv1d_strided(&input, &flat_weight, 1, 0),
        Err(SeaDlError::RankMismatch { actual: 2, .. })
    ));
    Ok(())
}

#[test]
fn test_conv1d_kernel_larger_than_input() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[1, 1, 2])?;
    let weight = seq_tensor(&[1, 1, 5])?;
    assert!(matches!(
        conv1d_strided(&input, &weight, 1, 0),
        Err(SeaDlError::EmptyOutput { .. })
    ));
    // Padding makes room for the kernel again.
    let out = conv1d_strided(&input, &weight, 1, 2)?;
    assert_eq!(out.dims(), &[1, 1, 2]);
    Ok(())
}

#[test]
fn test_conv1d_zero_stride() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[1, 1, 6])?;
    let weight = seq_tensor(&[1, 1, 2])?;
    assert!(matches!(
        conv1d_strided(&input, &weight, 0, 0),
        Err(SeaDlError::InvalidConfig { .. })
    ));
    Ok(())
}

#[test]
fn test_conv1d_gradients_flow() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[2, 2, 6])?;
    let weight = candle_core::Var::from_tensor(&seq_tensor(&[3, 2, 3])?)?;
    let out = conv1d_strided(&input, weight.as_tensor(), 1, 1)?;
    let grads = out.sum_all()?.backward()?;
    let grad_w = grads.get(weight.as_tensor()).expect("weight gradient");
    assert_eq!(grad_w.dims(), &[3, 2, 3]);
    Ok(())
}
