use super::conv2d_strided;
use crate::error::SeaDlError;
use crate::utils::testing::{assert_tensors_close, check_tensor_near};
use candle_core::{DType, Device, Tensor, Var};

fn seq_tensor(dims: &[usize]) -> Result<Tensor, SeaDlError> {
    let n: usize = dims.iter().product();
    Ok(Tensor::arange(0f32, n as f32, &Device::Cpu)?
        .affine(0.29, -0.4)?
        .sin()?
        .reshape(dims)?)
}

#[test]
fn test_conv2d_manual_values() -> Result<(), SeaDlError> {
    // 3x3 input 1..9, 2x2 kernel [[1, 0], [0, 1]] picks the main diagonal pair.
    let input = Tensor::arange(1f32, 10.0, &Device::Cpu)?.reshape((1, 1, 3, 3))?;
    let weight = Tensor::new(&[[[[1.0f32, 0.0], [0.0, 1.0]]]], &Device::Cpu)?;
    let out = conv2d_strided(&input, &weight, 1, 0)?;
    check_tensor_near(&out, &[1, 1, 2, 2], &[6.0, 8.0, 12.0, 14.0], 1e-6);
    Ok(())
}

#[test]
fn test_conv2d_asymmetric_stride_and_padding() -> Result<(), SeaDlError> {
    // Kernel of ones sums each window.
    let input = Tensor::arange(1f32, 13.0, &Device::Cpu)?.reshape((1, 1, 3, 4))?;
    let weight = Tensor::ones((1, 1, 2, 2), DType::F32, &Device::Cpu)?;
    // padding (0, 1): each row becomes [0, a, b, c, d, 0]; stride (1, 2): columns 0, 2, 4.
    let out = conv2d_strided(&input, &weight, (1, 2), (0, 1))?;
    // rows 1-2: [0,1,2,3,4,0] + [0,5,6,7,8,0] ; rows 2-3: [0,5,..] + [0,9,10,11,12,0]
    check_tensor_near(
        &out,
        &[1, 1, 2, 3],
        &[6.0, 18.0, 12.0, 14.0, 34.0, 20.0],
        1e-5,
    );
    Ok(())
}

#[test]
fn test_conv2d_matches_native() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[2, 3, 9, 8])?;
    let weight = seq_tensor(&[5, 3, 3, 3])?;
    for (stride, padding) in [(1, 0), (1, 1), (2, 0), (2, 1), (3, 2)] {
        let ours = conv2d_strided(&input, &weight, stride, padding)?;
        let native = input.conv2d(&weight, padding, stride, 1, 1)?;
        assert_tensors_close(&ours, &native, 1e-4);
    }
    Ok(())
}

#[test]
fn test_conv2d_rectangular_kernel() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[1, 2, 7, 6])?;
    let weight = seq_tensor(&[4, 2, 3, 1])?;
    let out = conv2d_strided(&input, &weight, (2, 1), [1, 0])?;
    // OH = (7 + 2 - 3) / 2 + 1 = 4, OW = (6 - 1) / 1 + 1 = 6
    assert_eq!(out.dims(), &[1, 4, 4, 6]);
    Ok(())
}

#[test]
fn test_conv2d_output_channels_follow_weight() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[3, 4, 5, 5])?;
    for c_out in [1, 2, 7] {
        let weight = seq_tensor(&[c_out, 4, 3, 3])?;
        let out = conv2d_strided(&input, &weight, 1, 1)?;
        assert_eq!(out.dims(), &[3, c_out, 5, 5]);
    }
    Ok(())
}

#[test]
fn test_conv2d_unbatched_input() -> Result<(), SeaDlError> {
    let input = seq_tensor(&[2, 6, 6])?;
    let weight = seq_tensor(&[3, 2, 3, 3])?;
    let out = conv2d_strided(&input, &weight, 2, 1)?;
    assert_eq!(out.dims(), &[3, 3, 3]);
    Ok(())
}

#[test]
fn test_conv2d_errors() -> Result<(), SeaDlError> {
    let weight = seq_tensor(&[3, 2, 3, 3])?;
    let wrong_channels = seq_tensor(&[1, 4, 6, 6])?;
    assert!(matches!(
        conv2d_strided(&wrong_channels, &weight, 1, 0),
        Err(SeaDlError::ShapeMismatch { .. })
    ));
    let too_small = seq_tensor(&[1, 2, 2, 6])?;
    assert!(matches!(
        conv2d_strided(&too_small, &weight, 1, 0),
        Err(SeaDlError::EmptyOutput { .. })
    ));
    let rank5 = seq_tensor(&[1, 1, 2, 6, 6])?;
    assert!(matches!(
        conv2d_strided(&rank5, &weight, 1, 0),
        Err(SeaDlError::RankMismatch { actual: 5, .. })
    ));
    let ok_input = seq_tensor(&[1, 2, 6, 6])?;
    assert!(matches!(
        conv2d_strided(&ok_input, &weight, (1, 0), 0),
        Err(SeaDlError::InvalidConfig { .. })
    ));
    Ok(())
}

#[test]
fn test_conv2d_gradients_flow() -> Result<(), SeaDlError> {
    let input = Var::from_tensor(&seq_tensor(&[1, 2, 5, 5])?)?;
    let weight = Var::from_tensor(&seq_tensor(&[3, 2, 3, 3])?)?;
    let out = conv2d_strided(input.as_tensor(), weight.as_tensor(), 2, 1)?;
    let grads = out.sum_all()?.backward()?;
    let grad_w = grads.get(weight.as_tensor()).expect("weight gradient");
    let grad_x = grads.get(input.as_tensor()).expect("input gradient");
    assert_eq!(grad_w.dims(), &[3, 2, 3, 3]);
    assert_eq!(grad_x.dims(), &[1, 2, 5, 5]);
    Ok(())
}
