use super::relu_op;
use crate::error::SeaDlError;
use candle_core::{DType, Device, Tensor};

#[test]
fn test_relu_forward() -> Result<(), SeaDlError> {
    let input = Tensor::new(&[[-1.0f32, 0.0, 2.5], [3.0, -0.5, 1.0]], &Device::Cpu)?;
    let output = relu_op(&input)?;
    assert_eq!(output.dims(), &[2, 3]);
    assert_eq!(
        output.to_vec2::<f32>()?,
        vec![vec![0.0, 0.0, 2.5], vec![3.0, 0.0, 1.0]]
    );
    Ok(())
}

#[test]
fn test_relu_keeps_dtype() -> Result<(), SeaDlError> {
    let input = Tensor::new(&[-2.0f64, 4.0], &Device::Cpu)?;
    let output = relu_op(&input)?;
    assert_eq!(output.dtype(), DType::F64);
    assert_eq!(output.to_vec1::<f64>()?, vec![0.0, 4.0]);
    Ok(())
}
