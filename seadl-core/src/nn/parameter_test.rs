use super::Parameter;
use crate::error::SeaDlError;
use candle_core::{DType, Device, Tensor};

#[test]
fn test_parameter_creation_and_name() -> Result<(), SeaDlError> {
    let t = Tensor::zeros((2, 3), DType::F32, &Device::Cpu)?;
    let named = Parameter::new(t.clone(), Some("weight".to_string()))?;
    assert_eq!(named.name(), Some("weight"));
    assert_eq!(named.dims(), &[2, 3]);
    assert_eq!(named.numel(), 6);

    let unnamed = Parameter::new_unnamed(t)?;
    assert_eq!(unnamed.name(), None);
    Ok(())
}

#[test]
fn test_parameter_set_updates_value() -> Result<(), SeaDlError> {
    let param = Parameter::new_unnamed(Tensor::zeros(3, DType::F32, &Device::Cpu)?)?;
    let alias = param.clone();
    param.set(&Tensor::new(&[1.0f32, 2.0, 3.0], &Device::Cpu)?)?;
    assert_eq!(param.to_vec1::<f32>()?, vec![1.0, 2.0, 3.0]);
    // Clones share storage.
    assert_eq!(alias.to_vec1::<f32>()?, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn test_parameter_set_casts_dtype() -> Result<(), SeaDlError> {
    let param = Parameter::new_unnamed(Tensor::zeros(2, DType::F32, &Device::Cpu)?)?;
    param.set(&Tensor::new(&[0.5f64, -0.5], &Device::Cpu)?)?;
    assert_eq!(param.dtype(), DType::F32);
    assert_eq!(param.to_vec1::<f32>()?, vec![0.5, -0.5]);
    Ok(())
}

#[test]
fn test_parameter_set_shape_mismatch() -> Result<(), SeaDlError> {
    let param = Parameter::new(
        Tensor::zeros((2, 2), DType::F32, &Device::Cpu)?,
        Some("bias".to_string()),
    )?;
    let result = param.set(&Tensor::zeros(4, DType::F32, &Device::Cpu)?);
    assert!(matches!(result, Err(SeaDlError::ShapeMismatch { .. })));
    Ok(())
}

#[test]
fn test_parameter_to_dtype() -> Result<(), SeaDlError> {
    let mut param = Parameter::new_unnamed(Tensor::ones(2, DType::F32, &Device::Cpu)?)?;
    param.to_dtype(DType::F64)?;
    assert_eq!(param.dtype(), DType::F64);
    assert_eq!(param.to_vec1::<f64>()?, vec![1.0, 1.0]);
    param.to_device(&Device::Cpu)?;
    assert!(param.device().is_cpu());
    Ok(())
}

#[test]
fn test_parameter_is_tracked_by_autograd() -> Result<(), SeaDlError> {
    let param = Parameter::new_unnamed(Tensor::new(&[2.0f32, 3.0], &Device::Cpu)?)?;
    let loss = param.sqr()?.sum_all()?;
    let grads = loss.backward()?;
    let grad = grads.get(param.tensor()).expect("parameter gradient");
    assert_eq!(grad.to_vec1::<f32>()?, vec![4.0, 6.0]);
    Ok(())
}

#[test]
fn test_parameter_set_from_own_storage() -> Result<(), SeaDlError> {
    let p = Parameter::new_unnamed(Tensor::new(&[[1.0f32, 2.0], [3.0, 4.0]], &Device::Cpu)?)?;
    p.set(p.tensor())?;
    assert_eq!(p.to_vec2::<f32>()?, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

    // A view of the parameter is read in full before the write.
    let transposed = p.tensor().t()?;
    p.set(&transposed)?;
    assert_eq!(p.to_vec2::<f32>()?, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    Ok(())
}
