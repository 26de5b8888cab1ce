use crate::error::SeaDlError;
use candle_core::Tensor;
use log::trace;

/// Applies the Rectified Linear Unit element-wise: `ReLU(x) = max(0, x)`.
///
/// Works for tensors of any shape and float dtype. The result is a new tensor;
/// gradients flow through it when `input` is tracked by the engine.
pub fn relu_op(input: &Tensor) -> Result<Tensor, SeaDlError> {
    trace!("relu_op: input dims {:?}", input.dims());
    Ok(input.relu()?)
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
