use crate::error::SeaDlError;
use candle_core::{DType, Device, Storage, Tensor, Var};
use std::fmt;
use std::ops::Deref;

/// A learnable tensor registered by a [`Module`](crate::nn::Module).
///
/// Backed by a [`candle_core::Var`], so the engine tracks gradients for it and
/// an optimizer can overwrite its value in place with [`Parameter::set`].
/// Cloning is shallow: clones share the same storage.
#[derive(Clone)]
pub struct Parameter {
    var: Var,
    name: Option<String>,
}

impl Parameter {
    /// Creates a new Parameter from a Tensor, with an optional name.
    pub fn new(tensor: Tensor, name: Option<String>) -> Result<Self, SeaDlError> {
        let var = Var::from_tensor(&tensor)?;
        Ok(Parameter { var, name })
    }

    /// Creates a new Parameter without a name.
    pub fn new_unnamed(tensor: Tensor) -> Result<Self, SeaDlError> {
        Self::new(tensor, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The underlying engine variable, e.g. to hand to an optimizer.
    pub fn var(&self) -> &Var {
        &self.var
    }

    pub fn tensor(&self) -> &Tensor {
        self.var.as_tensor()
    }

    /// Number of scalar values held by the parameter.
    pub fn numel(&self) -> usize {
        self.var.elem_count()
    }

    /// Overwrites the parameter value in place.
    ///
    /// `value` may share storage with the parameter (its own tensor, a clone
    /// or a view of it); it is copied before the write in that case.
    ///
    /// # Errors
    /// [`SeaDlError::ShapeMismatch`] if `value` does not have the parameter's shape.
    pub fn set(&self, value: &Tensor) -> Result<(), SeaDlError> {
        if value.dims() != self.var.dims() {
            return Err(SeaDlError::ShapeMismatch {
                expected: self.var.dims().to_vec(),
                actual: value.dims().to_vec(),
                operation: format!("Parameter::set({})", self.name().unwrap_or("unnamed")),
            });
        }
        let mut value = value
            .to_device(self.var.device())?
            .to_dtype(self.var.dtype())?;
        // `Tensor::same_storage` is crate-private in candle; compare the
        // addresses of the shared storages through the public accessor.
        let value_storage: *const Storage = {
            let (guard, _) = value.storage_and_layout();
            let ptr: *const Storage = &*guard;
            ptr
        };
        let var_storage: *const Storage = {
            let (guard, _) = self.var.as_tensor().storage_and_layout();
            let ptr: *const Storage = &*guard;
            ptr
        };
        let same_storage = std::ptr::eq(value_storage, var_storage);
        if same_storage {
            value = value.copy()?;
        }
        self.var.set(&value)?;
        Ok(())
    }

    /// Moves the parameter to `device`. The parameter becomes a new variable;
    /// clones taken before the move keep pointing at the old storage.
    pub fn to_device(&mut self, device: &Device) -> Result<(), SeaDlError> {
        if self.var.device().same_device(device) {
            return Ok(());
        }
        self.var = Var::from_tensor(&self.var.to_device(device)?)?;
        Ok(())
    }

    /// Casts the parameter to `dtype`. Same caveat as [`Parameter::to_device`].
    pub fn to_dtype(&mut self, dtype: DType) -> Result<(), SeaDlError> {
        if self.var.dtype() == dtype {
            return Ok(());
        }
        self.var = Var::from_tensor(&self.var.to_dtype(dtype)?)?;
        Ok(())
    }
}

impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        self.var.as_tensor()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parameter(name={:?}, shape={:?}, dtype={:?}, device={:?})",
            self.name,
            self.var.dims(),
            self.var.dtype(),
            self.var.device().location()
        )
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
