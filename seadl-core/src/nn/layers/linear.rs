use crate::device::resolve_device;
use crate::error::SeaDlError;
use crate::nn::init;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::linalg::linear_op;
use candle_core::{DType, Device, Tensor};
use log::debug;
use rand::Rng;

/// Construction options for [`Linear`].
#[derive(Debug, Clone)]
pub struct LinearConfig {
    /// Learn an additive bias.
    pub bias: bool,
    pub dtype: DType,
    /// `None` selects [`default_device`](crate::device::default_device).
    pub device: Option<Device>,
}

impl Default for LinearConfig {
    fn default() -> Self {
        LinearConfig {
            bias: true,
            dtype: DType::F32,
            device: None,
        }
    }
}

impl LinearConfig {
    pub fn with_bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }
}

/// Applies a linear transformation to the incoming data: `y = x W^T + b`.
#[derive(Debug)]
pub struct Linear {
    weight: Parameter,
    bias: Option<Parameter>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer with weight `[out_features, in_features]` and
    /// bias `[out_features]`, both drawn from `U(-1/sqrt(in), 1/sqrt(in))`.
    pub fn new(
        in_features: usize,
        out_features: usize,
        config: LinearConfig,
    ) -> Result<Self, SeaDlError> {
        Self::new_with_rng(in_features, out_features, config, &mut rand::thread_rng())
    }

    /// Same as [`Linear::new`], sampling the initial values from `rng`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        config: LinearConfig,
        rng: &mut R,
    ) -> Result<Self, SeaDlError> {
        if in_features == 0 || out_features == 0 {
            return Err(SeaDlError::invalid_config(
                "Linear",
                format!(
                    "in_features ({}) and out_features ({}) must be > 0",
                    in_features, out_features
                ),
            ));
        }
        let device = resolve_device(config.device.as_ref());
        let weight = init::fan_in_uniform(
            &[out_features, in_features],
            in_features,
            config.dtype,
            &device,
            rng,
        )?;
        let bias = if config.bias {
            Some(init::fan_in_uniform(
                &[out_features],
                in_features,
                config.dtype,
                &device,
                rng,
            )?)
        } else {
            None
        };
        debug!(
            "Linear: in_features={}, out_features={}, bias={}, dtype={:?}, device={:?}",
            in_features,
            out_features,
            config.bias,
            config.dtype,
            device.location()
        );
        Self::from_parts(weight, bias)
    }

    /// Builds a layer around existing tensors.
    ///
    /// # Errors
    /// [`SeaDlError::RankMismatch`] / [`SeaDlError::ShapeMismatch`] if `weight`
    /// is not 2-D or `bias` is not `[out_features]`.
    pub fn from_parts(weight: Tensor, bias: Option<Tensor>) -> Result<Self, SeaDlError> {
        if weight.rank() != 2 {
            return Err(SeaDlError::RankMismatch {
                expected: vec![2],
                actual: weight.rank(),
                operation: "Linear (weight)".to_string(),
            });
        }
        let (out_features, in_features) = weight.dims2()?;
        if let Some(b) = &bias {
            if b.dims() != [out_features] {
                return Err(SeaDlError::ShapeMismatch {
                    expected: vec![out_features],
                    actual: b.dims().to_vec(),
                    operation: "Linear (bias)".to_string(),
                });
            }
        }
        Ok(Linear {
            weight: Parameter::new(weight, Some("weight".to_string()))?,
            bias: bias
                .map(|b| Parameter::new(b, Some("bias".to_string())))
                .transpose()?,
            in_features,
            out_features,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        linear_op(input, &self.weight, self.bias.as_deref())
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut params = vec![("weight".to_string(), &self.weight)];
        if let Some(bias) = &self.bias {
            params.push(("bias".to_string(), bias));
        }
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter)> {
        let mut params = vec![("weight".to_string(), &mut self.weight)];
        if let Some(bias) = self.bias.as_mut() {
            params.push(("bias".to_string(), bias));
        }
        params
    }

    fn extra_repr(&self) -> String {
        format!(
            "in_features={}, out_features={}, bias={}",
            self.in_features,
            self.out_features,
            self.bias.is_some()
        )
    }
}
