//! Convolution layers: the torch `Conv1d` / `Conv2d` API with dilation 1 and
//! groups 1, computed by the strided kernels in [`crate::ops::conv`].

use crate::device::resolve_device;
use crate::error::SeaDlError;
use crate::nn::init;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::conv::{conv1d_strided, conv2d_strided};
use crate::ops::utils::IntoPair;
use candle_core::{DType, Device, Tensor};
use log::debug;
use rand::Rng;

/// Construction options for [`Conv1d`].
#[derive(Debug, Clone)]
pub struct Conv1dConfig {
    pub stride: usize,
    /// Zeros added on both ends of the length axis.
    pub padding: usize,
    pub bias: bool,
    pub dtype: DType,
    /// `None` selects [`default_device`](crate::device::default_device).
    pub device: Option<Device>,
}

impl Default for Conv1dConfig {
    fn default() -> Self {
        Conv1dConfig {
            stride: 1,
            padding: 0,
            bias: true,
            dtype: DType::F32,
            device: None,
        }
    }
}

impl Conv1dConfig {
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

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

/// Construction options for [`Conv2d`]. Stride and padding are `(height, width)`.
#[derive(Debug, Clone)]
pub struct Conv2dConfig {
    pub stride: (usize, usize),
    pub padding: (usize, usize),
    pub bias: bool,
    pub dtype: DType,
    pub device: Option<Device>,
}

impl Default for Conv2dConfig {
    fn default() -> Self {
        Conv2dConfig {
            stride: (1, 1),
            padding: (0, 0),
            bias: true,
            dtype: DType::F32,
            device: None,
        }
    }
}

impl Conv2dConfig {
    pub fn with_stride(mut self, stride: impl IntoPair) -> Self {
        self.stride = stride.into_pair();
        self
    }

    pub fn with_padding(mut self, padding: impl IntoPair) -> Self {
        self.padding = padding.into_pair();
        self
    }

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

fn ensure_positive(values: &[(&str, usize)], operation: &str) -> Result<(), SeaDlError> {
    for (name, value) in values {
        if *value == 0 {
            return Err(SeaDlError::invalid_config(
                operation,
                format!("{} must be > 0", name),
            ));
        }
    }
    Ok(())
}

/// Product of the weight dimensions that feed one output value.
fn checked_fan_in(factors: &[usize], operation: &str) -> Result<usize, SeaDlError> {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or_else(|| {
            SeaDlError::invalid_config(operation, format!("fan-in {:?} overflows usize", factors))
        })
}

fn bias_parameter(
    bias: Option<Tensor>,
    out_channels: usize,
    operation: &str,
) -> Result<Option<Parameter>, SeaDlError> {
    match bias {
        Some(b) if b.dims() != [out_channels] => Err(SeaDlError::ShapeMismatch {
            expected: vec![out_channels],
            actual: b.dims().to_vec(),
            operation: format!("{} (bias)", operation),
        }),
        Some(b) => Ok(Some(Parameter::new(b, Some("bias".to_string()))?)),
        None => Ok(None),
    }
}

/// Applies a 1-D convolution over an input of shape `[B, C_in, L]` (or `[C_in, L]`).
#[derive(Debug)]
pub struct Conv1d {
    weight: Parameter,
    bias: Option<Parameter>,
    stride: usize,
    padding: usize,
}

impl Conv1d {
    /// Creates a Conv1d layer with weight `[out_channels, in_channels, kernel_size]`.
    ///
    /// Weight and bias are drawn from `U(-sqrt(k), sqrt(k))` with
    /// `k = 1 / (in_channels * kernel_size)`.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        config: Conv1dConfig,
    ) -> Result<Self, SeaDlError> {
        Self::new_with_rng(
            in_channels,
            out_channels,
            kernel_size,
            config,
            &mut rand::thread_rng(),
        )
    }

    /// Same as [`Conv1d::new`], sampling the initial values from `rng`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        config: Conv1dConfig,
        rng: &mut R,
    ) -> Result<Self, SeaDlError> {
        ensure_positive(
            &[
                ("in_channels", in_channels),
                ("out_channels", out_channels),
                ("kernel_size", kernel_size),
                ("stride", config.stride),
            ],
            "Conv1d",
        )?;
        let device = resolve_device(config.device.as_ref());
        let fan_in = checked_fan_in(&[in_channels, kernel_size], "Conv1d")?;
        let weight = init::fan_in_uniform(
            &[out_channels, in_channels, kernel_size],
            fan_in,
            config.dtype,
            &device,
            rng,
        )?;
        let bias = if config.bias {
            Some(init::fan_in_uniform(
                &[out_channels],
                fan_in,
                config.dtype,
                &device,
                rng,
            )?)
        } else {
            None
        };
        debug!(
            "Conv1d: weight [{}, {}, {}], stride={}, padding={}, bias={}, init bound={:.6}, device={:?}",
            out_channels,
            in_channels,
            kernel_size,
            config.stride,
            config.padding,
            config.bias,
            init::fan_in_bound(fan_in)?,
            device.location()
        );
        Self::from_parts(weight, bias, config.stride, config.padding)
    }

    /// Builds a layer around an existing `[C_out, C_in, K]` weight.
    pub fn from_parts(
        weight: Tensor,
        bias: Option<Tensor>,
        stride: usize,
        padding: usize,
    ) -> Result<Self, SeaDlError> {
        if weight.rank() != 3 {
            return Err(SeaDlError::RankMismatch {
                expected: vec![3],
                actual: weight.rank(),
                operation: "Conv1d (weight)".to_string(),
            });
        }
        ensure_positive(&[("stride", stride)], "Conv1d")?;
        let out_channels = weight.dims()[0];
        Ok(Conv1d {
            bias: bias_parameter(bias, out_channels, "Conv1d")?,
            weight: Parameter::new(weight, Some("weight".to_string()))?,
            stride,
            padding,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_channels(&self) -> usize {
        self.weight.dims()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.dims()[0]
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.dims()[2]
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn device(&self) -> &Device {
        self.weight.device()
    }
}

impl Module for Conv1d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        let out = conv1d_strided(input, &self.weight, self.stride, self.padding)?;
        match &self.bias {
            // [C_out, 1] lines up with the channel axis of batched and unbatched outputs.
            Some(bias) => Ok(out.broadcast_add(&bias.reshape((self.out_channels(), 1))?)?),
            None => Ok(out),
        }
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
            "Weight shape: {:?}, Kernel Size: {}, Stride: {}, Padding: {}, Parameters: {}",
            self.weight.dims(),
            self.kernel_size(),
            self.stride,
            self.padding,
            self.weight.numel()
        )
    }
}

/// Applies a 2-D convolution over an input of shape `[B, C_in, H, W]` (or `[C_in, H, W]`).
#[derive(Debug)]
pub struct Conv2d {
    weight: Parameter,
    bias: Option<Parameter>,
    stride: (usize, usize),
    padding: (usize, usize),
}

impl Conv2d {
    /// Creates a Conv2d layer with weight `[out_channels, in_channels, KH, KW]`.
    ///
    /// Weight and bias are drawn from `U(-sqrt(k), sqrt(k))` with
    /// `k = 1 / (in_channels * KH * KW)`.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: impl IntoPair,
        config: Conv2dConfig,
    ) -> Result<Self, SeaDlError> {
        Self::new_with_rng(
            in_channels,
            out_channels,
            kernel_size,
            config,
            &mut rand::thread_rng(),
        )
    }

    /// Same as [`Conv2d::new`], sampling the initial values from `rng`.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: impl IntoPair,
        config: Conv2dConfig,
        rng: &mut R,
    ) -> Result<Self, SeaDlError> {
        let (kh, kw) = kernel_size.into_pair();
        ensure_positive(
            &[
                ("in_channels", in_channels),
                ("out_channels", out_channels),
                ("kernel height", kh),
                ("kernel width", kw),
                ("stride height", config.stride.0),
                ("stride width", config.stride.1),
            ],
            "Conv2d",
        )?;
        let device = resolve_device(config.device.as_ref());
        let fan_in = checked_fan_in(&[in_channels, kh, kw], "Conv2d")?;
        let weight = init::fan_in_uniform(
            &[out_channels, in_channels, kh, kw],
            fan_in,
            config.dtype,
            &device,
            rng,
        )?;
        let bias = if config.bias {
            Some(init::fan_in_uniform(
                &[out_channels],
                fan_in,
                config.dtype,
                &device,
                rng,
            )?)
        } else {
            None
        };
        debug!(
            "Conv2d: weight [{}, {}, {}, {}], stride={:?}, padding={:?}, bias={}, init bound={:.6}, device={:?}",
            out_channels,
            in_channels,
            kh,
            kw,
            config.stride,
            config.padding,
            config.bias,
            init::fan_in_bound(fan_in)?,
            device.location()
        );
        Self::from_parts(weight, bias, config.stride, config.padding)
    }

    /// Builds a layer around an existing `[C_out, C_in, KH, KW]` weight.
    pub fn from_parts(
        weight: Tensor,
        bias: Option<Tensor>,
        stride: impl IntoPair,
        padding: impl IntoPair,
    ) -> Result<Self, SeaDlError> {
        if weight.rank() != 4 {
            return Err(SeaDlError::RankMismatch {
                expected: vec![4],
                actual: weight.rank(),
                operation: "Conv2d (weight)".to_string(),
            });
        }
        let stride = stride.into_pair();
        ensure_positive(
            &[("stride height", stride.0), ("stride width", stride.1)],
            "Conv2d",
        )?;
        let out_channels = weight.dims()[0];
        Ok(Conv2d {
            bias: bias_parameter(bias, out_channels, "Conv2d")?,
            weight: Parameter::new(weight, Some("weight".to_string()))?,
            stride,
            padding: padding.into_pair(),
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_channels(&self) -> usize {
        self.weight.dims()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.dims()[0]
    }

    /// `(KH, KW)`
    pub fn kernel_size(&self) -> (usize, usize) {
        let dims = self.weight.dims();
        (dims[2], dims[3])
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub fn padding(&self) -> (usize, usize) {
        self.padding
    }

    pub fn device(&self) -> &Device {
        self.weight.device()
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        let out = conv2d_strided(input, &self.weight, self.stride, self.padding)?;
        match &self.bias {
            Some(bias) => Ok(out.broadcast_add(&bias.reshape((self.out_channels(), 1, 1))?)?),
            None => Ok(out),
        }
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
            "Weight shape: {:?}, Kernel Size: {:?}, Stride: {:?}, Padding: {:?}, Parameters: {}",
            self.weight.dims(),
            self.kernel_size(),
            self.stride,
            self.padding,
            self.weight.numel()
        )
    }
}

#[cfg(test)]
#[path = "conv_test.rs"]
mod tests;
