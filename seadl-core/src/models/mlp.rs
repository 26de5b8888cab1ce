use crate::device::resolve_device;
use crate::error::SeaDlError;
use crate::nn::{Flatten, Linear, LinearConfig, Module, Parameter, ReLU};
use candle_core::{DType, Device, Tensor};
use log::debug;
use rand::Rng;

/// Sizes and placement of a [`SimpleMLP`]. Defaults fit flattened 28x28 images
/// and 10 classes.
#[derive(Debug, Clone)]
pub struct SimpleMlpConfig {
    pub in_features: usize,
    pub hidden_features: usize,
    pub out_features: usize,
    pub dtype: DType,
    pub device: Option<Device>,
}

impl Default for SimpleMlpConfig {
    fn default() -> Self {
        SimpleMlpConfig {
            in_features: 28 * 28,
            hidden_features: 100,
            out_features: 10,
            dtype: DType::F32,
            device: None,
        }
    }
}

impl SimpleMlpConfig {
    pub fn with_features(
        mut self,
        in_features: usize,
        hidden_features: usize,
        out_features: usize,
    ) -> Self {
        self.in_features = in_features;
        self.hidden_features = hidden_features;
        self.out_features = out_features;
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

/// Multi-layer perceptron with one hidden layer:
/// Flatten(1, -1) -> Linear -> ReLU -> Linear.
///
/// Any input whose dimensions after the first multiply to `in_features` is
/// accepted, e.g. `[B, 1, 28, 28]` images.
#[derive(Debug)]
pub struct SimpleMLP {
    flatten: Flatten,
    linear1: Linear,
    relu: ReLU,
    linear2: Linear,
}

impl SimpleMLP {
    pub fn new(config: SimpleMlpConfig) -> Result<Self, SeaDlError> {
        Self::new_with_rng(config, &mut rand::thread_rng())
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        config: SimpleMlpConfig,
        rng: &mut R,
    ) -> Result<Self, SeaDlError> {
        // Resolve once so both layers land on the same device.
        let device = resolve_device(config.device.as_ref());
        let linear_config = LinearConfig::default()
            .with_dtype(config.dtype)
            .with_device(device);
        let linear1 = Linear::new_with_rng(
            config.in_features,
            config.hidden_features,
            linear_config.clone(),
            rng,
        )?;
        let linear2 = Linear::new_with_rng(
            config.hidden_features,
            config.out_features,
            linear_config,
            rng,
        )?;
        debug!(
            "SimpleMLP: {} -> {} -> {}",
            config.in_features, config.hidden_features, config.out_features
        );
        Ok(SimpleMLP {
            flatten: Flatten::new(1, -1),
            linear1,
            relu: ReLU::new(),
            linear2,
        })
    }

    pub fn linear1(&self) -> &Linear {
        &self.linear1
    }

    pub fn linear2(&self) -> &Linear {
        &self.linear2
    }
}

impl Module for SimpleMLP {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        let x = self.flatten.forward(input)?;
        let x = self.relu.forward(&self.linear1.forward(&x)?)?;
        self.linear2.forward(&x)
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        let mut params = Vec::new();
        for (prefix, layer) in [("linear1", &self.linear1), ("linear2", &self.linear2)] {
            for (name, p) in layer.named_parameters() {
                params.push((format!("{}.{}", prefix, name), p));
            }
        }
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter)> {
        let mut params = Vec::new();
        for (prefix, layer) in [("linear1", &mut self.linear1), ("linear2", &mut self.linear2)] {
            for (name, p) in layer.named_parameters_mut() {
                params.push((format!("{}.{}", prefix, name), p));
            }
        }
        params
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("flatten".to_string(), &self.flatten as &dyn Module),
            ("linear1".to_string(), &self.linear1 as &dyn Module),
            ("relu".to_string(), &self.relu as &dyn Module),
            ("linear2".to_string(), &self.linear2 as &dyn Module),
        ]
    }
}
