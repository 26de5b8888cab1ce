use crate::error::SeaDlError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::ops::view::flatten_op;
use candle_core::Tensor;

/// Flattens a contiguous range of dimensions into one.
///
/// Defaults to `start_dim = 1, end_dim = -1`, which keeps the batch axis and
/// merges everything else.
#[derive(Debug, Clone)]
pub struct Flatten {
    start_dim: isize,
    end_dim: isize,
}

impl Flatten {
    pub fn new(start_dim: isize, end_dim: isize) -> Self {
        Flatten { start_dim, end_dim }
    }

    pub fn start_dim(&self) -> isize {
        self.start_dim
    }

    pub fn end_dim(&self) -> isize {
        self.end_dim
    }
}

impl Default for Flatten {
    fn default() -> Self {
        Flatten::new(1, -1)
    }
}

impl Module for Flatten {
    fn forward(&self, input: &Tensor) -> Result<Tensor, SeaDlError> {
        flatten_op(input, self.start_dim, self.end_dim)
    }

    fn named_parameters(&self) -> Vec<(String, &Parameter)> {
        Vec::new()
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter)> {
        Vec::new()
    }

    fn extra_repr(&self) -> String {
        format!("start_dim={}, end_dim={}", self.start_dim, self.end_dim)
    }
}
