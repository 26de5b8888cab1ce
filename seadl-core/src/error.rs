use candle_core::DeviceLocation;
use thiserror::Error;

/// Custom error type for the SeaDL layer library.
///
/// Failures raised by the tensor engine itself are wrapped in [`SeaDlError::Candle`];
/// the remaining variants are raised eagerly by layer and kernel validation,
/// before any tensor work is scheduled.
#[derive(Error, Debug)]
pub enum SeaDlError {
    #[error("Tensor engine error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Rank mismatch in {operation}: expected one of {expected:?}, got {actual}")]
    RankMismatch {
        expected: Vec<usize>,
        actual: usize,
        operation: String,
    },

    #[error("Invalid configuration for {operation}: {message}")]
    InvalidConfig { operation: String, message: String },

    #[error(
        "Empty output in {operation}: input size {input} with padding {padding} is smaller than kernel size {kernel}"
    )]
    EmptyOutput {
        operation: String,
        input: usize,
        kernel: usize,
        padding: usize,
    },

    #[error("Invalid dimension {dim} for a tensor of rank {rank} in {operation}")]
    InvalidDimension {
        dim: isize,
        rank: usize,
        operation: String,
    },

    #[error("Device mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DeviceMismatch {
        expected: DeviceLocation,
        actual: DeviceLocation,
        operation: String,
    },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

impl SeaDlError {
    /// Shorthand for [`SeaDlError::InvalidConfig`].
    pub(crate) fn invalid_config(operation: &str, message: impl Into<String>) -> Self {
        SeaDlError::InvalidConfig {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
