//! # seadl-core
//!
//! Neural network layers (MLP, convolution, activation modules) on top of
//! candle tensors. Tensor storage, autograd and device dispatch belong to
//! candle; this crate provides the functional kernels ([`ops`]), the
//! [`Module`] composition pattern with named [`Parameter`]s ([`nn`]),
//! containers ([`model`]) and a small reference model ([`models`]).

pub mod device;
pub mod error;
pub mod model;
pub mod models;
pub mod nn;
pub mod ops;
pub mod utils;

pub use error::SeaDlError;
pub use model::Sequential;
pub use models::{SimpleMLP, SimpleMlpConfig};
pub use nn::{Module, Parameter};

// Re-export the tensor engine types that appear in public signatures.
pub use candle_core::{DType, Device, Tensor};
