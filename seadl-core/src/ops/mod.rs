// src/ops/mod.rs
//! # Functional kernels
//!
//! Stateless operations the layers in [`crate::nn`] are built from. Each one
//! validates its inputs and then delegates the arithmetic to candle.

pub mod activation;
pub mod conv;
pub mod linalg;
pub mod utils;
pub mod view;

pub use activation::relu_op;
pub use conv::{conv1d_strided, conv2d_strided, conv_output_len};
pub use linalg::linear_op;
pub use utils::{pair_value, IntoPair};
pub use view::flatten_op;
