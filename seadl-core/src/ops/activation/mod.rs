// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! Non-linear activation functions applied element-wise.
//!
//! ## Currently Implemented:
//! - [`relu_op`]: Rectified Linear Unit.

pub mod relu;

pub use relu::relu_op;
