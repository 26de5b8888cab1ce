// src/nn/mod.rs
// Neural network layers, the Module trait and parameter handling.

pub mod init;
pub mod layers;
pub mod module;
pub mod parameter;

// Re-export common items
pub use layers::{
    Conv1d, Conv1dConfig, Conv2d, Conv2dConfig, Flatten, Linear, LinearConfig, ReLU,
};
pub use module::{describe, modules, Module};
pub use parameter::Parameter;
