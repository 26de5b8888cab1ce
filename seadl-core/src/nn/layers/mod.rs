// src/nn/layers/mod.rs

pub mod conv;
pub mod flatten;
pub mod linear;
pub mod relu;

// Re-export key layer structs
pub use conv::{Conv1d, Conv1dConfig, Conv2d, Conv2dConfig};
pub use flatten::Flatten;
pub use linear::{Linear, LinearConfig};
pub use relu::ReLU;
