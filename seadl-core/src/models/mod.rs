// src/models/mod.rs
// Ready-made models assembled from the layers in `nn`.

pub mod mlp;

pub use mlp::{SimpleMLP, SimpleMlpConfig};
