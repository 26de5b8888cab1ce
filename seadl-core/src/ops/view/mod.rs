// src/ops/view/mod.rs

pub mod flatten;

pub use flatten::{flatten_op, normalize_dim};
