// src/ops/linalg/mod.rs

pub mod linear;

pub use linear::linear_op;
