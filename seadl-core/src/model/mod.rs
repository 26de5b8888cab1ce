// src/model/mod.rs
// Containers composing other modules.

pub mod sequential;

pub use sequential::Sequential;
