//! Common structs describing a car and its model features, shared across crates.

mod features;
mod field;

pub use features::*;
pub use field::*;
