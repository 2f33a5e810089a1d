//! CLI command implementations.

pub mod history;
pub mod import;
pub mod options;
pub mod predict;
pub mod train;
