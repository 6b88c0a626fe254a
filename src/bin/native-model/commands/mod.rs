//! Command implementations.

pub mod binaries;
pub mod completions;
pub mod model;
pub mod tasks;
pub mod toolchain;
