//! native-model - lazy model resolution for native build variants
//!
//! This crate builds the model of a native (C/C++) project: the tool chains,
//! platforms, build types and flavors it is configured with, and the binaries
//! that follow from them. Elements are created lazily and populated by phased
//! rules, empty axes receive defaults, and the binaries are derived as the
//! capability-filtered cross product of the axes.

pub mod core;
pub mod model;
pub mod ops;
pub mod probe;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a fake host probe and model fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    binary::{BinaryContainer, NativeBinary},
    errors::ModelError,
    manifest::ModelManifest,
    registry::ModelRegistry,
};

pub use model::{BinaryConsumer, Model, NativeModelPlugin, Phase, TaskPlan};
pub use util::context::GlobalContext;
