//! High-level operations.
//!
//! This module contains the implementation of the CLI commands.

pub mod resolve;

pub use resolve::{
    apply_manifest, build_model, build_model_with_probe, host_probe, load_manifest, resolve_model,
};
