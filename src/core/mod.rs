//! Core data structures for the native model.
//!
//! This module contains the foundational types the scheduler operates on:
//! - The named model registry and its element type tags
//! - Axis containers (platforms, build types, flavors, tool chains)
//! - Repositories and generated binaries
//! - The Model.toml manifest

pub mod axis;
pub mod binary;
pub mod element;
pub mod errors;
pub mod manifest;
pub mod platform;
pub mod registry;
pub mod repository;
pub mod toolchain;

pub use axis::{BuildType, BuildTypeContainer, Flavor, FlavorContainer, Named, NamedContainer};
pub use binary::{BinaryContainer, NativeBinary};
pub use element::{names, ModelElement, ModelObject, ModelType};
pub use errors::ModelError;
pub use manifest::{ModelManifest, MANIFEST_NAME};
pub use platform::{Architecture, OperatingSystem, Platform, PlatformContainer};
pub use registry::ModelRegistry;
pub use repository::{BaseDirResolver, FileResolver, PrebuiltLibraries, PrebuiltLibrary, Repositories};
pub use toolchain::{TargetCapability, ToolChain, ToolChainFamily, ToolChainRegistry};
