//! Model element type tags and the constructor table.
//!
//! Every object stored in the [`ModelRegistry`](crate::core::registry::ModelRegistry)
//! is one variant of [`ModelObject`], identified by its [`ModelType`] tag.
//! Typed access goes through [`ModelElement`], implemented once per variant.

use std::fmt;

use crate::core::axis::{BuildTypeContainer, FlavorContainer};
use crate::core::binary::BinaryContainer;
use crate::core::platform::PlatformContainer;
use crate::core::repository::Repositories;
use crate::core::toolchain::ToolChainRegistry;

/// Well-known element names bound by the native model plugin.
pub mod names {
    pub const TOOL_CHAINS: &str = "toolChains";
    pub const PLATFORMS: &str = "platforms";
    pub const BUILD_TYPES: &str = "buildTypes";
    pub const FLAVORS: &str = "flavors";
    pub const REPOSITORIES: &str = "repositories";
    pub const BINARIES: &str = "binaries";
}

/// Type tag of a model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    ToolChains,
    Platforms,
    BuildTypes,
    Flavors,
    Repositories,
    Binaries,
}

impl ModelType {
    /// Get the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::ToolChains => "ToolChainRegistry",
            ModelType::Platforms => "PlatformContainer",
            ModelType::BuildTypes => "BuildTypeContainer",
            ModelType::Flavors => "FlavorContainer",
            ModelType::Repositories => "Repositories",
            ModelType::Binaries => "BinaryContainer",
        }
    }

    /// Constructor for types that need no collaborators.
    ///
    /// `Repositories` needs a file resolver and has to be registered with an
    /// explicit factory.
    pub fn constructor(&self) -> Option<fn() -> ModelObject> {
        match self {
            ModelType::ToolChains => Some(|| ModelObject::ToolChains(ToolChainRegistry::default())),
            ModelType::Platforms => Some(|| ModelObject::Platforms(PlatformContainer::default())),
            ModelType::BuildTypes => Some(|| ModelObject::BuildTypes(BuildTypeContainer::default())),
            ModelType::Flavors => Some(|| ModelObject::Flavors(FlavorContainer::default())),
            ModelType::Binaries => Some(|| ModelObject::Binaries(BinaryContainer::default())),
            ModelType::Repositories => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A realized model object.
#[derive(Debug)]
pub enum ModelObject {
    ToolChains(ToolChainRegistry),
    Platforms(PlatformContainer),
    BuildTypes(BuildTypeContainer),
    Flavors(FlavorContainer),
    Repositories(Repositories),
    Binaries(BinaryContainer),
}

impl ModelObject {
    /// The type tag of this object.
    pub fn model_type(&self) -> ModelType {
        match self {
            ModelObject::ToolChains(_) => ModelType::ToolChains,
            ModelObject::Platforms(_) => ModelType::Platforms,
            ModelObject::BuildTypes(_) => ModelType::BuildTypes,
            ModelObject::Flavors(_) => ModelType::Flavors,
            ModelObject::Repositories(_) => ModelType::Repositories,
            ModelObject::Binaries(_) => ModelType::Binaries,
        }
    }
}

/// A concrete type that can be stored in the registry.
pub trait ModelElement: Sized + 'static {
    /// Tag of the registry slot holding this type.
    const TYPE: ModelType;

    fn into_object(self) -> ModelObject;

    fn from_object(object: &ModelObject) -> Option<&Self>;

    fn from_object_mut(object: &mut ModelObject) -> Option<&mut Self>;
}

macro_rules! model_element {
    ($ty:ty, $variant:ident) => {
        impl ModelElement for $ty {
            const TYPE: ModelType = ModelType::$variant;

            fn into_object(self) -> ModelObject {
                ModelObject::$variant(self)
            }

            fn from_object(object: &ModelObject) -> Option<&Self> {
                match object {
                    ModelObject::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_object_mut(object: &mut ModelObject) -> Option<&mut Self> {
                match object {
                    ModelObject::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

model_element!(ToolChainRegistry, ToolChains);
model_element!(PlatformContainer, Platforms);
model_element!(BuildTypeContainer, BuildTypes);
model_element!(FlavorContainer, Flavors);
model_element!(Repositories, Repositories);
model_element!(BinaryContainer, Binaries);
