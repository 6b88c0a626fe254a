//! Built-in rules of the native model.
//!
//! Registration rules bind a factory per element. Default rules add sentinel
//! values to axes that are still empty when they run; a declared value always
//! suppresses the default.

use std::sync::Arc;

use crate::core::axis::{
    BuildType, BuildTypeContainer, Flavor, FlavorContainer, DEFAULT_BUILD_TYPES, DEFAULT_FLAVOR,
};
use crate::core::binary::BinaryContainer;
use crate::core::element::{names, ModelType};
use crate::core::errors::ModelError;
use crate::core::platform::{PlatformContainer, DEFAULT_PLATFORM};
use crate::core::repository::{FileResolver, Repositories};
use crate::core::toolchain::ToolChainRegistry;
use crate::model::scheduler::{ModelRule, RuleContext, RuleDescriptor};
use crate::model::Phase;
use crate::probe::HostProbe;
use crate::util::config::DefaultsConfig;

/// Names of the values the default rules create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultNames {
    pub platform: String,
    pub build_types: Vec<String>,
    pub flavor: String,
}

impl Default for DefaultNames {
    fn default() -> Self {
        DefaultNames {
            platform: DEFAULT_PLATFORM.to_string(),
            build_types: DEFAULT_BUILD_TYPES.iter().map(|s| s.to_string()).collect(),
            flavor: DEFAULT_FLAVOR.to_string(),
        }
    }
}

impl DefaultNames {
    /// Apply the `[defaults]` section of the tool configuration.
    pub fn from_config(config: &DefaultsConfig) -> Self {
        let mut defaults = DefaultNames::default();
        if let Some(platform) = &config.platform {
            defaults.platform = platform.clone();
        }
        if let Some(build_types) = &config.build_types {
            defaults.build_types = build_types.clone();
        }
        if let Some(flavor) = &config.flavor {
            defaults.flavor = flavor.clone();
        }
        defaults
    }
}

/// Binds the default constructor of a model type to an element name.
pub struct RegisterElement {
    descriptor: RuleDescriptor,
    name: String,
    ty: ModelType,
}

impl RegisterElement {
    pub fn new(name: &str, ty: ModelType) -> Self {
        RegisterElement {
            descriptor: RuleDescriptor::new(format!("register {}", name), Phase::Registration)
                .mutating(name),
            name: name.to_string(),
            ty,
        }
    }
}

impl ModelRule for RegisterElement {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        ctx.register_default(&self.name, self.ty)
    }
}

/// Binds the repositories element, which needs a file resolver.
pub struct RegisterRepositories {
    descriptor: RuleDescriptor,
    resolver: Arc<dyn FileResolver>,
}

impl RegisterRepositories {
    pub fn new(resolver: Arc<dyn FileResolver>) -> Self {
        RegisterRepositories {
            descriptor: RuleDescriptor::new("register repositories", Phase::Registration)
                .mutating(names::REPOSITORIES),
            resolver,
        }
    }
}

impl ModelRule for RegisterRepositories {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let resolver = self.resolver;
        ctx.register(names::REPOSITORIES, move || Repositories::new(resolver))
    }
}

/// Adds a host platform when no platform is declared.
pub struct CreateDefaultPlatform {
    descriptor: RuleDescriptor,
    probe: Arc<dyn HostProbe>,
    name: String,
}

impl CreateDefaultPlatform {
    pub fn new(probe: Arc<dyn HostProbe>, name: impl Into<String>) -> Self {
        CreateDefaultPlatform {
            descriptor: RuleDescriptor::new("create default platform", Phase::Defaults)
                .mutating(names::PLATFORMS),
            probe,
            name: name.into(),
        }
    }
}

impl ModelRule for CreateDefaultPlatform {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let platforms = ctx.get_mut::<PlatformContainer>(names::PLATFORMS)?;
        if platforms.is_empty() {
            let platform = self.probe.host_platform(&self.name);
            tracing::info!("Using default platform {}", platform);
            platforms.add(platform)?;
        }
        Ok(())
    }
}

/// Adds the default build types when none is declared.
pub struct CreateDefaultBuildTypes {
    descriptor: RuleDescriptor,
    build_types: Vec<String>,
}

impl CreateDefaultBuildTypes {
    pub fn new(build_types: Vec<String>) -> Self {
        CreateDefaultBuildTypes {
            descriptor: RuleDescriptor::new("create default build types", Phase::Defaults)
                .mutating(names::BUILD_TYPES),
            build_types,
        }
    }
}

impl ModelRule for CreateDefaultBuildTypes {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let build_types = ctx.get_mut::<BuildTypeContainer>(names::BUILD_TYPES)?;
        if build_types.is_empty() {
            tracing::info!("Using default build types: {}", self.build_types.join(", "));
            for name in self.build_types {
                build_types.add(BuildType::new(name))?;
            }
        }
        Ok(())
    }
}

/// Adds the default flavor when none is declared.
pub struct CreateDefaultFlavor {
    descriptor: RuleDescriptor,
    name: String,
}

impl CreateDefaultFlavor {
    pub fn new(name: impl Into<String>) -> Self {
        CreateDefaultFlavor {
            descriptor: RuleDescriptor::new("create default flavor", Phase::Defaults)
                .mutating(names::FLAVORS),
            name: name.into(),
        }
    }
}

impl ModelRule for CreateDefaultFlavor {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let flavors = ctx.get_mut::<FlavorContainer>(names::FLAVORS)?;
        if flavors.is_empty() {
            tracing::info!("Using default flavor `{}`", self.name);
            flavors.add(Flavor::new(self.name))?;
        }
        Ok(())
    }
}

/// Finalizer of the tool chain registry: probes the host when no tool chain
/// is declared.
///
/// Runs right before the first read of the registry, so user configuration
/// is always complete when it decides.
pub struct AddDefaultToolChainsIfRequired {
    descriptor: RuleDescriptor,
    probe: Arc<dyn HostProbe>,
}

impl AddDefaultToolChainsIfRequired {
    pub fn new(probe: Arc<dyn HostProbe>) -> Self {
        AddDefaultToolChainsIfRequired {
            descriptor: RuleDescriptor::new("add default tool chains", Phase::Finalization)
                .mutating(names::TOOL_CHAINS),
            probe,
        }
    }
}

impl ModelRule for AddDefaultToolChainsIfRequired {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let tool_chains = ctx.get_mut::<ToolChainRegistry>(names::TOOL_CHAINS)?;
        if tool_chains.is_empty() && tool_chains.add_default_tool_chains(self.probe.as_ref()) == 0 {
            tracing::debug!("No tool chain found on the host");
        }
        Ok(())
    }
}

/// Finalizer of the binary container. Generated binaries are handed to
/// consumers only after this has run.
pub struct CloseBinariesForTasks {
    descriptor: RuleDescriptor,
}

impl CloseBinariesForTasks {
    pub fn new() -> Self {
        CloseBinariesForTasks {
            descriptor: RuleDescriptor::new("close binaries for tasks", Phase::Finalization)
                .mutating(names::BINARIES),
        }
    }
}

impl Default for CloseBinariesForTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRule for CloseBinariesForTasks {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let binaries = ctx.get::<BinaryContainer>(names::BINARIES)?;
        let count = binaries.len()?;
        tracing::debug!("Closing {} binaries for task wiring", count);
        Ok(())
    }
}
