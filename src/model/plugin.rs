//! The native model plugin.
//!
//! Applying the plugin to a [`Model`] queues every rule of the native
//! binaries model: element registration, defaults, the tool chain finalizer,
//! variant generation and the binary finalizer. Nothing runs until the model
//! is resolved or read.

use std::sync::Arc;

use crate::core::element::{names, ModelType};
use crate::core::errors::ModelError;
use crate::core::repository::FileResolver;
use crate::model::rules::{
    AddDefaultToolChainsIfRequired, CloseBinariesForTasks, CreateDefaultBuildTypes,
    CreateDefaultFlavor, CreateDefaultPlatform, DefaultNames, RegisterElement,
    RegisterRepositories,
};
use crate::model::variants::CreateNativeBinaries;
use crate::model::Model;
use crate::probe::HostProbe;

/// Installs the native binaries rules into a model.
#[derive(Debug, Clone)]
pub struct NativeModelPlugin {
    probe: Arc<dyn HostProbe>,
    resolver: Arc<dyn FileResolver>,
    defaults: DefaultNames,
}

impl NativeModelPlugin {
    pub fn new(probe: Arc<dyn HostProbe>, resolver: Arc<dyn FileResolver>) -> Self {
        NativeModelPlugin {
            probe,
            resolver,
            defaults: DefaultNames::default(),
        }
    }

    /// Override the names used by the default rules.
    pub fn with_defaults(mut self, defaults: DefaultNames) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &DefaultNames {
        &self.defaults
    }

    /// Queue the plugin's rules.
    pub fn apply(&self, model: &mut Model) -> Result<(), ModelError> {
        model.add_rule(RegisterElement::new(names::TOOL_CHAINS, ModelType::ToolChains))?;
        model.add_rule(RegisterElement::new(names::PLATFORMS, ModelType::Platforms))?;
        model.add_rule(RegisterElement::new(names::BUILD_TYPES, ModelType::BuildTypes))?;
        model.add_rule(RegisterElement::new(names::FLAVORS, ModelType::Flavors))?;
        model.add_rule(RegisterRepositories::new(Arc::clone(&self.resolver)))?;
        model.add_rule(RegisterElement::new(names::BINARIES, ModelType::Binaries))?;

        model.add_rule(CreateDefaultPlatform::new(
            Arc::clone(&self.probe),
            self.defaults.platform.clone(),
        ))?;
        model.add_rule(CreateDefaultBuildTypes::new(self.defaults.build_types.clone()))?;
        model.add_rule(CreateDefaultFlavor::new(self.defaults.flavor.clone()))?;
        model.add_rule(AddDefaultToolChainsIfRequired::new(Arc::clone(&self.probe)))?;

        model.add_rule(CreateNativeBinaries::new())?;
        model.add_rule(CloseBinariesForTasks::new())?;

        tracing::debug!("applied native model plugin");
        Ok(())
    }
}
