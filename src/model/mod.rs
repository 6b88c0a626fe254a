//! The model: a registry of elements plus the rules that build them.
//!
//! A [`Model`] starts empty. Plugins and user configuration add rules; the
//! model is resolved lazily, either explicitly through [`Model::resolve`] or
//! implicitly when an element is read.

pub mod bridge;
mod phase;
pub mod plugin;
pub mod rules;
pub mod scheduler;
pub mod variants;

use anyhow::Context;

pub use bridge::{BinaryConsumer, PlannedTask, TaskKind, TaskPlan};
pub use phase::Phase;
pub use plugin::NativeModelPlugin;
pub use rules::DefaultNames;
pub use scheduler::{FnRule, ModelRule, RuleContext, RuleDescriptor, RuleScheduler};
pub use variants::{generate_variants, CreateNativeBinaries};

use crate::core::axis::{BuildTypeContainer, FlavorContainer, Named};
use crate::core::binary::BinaryContainer;
use crate::core::element::{names, ModelElement};
use crate::core::errors::ModelError;
use crate::core::platform::PlatformContainer;
use crate::core::repository::Repositories;
use crate::core::toolchain::ToolChainRegistry;

/// A model under construction.
#[derive(Debug, Default)]
pub struct Model {
    registry: crate::core::registry::ModelRegistry,
    scheduler: RuleScheduler,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rule.
    pub fn add_rule<R: ModelRule + 'static>(&mut self, rule: R) -> Result<(), ModelError> {
        self.scheduler.add(Box::new(rule))
    }

    /// Queue a configuration rule that mutates `element`.
    ///
    /// ```
    /// use native_model::core::axis::{Flavor, FlavorContainer};
    /// use native_model::model::Model;
    ///
    /// let mut model = Model::new();
    /// model
    ///     .configure::<FlavorContainer, _>("flavors", |flavors| {
    ///         flavors.add(Flavor::new("paid"))?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// ```
    pub fn configure<T, F>(&mut self, element: &str, body: F) -> Result<(), ModelError>
    where
        T: ModelElement,
        F: FnOnce(&mut T) -> Result<(), ModelError> + 'static,
    {
        let name = element.to_string();
        let descriptor =
            RuleDescriptor::new(format!("configure {}", element), Phase::Configuration)
                .mutating(element);
        self.add_rule(FnRule::new(descriptor, move |ctx: &mut RuleContext<'_>| {
            body(ctx.get_mut::<T>(&name)?)
        }))
    }

    /// Run every pending rule.
    pub fn resolve(&mut self) -> Result<(), ModelError> {
        self.resolve_to(Phase::Finalization)
    }

    /// Run pending rules up to and including `phase`.
    pub fn resolve_to(&mut self, phase: Phase) -> Result<(), ModelError> {
        self.scheduler.run_to(&mut self.registry, phase)
    }

    /// Whether every phase has run.
    pub fn is_resolved(&self) -> bool {
        self.scheduler.completed_phase() == Some(Phase::Finalization)
    }

    /// Read an element without resolving the whole model.
    ///
    /// Fails with [`ModelError::NotYetResolved`] while a pending rule can still
    /// change the element. Finalizers of the element run first.
    pub fn get<T: ModelElement>(&mut self, name: &str) -> Result<&T, ModelError> {
        self.scheduler.prepare_read(&mut self.registry, name)?;
        self.registry.get::<T>(name)
    }

    /// Resolve the model and return the generated binaries.
    pub fn binaries(&mut self) -> Result<&BinaryContainer, ModelError> {
        self.resolve()?;
        self.get::<BinaryContainer>(names::BINARIES)
    }

    pub fn tool_chains(&mut self) -> Result<&ToolChainRegistry, ModelError> {
        self.get(names::TOOL_CHAINS)
    }

    pub fn platforms(&mut self) -> Result<&PlatformContainer, ModelError> {
        self.get(names::PLATFORMS)
    }

    pub fn build_types(&mut self) -> Result<&BuildTypeContainer, ModelError> {
        self.get(names::BUILD_TYPES)
    }

    pub fn flavors(&mut self) -> Result<&FlavorContainer, ModelError> {
        self.get(names::FLAVORS)
    }

    pub fn repositories(&mut self) -> Result<&Repositories, ModelError> {
        self.get(names::REPOSITORIES)
    }

    /// Resolve the model and hand every binary to `consumer`.
    ///
    /// Returns the number of binaries wired.
    pub fn wire_binaries(&mut self, consumer: &mut dyn BinaryConsumer) -> anyhow::Result<usize> {
        let binaries = self.binaries()?;
        let mut wired = 0;
        for binary in binaries.iter()? {
            consumer
                .wire(binary)
                .with_context(|| format!("failed to wire binary `{}`", binary.name()))?;
            wired += 1;
        }
        Ok(wired)
    }

    pub fn registry(&self) -> &crate::core::registry::ModelRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &RuleScheduler {
        &self.scheduler
    }
}
