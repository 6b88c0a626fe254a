//! Phased rule scheduler.
//!
//! Key principle: rules never hold references into the model. Each rule
//! declares the elements it reads and mutates, and receives a [`RuleContext`]
//! that only hands out those elements.
//!
//! Phases run in [`Phase::ALL`] order and every phase is drained before the
//! next one starts. Within a phase, rules run in the order they were added.
//!
//! Finalizers (rules in [`Phase::Finalization`]) are lazy: a pending finalizer
//! runs right before the first rule, or the first external read, that reads
//! an element it mutates. Once it has run, those elements are finalized and
//! reject further mutation.

use crate::core::element::{ModelElement, ModelType};
use crate::core::errors::ModelError;
use crate::core::registry::{ElementFactory, ModelRegistry};
use crate::model::Phase;

/// Name, phase and declared element access of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    name: String,
    phase: Phase,
    reads: Vec<String>,
    mutates: Vec<String>,
}

impl RuleDescriptor {
    pub fn new(name: impl Into<String>, phase: Phase) -> Self {
        RuleDescriptor {
            name: name.into(),
            phase,
            reads: Vec::new(),
            mutates: Vec::new(),
        }
    }

    /// Declare that the rule reads `element`.
    pub fn reading(mut self, element: impl Into<String>) -> Self {
        self.reads.push(element.into());
        self
    }

    /// Declare that the rule mutates (or registers) `element`.
    pub fn mutating(mut self, element: impl Into<String>) -> Self {
        self.mutates.push(element.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    pub fn mutates(&self) -> &[String] {
        &self.mutates
    }

    pub fn is_finalizer(&self) -> bool {
        self.phase == Phase::Finalization
    }

    fn may_read(&self, element: &str) -> bool {
        self.reads.iter().chain(&self.mutates).any(|e| e == element)
    }

    fn may_mutate(&self, element: &str) -> bool {
        self.mutates.iter().any(|e| e == element)
    }

    fn origin(&self) -> String {
        format!("rule `{}`", self.name)
    }
}

/// A unit of model configuration.
pub trait ModelRule {
    fn descriptor(&self) -> &RuleDescriptor;

    /// Run the rule. Each rule runs at most once.
    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError>;
}

/// A rule backed by a closure.
pub struct FnRule<F> {
    descriptor: RuleDescriptor,
    body: F,
}

impl<F> FnRule<F>
where
    F: FnOnce(&mut RuleContext<'_>) -> Result<(), ModelError>,
{
    pub fn new(descriptor: RuleDescriptor, body: F) -> Self {
        FnRule { descriptor, body }
    }
}

impl<F> ModelRule for FnRule<F>
where
    F: FnOnce(&mut RuleContext<'_>) -> Result<(), ModelError>,
{
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        (self.body)(ctx)
    }
}

/// The view of the model a running rule gets.
pub struct RuleContext<'a> {
    rule: &'a RuleDescriptor,
    registry: &'a mut ModelRegistry,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(rule: &'a RuleDescriptor, registry: &'a mut ModelRegistry) -> Self {
        RuleContext { rule, registry }
    }

    /// The running rule.
    pub fn rule(&self) -> &RuleDescriptor {
        self.rule
    }

    /// Read a declared element.
    ///
    /// Declared elements are realized before the rule body runs, so several
    /// elements can be borrowed at once.
    pub fn get<T: ModelElement>(&self, name: &str) -> Result<&T, ModelError> {
        if !self.rule.may_read(name) {
            return Err(self.undeclared(name, "read"));
        }
        self.registry
            .peek::<T>(name)?
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Mutate an element the rule declared in `mutates`.
    pub fn get_mut<T: ModelElement>(&mut self, name: &str) -> Result<&mut T, ModelError> {
        if !self.rule.may_mutate(name) {
            return Err(self.undeclared(name, "mutate"));
        }
        self.registry.get_mut::<T>(name)
    }

    /// Bind a typed factory to a declared element name.
    pub fn register<T, F>(&mut self, name: &str, factory: F) -> Result<(), ModelError>
    where
        T: ModelElement,
        F: FnOnce() -> T + 'static,
    {
        self.check_registration(name)?;
        self.registry.register::<T, F>(name, factory)
    }

    /// Bind the default constructor of `ty` to a declared element name.
    pub fn register_default(&mut self, name: &str, ty: ModelType) -> Result<(), ModelError> {
        self.check_registration(name)?;
        self.registry.register_default(name, ty)
    }

    /// Bind an untyped factory to a declared element name.
    pub fn register_factory(
        &mut self,
        name: &str,
        ty: ModelType,
        factory: ElementFactory,
    ) -> Result<(), ModelError> {
        self.check_registration(name)?;
        self.registry.register_factory(name, ty, factory)
    }

    fn check_registration(&self, name: &str) -> Result<(), ModelError> {
        if self.rule.phase() != Phase::Registration {
            return Err(ModelError::configuration(
                self.rule.origin(),
                format!(
                    "elements can only be registered in the registration phase, not {}",
                    self.rule.phase()
                ),
            ));
        }
        if !self.rule.may_mutate(name) {
            return Err(self.undeclared(name, "register"));
        }
        Ok(())
    }

    fn undeclared(&self, name: &str, access: &str) -> ModelError {
        ModelError::configuration(
            self.rule.origin(),
            format!("cannot {} `{}`: element is not declared by the rule", access, name),
        )
    }
}

/// Runs rules phase by phase against a registry.
///
/// The scheduler owns only the pending rules and its phase cursor. A rule
/// failure poisons the scheduler: the failing error is returned once, and
/// every later run reports that resolution already failed.
#[derive(Default)]
pub struct RuleScheduler {
    rules: Vec<Option<Box<dyn ModelRule>>>,
    completed: Option<Phase>,
    failure: Option<ModelError>,
}

impl RuleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rule. Fails if the rule's phase has already been drained.
    pub fn add(&mut self, rule: Box<dyn ModelRule>) -> Result<(), ModelError> {
        self.check_poisoned()?;
        let descriptor = rule.descriptor();
        if let Some(completed) = self.completed {
            if descriptor.phase() <= completed {
                return Err(ModelError::configuration(
                    descriptor.origin(),
                    format!("the {} phase has already run", descriptor.phase()),
                ));
            }
        }
        tracing::debug!(
            "added rule `{}` ({} phase)",
            descriptor.name(),
            descriptor.phase()
        );
        self.rules.push(Some(rule));
        Ok(())
    }

    /// The last phase that has been fully drained.
    pub fn completed_phase(&self) -> Option<Phase> {
        self.completed
    }

    /// Number of rules that have not run yet.
    pub fn pending(&self) -> usize {
        self.rules.iter().flatten().count()
    }

    /// Names of pending rules in `phase`, in execution order.
    pub fn pending_in(&self, phase: Phase) -> Vec<&str> {
        self.rules
            .iter()
            .flatten()
            .map(|rule| rule.descriptor())
            .filter(|d| d.phase() == phase)
            .map(RuleDescriptor::name)
            .collect()
    }

    pub fn is_poisoned(&self) -> bool {
        self.failure.is_some()
    }

    /// Drain every phase up to and including `target`.
    pub fn run_to(&mut self, registry: &mut ModelRegistry, target: Phase) -> Result<(), ModelError> {
        self.check_poisoned()?;

        for phase in Phase::ALL {
            if phase > target {
                break;
            }
            if self.completed.is_some_and(|completed| phase <= completed) {
                continue;
            }

            while let Some(index) = self.next_in(phase) {
                self.execute(registry, index)?;
            }
            self.completed = Some(phase);
            tracing::debug!("completed {} phase", phase);
        }
        Ok(())
    }

    /// Prepare an external read of `element`.
    ///
    /// Fails with [`ModelError::NotYetResolved`] while a pending rule can still
    /// change the element, then runs any finalizer of the element.
    pub fn prepare_read(
        &mut self,
        registry: &mut ModelRegistry,
        element: &str,
    ) -> Result<(), ModelError> {
        self.check_poisoned()?;
        self.check_resolved(element, None)?;
        self.run_finalizers(registry, element)
    }

    fn next_in(&self, phase: Phase) -> Option<usize> {
        self.rules.iter().position(|rule| {
            rule.as_ref()
                .is_some_and(|rule| rule.descriptor().phase() == phase)
        })
    }

    fn execute(&mut self, registry: &mut ModelRegistry, index: usize) -> Result<(), ModelError> {
        let Some(rule) = self.rules.get_mut(index).and_then(Option::take) else {
            return Ok(());
        };
        let result = self.execute_rule(registry, rule);
        if let Err(err) = &result {
            tracing::debug!("model resolution failed: {}", err);
            self.failure = Some(err.clone());
        }
        result
    }

    fn execute_rule(
        &mut self,
        registry: &mut ModelRegistry,
        rule: Box<dyn ModelRule>,
    ) -> Result<(), ModelError> {
        let descriptor = rule.descriptor().clone();

        for element in descriptor.reads() {
            self.check_resolved(element, Some(descriptor.phase()))?;
            self.run_finalizers(registry, element)?;
        }
        for element in descriptor.reads().iter().chain(descriptor.mutates()) {
            if registry.contains(element) {
                registry.realize(element)?;
            }
        }

        tracing::debug!(
            "applying rule `{}` ({} phase)",
            descriptor.name(),
            descriptor.phase()
        );
        let mut ctx = RuleContext::new(&descriptor, registry);
        rule.apply(&mut ctx)?;

        if descriptor.is_finalizer() {
            for element in descriptor.mutates() {
                if registry.contains(element) {
                    registry.finalize(element)?;
                    tracing::debug!("finalized `{}`", element);
                }
            }
        }
        Ok(())
    }

    /// Fail if a pending rule in the phase of `reader` or a later one mutates
    /// `element`.
    ///
    /// `reader` is `None` for reads from outside the scheduler, which are
    /// blocked by every pending mutator. Finalizers never block a read; they
    /// run before it instead, so they only see fully configured elements.
    fn check_resolved(&self, element: &str, reader: Option<Phase>) -> Result<(), ModelError> {
        let blocking = self
            .rules
            .iter()
            .flatten()
            .map(|rule| rule.descriptor())
            .filter(|d| !d.is_finalizer())
            .filter(|d| reader.map_or(true, |phase| d.phase() >= phase))
            .filter(|d| d.may_mutate(element))
            .map(RuleDescriptor::phase)
            .max();

        match blocking {
            Some(phase) => Err(ModelError::NotYetResolved {
                name: element.to_string(),
                phase,
            }),
            None => Ok(()),
        }
    }

    fn run_finalizers(&mut self, registry: &mut ModelRegistry, element: &str) -> Result<(), ModelError> {
        while let Some(index) = self.rules.iter().position(|rule| {
            rule.as_ref().is_some_and(|rule| {
                let d = rule.descriptor();
                d.is_finalizer() && d.may_mutate(element)
            })
        }) {
            self.execute(registry, index)?;
        }
        Ok(())
    }

    fn check_poisoned(&self) -> Result<(), ModelError> {
        match &self.failure {
            Some(err) => Err(ModelError::configuration(
                "model",
                format!("model resolution previously failed: {}", err),
            )),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RuleScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleScheduler")
            .field("completed", &self.completed)
            .field("pending", &self.pending())
            .field("failure", &self.failure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::axis::{BuildType, BuildTypeContainer, Flavor, FlavorContainer};
    use crate::core::element::names;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging_rule(log: &Log, descriptor: RuleDescriptor) -> Box<dyn ModelRule> {
        let log = Rc::clone(log);
        let name = descriptor.name().to_string();
        Box::new(FnRule::new(descriptor, move |_ctx: &mut RuleContext<'_>| {
            log.borrow_mut().push(name);
            Ok(())
        }))
    }

    fn register_axes() -> Box<dyn ModelRule> {
        Box::new(FnRule::new(
            RuleDescriptor::new("register", Phase::Registration)
                .mutating(names::BUILD_TYPES)
                .mutating(names::FLAVORS),
            |ctx: &mut RuleContext<'_>| {
                ctx.register_default(names::BUILD_TYPES, ModelType::BuildTypes)?;
                ctx.register_default(names::FLAVORS, ModelType::Flavors)
            },
        ))
    }

    #[test]
    fn test_phases_run_in_order() {
        let log = Log::default();
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();

        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("finalize", Phase::Finalization)))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("variants", Phase::Variants)))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("configure-a", Phase::Configuration)))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("defaults", Phase::Defaults)))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("configure-b", Phase::Configuration)))
            .unwrap();

        scheduler.run_to(&mut registry, Phase::Finalization).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["configure-a", "configure-b", "defaults", "variants", "finalize"]
        );
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.completed_phase(), Some(Phase::Finalization));
    }

    #[test]
    fn test_run_to_stops_at_target() {
        let log = Log::default();
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("configure", Phase::Configuration)))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("variants", Phase::Variants)))
            .unwrap();

        scheduler.run_to(&mut registry, Phase::Defaults).unwrap();
        assert_eq!(*log.borrow(), vec!["configure"]);
        assert_eq!(scheduler.pending_in(Phase::Variants), vec!["variants"]);

        // Each rule runs once even when resolution is resumed
        scheduler.run_to(&mut registry, Phase::Finalization).unwrap();
        scheduler.run_to(&mut registry, Phase::Finalization).unwrap();
        assert_eq!(*log.borrow(), vec!["configure", "variants"]);
    }

    #[test]
    fn test_add_to_completed_phase_fails() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.run_to(&mut registry, Phase::Configuration).unwrap();

        let log = Log::default();
        let err = scheduler
            .add(logging_rule(&log, RuleDescriptor::new("late", Phase::Configuration)))
            .unwrap_err();
        assert!(matches!(err, ModelError::Configuration { ref origin, .. } if origin == "rule `late`"));
        assert!(scheduler
            .add(logging_rule(&log, RuleDescriptor::new("later", Phase::Variants)))
            .is_ok());
    }

    #[test]
    fn test_undeclared_access_fails() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("sneaky", Phase::Configuration).reading(names::FLAVORS),
                |ctx: &mut RuleContext<'_>| {
                    ctx.get::<FlavorContainer>(names::FLAVORS)?;
                    ctx.get_mut::<BuildTypeContainer>(names::BUILD_TYPES)?;
                    Ok(())
                },
            )))
            .unwrap();

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert_eq!(
            err,
            ModelError::configuration(
                "rule `sneaky`",
                "cannot mutate `buildTypes`: element is not declared by the rule"
            )
        );
    }

    #[test]
    fn test_read_of_later_mutation_is_not_yet_resolved() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("early-reader", Phase::Configuration).reading(names::FLAVORS),
                |_ctx: &mut RuleContext<'_>| Ok(()),
            )))
            .unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("default-flavor", Phase::Defaults).mutating(names::FLAVORS),
                |_ctx: &mut RuleContext<'_>| Ok(()),
            )))
            .unwrap();

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert_eq!(
            err,
            ModelError::NotYetResolved {
                name: names::FLAVORS.to_string(),
                phase: Phase::Defaults,
            }
        );
    }

    #[test]
    fn test_read_of_same_phase_mutation_is_not_yet_resolved() {
        let log = Log::default();
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(logging_rule(
                &log,
                RuleDescriptor::new("close-flavors", Phase::Finalization).mutating(names::FLAVORS),
            ))
            .unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("reader", Phase::Configuration).reading(names::FLAVORS),
                |_ctx: &mut RuleContext<'_>| Ok(()),
            )))
            .unwrap();
        scheduler
            .add(logging_rule(
                &log,
                RuleDescriptor::new("add-flavor", Phase::Configuration).mutating(names::FLAVORS),
            ))
            .unwrap();

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert_eq!(
            err,
            ModelError::NotYetResolved {
                name: names::FLAVORS.to_string(),
                phase: Phase::Configuration,
            }
        );
        // The finalizer never saw a half-configured element
        assert!(log.borrow().is_empty());
        assert!(!registry.is_finalized(names::FLAVORS));
    }

    #[test]
    fn test_read_after_same_phase_mutation() {
        let log = Log::default();
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("add-flavor", Phase::Configuration).mutating(names::FLAVORS),
                |ctx: &mut RuleContext<'_>| {
                    ctx.get_mut::<FlavorContainer>(names::FLAVORS)?
                        .add(Flavor::new("free"))?;
                    Ok(())
                },
            )))
            .unwrap();
        let reader_log = Rc::clone(&log);
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("reader", Phase::Configuration).reading(names::FLAVORS),
                move |ctx: &mut RuleContext<'_>| {
                    let count = ctx.get::<FlavorContainer>(names::FLAVORS)?.len();
                    reader_log.borrow_mut().push(format!("reader saw {}", count));
                    Ok(())
                },
            )))
            .unwrap();

        scheduler.run_to(&mut registry, Phase::Finalization).unwrap();
        assert_eq!(*log.borrow(), vec!["reader saw 1"]);
    }

    #[test]
    fn test_external_read_before_resolution() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("add-flavor", Phase::Configuration).mutating(names::FLAVORS),
                |ctx: &mut RuleContext<'_>| {
                    ctx.get_mut::<FlavorContainer>(names::FLAVORS)?
                        .add(Flavor::new("free"))?;
                    Ok(())
                },
            )))
            .unwrap();

        assert!(matches!(
            scheduler.prepare_read(&mut registry, names::FLAVORS),
            Err(ModelError::NotYetResolved { .. })
        ));
        // Build types have no pending writer once registered
        scheduler.run_to(&mut registry, Phase::Registration).unwrap();
        assert!(scheduler.prepare_read(&mut registry, names::BUILD_TYPES).is_ok());

        scheduler.run_to(&mut registry, Phase::Configuration).unwrap();
        scheduler.prepare_read(&mut registry, names::FLAVORS).unwrap();
        assert_eq!(
            registry.get::<FlavorContainer>(names::FLAVORS).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_finalizer_runs_lazily_once() {
        let log = Log::default();
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();

        let finalizer_log = Rc::clone(&log);
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("default-build-types", Phase::Finalization)
                    .mutating(names::BUILD_TYPES),
                move |ctx: &mut RuleContext<'_>| {
                    finalizer_log.borrow_mut().push("finalizer".to_string());
                    let build_types = ctx.get_mut::<BuildTypeContainer>(names::BUILD_TYPES)?;
                    if build_types.is_empty() {
                        build_types.add(BuildType::new("debug"))?;
                    }
                    Ok(())
                },
            )))
            .unwrap();

        let reader_log = Rc::clone(&log);
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("reader", Phase::Defaults).reading(names::BUILD_TYPES),
                move |ctx: &mut RuleContext<'_>| {
                    let count = ctx.get::<BuildTypeContainer>(names::BUILD_TYPES)?.len();
                    reader_log.borrow_mut().push(format!("reader saw {}", count));
                    Ok(())
                },
            )))
            .unwrap();
        scheduler
            .add(logging_rule(&log, RuleDescriptor::new("variants", Phase::Variants)))
            .unwrap();

        scheduler.run_to(&mut registry, Phase::Finalization).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["finalizer", "reader saw 1", "variants"]
        );
        assert!(registry.is_finalized(names::BUILD_TYPES));
        assert!(registry.get_mut::<BuildTypeContainer>(names::BUILD_TYPES).is_err());
    }

    #[test]
    fn test_finalizer_runs_before_external_read() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler.add(register_axes()).unwrap();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("close-flavors", Phase::Finalization).mutating(names::FLAVORS),
                |_ctx: &mut RuleContext<'_>| Ok(()),
            )))
            .unwrap();

        scheduler.run_to(&mut registry, Phase::Registration).unwrap();
        assert!(!registry.is_finalized(names::FLAVORS));
        scheduler.prepare_read(&mut registry, names::FLAVORS).unwrap();
        assert!(registry.is_finalized(names::FLAVORS));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_failure_poisons_scheduler() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("broken", Phase::Configuration),
                |_ctx: &mut RuleContext<'_>| Err(ModelError::configuration("rule `broken`", "boom")),
            )))
            .unwrap();

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert_eq!(err, ModelError::configuration("rule `broken`", "boom"));
        assert!(scheduler.is_poisoned());

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert!(err.to_string().contains("previously failed"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_register_outside_registration_phase() {
        let mut scheduler = RuleScheduler::new();
        let mut registry = ModelRegistry::new();
        scheduler
            .add(Box::new(FnRule::new(
                RuleDescriptor::new("late-register", Phase::Defaults).mutating(names::FLAVORS),
                |ctx: &mut RuleContext<'_>| ctx.register_default(names::FLAVORS, ModelType::Flavors),
            )))
            .unwrap();

        let err = scheduler.run_to(&mut registry, Phase::Finalization).unwrap_err();
        assert!(matches!(err, ModelError::Configuration { .. }));
        assert!(!registry.contains(names::FLAVORS));
    }
}
