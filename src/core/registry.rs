//! Named model registry - lazily realized, typed model elements.
//!
//! Key principle: registration never runs a factory. A slot is realized the
//! first time it is read, and the realized object is memoized for the
//! lifetime of the registry, so every read of a name sees the same instance.

use indexmap::IndexMap;

use crate::core::element::{ModelElement, ModelObject, ModelType};
use crate::core::errors::ModelError;

/// A factory bound to a registry slot.
pub type ElementFactory = Box<dyn FnOnce() -> Result<ModelObject, ModelError>>;

enum SlotState {
    Pending(ElementFactory),
    Realizing,
    Realized(ModelObject),
    Failed(ModelError),
}

struct Slot {
    ty: ModelType,
    state: SlotState,
    finalized: bool,
}

/// Registry of named, typed model elements.
///
/// Iteration follows registration order.
#[derive(Default)]
pub struct ModelRegistry {
    slots: IndexMap<String, Slot>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ModelRegistry {
            slots: IndexMap::new(),
        }
    }

    /// Bind a typed factory to `name`.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ModelError>
    where
        T: ModelElement,
        F: FnOnce() -> T + 'static,
    {
        self.register_factory(name, T::TYPE, Box::new(move || Ok(factory().into_object())))
    }

    /// Bind the constructor from the type's factory table entry to `name`.
    pub fn register_default(
        &mut self,
        name: impl Into<String>,
        ty: ModelType,
    ) -> Result<(), ModelError> {
        let name = name.into();
        let constructor = ty.constructor().ok_or_else(|| {
            ModelError::configuration(
                format!("registration of `{}`", name),
                format!("{} has no default constructor", ty),
            )
        })?;
        self.register_factory(name, ty, Box::new(move || Ok(constructor())))
    }

    /// Bind an untyped factory producing an object of type `ty`.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        ty: ModelType,
        factory: ElementFactory,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if let Some(existing) = self.slots.get(&name) {
            return Err(if existing.ty == ty {
                ModelError::DuplicateRegistration {
                    name,
                    kind: ty.to_string(),
                }
            } else {
                ModelError::TypeMismatch {
                    name,
                    expected: existing.ty,
                    found: ty,
                }
            });
        }

        tracing::debug!("registered model element `{}` ({})", name, ty);
        self.slots.insert(
            name,
            Slot {
                ty,
                state: SlotState::Pending(factory),
                finalized: false,
            },
        );
        Ok(())
    }

    /// Realize `name` if it has not been realized yet.
    pub fn realize(&mut self, name: &str) -> Result<(), ModelError> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })?;

        match &slot.state {
            SlotState::Realized(_) => return Ok(()),
            SlotState::Failed(err) => return Err(err.clone()),
            SlotState::Realizing => {
                return Err(ModelError::configuration(
                    format!("realization of `{}`", name),
                    "element was requested while its factory was running",
                ))
            }
            SlotState::Pending(_) => {}
        }

        let SlotState::Pending(factory) = std::mem::replace(&mut slot.state, SlotState::Realizing)
        else {
            unreachable!("slot state checked above");
        };

        let result = factory().and_then(|object| {
            if object.model_type() == slot.ty {
                Ok(object)
            } else {
                Err(ModelError::TypeMismatch {
                    name: name.to_string(),
                    expected: slot.ty,
                    found: object.model_type(),
                })
            }
        });

        match result {
            Ok(object) => {
                tracing::debug!("realized model element `{}`", name);
                slot.state = SlotState::Realized(object);
                Ok(())
            }
            Err(err) => {
                slot.state = SlotState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Realize and return the element registered as `name`.
    pub fn get<T: ModelElement>(&mut self, name: &str) -> Result<&T, ModelError> {
        self.check_type::<T>(name)?;
        self.realize(name)?;
        self.peek::<T>(name)?
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Realize and return the element registered as `name` for mutation.
    ///
    /// Fails once the element has been finalized.
    pub fn get_mut<T: ModelElement>(&mut self, name: &str) -> Result<&mut T, ModelError> {
        self.check_type::<T>(name)?;
        if self.is_finalized(name) {
            return Err(ModelError::configuration(
                format!("mutation of `{}`", name),
                "element is finalized and can no longer be changed",
            ));
        }
        self.realize(name)?;
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })?;
        match &mut slot.state {
            SlotState::Realized(object) => {
                T::from_object_mut(object).ok_or_else(|| ModelError::TypeMismatch {
                    name: name.to_string(),
                    expected: slot.ty,
                    found: T::TYPE,
                })
            }
            _ => Err(ModelError::UnknownElement {
                name: name.to_string(),
            }),
        }
    }

    /// Return the element if it is already realized, without realizing it.
    pub fn peek<T: ModelElement>(&self, name: &str) -> Result<Option<&T>, ModelError> {
        self.check_type::<T>(name)?;
        match self.slots.get(name).map(|slot| &slot.state) {
            Some(SlotState::Realized(object)) => Ok(T::from_object(object)),
            _ => Ok(None),
        }
    }

    /// Realize every element of type `T` and iterate them in registration order.
    ///
    /// Each call re-reads the registry, so elements registered since the
    /// previous call are included.
    pub fn all<T: ModelElement>(
        &mut self,
    ) -> Result<impl Iterator<Item = (&str, &T)> + '_, ModelError> {
        let pending: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.ty == T::TYPE)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &pending {
            self.realize(name)?;
        }

        Ok(self.slots.iter().filter_map(|(name, slot)| match &slot.state {
            SlotState::Realized(object) => T::from_object(object).map(|t| (name.as_str(), t)),
            _ => None,
        }))
    }

    fn check_type<T: ModelElement>(&self, name: &str) -> Result<(), ModelError> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })?;
        if slot.ty != T::TYPE {
            return Err(ModelError::TypeMismatch {
                name: name.to_string(),
                expected: slot.ty,
                found: T::TYPE,
            });
        }
        Ok(())
    }

    /// Mark an element as finalized. Later mutable access fails.
    pub fn finalize(&mut self, name: &str) -> Result<(), ModelError> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownElement {
                name: name.to_string(),
            })?;
        slot.finalized = true;
        Ok(())
    }

    /// Check whether an element has been finalized.
    pub fn is_finalized(&self, name: &str) -> bool {
        self.slots.get(name).is_some_and(|slot| slot.finalized)
    }

    /// Check whether an element has been realized.
    pub fn is_realized(&self, name: &str) -> bool {
        matches!(
            self.slots.get(name).map(|slot| &slot.state),
            Some(SlotState::Realized(_))
        )
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The type an element was registered with.
    pub fn model_type(&self, name: &str) -> Option<ModelType> {
        self.slots.get(name).map(|slot| slot.ty)
    }

    /// Registered element names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Get the number of registered elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(name, slot)| (name, slot.ty)))
            .finish()
    }
}
