//! Model error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::element::ModelType;
use crate::model::Phase;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while building or reading the model.
///
/// Every variant aborts the current resolution pass. None of them are
/// recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ModelError {
    #[error("{kind} `{name}` is already registered")]
    #[diagnostic(code(native_model::registry::duplicate))]
    DuplicateRegistration { name: String, kind: String },

    #[error("unknown model element `{name}`")]
    #[diagnostic(code(native_model::registry::unknown))]
    UnknownElement { name: String },

    #[error("model element `{name}` is a {found}, not a {expected}")]
    #[diagnostic(code(native_model::registry::type_mismatch))]
    TypeMismatch {
        name: String,
        expected: ModelType,
        found: ModelType,
    },

    #[error("model element `{name}` is not resolved until the {phase} phase has run")]
    #[diagnostic(
        code(native_model::scheduler::not_yet_resolved),
        help("Read the element from a rule in a later phase, or after resolving the model")
    )]
    NotYetResolved { name: String, phase: Phase },

    #[error("binaries in `{name}` have already been generated")]
    #[diagnostic(code(native_model::variants::regeneration))]
    Regeneration { name: String },

    #[error("{origin}: {message}")]
    #[diagnostic(code(native_model::configuration))]
    Configuration { origin: String, message: String },
}

impl ModelError {
    /// Create a configuration error attributed to a rule or component.
    pub fn configuration(origin: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::Configuration {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ModelError::DuplicateRegistration { name, kind } if kind == "binary" => {
                Diagnostic::error(format!("two variants are both named `{}`", name))
                    .with_context("binary names join platform, build type and flavor names")
                    .with_suggestion(suggestions::DUPLICATE_NAME)
            }

            ModelError::DuplicateRegistration { name, kind } => {
                Diagnostic::error(format!("{} `{}` is declared more than once", kind, name))
                    .with_context("the first declaration is kept")
                    .with_suggestion(suggestions::DUPLICATE_NAME)
            }

            ModelError::UnknownElement { name } => {
                Diagnostic::error(format!("unknown model element `{}`", name))
                    .with_suggestion("Check the element name against the registered elements")
            }

            ModelError::TypeMismatch {
                name,
                expected,
                found,
            } => Diagnostic::error(format!("model element `{}` has the wrong type", name))
                .with_context(format!("registered as {}", expected))
                .with_context(format!("requested as {}", found)),

            ModelError::NotYetResolved { name, phase } => {
                Diagnostic::error(format!("`{}` was read before it was resolved", name))
                    .with_context(format!("`{}` is complete after the {} phase", name, phase))
                    .with_suggestion("Move the reading rule to a later phase")
            }

            ModelError::Regeneration { name } => {
                Diagnostic::error(format!("binaries in `{}` were generated twice", name))
                    .with_context("generated binaries are referenced by task wiring")
                    .with_suggestion("Register a single variant-generation rule")
            }

            ModelError::Configuration { origin, message } => {
                Diagnostic::error(format!("model configuration failed in {}", origin))
                    .with_context(message.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ModelError::DuplicateRegistration {
            name: "platforms".to_string(),
            kind: ModelType::Platforms.to_string(),
        };
        assert_eq!(
            err.to_string(),
            "PlatformContainer `platforms` is already registered"
        );

        let err = ModelError::NotYetResolved {
            name: "binaries".to_string(),
            phase: Phase::Variants,
        };
        assert!(err.to_string().contains("variants phase"));
    }

    #[test]
    fn test_to_diagnostic() {
        let err = ModelError::TypeMismatch {
            name: "flavors".to_string(),
            expected: ModelType::Flavors,
            found: ModelType::Platforms,
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("wrong type"));
        assert!(output.contains("registered as FlavorContainer"));
        assert!(output.contains("requested as PlatformContainer"));
    }

    #[test]
    fn test_binary_collision_diagnostic() {
        let err = ModelError::DuplicateRegistration {
            name: "linuxDebugDefault".to_string(),
            kind: "binary".to_string(),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("two variants are both named `linuxDebugDefault`"));
        assert!(!output.contains("first declaration is kept"));
    }

    #[test]
    fn test_configuration_constructor() {
        let err = ModelError::configuration("rule `x`", "boom");
        assert_eq!(err.to_string(), "rule `x`: boom");
    }
}
