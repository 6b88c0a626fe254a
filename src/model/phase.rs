//! Execution phases of the rule scheduler.

use std::fmt;

/// A named, strictly ordered stage of model resolution.
///
/// Every rule belongs to exactly one phase. A phase is fully drained before
/// the next one starts, whatever order the rules were added in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Factories for every model element are bound.
    Registration,
    /// User declarations mutate the axis containers.
    Configuration,
    /// Empty axis containers receive their default values.
    Defaults,
    /// The binary container is computed from the axes.
    Variants,
    /// Finalizers that have not run lazily yet.
    Finalization,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 5] = [
        Phase::Registration,
        Phase::Configuration,
        Phase::Defaults,
        Phase::Variants,
        Phase::Finalization,
    ];

    /// Get the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Registration => "registration",
            Phase::Configuration => "configuration",
            Phase::Defaults => "defaults",
            Phase::Variants => "variants",
            Phase::Finalization => "finalization",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
