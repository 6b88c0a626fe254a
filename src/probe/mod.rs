//! Host environment probing.
//!
//! The probe is the only part of model construction that performs I/O. It is
//! consulted by the tool chain default rule and by the host platform default,
//! and a probe that finds nothing is not an error.

use std::fmt;
use std::path::PathBuf;

use crate::core::platform::{Architecture, OperatingSystem, Platform};
use crate::core::toolchain::{TargetCapability, ToolChain, ToolChainFamily};

mod detect;

pub use detect::{detect_compiler_family, infer_cxx, SystemProbe};

/// A tool chain found on the host, before it is added to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolChainCandidate {
    pub family: ToolChainFamily,
    pub cc: PathBuf,
    pub cxx: Option<PathBuf>,
    pub ar: Option<PathBuf>,
}

impl ToolChainCandidate {
    pub fn new(family: ToolChainFamily, cc: impl Into<PathBuf>) -> Self {
        ToolChainCandidate {
            family,
            cc: cc.into(),
            cxx: None,
            ar: None,
        }
    }

    pub fn with_cxx(mut self, cxx: impl Into<PathBuf>) -> Self {
        self.cxx = Some(cxx.into());
        self
    }

    pub fn with_ar(mut self, ar: impl Into<PathBuf>) -> Self {
        self.ar = Some(ar.into());
        self
    }

    /// Convert into a host-only tool chain named after its family.
    pub fn into_tool_chain(self, host: TargetCapability) -> ToolChain {
        let mut tool_chain = ToolChain::new(self.family.as_str(), self.family)
            .with_host(host)
            .with_cc(self.cc);
        if let Some(cxx) = self.cxx {
            tool_chain = tool_chain.with_cxx(cxx);
        }
        if let Some(ar) = self.ar {
            tool_chain = tool_chain.with_ar(ar);
        }
        tool_chain
    }
}

/// Inspection of the machine the model is configured on.
pub trait HostProbe: fmt::Debug {
    /// Find usable compiler/linker sets, in preference order.
    fn detect_tool_chains(&self) -> Vec<ToolChainCandidate>;

    fn host_architecture(&self) -> Architecture {
        Architecture::host()
    }

    fn host_operating_system(&self) -> OperatingSystem {
        OperatingSystem::host()
    }

    fn host_capability(&self) -> TargetCapability {
        TargetCapability::new(self.host_architecture()).with_os(self.host_operating_system())
    }

    /// A platform describing the host, called `name`.
    fn host_platform(&self, name: &str) -> Platform {
        Platform::new(name, self.host_architecture(), self.host_operating_system())
    }
}

/// A probe with a fixed answer.
///
/// Used when probing is disabled in the configuration and for deterministic
/// resolution in tests.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    architecture: Architecture,
    operating_system: OperatingSystem,
    candidates: Vec<ToolChainCandidate>,
}

impl StaticProbe {
    pub fn new(architecture: Architecture, operating_system: OperatingSystem) -> Self {
        StaticProbe {
            architecture,
            operating_system,
            candidates: Vec::new(),
        }
    }

    /// A probe for the real host that never finds a tool chain.
    pub fn host_without_tool_chains() -> Self {
        StaticProbe::new(Architecture::host(), OperatingSystem::host())
    }

    pub fn with_candidate(mut self, candidate: ToolChainCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }
}

impl HostProbe for StaticProbe {
    fn detect_tool_chains(&self) -> Vec<ToolChainCandidate> {
        self.candidates.clone()
    }

    fn host_architecture(&self) -> Architecture {
        self.architecture.clone()
    }

    fn host_operating_system(&self) -> OperatingSystem {
        self.operating_system.clone()
    }
}
