//! Test utilities and mocks for unit tests.
//!
//! The only I/O the model performs is host probing, so the main mock here is
//! [`FakeProbe`]: a probe with a fixed host and fixed tool chain candidates
//! that counts how often detection runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{fixtures, FakeProbe};
//!
//! #[test]
//! fn test_example() {
//!     let mut model = Model::new();
//!     fixtures::plugin(FakeProbe::x86_linux().with_gcc())
//!         .apply(&mut model)
//!         .unwrap();
//!     assert_eq!(model.binaries().unwrap().len().unwrap(), 2);
//! }
//! ```

pub mod fixtures;

use std::cell::Cell;

use crate::core::platform::{Architecture, OperatingSystem};
use crate::core::toolchain::ToolChainFamily;
use crate::probe::{HostProbe, ToolChainCandidate};

/// Mock host probe.
#[derive(Debug, Clone)]
pub struct FakeProbe {
    architecture: Architecture,
    operating_system: OperatingSystem,
    candidates: Vec<ToolChainCandidate>,
    detections: Cell<usize>,
}

impl FakeProbe {
    /// A probe for the given host that finds no tool chain.
    pub fn new(architecture: &str, operating_system: &str) -> Self {
        FakeProbe {
            architecture: Architecture::new(architecture),
            operating_system: OperatingSystem::new(operating_system),
            candidates: Vec::new(),
            detections: Cell::new(0),
        }
    }

    /// A 32-bit x86 Linux host.
    pub fn x86_linux() -> Self {
        FakeProbe::new("x86", "linux")
    }

    pub fn with_candidate(mut self, candidate: ToolChainCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Report a GCC installation in /usr/bin.
    pub fn with_gcc(self) -> Self {
        self.with_candidate(
            ToolChainCandidate::new(ToolChainFamily::Gcc, "/usr/bin/gcc")
                .with_cxx("/usr/bin/g++")
                .with_ar("/usr/bin/ar"),
        )
    }

    /// Report a Clang installation in /usr/bin.
    pub fn with_clang(self) -> Self {
        self.with_candidate(
            ToolChainCandidate::new(ToolChainFamily::Clang, "/usr/bin/clang")
                .with_cxx("/usr/bin/clang++")
                .with_ar("/usr/bin/llvm-ar"),
        )
    }

    /// How many times tool chain detection ran.
    pub fn detections(&self) -> usize {
        self.detections.get()
    }
}

impl HostProbe for FakeProbe {
    fn detect_tool_chains(&self) -> Vec<ToolChainCandidate> {
        self.detections.set(self.detections.get() + 1);
        self.candidates.clone()
    }

    fn host_architecture(&self) -> Architecture {
        self.architecture.clone()
    }

    fn host_operating_system(&self) -> OperatingSystem {
        self.operating_system.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_probe_counts_detections() {
        let probe = FakeProbe::x86_linux().with_gcc();
        assert_eq!(probe.detections(), 0);
        assert_eq!(probe.detect_tool_chains().len(), 1);
        assert_eq!(probe.detections(), 1);
        assert_eq!(probe.host_platform("host").architecture().as_str(), "x86");
    }
}
