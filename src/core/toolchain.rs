//! Tool chains and their platform capabilities.
//!
//! A tool chain is eligible for a platform when one of its declared targets
//! matches the platform's architecture (and operating system, if the target
//! names one). A tool chain with no declared targets only targets the host.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::axis::{Named, NamedContainer};
use crate::core::errors::ModelError;
use crate::core::platform::{Architecture, OperatingSystem, Platform};
use crate::probe::HostProbe;

/// The compiler family of a tool chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolChainFamily {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolChainFamily {
    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChainFamily::Gcc => "gcc",
            ToolChainFamily::Clang => "clang",
            ToolChainFamily::AppleClang => "apple-clang",
            ToolChainFamily::Msvc => "msvc",
        }
    }
}

impl fmt::Display for ToolChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ToolChainFamily {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(ToolChainFamily::Gcc),
            "clang" => Ok(ToolChainFamily::Clang),
            "apple-clang" => Ok(ToolChainFamily::AppleClang),
            "msvc" | "visualcpp" => Ok(ToolChainFamily::Msvc),
            _ => Err(ModelError::configuration(
                "tool chain family",
                format!(
                    "invalid family '{}', valid values: gcc, clang, apple-clang, msvc",
                    s
                ),
            )),
        }
    }
}

/// A platform a tool chain can build for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCapability {
    pub architecture: Architecture,
    /// `None` matches any operating system.
    pub operating_system: Option<OperatingSystem>,
}

impl TargetCapability {
    pub fn new(architecture: Architecture) -> Self {
        TargetCapability {
            architecture,
            operating_system: None,
        }
    }

    pub fn with_os(mut self, operating_system: OperatingSystem) -> Self {
        self.operating_system = Some(operating_system);
        self
    }

    /// The capability of building for the machine this process runs on.
    pub fn host() -> Self {
        TargetCapability::new(Architecture::host()).with_os(OperatingSystem::host())
    }

    pub fn matches(&self, platform: &Platform) -> bool {
        &self.architecture == platform.architecture()
            && self
                .operating_system
                .as_ref()
                .map_or(true, |os| os == platform.operating_system())
    }
}

impl fmt::Display for TargetCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operating_system {
            Some(os) => write!(f, "{}-{}", self.architecture, os),
            None => write!(f, "{}", self.architecture),
        }
    }
}

/// A named, capability-qualified tool chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolChain {
    name: String,
    family: ToolChainFamily,
    cc: Option<PathBuf>,
    cxx: Option<PathBuf>,
    ar: Option<PathBuf>,
    targets: Vec<TargetCapability>,
    #[serde(skip)]
    host: TargetCapability,
}

impl ToolChain {
    pub fn new(name: impl Into<String>, family: ToolChainFamily) -> Self {
        ToolChain {
            name: name.into(),
            family,
            cc: None,
            cxx: None,
            ar: None,
            targets: Vec::new(),
            host: TargetCapability::host(),
        }
    }

    /// Override the host capability used when no targets are declared.
    pub fn with_host(mut self, host: TargetCapability) -> Self {
        self.host = host;
        self
    }

    pub fn with_cc(mut self, cc: impl Into<PathBuf>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn with_cxx(mut self, cxx: impl Into<PathBuf>) -> Self {
        self.cxx = Some(cxx.into());
        self
    }

    pub fn with_ar(mut self, ar: impl Into<PathBuf>) -> Self {
        self.ar = Some(ar.into());
        self
    }

    /// Declare that this tool chain builds for `architecture` on any OS.
    pub fn target(mut self, architecture: &str) -> Self {
        self.add_target(TargetCapability::new(Architecture::new(architecture)));
        self
    }

    /// Declare that this tool chain builds for `architecture` on `os`.
    pub fn target_os(mut self, architecture: &str, os: &str) -> Self {
        self.add_target(
            TargetCapability::new(Architecture::new(architecture))
                .with_os(OperatingSystem::new(os)),
        );
        self
    }

    pub fn add_target(&mut self, target: TargetCapability) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    pub fn family(&self) -> ToolChainFamily {
        self.family
    }

    pub fn cc(&self) -> Option<&Path> {
        self.cc.as_deref()
    }

    pub fn cxx(&self) -> Option<&Path> {
        self.cxx.as_deref()
    }

    pub fn ar(&self) -> Option<&Path> {
        self.ar.as_deref()
    }

    /// Declared targets. Empty means host only.
    pub fn targets(&self) -> &[TargetCapability] {
        &self.targets
    }

    /// Can this tool chain build binaries for `platform`?
    pub fn can_target(&self, platform: &Platform) -> bool {
        if self.targets.is_empty() {
            self.host.matches(platform)
        } else {
            self.targets.iter().any(|t| t.matches(platform))
        }
    }
}

impl Named for ToolChain {
    const KIND: &'static str = "tool chain";

    fn name(&self) -> &str {
        &self.name
    }
}

/// The tool chain axis.
///
/// Tool chains are kept in registration order, which is also the order the
/// variant generator tries them in.
#[derive(Debug, Clone, Default)]
pub struct ToolChainRegistry {
    tool_chains: NamedContainer<ToolChain>,
}

impl ToolChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tool_chain: ToolChain) -> Result<&mut ToolChain, ModelError> {
        self.tool_chains.add(tool_chain)
    }

    pub fn get(&self, name: &str) -> Option<&ToolChain> {
        self.tool_chains.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ToolChain> {
        self.tool_chains.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolChain> {
        self.tool_chains.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tool_chains.names()
    }

    pub fn len(&self) -> usize {
        self.tool_chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tool_chains.is_empty()
    }

    /// The first registered tool chain that can target `platform`.
    pub fn select_for(&self, platform: &Platform) -> Option<&ToolChain> {
        self.tool_chains.iter().find(|tc| tc.can_target(platform))
    }

    /// Add every tool chain the host probe can find.
    ///
    /// Returns the number added. Candidates whose name is already taken are
    /// skipped.
    pub fn add_default_tool_chains(&mut self, probe: &dyn HostProbe) -> usize {
        let host = probe.host_capability();
        let mut added = 0;
        for candidate in probe.detect_tool_chains() {
            let tool_chain = candidate.into_tool_chain(host.clone());
            let name = tool_chain.name().to_string();
            match self.add(tool_chain) {
                Ok(_) => {
                    tracing::info!("Using default tool chain `{}`", name);
                    added += 1;
                }
                Err(_) => tracing::debug!("Skipping duplicate probed tool chain `{}`", name),
            }
        }
        added
    }
}
