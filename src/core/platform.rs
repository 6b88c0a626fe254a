//! Target platforms.
//!
//! A platform is a named (architecture, operating system) pair. Architecture
//! and operating system names are normalised so that `amd64`, `x64` and
//! `x86_64` all describe the same machine.

use std::fmt;

use serde::Serialize;

use crate::core::axis::{Named, NamedContainer};

/// Name of the platform added when none is declared.
pub const DEFAULT_PLATFORM: &str = "host";

/// A CPU architecture with a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Architecture(String);

impl Architecture {
    /// Parse an architecture name, folding known aliases.
    pub fn new(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let canonical = match lower.as_str() {
            "x86_64" | "amd64" | "x64" | "x86-64" => "x86_64",
            "x86" | "i386" | "i486" | "i586" | "i686" | "ia-32" => "x86",
            "aarch64" | "arm64" | "arm-v8" => "aarch64",
            "arm" | "armv7" | "arm-v7" => "arm",
            "ia64" | "ia-64" => "ia64",
            other => other,
        };
        Architecture(canonical.to_string())
    }

    /// The architecture this process runs on.
    pub fn host() -> Self {
        Architecture::new(std::env::consts::ARCH)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An operating system with a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OperatingSystem(String);

impl OperatingSystem {
    /// Parse an operating system name, folding known aliases.
    pub fn new(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let canonical = match lower.as_str() {
            "macos" | "osx" | "os x" | "mac os x" | "macosx" | "darwin" => "macos",
            "windows" | "win32" | "win" => "windows",
            "solaris" | "sunos" => "solaris",
            other => other,
        };
        OperatingSystem(canonical.to_string())
    }

    /// The operating system this process runs on.
    pub fn host() -> Self {
        OperatingSystem::new(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    name: String,
    architecture: Architecture,
    operating_system: OperatingSystem,
}

impl Platform {
    pub fn new(
        name: impl Into<String>,
        architecture: Architecture,
        operating_system: OperatingSystem,
    ) -> Self {
        Platform {
            name: name.into(),
            architecture,
            operating_system,
        }
    }

    /// A platform describing the machine this process runs on.
    pub fn host(name: impl Into<String>) -> Self {
        Platform::new(name, Architecture::host(), OperatingSystem::host())
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn operating_system(&self) -> &OperatingSystem {
        &self.operating_system
    }
}

impl Named for Platform {
    const KIND: &'static str = "platform";

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}-{})",
            self.name, self.architecture, self.operating_system
        )
    }
}

pub type PlatformContainer = NamedContainer<Platform>;
