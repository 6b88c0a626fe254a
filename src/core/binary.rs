//! Native binaries and the binary container.
//!
//! A binary is one concrete build variant: a (platform, build type, flavor)
//! combination paired with the tool chain that builds it. The container is
//! filled exactly once, by the variant generator.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::core::axis::{BuildType, Flavor, Named};
use crate::core::element::names;
use crate::core::errors::ModelError;
use crate::core::platform::Platform;
use crate::core::toolchain::ToolChain;
use crate::model::Phase;
use crate::util::hash::Fingerprint;

/// A concrete build variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeBinary {
    name: String,
    platform: Platform,
    build_type: BuildType,
    flavor: Flavor,
    tool_chain: ToolChain,
}

impl NativeBinary {
    pub fn new(
        platform: Platform,
        build_type: BuildType,
        flavor: Flavor,
        tool_chain: ToolChain,
    ) -> Self {
        let name = binary_name(&[platform.name(), build_type.name(), flavor.name()]);
        NativeBinary {
            name,
            platform,
            build_type,
            flavor,
            tool_chain,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn build_type(&self) -> &BuildType {
        &self.build_type
    }

    pub fn flavor(&self) -> &Flavor {
        &self.flavor
    }

    pub fn tool_chain(&self) -> &ToolChain {
        &self.tool_chain
    }
}

impl Named for NativeBinary {
    const KIND: &'static str = "binary";

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NativeBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} / {} / {}] with {}",
            self.name,
            self.platform.name(),
            self.build_type.name(),
            self.flavor.name(),
            self.tool_chain.name()
        )
    }
}

/// Join name segments in lower camel case: `["x86", "debug", "default"]`
/// becomes `x86DebugDefault`.
pub fn binary_name(segments: &[&str]) -> String {
    let mut name = String::new();
    for (i, segment) in segments.iter().filter(|s| !s.is_empty()).enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                name.extend(first.to_lowercase());
            } else {
                name.extend(first.to_uppercase());
            }
            name.push_str(chars.as_str());
        }
    }
    name
}

/// The generated binaries.
///
/// Reading the container before it has been populated fails with
/// [`ModelError::NotYetResolved`].
#[derive(Debug, Clone, Default)]
pub struct BinaryContainer {
    binaries: Option<Vec<NativeBinary>>,
}

impl BinaryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the generated binaries. Only the first call succeeds.
    ///
    /// Names are compared as given. Axis values whose names differ only in the
    /// case of a leading letter (`Linux` and `linux`) compose to the same
    /// binary name and are rejected here.
    pub fn populate(&mut self, binaries: Vec<NativeBinary>) -> Result<(), ModelError> {
        if self.binaries.is_some() {
            return Err(ModelError::Regeneration {
                name: names::BINARIES.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for binary in &binaries {
            if !seen.insert(binary.name()) {
                return Err(ModelError::DuplicateRegistration {
                    name: binary.name().to_string(),
                    kind: NativeBinary::KIND.to_string(),
                });
            }
        }
        self.binaries = Some(binaries);
        Ok(())
    }

    /// Whether the variant generator has run.
    pub fn is_resolved(&self) -> bool {
        self.binaries.is_some()
    }

    fn resolved(&self) -> Result<&[NativeBinary], ModelError> {
        self.binaries
            .as_deref()
            .ok_or_else(|| ModelError::NotYetResolved {
                name: names::BINARIES.to_string(),
                phase: Phase::Variants,
            })
    }

    /// Iterate binaries in generation order.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, NativeBinary>, ModelError> {
        Ok(self.resolved()?.iter())
    }

    pub fn get(&self, name: &str) -> Result<Option<&NativeBinary>, ModelError> {
        Ok(self.resolved()?.iter().find(|b| b.name() == name))
    }

    pub fn len(&self) -> Result<usize, ModelError> {
        Ok(self.resolved()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ModelError> {
        Ok(self.resolved()?.is_empty())
    }

    /// Stable fingerprint of the generated variants.
    ///
    /// Two resolutions of the same model configuration produce the same value.
    pub fn fingerprint(&self) -> Result<String, ModelError> {
        let mut fp = Fingerprint::new();
        for binary in self.resolved()? {
            fp.update_str(binary.name())
                .update_str(binary.platform().architecture().as_str())
                .update_str(binary.platform().operating_system().as_str())
                .update_str(binary.tool_chain().name())
                .update_str(binary.tool_chain().family().as_str())
                .update_opt(binary.tool_chain().cc().and_then(|p| p.to_str()));
        }
        Ok(fp.finish_short())
    }
}
