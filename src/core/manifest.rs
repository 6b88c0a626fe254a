//! Model.toml manifest parsing and schema.
//!
//! The manifest is the declarative form of user configuration. Each section
//! becomes a configuration rule that fills one axis container; sections left
//! out keep their axis empty so the default rules apply.
//!
//! ```toml
//! build-types = ["debug", "release"]
//! flavors = ["free", "paid"]
//!
//! [[platform]]
//! name = "x86"
//! architecture = "i386"
//! os = "linux"
//!
//! [[toolchain]]
//! name = "gcc"
//! family = "gcc"
//! cc = "/usr/bin/gcc"
//!
//! [[toolchain.target]]
//! architecture = "x86"
//!
//! [[repository]]
//! name = "vendor"
//!
//! [[repository.library]]
//! name = "zlib"
//! headers = ["vendor/zlib/include"]
//! binaries = ["vendor/zlib/lib/libz.a"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::toolchain::ToolChainFamily;

/// File name of the model manifest.
pub const MANIFEST_NAME: &str = "Model.toml";

/// The parsed Model.toml manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModelManifest {
    /// Declared target platforms
    #[serde(rename = "platform")]
    pub platforms: Vec<PlatformDecl>,

    /// Declared build types, in order
    pub build_types: Vec<String>,

    /// Declared flavors, in order
    pub flavors: Vec<String>,

    /// Declared tool chains, in preference order
    #[serde(rename = "toolchain")]
    pub tool_chains: Vec<ToolChainDecl>,

    /// Declared artifact repositories
    #[serde(rename = "repository")]
    pub repositories: Vec<RepositoryDecl>,
}

/// A `[[platform]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDecl {
    pub name: String,

    /// Defaults to the host architecture
    #[serde(default)]
    pub architecture: Option<String>,

    /// Defaults to the host operating system
    #[serde(default)]
    pub os: Option<String>,
}

/// A `[[toolchain]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolChainDecl {
    pub name: String,

    pub family: ToolChainFamily,

    #[serde(default)]
    pub cc: Option<PathBuf>,

    #[serde(default)]
    pub cxx: Option<PathBuf>,

    #[serde(default)]
    pub ar: Option<PathBuf>,

    /// Target capabilities; empty means host only
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDecl>,
}

/// A `[[toolchain.target]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDecl {
    pub architecture: String,

    #[serde(default)]
    pub os: Option<String>,
}

/// A `[[repository]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDecl {
    pub name: String,

    #[serde(default = "default_repository_kind")]
    pub kind: String,

    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryDecl>,
}

fn default_repository_kind() -> String {
    "prebuilt".to_string()
}

/// A `[[repository.library]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDecl {
    pub name: String,

    #[serde(default)]
    pub headers: Vec<PathBuf>,

    #[serde(default)]
    pub binaries: Vec<PathBuf>,
}

impl ModelManifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("invalid manifest: {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ModelManifest =
            toml::from_str(content).with_context(|| format!("failed to parse {}", MANIFEST_NAME))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check the parts of the schema serde cannot express.
    fn validate(&self) -> Result<()> {
        let names = self
            .platforms
            .iter()
            .map(|p| ("platform", p.name.as_str()))
            .chain(self.build_types.iter().map(|b| ("build type", b.as_str())))
            .chain(self.flavors.iter().map(|f| ("flavor", f.as_str())))
            .chain(self.tool_chains.iter().map(|t| ("tool chain", t.name.as_str())))
            .chain(self.repositories.iter().map(|r| ("repository", r.name.as_str())))
            .chain(
                self.repositories
                    .iter()
                    .flat_map(|r| r.libraries.iter())
                    .map(|l| ("library", l.name.as_str())),
            );

        for (kind, name) in names {
            if name.trim().is_empty() {
                bail!("{} names must not be empty", kind);
            }
        }

        for tool_chain in &self.tool_chains {
            if tool_chain.targets.iter().any(|t| t.architecture.trim().is_empty()) {
                bail!(
                    "tool chain `{}` declares a target without an architecture",
                    tool_chain.name
                );
            }
        }
        Ok(())
    }

    /// Whether the manifest declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self == &ModelManifest::default()
    }
}

impl std::str::FromStr for ModelManifest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
