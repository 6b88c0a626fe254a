//! Test fixtures for common test scenarios.
//!
//! Pre-built plugins, manifests and models for unit tests.

use std::path::Path;
use std::sync::Arc;

use crate::core::manifest::{ModelManifest, MANIFEST_NAME};
use crate::core::repository::BaseDirResolver;
use crate::model::{Model, NativeModelPlugin};
use crate::ops::apply_manifest;

use super::FakeProbe;

/// Base directory used by fixture resolvers.
pub const PROJECT_ROOT: &str = "/work/project";

/// A native model plugin using `probe` and resolving paths under
/// [`PROJECT_ROOT`].
pub fn plugin(probe: FakeProbe) -> NativeModelPlugin {
    NativeModelPlugin::new(Arc::new(probe), Arc::new(BaseDirResolver::new(PROJECT_ROOT)))
}

/// A model with the native plugin applied.
pub fn native_model(probe: FakeProbe) -> Model {
    let mut model = Model::new();
    plugin(probe)
        .apply(&mut model)
        .expect("plugin applies to an empty model");
    model
}

/// A model with the native plugin and the rules of `manifest` applied.
pub fn model_from_manifest(probe: FakeProbe, manifest: &str) -> Model {
    let manifest = ModelManifest::parse(manifest).expect("fixture manifest parses");
    let mut model = native_model(probe);
    apply_manifest(&mut model, &manifest).expect("manifest rules can be added");
    model
}

/// One x86 Linux platform built by GCC with the default build types.
pub const X86_GCC_MANIFEST: &str = r#"
[[platform]]
name = "x86"
architecture = "x86"
os = "linux"

[[toolchain]]
name = "gcc"
family = "gcc"

[[toolchain.target]]
architecture = "x86"
"#;

/// Two platforms, one of which no tool chain can target.
pub const CROSS_MANIFEST: &str = r#"
build-types = ["debug"]
flavors = ["free", "paid"]

[[platform]]
name = "x86"
architecture = "x86"
os = "linux"

[[platform]]
name = "sparc"
architecture = "sparc64"
os = "solaris"

[[toolchain]]
name = "gcc"
family = "gcc"

[[toolchain.target]]
architecture = "x86"
"#;

/// Write `content` as the model manifest in `dir`.
pub fn write_manifest(dir: &Path, content: &str) {
    std::fs::write(dir.join(MANIFEST_NAME), content).expect("failed to write fixture manifest");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_manifests_parse() {
        assert!(ModelManifest::parse(X86_GCC_MANIFEST).is_ok());
        assert!(ModelManifest::parse(CROSS_MANIFEST).is_ok());
    }
}
