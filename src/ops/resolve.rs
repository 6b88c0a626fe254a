//! Model resolution operations.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::axis::{BuildType, BuildTypeContainer, Flavor, FlavorContainer};
use crate::core::element::names;
use crate::core::errors::ModelError;
use crate::core::manifest::{ModelManifest, RepositoryDecl, ToolChainDecl};
use crate::core::platform::{Architecture, OperatingSystem, Platform, PlatformContainer};
use crate::core::repository::{ArtifactRepository, BaseDirResolver, Repositories, RepositoryKind};
use crate::core::toolchain::{TargetCapability, ToolChain, ToolChainRegistry};
use crate::model::{DefaultNames, Model, NativeModelPlugin};
use crate::probe::{HostProbe, StaticProbe, SystemProbe};
use crate::util::context::GlobalContext;

/// Queue one configuration rule per axis the manifest declares.
///
/// Axes the manifest leaves out get no rule, so their default rules apply.
pub fn apply_manifest(model: &mut Model, manifest: &ModelManifest) -> Result<(), ModelError> {
    if !manifest.platforms.is_empty() {
        let platforms: Vec<Platform> = manifest
            .platforms
            .iter()
            .map(|decl| {
                Platform::new(
                    decl.name.clone(),
                    decl.architecture
                        .as_deref()
                        .map_or_else(Architecture::host, Architecture::new),
                    decl.os
                        .as_deref()
                        .map_or_else(OperatingSystem::host, OperatingSystem::new),
                )
            })
            .collect();
        model.configure::<PlatformContainer, _>(names::PLATFORMS, move |container| {
            for platform in platforms {
                container.add(platform)?;
            }
            Ok(())
        })?;
    }

    if !manifest.build_types.is_empty() {
        let build_types = manifest.build_types.clone();
        model.configure::<BuildTypeContainer, _>(names::BUILD_TYPES, move |container| {
            for name in build_types {
                container.add(BuildType::new(name))?;
            }
            Ok(())
        })?;
    }

    if !manifest.flavors.is_empty() {
        let flavors = manifest.flavors.clone();
        model.configure::<FlavorContainer, _>(names::FLAVORS, move |container| {
            for name in flavors {
                container.add(Flavor::new(name))?;
            }
            Ok(())
        })?;
    }

    if !manifest.tool_chains.is_empty() {
        let tool_chains: Vec<ToolChain> = manifest.tool_chains.iter().map(to_tool_chain).collect();
        model.configure::<ToolChainRegistry, _>(names::TOOL_CHAINS, move |container| {
            for tool_chain in tool_chains {
                container.add(tool_chain)?;
            }
            Ok(())
        })?;
    }

    if !manifest.repositories.is_empty() {
        // Kinds are checked now so a typo fails before anything runs
        let repositories = manifest
            .repositories
            .iter()
            .map(|decl| -> Result<_, ModelError> {
                Ok((decl.kind.parse::<RepositoryKind>()?, decl.clone()))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        model.configure::<Repositories, _>(names::REPOSITORIES, move |container| {
            for (kind, decl) in repositories {
                declare_repository(container, kind, &decl)?;
            }
            Ok(())
        })?;
    }

    Ok(())
}

fn to_tool_chain(decl: &ToolChainDecl) -> ToolChain {
    let mut tool_chain = ToolChain::new(decl.name.clone(), decl.family);
    if let Some(cc) = &decl.cc {
        tool_chain = tool_chain.with_cc(cc);
    }
    if let Some(cxx) = &decl.cxx {
        tool_chain = tool_chain.with_cxx(cxx);
    }
    if let Some(ar) = &decl.ar {
        tool_chain = tool_chain.with_ar(ar);
    }
    for target in &decl.targets {
        let mut capability = TargetCapability::new(Architecture::new(&target.architecture));
        if let Some(os) = &target.os {
            capability = capability.with_os(OperatingSystem::new(os));
        }
        tool_chain.add_target(capability);
    }
    tool_chain
}

fn declare_repository(
    repositories: &mut Repositories,
    kind: RepositoryKind,
    decl: &RepositoryDecl,
) -> Result<(), ModelError> {
    match repositories.create(kind, &decl.name)? {
        ArtifactRepository::Prebuilt(libraries) => {
            for lib in &decl.libraries {
                let library = libraries.create(lib.name.clone())?;
                for header in &lib.headers {
                    library.header_dir(header)?;
                }
                for binary in &lib.binaries {
                    library.binary_file(binary)?;
                }
            }
        }
    }
    Ok(())
}

/// The host probe selected by the configuration.
pub fn host_probe(ctx: &GlobalContext) -> Arc<dyn HostProbe> {
    let probe = &ctx.config().probe;
    if probe.is_enabled() {
        Arc::new(SystemProbe::new(probe.clone()))
    } else {
        tracing::debug!("Host probing disabled; no default tool chains");
        Arc::new(StaticProbe::host_without_tool_chains())
    }
}

/// Load the manifest, if the project has one.
pub fn load_manifest(ctx: &GlobalContext) -> Result<Option<ModelManifest>> {
    match ctx.find_manifest() {
        Some(path) => {
            tracing::debug!("Using manifest {}", path.display());
            ModelManifest::load(&path).map(Some)
        }
        None => {
            tracing::debug!("No manifest found; using defaults only");
            Ok(None)
        }
    }
}

/// Build the project's model with every rule queued but nothing run.
pub fn build_model(ctx: &GlobalContext) -> Result<Model> {
    build_model_with_probe(ctx, host_probe(ctx))
}

/// Build the project's model using `probe` for host inspection.
pub fn build_model_with_probe(ctx: &GlobalContext, probe: Arc<dyn HostProbe>) -> Result<Model> {
    let manifest = load_manifest(ctx)?;
    let resolver = Arc::new(BaseDirResolver::new(ctx.project_root()));

    let mut model = Model::new();
    NativeModelPlugin::new(probe, resolver)
        .with_defaults(DefaultNames::from_config(&ctx.config().defaults))
        .apply(&mut model)?;

    if let Some(manifest) = &manifest {
        apply_manifest(&mut model, manifest).context("failed to apply the model manifest")?;
    }
    Ok(model)
}

/// Build and fully resolve the project's model.
pub fn resolve_model(ctx: &GlobalContext) -> Result<Model> {
    let mut model = build_model(ctx)?;
    model.resolve()?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::axis::Named;
    use crate::test_support::fixtures::{self, model_from_manifest, CROSS_MANIFEST, X86_GCC_MANIFEST};
    use crate::test_support::FakeProbe;
    use crate::util::config::Config;
    use tempfile::TempDir;

    fn binary_names(model: &mut Model) -> Vec<String> {
        model
            .binaries()
            .unwrap()
            .iter()
            .unwrap()
            .map(|b| b.name().to_string())
            .collect()
    }

    #[test]
    fn test_manifest_end_to_end() {
        let mut model = model_from_manifest(FakeProbe::x86_linux().with_clang(), X86_GCC_MANIFEST);
        assert_eq!(
            binary_names(&mut model),
            vec!["x86DebugDefault", "x86ReleaseDefault"]
        );
        // A declared tool chain means the host is never probed
        assert_eq!(model.tool_chains().unwrap().names().collect::<Vec<_>>(), vec!["gcc"]);
    }

    #[test]
    fn test_manifest_skips_unsupported_platform() {
        let mut model = model_from_manifest(FakeProbe::x86_linux(), CROSS_MANIFEST);
        assert_eq!(binary_names(&mut model), vec!["x86DebugFree", "x86DebugPaid"]);
        assert_eq!(model.platforms().unwrap().len(), 2);
    }

    #[test]
    fn test_manifest_repositories() {
        let mut model = model_from_manifest(
            FakeProbe::x86_linux(),
            r#"
[[repository]]
name = "vendor"

[[repository.library]]
name = "zlib"
headers = ["vendor/zlib/include"]
binaries = ["vendor/zlib/lib/libz.a"]
"#,
        );
        model.resolve().unwrap();

        let repositories = model.repositories().unwrap();
        let zlib = repositories.resolve_library("zlib").unwrap();
        assert_eq!(
            zlib.headers(),
            &[Path::new(fixtures::PROJECT_ROOT).join("vendor/zlib/include")]
        );
        assert_eq!(repositories.get("vendor").unwrap().kind(), RepositoryKind::Prebuilt);
    }

    #[test]
    fn test_unknown_repository_kind() {
        let manifest = ModelManifest::parse(
            r#"
[[repository]]
name = "central"
kind = "maven"
"#,
        )
        .unwrap();
        let mut model = fixtures::native_model(FakeProbe::x86_linux());
        assert!(matches!(
            apply_manifest(&mut model, &manifest),
            Err(ModelError::Configuration { .. })
        ));
    }

    #[test]
    fn test_duplicate_declaration_in_manifest() {
        let mut model =
            model_from_manifest(FakeProbe::x86_linux(), "flavors = [\"free\", \"free\"]\n");
        let err = model.resolve().unwrap_err();
        assert!(matches!(err, ModelError::DuplicateRegistration { ref kind, .. } if kind == "flavor"));
    }

    #[test]
    fn test_build_model_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_config(Config::default());

        let mut model = build_model_with_probe(&ctx, Arc::new(FakeProbe::x86_linux().with_gcc()))
            .unwrap();
        assert!(!model.is_resolved());
        assert_eq!(
            binary_names(&mut model),
            vec!["hostDebugDefault", "hostReleaseDefault"]
        );
    }

    #[test]
    fn test_build_model_uses_config_defaults() {
        let tmp = TempDir::new().unwrap();
        fixtures::write_manifest(tmp.path(), "flavors = [\"free\"]\n");

        let mut config = Config::default();
        config.defaults.platform = Some("native".to_string());
        config.defaults.build_types = Some(vec!["release".to_string()]);
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_config(config);

        let mut model = build_model_with_probe(&ctx, Arc::new(FakeProbe::x86_linux().with_gcc()))
            .unwrap();
        assert_eq!(binary_names(&mut model), vec!["nativeReleaseFree"]);
    }

    #[test]
    fn test_disabled_probe_yields_static_probe() {
        let mut config = Config::default();
        config.probe.enabled = Some(false);
        let ctx = GlobalContext::with_cwd(std::env::temp_dir()).with_config(config);

        let probe = host_probe(&ctx);
        assert!(probe.detect_tool_chains().is_empty());
    }

    #[test]
    fn test_invalid_manifest_is_reported() {
        let tmp = TempDir::new().unwrap();
        fixtures::write_manifest(tmp.path(), "[[platform]]\n");
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_config(Config::default());

        let err = build_model(&ctx).unwrap_err();
        assert!(format!("{:#}", err).contains("Model.toml"));
    }
}
