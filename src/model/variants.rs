//! Variant generation.
//!
//! Expands platform × build type × flavor into native binaries. Each
//! combination is built by the first registered tool chain that can target
//! its platform; combinations without such a tool chain are skipped.

use crate::core::axis::{BuildTypeContainer, FlavorContainer};
use crate::core::binary::{BinaryContainer, NativeBinary};
use crate::core::element::names;
use crate::core::errors::ModelError;
use crate::core::platform::PlatformContainer;
use crate::core::toolchain::ToolChainRegistry;
use crate::model::scheduler::{ModelRule, RuleContext, RuleDescriptor};
use crate::model::Phase;

/// Compute the binaries for the given axes.
///
/// Iteration is platform outer, build type middle, flavor inner, each in
/// container order.
pub fn generate_variants(
    tool_chains: &ToolChainRegistry,
    platforms: &PlatformContainer,
    build_types: &BuildTypeContainer,
    flavors: &FlavorContainer,
) -> Vec<NativeBinary> {
    let mut binaries = Vec::new();

    for platform in platforms {
        let Some(tool_chain) = tool_chains.select_for(platform) else {
            tracing::debug!(
                "No tool chain can target platform {}; skipping its variants",
                platform
            );
            continue;
        };

        for build_type in build_types {
            for flavor in flavors {
                let binary = NativeBinary::new(
                    platform.clone(),
                    build_type.clone(),
                    flavor.clone(),
                    tool_chain.clone(),
                );
                tracing::debug!("Created binary {}", binary);
                binaries.push(binary);
            }
        }
    }

    binaries
}

/// The single rule that fills the binary container.
pub struct CreateNativeBinaries {
    descriptor: RuleDescriptor,
}

impl CreateNativeBinaries {
    pub fn new() -> Self {
        CreateNativeBinaries {
            descriptor: RuleDescriptor::new("create native binaries", Phase::Variants)
                .reading(names::TOOL_CHAINS)
                .reading(names::PLATFORMS)
                .reading(names::BUILD_TYPES)
                .reading(names::FLAVORS)
                .mutating(names::BINARIES),
        }
    }
}

impl Default for CreateNativeBinaries {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRule for CreateNativeBinaries {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn apply(self: Box<Self>, ctx: &mut RuleContext<'_>) -> Result<(), ModelError> {
        let binaries = generate_variants(
            ctx.get::<ToolChainRegistry>(names::TOOL_CHAINS)?,
            ctx.get::<PlatformContainer>(names::PLATFORMS)?,
            ctx.get::<BuildTypeContainer>(names::BUILD_TYPES)?,
            ctx.get::<FlavorContainer>(names::FLAVORS)?,
        );

        let count = binaries.len();
        ctx.get_mut::<BinaryContainer>(names::BINARIES)?
            .populate(binaries)?;

        if count == 0 {
            tracing::info!("No binaries generated");
        } else {
            tracing::info!(
                "Generated {} binar{}",
                count,
                if count == 1 { "y" } else { "ies" }
            );
        }
        Ok(())
    }
}
