//! `native-model binaries` command

use anyhow::Result;
use serde::Serialize;

use native_model::ops::resolve_model;
use native_model::util::diagnostic::{self, suggestions, Diagnostic};
use native_model::{GlobalContext, NativeBinary};

use crate::cli::BinariesArgs;

#[derive(Serialize)]
struct BinariesOutput<'a> {
    fingerprint: String,
    binaries: Vec<&'a NativeBinary>,
}

pub fn execute(args: BinariesArgs, ctx: &GlobalContext) -> Result<()> {
    let mut model = resolve_model(ctx)?;
    let binaries = model.binaries()?;

    if args.json {
        let output = BinariesOutput {
            fingerprint: binaries.fingerprint()?,
            binaries: binaries.iter()?.collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if binaries.is_empty()? {
        let mut warning = Diagnostic::warning("the model resolved to no binaries")
            .with_suggestion(suggestions::NO_BINARIES);
        if let Some(manifest) = ctx.find_manifest() {
            warning = warning.with_location(manifest);
        }
        diagnostic::emit(&warning, ctx.color());
        return Ok(());
    }

    for binary in binaries.iter()? {
        println!("  {}", binary);
    }
    println!();
    println!("{} binaries, fingerprint {}", binaries.len()?, binaries.fingerprint()?);

    Ok(())
}
