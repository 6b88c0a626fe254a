//! `native-model toolchain` command

use anyhow::Result;

use native_model::ops::host_probe;
use native_model::util::diagnostic::{self, suggestions, Diagnostic};
use native_model::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    let probe = host_probe(ctx);

    let host = probe.host_capability();
    println!("Host: {}", host);
    println!();

    let candidates = probe.detect_tool_chains();
    if candidates.is_empty() {
        diagnostic::emit(
            &Diagnostic::warning("no tool chain found on this host")
                .with_suggestion(suggestions::NO_TOOLCHAIN),
            ctx.color(),
        );
        return Ok(());
    }

    println!("Tool chains:");
    for candidate in candidates {
        println!("  {}", candidate.family);
        println!("    CC:  {}", candidate.cc.display());
        match &candidate.cxx {
            Some(cxx) => println!("    CXX: {}", cxx.display()),
            None => println!("    CXX: not found"),
        }
        match &candidate.ar {
            Some(ar) => println!("    AR:  {}", ar.display()),
            None => println!("    AR:  not found"),
        }
    }

    Ok(())
}
