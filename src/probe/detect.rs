//! Tool chain detection on the real host.

use std::path::{Path, PathBuf};

use which::which;

use crate::core::toolchain::ToolChainFamily;
use crate::util::config::ProbeConfig;

use super::{HostProbe, ToolChainCandidate};

/// Probe that searches the environment and `PATH` for compilers.
///
/// Detection order:
/// 1. Tool paths from the `[probe]` config section
/// 2. On Windows: MSVC from a developer command prompt
/// 3. The `CC` environment variable (with `CXX`/`AR`)
/// 4. `gcc` and `clang` on `PATH`
///
/// At most one candidate per family is reported.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe {
    config: ProbeConfig,
}

impl SystemProbe {
    pub fn new(config: ProbeConfig) -> Self {
        SystemProbe { config }
    }

    /// Try to create a candidate from config file settings.
    fn try_detect_from_config(&self) -> Option<ToolChainCandidate> {
        let cc = self.config.cc.as_ref()?;
        if !cc.exists() {
            tracing::warn!("Configured C compiler not found: {}", cc.display());
            return None;
        }

        let cxx = self
            .config
            .cxx
            .clone()
            .filter(|p| p.exists())
            .unwrap_or_else(|| infer_cxx(cc));
        let ar = self
            .config
            .ar
            .clone()
            .filter(|p| p.exists())
            .or_else(find_ar);

        tracing::debug!("Using C compiler from config: {}", cc.display());
        Some(candidate(detect_compiler_family(cc), cc.clone(), Some(cxx), ar))
    }

    /// Try to create a candidate from the `CC` environment variable.
    fn try_detect_from_env(&self) -> Option<ToolChainCandidate> {
        let cc = PathBuf::from(std::env::var_os("CC")?);
        let cc = if cc.is_absolute() { cc } else { which(&cc).ok()? };

        let cxx = std::env::var_os("CXX")
            .map(PathBuf::from)
            .unwrap_or_else(|| infer_cxx(&cc));
        let ar = std::env::var_os("AR").map(PathBuf::from).or_else(find_ar);

        tracing::debug!("Using C compiler from CC: {}", cc.display());
        Some(candidate(detect_compiler_family(&cc), cc, Some(cxx), ar))
    }

    /// Try to find a compiler by program name on `PATH`.
    fn try_detect_program(&self, program: &str) -> Option<ToolChainCandidate> {
        let cc = which(program).ok()?;
        let cxx = infer_cxx(&cc);
        let cxx = which(&cxx).ok().or(Some(cxx));
        Some(candidate(detect_compiler_family(&cc), cc, cxx, find_ar()))
    }
}

impl HostProbe for SystemProbe {
    fn detect_tool_chains(&self) -> Vec<ToolChainCandidate> {
        if !self.config.is_enabled() {
            tracing::debug!("Tool chain probing disabled by configuration");
            return Vec::new();
        }

        let found = [
            self.try_detect_from_config(),
            try_detect_msvc(),
            self.try_detect_from_env(),
            self.try_detect_program("gcc"),
            self.try_detect_program("clang"),
        ];

        first_per_family(found.into_iter().flatten())
    }
}

/// Keep the first candidate of each family, in detection order.
fn first_per_family(
    found: impl IntoIterator<Item = ToolChainCandidate>,
) -> Vec<ToolChainCandidate> {
    let mut candidates: Vec<ToolChainCandidate> = Vec::new();
    for candidate in found {
        if candidates.iter().any(|c| c.family == candidate.family) {
            continue;
        }
        tracing::debug!(
            "Found {} tool chain at {}",
            candidate.family,
            candidate.cc.display()
        );
        candidates.push(candidate);
    }
    candidates
}

fn candidate(
    family: ToolChainFamily,
    cc: PathBuf,
    cxx: Option<PathBuf>,
    ar: Option<PathBuf>,
) -> ToolChainCandidate {
    ToolChainCandidate { family, cc, cxx, ar }
}

fn find_ar() -> Option<PathBuf> {
    which("ar").or_else(|_| which("llvm-ar")).ok()
}

/// Detect MSVC when running inside a developer command prompt.
#[cfg(target_os = "windows")]
fn try_detect_msvc() -> Option<ToolChainCandidate> {
    let cl = which("cl").ok()?;
    if std::env::var_os("INCLUDE").is_none() || std::env::var_os("LIB").is_none() {
        tracing::debug!("cl.exe found but the MSVC environment is not configured");
        return None;
    }
    let lib = which("lib").ok();
    Some(candidate(ToolChainFamily::Msvc, cl.clone(), Some(cl), lib))
}

#[cfg(not(target_os = "windows"))]
fn try_detect_msvc() -> Option<ToolChainCandidate> {
    None
}

/// Infer the C++ driver from a C compiler path (`gcc` → `g++`, `cc` → `c++`).
pub fn infer_cxx(cc: &Path) -> PathBuf {
    let cc_str = cc.to_string_lossy();

    if cc_str.ends_with("gcc") {
        return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 2]));
    }

    if cc_str.ends_with("clang") {
        return PathBuf::from(format!("{}++", cc_str));
    }

    // Only a complete "cc" basename, not "mycc"
    let is_standalone_cc = cc_str == "cc"
        || cc_str.ends_with("/cc")
        || cc_str.ends_with("\\cc")
        || cc_str.ends_with("-cc");

    if is_standalone_cc {
        return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 1]));
    }

    PathBuf::from(format!("{}++", cc_str))
}

/// Detect whether the compiler is GCC, Clang, Apple Clang or MSVC.
pub fn detect_compiler_family(cc: &Path) -> ToolChainFamily {
    let name = cc
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if name == "cl" {
        return ToolChainFamily::Msvc;
    }
    if name.contains("clang") {
        return detect_clang_variant(cc);
    }
    if name.contains("gcc") || name.contains("g++") {
        return ToolChainFamily::Gcc;
    }

    // Generic names like `cc`: ask the compiler
    match version_output(cc) {
        Some(stdout) if stdout.contains("clang") => detect_clang_variant(cc),
        _ => ToolChainFamily::Gcc,
    }
}

fn detect_clang_variant(cc: &Path) -> ToolChainFamily {
    match version_output(cc) {
        Some(stdout) if stdout.contains("apple") => ToolChainFamily::AppleClang,
        _ => ToolChainFamily::Clang,
    }
}

fn version_output(cc: &Path) -> Option<String> {
    let output = std::process::Command::new(cc).arg("--version").output();
    match output {
        Ok(output) => Some(String::from_utf8_lossy(&output.stdout).to_lowercase()),
        Err(e) => {
            tracing::debug!("Failed to run {} --version: {}", cc.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_cxx() {
        assert_eq!(infer_cxx(Path::new("gcc")), PathBuf::from("g++"));
        assert_eq!(
            infer_cxx(Path::new("/usr/bin/x86_64-linux-gnu-gcc")),
            PathBuf::from("/usr/bin/x86_64-linux-gnu-g++")
        );
        assert_eq!(infer_cxx(Path::new("clang")), PathBuf::from("clang++"));
        assert_eq!(infer_cxx(Path::new("/usr/bin/cc")), PathBuf::from("/usr/bin/c++"));
        assert_eq!(infer_cxx(Path::new("tcc")), PathBuf::from("tcc++"));
    }

    #[test]
    fn test_family_from_name() {
        assert_eq!(
            detect_compiler_family(Path::new("/opt/gcc-13/bin/x86_64-linux-gnu-gcc")),
            ToolChainFamily::Gcc
        );
        assert_eq!(detect_compiler_family(Path::new("cl.exe")), ToolChainFamily::Msvc);
    }

    #[test]
    fn test_disabled_probe_finds_nothing() {
        let probe = SystemProbe::new(ProbeConfig {
            enabled: Some(false),
            ..ProbeConfig::default()
        });
        assert!(probe.detect_tool_chains().is_empty());
    }

    #[test]
    fn test_missing_configured_compiler_is_skipped() {
        let probe = SystemProbe::new(ProbeConfig {
            cc: Some(PathBuf::from("/nonexistent/bin/gcc")),
            ..ProbeConfig::default()
        });
        assert!(probe.try_detect_from_config().is_none());
    }

    #[test]
    fn test_first_candidate_per_family_wins() {
        let configured = ToolChainCandidate::new(ToolChainFamily::Gcc, "/opt/gcc-13/bin/gcc");
        let from_env = ToolChainCandidate::new(ToolChainFamily::Clang, "/usr/bin/clang");
        let on_path = ToolChainCandidate::new(ToolChainFamily::Gcc, "/usr/bin/gcc");

        let candidates = first_per_family(vec![configured.clone(), from_env.clone(), on_path]);
        assert_eq!(candidates, vec![configured, from_env]);
    }
}
