//! Unity runtime build detection
//!
//! Fall of Avalon ships as either a Mono build or an IL2CPP build, and
//! BepInEx has a separate release line for each. These checks look at marker
//! files to decide which one is on disk, both for the game itself and for an
//! already-installed BepInEx.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExtError;
use crate::game::{il2cpp_dir, managed_dll_dir};
use crate::logging::{log_debug, log_detect};
use crate::probe::FileProbe;

const MONO_DLL_PREFIX: &str = "Mono.";
const LIBRARY_EXTENSION: &str = ".dll";
const IL2CPP_MARKER: &str = "il2cpp";

/// Relative path of BepInEx's own runtime files
pub fn loader_core_dir() -> PathBuf {
    Path::new("BepInEx").join("core")
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildVariant {
    /// Managed assemblies loaded by the Mono runtime (BepInEx 5)
    Mono,
    /// Ahead-of-time compiled IL2CPP build (BepInEx 6)
    Il2Cpp,
}

impl BuildVariant {
    pub fn display_name(&self) -> &'static str {
        match self {
            BuildVariant::Mono => "Mono (v5)",
            BuildVariant::Il2Cpp => "IL2CPP (v6)",
        }
    }

    /// Runtime tag the host's loader installer understands
    pub fn unity_build_tag(&self) -> &'static str {
        match self {
            BuildVariant::Mono => "unitymono",
            BuildVariant::Il2Cpp => "unityil2cpp",
        }
    }

    /// Mods are considered unstable on this build
    pub fn is_high_risk(&self) -> bool {
        matches!(self, BuildVariant::Il2Cpp)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Game Build
// ============================================================================

/// Determine which runtime build of the game is installed at `game_path`.
///
/// Mono wins if `Managed/` holds at least one `Mono.*.dll`; otherwise a
/// non-empty `il2cpp_data/` means IL2CPP. An empty or unrelated `Managed/`
/// falls through to the IL2CPP check.
pub fn classify_game_build(probe: &dyn FileProbe, game_path: &Path) -> Result<BuildVariant, ExtError> {
    let managed = game_path.join(managed_dll_dir());
    log_debug("Looking for Mono dir");
    if probe.is_dir(&managed) {
        log_debug("Found Mono dir");
        let mono_dlls: Vec<String> = probe
            .list_entries(&managed)?
            .into_iter()
            .filter(|f| f.starts_with(MONO_DLL_PREFIX) && f.ends_with(LIBRARY_EXTENSION))
            .collect();
        if !mono_dlls.is_empty() {
            log_debug(&format!("Found Mono DLLs: {:?}", mono_dlls));
            log_detect(&format!("Game build: {}", BuildVariant::Mono));
            return Ok(BuildVariant::Mono);
        }
    }

    let il2cpp = game_path.join(il2cpp_dir());
    log_debug("Looking for IL2CPP dir");
    if probe.is_dir(&il2cpp) {
        log_debug("Found IL2CPP dir");
        let entries = probe.list_entries(&il2cpp)?;
        if !entries.is_empty() {
            log_debug(&format!("Found IL2CPP entries: {:?}", entries));
            log_detect(&format!("Game build: {}", BuildVariant::Il2Cpp));
            return Ok(BuildVariant::Il2Cpp);
        }
    }

    Err(ExtError::Classification {
        managed_dir: managed_dll_dir().display().to_string(),
        il2cpp_dir: il2cpp_dir().display().to_string(),
    })
}

// ============================================================================
// Installed BepInEx Build
// ============================================================================

/// Determine which build an installed BepInEx targets.
///
/// `Ok(None)` means BepInEx is not installed yet. When `BepInEx/core` exists
/// but holds no IL2CPP assembly, Mono is assumed.
pub fn classify_installed_loader_build(
    probe: &dyn FileProbe,
    game_path: &Path,
) -> Result<Option<BuildVariant>, ExtError> {
    let core = game_path.join(loader_core_dir());
    if !probe.is_dir(&core) {
        log_debug("No BepInEx/core directory, BepInEx not installed yet");
        return Ok(None);
    }
    log_debug("Found BepInEx/core directory");

    let core_dlls = probe.list_entries(&core)?;
    let is_il2cpp = core_dlls
        .iter()
        .any(|f| f.to_lowercase().contains(IL2CPP_MARKER) && f.ends_with(LIBRARY_EXTENSION));

    if is_il2cpp {
        log_debug(&format!("Found IL2CPP BepInEx DLLs: {:?}", core_dlls));
        log_detect(&format!("Installed BepInEx build: {}", BuildVariant::Il2Cpp));
        return Ok(Some(BuildVariant::Il2Cpp));
    }

    log_debug("IL2CPP BepInEx DLLs not found, assuming Mono is installed");
    log_detect(&format!("Installed BepInEx build: {}", BuildVariant::Mono));
    Ok(Some(BuildVariant::Mono))
}
