//! BepInEx package selection
//!
//! One Nexus-hosted BepInEx package per runtime build, and the config record
//! handed to the host's loader installer.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detect::BuildVariant;
use crate::game::GAME_ID;

/// Where and what to download for a BepInEx package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderPackageDescriptor {
    pub game_id: String,
    pub domain_id: String,
    pub mod_id: String,
    pub file_id: String,
    pub archive_name: String,
    pub architecture: String,
    /// Semver compliant, build metadata allowed (`6.0.0-be+735b`)
    pub version: String,
    pub allow_auto_install: bool,
}

impl LoaderPackageDescriptor {
    fn nexus(mod_id: &str, file_id: &str, archive_name: &str, version: &str) -> Self {
        Self {
            game_id: GAME_ID.to_string(),
            domain_id: GAME_ID.to_string(),
            mod_id: mod_id.to_string(),
            file_id: file_id.to_string(),
            archive_name: archive_name.to_string(),
            architecture: "x64".to_string(),
            version: version.to_string(),
            allow_auto_install: false,
        }
    }

    /// BepInEx 5 for the Mono build
    pub fn bepinex5() -> Self {
        Self::nexus(
            "50",
            "162",
            "BepInEx Mono Windows x64-50-5-4-23-3-1752802821.zip",
            "5.4.23.3",
        )
    }

    /// BepInEx 6 bleeding edge for the IL2CPP build
    pub fn bepinex6() -> Self {
        Self::nexus(
            "16",
            "100",
            "BepinEx-16-6-0-0-be-735b-1749459702.zip",
            "6.0.0-be+735b",
        )
    }

    /// Nexus file page for this package
    pub fn nexus_url(&self) -> String {
        format!(
            "https://www.nexusmods.com/{}/mods/{}?tab=files&file_id={}",
            self.domain_id, self.mod_id, self.file_id
        )
    }
}

/// Package matching a detected game build
pub fn select_package(build: BuildVariant) -> LoaderPackageDescriptor {
    match build {
        BuildVariant::Mono => LoaderPackageDescriptor::bepinex5(),
        BuildVariant::Il2Cpp => LoaderPackageDescriptor::bepinex6(),
    }
}

/// Nexus mod id of the Mono package, whose description carries the
/// migration guide
pub fn mono_package_mod_id() -> String {
    LoaderPackageDescriptor::bepinex5().mod_id
}

pub type PackDownloader = Arc<dyn Fn() -> LoaderPackageDescriptor + Send + Sync>;

/// Registration handed to the host's BepInEx installer
#[derive(Clone)]
pub struct LoaderGameConfig {
    pub game_id: String,
    pub auto_download_bepinex: bool,
    pub unity_build: BuildVariant,
    pub custom_pack_downloader: PackDownloader,
}

impl LoaderGameConfig {
    pub fn for_build(build: BuildVariant, auto_download_bepinex: bool) -> Self {
        Self {
            game_id: GAME_ID.to_string(),
            auto_download_bepinex,
            unity_build: build,
            custom_pack_downloader: Arc::new(move || select_package(build)),
        }
    }

    pub fn download_info(&self) -> LoaderPackageDescriptor {
        (self.custom_pack_downloader)()
    }
}

impl fmt::Debug for LoaderGameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderGameConfig")
            .field("game_id", &self.game_id)
            .field("auto_download_bepinex", &self.auto_download_bepinex)
            .field("unity_build", &self.unity_build.unity_build_tag())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_package_per_build() {
        let mono = select_package(BuildVariant::Mono);
        assert_eq!(mono.mod_id, "50");
        assert_eq!(mono.file_id, "162");
        assert_eq!(mono.version, "5.4.23.3");

        let il2cpp = select_package(BuildVariant::Il2Cpp);
        assert_eq!(il2cpp.mod_id, "16");
        assert_eq!(il2cpp.file_id, "100");
        assert_eq!(il2cpp.version, "6.0.0-be+735b");

        for pkg in [mono, il2cpp] {
            assert_eq!(pkg.game_id, GAME_ID);
            assert_eq!(pkg.domain_id, GAME_ID);
            assert_eq!(pkg.architecture, "x64");
            assert!(!pkg.allow_auto_install);
        }
    }

    #[test]
    fn test_descriptor_wire_format() {
        let json = serde_json::to_value(LoaderPackageDescriptor::bepinex5()).unwrap();
        assert_eq!(json["modId"], "50");
        assert_eq!(json["archiveName"], "BepInEx Mono Windows x64-50-5-4-23-3-1752802821.zip");
        assert_eq!(json["allowAutoInstall"], false);
    }

    #[test]
    fn test_config_downloader_matches_build() {
        let config = LoaderGameConfig::for_build(BuildVariant::Il2Cpp, true);
        assert_eq!(config.game_id, GAME_ID);
        assert!(config.auto_download_bepinex);
        assert_eq!(config.unity_build.unity_build_tag(), "unityil2cpp");
        assert_eq!(config.download_info(), LoaderPackageDescriptor::bepinex6());
    }

    #[test]
    fn test_nexus_url() {
        assert_eq!(
            LoaderPackageDescriptor::bepinex5().nexus_url(),
            "https://www.nexusmods.com/taintedgrailthefallofavalon/mods/50?tab=files&file_id=162"
        );
        assert_eq!(mono_package_mod_id(), "50");
    }
}
