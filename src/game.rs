//! Game registration for Tainted Grail: The Fall of Avalon
//!
//! The record handed to the host when the extension loads, plus the small
//! capability interface the host calls back into (path query, setup, mod path,
//! executable).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ExtError;
use crate::game_finder::GameLocator;
use crate::logging::log_info;
use crate::probe::FileProbe;

// ============================================================================
// Constants
// ============================================================================

pub const GAME_ID: &str = "taintedgrailthefallofavalon";
pub const GAME_NAME: &str = "Tainted Grail: The Fall of Avalon";
pub const GAME_SHORT_NAME: &str = "TG:FoA";
pub const STEAM_ID: &str = "1466060";
pub const GOG_ID: &str = "1887281589";
pub const GAME_EXE_FILENAME: &str = "Fall of Avalon.exe";
pub const GAME_LOGO: &str = "gameart.png";

pub const GAME_DATA_DIR: &str = "Fall of Avalon_Data";

/// Relative path of the Mono managed assemblies
pub fn managed_dll_dir() -> PathBuf {
    Path::new(GAME_DATA_DIR).join("Managed")
}

/// Relative path of the IL2CPP metadata
pub fn il2cpp_dir() -> PathBuf {
    Path::new(GAME_DATA_DIR).join("il2cpp_data")
}

/// Relative path mods are deployed into
pub fn mod_path() -> PathBuf {
    Path::new("BepInEx").join("plugins")
}

// ============================================================================
// Registration Record
// ============================================================================

/// Static description of the game as the host sees it
#[derive(Debug, Clone, PartialEq)]
pub struct GameRegistration {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub merge_mods: bool,
    pub logo: &'static str,
    pub executable: &'static str,
    pub required_files: Vec<&'static str>,
    pub environment: BTreeMap<&'static str, &'static str>,
    pub details: BTreeMap<&'static str, &'static str>,
}

impl GameRegistration {
    pub fn fall_of_avalon() -> Self {
        Self {
            id: GAME_ID,
            name: GAME_NAME,
            short_name: GAME_SHORT_NAME,
            merge_mods: true,
            logo: GAME_LOGO,
            executable: GAME_EXE_FILENAME,
            required_files: vec![GAME_EXE_FILENAME],
            environment: BTreeMap::from([("SteamAPPId", STEAM_ID)]),
            details: BTreeMap::from([("steamAppId", STEAM_ID), ("gogAppId", GOG_ID)]),
        }
    }

    /// Store identifiers used to look the game up, in priority order
    pub fn store_ids(&self) -> Vec<&'static str> {
        ["steamAppId", "gogAppId"]
            .iter()
            .filter_map(|key| self.details.get(key).copied())
            .collect()
    }
}

// ============================================================================
// Host Callbacks
// ============================================================================

/// Callbacks the host invokes on a registered game
pub trait GameSupport {
    fn registration(&self) -> &GameRegistration;

    /// Absolute path of the game installation
    fn query_path(&self) -> Result<PathBuf, ExtError>;

    /// Prepare a discovered installation for modding
    fn setup(&self, discovery_path: &Path) -> Result<(), ExtError>;

    /// Mod directory, relative to the game root
    fn query_mod_path(&self) -> PathBuf {
        mod_path()
    }

    fn executable(&self) -> &'static str {
        self.registration().executable
    }
}

/// [`GameSupport`] for Fall of Avalon over a locator and a filesystem probe
pub struct AvalonGame<L, P> {
    registration: GameRegistration,
    locator: L,
    probe: P,
}

impl<L: GameLocator, P: FileProbe> AvalonGame<L, P> {
    pub fn new(locator: L, probe: P) -> Self {
        Self {
            registration: GameRegistration::fall_of_avalon(),
            locator,
            probe,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }
}

impl<L: GameLocator, P: FileProbe> GameSupport for AvalonGame<L, P> {
    fn registration(&self) -> &GameRegistration {
        &self.registration
    }

    fn query_path(&self) -> Result<PathBuf, ExtError> {
        let ids = self.registration.store_ids();
        self.locator
            .find_by_app_ids(&ids)
            .ok_or_else(|| ExtError::GameNotFound {
                game: self.registration.name.to_string(),
            })
    }

    fn setup(&self, discovery_path: &Path) -> Result<(), ExtError> {
        let plugins = discovery_path.join(self.query_mod_path());
        log_info(&format!("Ensuring mod directory exists: {}", plugins.display()));
        self.probe.ensure_dir(&plugins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::LocalFs;
    use tempfile::TempDir;

    struct FixedLocator(Option<PathBuf>);

    impl GameLocator for FixedLocator {
        fn find_by_app_ids(&self, ids: &[&str]) -> Option<PathBuf> {
            assert_eq!(ids, &[STEAM_ID, GOG_ID]);
            self.0.clone()
        }
    }

    #[test]
    fn test_registration_record() {
        let reg = GameRegistration::fall_of_avalon();
        assert_eq!(reg.id, "taintedgrailthefallofavalon");
        assert_eq!(reg.short_name, "TG:FoA");
        assert!(reg.merge_mods);
        assert_eq!(reg.required_files, vec!["Fall of Avalon.exe"]);
        assert_eq!(reg.environment.get("SteamAPPId"), Some(&"1466060"));
        assert_eq!(reg.details.get("gogAppId"), Some(&"1887281589"));
        assert_eq!(reg.store_ids(), vec![STEAM_ID, GOG_ID]);
    }

    #[test]
    fn test_query_path_uses_store_ids() {
        let game = AvalonGame::new(FixedLocator(Some(PathBuf::from("/games/foa"))), LocalFs);
        assert_eq!(game.query_path().unwrap(), PathBuf::from("/games/foa"));

        let missing = AvalonGame::new(FixedLocator(None), LocalFs);
        assert!(matches!(missing.query_path(), Err(ExtError::GameNotFound { .. })));
    }

    #[test]
    fn test_setup_creates_plugins_dir() {
        let tmp = TempDir::new().unwrap();
        let game = AvalonGame::new(FixedLocator(None), LocalFs);
        game.setup(tmp.path()).unwrap();
        assert!(tmp.path().join("BepInEx").join("plugins").is_dir());
        assert_eq!(game.query_mod_path(), PathBuf::from("BepInEx/plugins"));
        assert_eq!(game.executable(), "Fall of Avalon.exe");
    }
}
