//! Game detection
//!
//! Locates an installed game from its store ids:
//! - Steam (native, Flatpak, Snap) via appmanifest_*.acf parsing
//! - GOG via Heroic's installed.json
//!
//! # Example
//!
//! ```rust,ignore
//! use foa_bepinex::game_finder::{GameLocator, SystemGameLocator};
//!
//! let locator = SystemGameLocator::from_home();
//! if let Some(path) = locator.find_by_app_ids(&["1466060", "1887281589"]) {
//!     println!("Found at {}", path.display());
//! }
//! ```

mod heroic;
mod steam;
mod vdf;

use std::path::PathBuf;

pub use heroic::find_gog_install_path_in;
pub use steam::find_install_path_in;
pub use vdf::{parse_library_folders, parse_vdf, AppManifest, VdfValue};

use crate::logging::log_info;

/// Finds a game installation by any of its store ids
pub trait GameLocator {
    fn find_by_app_ids(&self, ids: &[&str]) -> Option<PathBuf>;
}

/// Searches the Steam and Heroic installs under a home directory
#[derive(Debug, Clone)]
pub struct SystemGameLocator {
    home: PathBuf,
}

impl SystemGameLocator {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn from_home() -> Self {
        Self::new(dirs::home_dir().unwrap_or_default())
    }
}

impl GameLocator for SystemGameLocator {
    fn find_by_app_ids(&self, ids: &[&str]) -> Option<PathBuf> {
        for id in ids {
            let found = find_install_path_in(&self.home, id)
                .or_else(|| find_gog_install_path_in(&self.home, id));
            if let Some(path) = found {
                log_info(&format!("Found game for store id {}: {}", id, path.display()));
                return Some(path);
            }
        }
        None
    }
}

/// A locator that always answers with a configured path
#[derive(Debug, Clone)]
pub struct FixedPath(pub PathBuf);

impl GameLocator for FixedPath {
    fn find_by_app_ids(&self, _ids: &[&str]) -> Option<PathBuf> {
        self.0.is_dir().then(|| self.0.clone())
    }
}

/// Prefer a configured override, then search the system
pub enum Locator {
    Fixed(FixedPath),
    System(SystemGameLocator),
}

impl GameLocator for Locator {
    fn find_by_app_ids(&self, ids: &[&str]) -> Option<PathBuf> {
        match self {
            Locator::Fixed(fixed) => fixed.find_by_app_ids(ids),
            Locator::System(system) => system.find_by_app_ids(ids),
        }
    }
}
