//! Heroic Games Launcher lookup for GOG installs
//!
//! Heroic records GOG installs in `gog_store/installed.json`, keyed by the
//! GOG product id.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::logging::{log_debug, log_warning};

/// Heroic config roots relative to the home directory
const HEROIC_PATHS: &[&str] = &[
    ".config/heroic",                                     // Native
    ".var/app/com.heroicgameslauncher.hgl/config/heroic", // Flatpak
];

#[derive(Debug, Deserialize)]
struct GogInstalledGame {
    #[serde(rename = "appName")]
    app_name: String,
    install_path: Option<String>,
}

/// Heroic wraps the list as `{"installed": [...]}`; older versions wrote a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GogInstalled {
    Wrapped { installed: Vec<GogInstalledGame> },
    Bare(Vec<GogInstalledGame>),
}

impl GogInstalled {
    fn into_games(self) -> Vec<GogInstalledGame> {
        match self {
            GogInstalled::Wrapped { installed } => installed,
            GogInstalled::Bare(list) => list,
        }
    }
}

/// Install directory of a GOG game installed through Heroic, searching under `home`
pub fn find_gog_install_path_in(home: &Path, gog_id: &str) -> Option<PathBuf> {
    for relative in HEROIC_PATHS {
        let installed_json = home.join(relative).join("gog_store/installed.json");
        let Ok(content) = fs::read_to_string(&installed_json) else {
            continue;
        };
        log_debug(&format!("Reading Heroic GOG library: {}", installed_json.display()));

        let games = match serde_json::from_str::<GogInstalled>(&content) {
            Ok(parsed) => parsed.into_games(),
            Err(e) => {
                log_warning(&format!("Failed to parse {}: {}", installed_json.display(), e));
                continue;
            }
        };

        let found = games
            .into_iter()
            .filter(|g| g.app_name == gog_id)
            .filter_map(|g| g.install_path.map(PathBuf::from))
            .find(|p| p.is_dir());
        if found.is_some() {
            return found;
        }
    }

    None
}
