use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::log_warning;

// ============================================================================
// Main App Config
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Skip store lookup and use this game folder
    #[serde(default)]
    pub game_path: Option<PathBuf>,
    /// Let the host fetch BepInEx without asking first
    #[serde(default = "default_true")]
    pub auto_download_bepinex: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_path: None,
            auto_download_bepinex: true,
        }
    }
}

impl AppConfig {
    fn get_path() -> PathBuf {
        crate::ext_path!("config.json")
    }

    /// Where the local host keeps its state tree
    pub fn get_state_path() -> PathBuf {
        crate::ext_path!("state.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::get_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => log_warning(&format!(
                        "Ignoring invalid config {}: {}",
                        path.display(),
                        e
                    )),
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        self.save_to(&Self::get_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }
}
