//! Steam install lookup
//!
//! Walks every Steam installation (native, Flatpak, Snap) and its library
//! folders looking for `appmanifest_<id>.acf`.

use std::fs;
use std::path::{Path, PathBuf};

use super::vdf::{parse_library_folders, AppManifest};
use crate::logging::log_debug;

/// Steam roots relative to the home directory
const STEAM_PATHS: &[&str] = &[
    ".local/share/Steam",
    ".steam/debian-installation",
    ".steam/steam",
    ".var/app/com.valvesoftware.Steam/data/Steam",
    ".var/app/com.valvesoftware.Steam/.local/share/Steam",
    "snap/steam/common/.local/share/Steam",
];

/// Steam installations under `home`, deduplicated through symlinks
fn find_steam_installations(home: &Path) -> Vec<PathBuf> {
    let mut installations: Vec<PathBuf> = Vec::new();
    let mut seen: Vec<PathBuf> = Vec::new();

    for relative in STEAM_PATHS {
        let path = home.join(relative);
        if !path.join("steamapps").exists() {
            continue;
        }
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if seen.contains(&canonical) {
            continue;
        }
        log_debug(&format!("Found Steam installation: {}", path.display()));
        seen.push(canonical);
        installations.push(path);
    }

    installations
}

/// The installation itself plus every library listed in `libraryfolders.vdf`
fn library_folders(steam_path: &Path) -> Vec<PathBuf> {
    let mut folders = vec![steam_path.to_path_buf()];

    for vdf in ["steamapps/libraryfolders.vdf", "config/libraryfolders.vdf"] {
        let Ok(content) = fs::read_to_string(steam_path.join(vdf)) else {
            continue;
        };
        for path in parse_library_folders(&content).into_iter().map(PathBuf::from) {
            if path.exists() && !folders.contains(&path) {
                folders.push(path);
            }
        }
    }

    folders
}

/// Install directory of a fully installed Steam app, searching under `home`
pub fn find_install_path_in(home: &Path, app_id: &str) -> Option<PathBuf> {
    for steam_path in find_steam_installations(home) {
        for library in library_folders(&steam_path) {
            let steamapps = library.join("steamapps");
            let manifest_path = steamapps.join(format!("appmanifest_{}.acf", app_id));

            let Ok(content) = fs::read_to_string(&manifest_path) else {
                continue;
            };
            let Some(manifest) = AppManifest::from_vdf(&content) else {
                continue;
            };
            if manifest.app_id != app_id || !manifest.is_installed() {
                continue;
            }

            let install_path = steamapps.join("common").join(&manifest.install_dir);
            if install_path.is_dir() {
                return Some(install_path);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(steamapps: &Path, app_id: &str, dir: &str, flags: u32) {
        fs::create_dir_all(steamapps.join("common").join(dir)).unwrap();
        fs::write(
            steamapps.join(format!("appmanifest_{}.acf", app_id)),
            format!(
                "\"AppState\"\n{{\n\t\"appid\"\t\"{}\"\n\t\"StateFlags\"\t\"{}\"\n\t\"installdir\"\t\"{}\"\n}}\n",
                app_id, flags, dir
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_finds_game_in_secondary_library() {
        let home = TempDir::new().unwrap();
        let steam = home.path().join(".local/share/Steam");
        fs::create_dir_all(steam.join("steamapps")).unwrap();

        let library = home.path().join("games/SteamLibrary");
        write_manifest(&library.join("steamapps"), "1466060", "Tainted Grail", 4);

        fs::write(
            steam.join("steamapps/libraryfolders.vdf"),
            format!(
                "\"libraryfolders\" {{ \"0\" {{ \"path\" \"{}\" }} \"1\" {{ \"path\" \"{}\" }} }}",
                steam.display(),
                library.display()
            ),
        )
        .unwrap();

        let found = find_install_path_in(home.path(), "1466060").unwrap();
        assert_eq!(found, library.join("steamapps/common/Tainted Grail"));
        assert!(find_install_path_in(home.path(), "22380").is_none());
    }

    #[test]
    fn test_skips_incomplete_installs() {
        let home = TempDir::new().unwrap();
        let steamapps = home.path().join(".steam/steam/steamapps");
        write_manifest(&steamapps, "1466060", "Tainted Grail", 1026);

        assert!(find_install_path_in(home.path(), "1466060").is_none());
    }
}
