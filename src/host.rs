//! Host capabilities
//!
//! Everything the extension needs from the mod manager it runs inside:
//! locating the game, filesystem access, persisted state, dialogs and the
//! BepInEx installer. The orchestrator and reminder only talk to the host
//! through [`ExtensionApi`].

use std::path::PathBuf;

use crate::error::ExtError;
use crate::loader::LoaderGameConfig;
use crate::probe::FileProbe;
use crate::state::StateStore;
use crate::text::{interpolate, Replacements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogAction {
    pub label: String,
    pub default: bool,
}

impl DialogAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: false,
        }
    }

    pub fn default_action(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: true,
        }
    }
}

/// A modal dialog. `bbcode` is already translated and interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub bbcode: String,
    pub actions: Vec<DialogAction>,
}

pub trait ExtensionApi {
    /// Whether the host's BepInEx integration is loaded
    fn loader_injection_available(&self) -> bool;

    /// Root of the game installation
    fn query_game_path(&self) -> Result<PathBuf, ExtError>;

    fn probe(&self) -> &dyn FileProbe;

    fn store(&self) -> &dyn StateStore;

    /// Whether the host may fetch BepInEx without asking
    fn auto_download_bepinex(&self) -> bool {
        true
    }

    fn translate(&self, template: &str, replace: &Replacements) -> String {
        interpolate(template, replace)
    }

    /// Present `dialog` and block until the user closes it. Returns the index
    /// of the chosen action, or `None` if the dialog was dismissed.
    fn show_dialog(&self, dialog: &Dialog) -> Option<usize>;

    /// Hand the game to the host's BepInEx installer. The host owns the
    /// download and install from here on.
    fn add_loader_game(&self, config: LoaderGameConfig) -> Result<(), ExtError>;

    fn open_mod_page(&self, game_id: &str, mod_id: &str, source: &str) -> Result<(), ExtError>;
}
