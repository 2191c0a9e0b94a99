//! FoA BepInEx - Tainted Grail: The Fall of Avalon support for mod managers
//!
//! Library crate with the game registration, Unity build detection, BepInEx
//! package selection and the Mono migration reminder. Hosts plug in through
//! [`host::ExtensionApi`]; the CLI binary drives it with [`local_host`].

#[macro_use]
pub mod paths;

pub mod config;
pub mod detect;
pub mod error;
pub mod game;
pub mod game_finder;
pub mod host;
pub mod loader;
pub mod local_host;
pub mod logging;
pub mod orchestrator;
pub mod probe;
pub mod reminder;
pub mod state;
pub mod text;
