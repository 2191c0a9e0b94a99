//! Terminal-backed host
//!
//! Runs the extension outside a mod manager: the real filesystem, Steam and
//! Heroic lookup, a JSON state file, dialogs on the terminal. Loader installs
//! are not performed; the request is logged and the package page printed.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::error::ExtError;
use crate::game::{AvalonGame, GameSupport};
use crate::game_finder::{FixedPath, Locator, SystemGameLocator};
use crate::host::{Dialog, DialogKind, ExtensionApi};
use crate::loader::LoaderGameConfig;
use crate::logging::{log_info, log_install, log_warning};
use crate::probe::{FileProbe, LocalFs};
use crate::state::{JsonStateStore, StateStore};
use crate::text::bbcode_to_plain;

pub struct LocalHost {
    game: AvalonGame<Locator, LocalFs>,
    store: JsonStateStore,
    auto_download: bool,
    interactive: bool,
    open_browser: bool,
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl LocalHost {
    /// Host over stdin/stdout, the on-disk state file and `config`
    pub fn new(config: &AppConfig, interactive: bool) -> Self {
        let store = JsonStateStore::open(&AppConfig::get_state_path());
        let mut host = Self::with_io(
            config,
            store,
            Box::new(std::io::BufReader::new(std::io::stdin())),
            Box::new(std::io::stdout()),
        );
        host.interactive = interactive;
        host.open_browser = interactive;
        host
    }

    /// Host with explicit state and terminal streams. Non-interactive until
    /// [`LocalHost::interactive`] is set.
    pub fn with_io(
        config: &AppConfig,
        store: JsonStateStore,
        input: Box<dyn BufRead + Send>,
        output: Box<dyn Write + Send>,
    ) -> Self {
        let locator = match config.game_path {
            Some(ref path) => Locator::Fixed(FixedPath(path.clone())),
            None => Locator::System(SystemGameLocator::from_home()),
        };

        Self {
            game: AvalonGame::new(locator, LocalFs),
            store,
            auto_download: config.auto_download_bepinex,
            interactive: false,
            open_browser: false,
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn game(&self) -> &AvalonGame<Locator, LocalFs> {
        &self.game
    }

    pub fn state(&self) -> &JsonStateStore {
        &self.store
    }

    fn say(&self, text: &str) {
        let mut out = self.output.lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn read_choice(&self, action_count: usize) -> Option<usize> {
        let mut line = String::new();
        if self.input.lock().read_line(&mut line).ok()? == 0 {
            return None;
        }
        let n: usize = line.trim().parse().ok()?;
        (1..=action_count).contains(&n).then(|| n - 1)
    }
}

impl ExtensionApi for LocalHost {
    fn loader_injection_available(&self) -> bool {
        true
    }

    fn query_game_path(&self) -> Result<PathBuf, ExtError> {
        let path = self.game.query_path()?;
        self.game.setup(&path)?;
        Ok(path)
    }

    fn probe(&self) -> &dyn FileProbe {
        self.game.probe()
    }

    fn store(&self) -> &dyn StateStore {
        &self.store
    }

    fn auto_download_bepinex(&self) -> bool {
        self.auto_download
    }

    fn show_dialog(&self, dialog: &Dialog) -> Option<usize> {
        let marker = match dialog.kind {
            DialogKind::Info => "INFO",
            DialogKind::Error => "ERROR",
        };
        let mut text = format!("\n[{}] {}\n\n{}\n", marker, dialog.title, bbcode_to_plain(&dialog.bbcode));
        for (i, action) in dialog.actions.iter().enumerate() {
            let default = if action.default { " (default)" } else { "" };
            text.push_str(&format!("\n  {}) {}{}", i + 1, action.label, default));
        }
        self.say(&text);

        if !self.interactive {
            return None;
        }
        self.say("\nChoose an option (empty to close):");
        self.read_choice(dialog.actions.len())
    }

    fn add_loader_game(&self, config: LoaderGameConfig) -> Result<(), ExtError> {
        let package = config.download_info();
        log_install(&format!(
            "BepInEx requested for {} ({}): {} v{} [{}], auto download: {}",
            config.game_id,
            config.unity_build.unity_build_tag(),
            package.archive_name,
            package.version,
            package.architecture,
            config.auto_download_bepinex,
        ));
        self.say(&format!(
            "BepInEx {} ({}) is the matching loader: {}",
            package.version,
            config.unity_build,
            package.nexus_url()
        ));
        Ok(())
    }

    fn open_mod_page(&self, game_id: &str, mod_id: &str, source: &str) -> Result<(), ExtError> {
        if source != "nexus" {
            return Err(ExtError::host("Open mod page", format!("unknown source '{}'", source)));
        }
        let url = format!("https://www.nexusmods.com/{}/mods/{}", game_id, mod_id);
        log_info(&format!("Opening mod page: {}", url));
        self.say(&url);

        if self.open_browser {
            let spawned = Command::new("xdg-open")
                .arg(&url)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if let Err(e) = spawned {
                log_warning(&format!("Could not launch a browser: {}", e));
            }
        }
        Ok(())
    }
}
