//! Startup BepInEx orchestration
//!
//! Runs once per host session: detect the game build, register the matching
//! BepInEx package with the host, nudge IL2CPP users towards Mono, and warn
//! when the BepInEx already on disk targets the other build.

use crate::detect::{classify_game_build, classify_installed_loader_build, BuildVariant};
use crate::error::ExtError;
use crate::game::GAME_NAME;
use crate::host::{Dialog, DialogAction, DialogKind, ExtensionApi};
use crate::loader::LoaderGameConfig;
use crate::logging::{log_error, log_info, log_install, log_warning};
use crate::reminder::maybe_show_reminder;
use crate::text::Replacements;

const MISMATCH_TITLE: &str = "BepInEx Version Mismatch";

const MISMATCH_BODY: &str = "\"{{game}}\" is currently installed with the \"{{gameBuild}}\" game build,{{bl}}\
but the currently installed BepInEx version is for the {{bepInExBuild}} build.{{bl}}\
Please go to the Mods tab and install the correct BepInEx version for your game build.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The host has no BepInEx integration loaded
    Skipped,
    Completed {
        game_build: BuildVariant,
        loader_build: Option<BuildVariant>,
        mismatch: bool,
        reminder_shown: bool,
    },
}

/// Warning shown when the installed BepInEx targets the wrong build
pub fn mismatch_dialog(
    api: &dyn ExtensionApi,
    game_build: BuildVariant,
    loader_build: BuildVariant,
) -> Dialog {
    let replace = Replacements::from([
        ("game", GAME_NAME.to_string()),
        ("gameBuild", game_build.to_string()),
        ("bepInExBuild", loader_build.to_string()),
        ("bl", "[br][/br][br][/br]".to_string()),
    ]);

    Dialog {
        kind: DialogKind::Error,
        title: MISMATCH_TITLE.to_string(),
        bbcode: api.translate(MISMATCH_BODY, &replace),
        actions: vec![DialogAction::default_action("Close")],
    }
}

/// Run the startup flow against `api`.
///
/// A game build that cannot be classified aborts the run. Installer and
/// reminder failures are logged and the run carries on.
pub fn run(api: &dyn ExtensionApi, now_ms: i64) -> Result<RunOutcome, ExtError> {
    if !api.loader_injection_available() {
        log_info("BepInEx integration not available, skipping loader setup");
        return Ok(RunOutcome::Skipped);
    }

    let game_path = api.query_game_path().inspect_err(|e| {
        log_error(&format!("Could not resolve game path: {}", e));
    })?;

    let game_build = classify_game_build(api.probe(), &game_path).inspect_err(|e| {
        log_error(&format!("Game build detection failed: {}", e));
    })?;

    let config = LoaderGameConfig::for_build(game_build, api.auto_download_bepinex());
    match game_build {
        BuildVariant::Mono => log_install("Installing BepInEx 5 (Mono)"),
        BuildVariant::Il2Cpp => log_install("Installing BepInEx 6 (IL2CPP)"),
    }
    if let Err(e) = api.add_loader_game(config) {
        log_warning(&format!("BepInEx installer reported an error: {}", e));
    }

    let mut reminder_shown = false;
    if game_build.is_high_risk() {
        match maybe_show_reminder(api, now_ms) {
            Ok(shown) => reminder_shown = shown,
            Err(e) => log_warning(&format!("Mono migration reminder failed: {}", e)),
        }
    }

    let loader_build = classify_installed_loader_build(api.probe(), &game_path)?;
    let mismatch = loader_build.is_some_and(|b| b != game_build);

    if let Some(found) = loader_build.filter(|_| mismatch) {
        log_warning(&format!(
            "Detected BepInEx build mismatch: expected {}, but got {}.",
            game_build, found
        ));
        let dialog = mismatch_dialog(api, game_build, found);
        let _ = api.show_dialog(&dialog);
    }

    Ok(RunOutcome::Completed {
        game_build,
        loader_build,
        mismatch,
        reminder_shown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::loader_core_dir;
    use crate::game::{il2cpp_dir, managed_dll_dir};
    use crate::host::fake::FakeHost;
    use crate::loader::LoaderPackageDescriptor;
    use crate::state::{ExtensionSettings, StateStore, REMINDER_SNOOZE_MS};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const NOW: i64 = 1_750_000_000_000;
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn touch(root: &Path, rel: PathBuf, name: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), "").unwrap();
    }

    fn mono_game() -> TempDir {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), managed_dll_dir(), "Mono.Security.dll");
        tmp
    }

    fn il2cpp_game() -> TempDir {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), il2cpp_dir(), "global-metadata.dat");
        tmp
    }

    #[test]
    fn test_skipped_without_injection() {
        let game = mono_game();
        let mut host = FakeHost::new(game.path());
        host.injection_available = false;

        assert_eq!(run(&host, NOW).unwrap(), RunOutcome::Skipped);
        assert!(host.installs.lock().is_empty());
    }

    #[test]
    fn test_mono_game_installs_bepinex5_without_reminder() {
        let game = mono_game();
        let host = FakeHost::new(game.path());

        let outcome = run(&host, NOW).unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Completed {
                game_build: BuildVariant::Mono,
                loader_build: None,
                mismatch: false,
                reminder_shown: false,
            }
        );

        let installs = host.installs.lock();
        assert_eq!(installs.len(), 1);
        assert_eq!(installs[0].unity_build.unity_build_tag(), "unitymono");
        assert_eq!(installs[0].download_info(), LoaderPackageDescriptor::bepinex5());
        assert!(host.dialogs.lock().is_empty());
    }

    #[test]
    fn test_unclassifiable_game_aborts_run() {
        let empty = TempDir::new().unwrap();
        let host = FakeHost::new(empty.path());

        let err = run(&host, NOW).unwrap_err();
        assert!(matches!(err, ExtError::Classification { .. }));
        assert!(host.installs.lock().is_empty());
        assert!(host.dialogs.lock().is_empty());
    }

    #[test]
    fn test_missing_game_path_aborts_run() {
        let mut host = FakeHost::new(Path::new("/unused"));
        host.game_path = None;
        assert!(matches!(run(&host, NOW), Err(ExtError::GameNotFound { .. })));
    }

    #[test]
    fn test_installer_failure_does_not_abort() {
        let game = mono_game();
        touch(game.path(), loader_core_dir(), "BepInEx.Unity.IL2CPP.dll");
        let mut host = FakeHost::new(game.path());
        host.fail_install = true;

        let outcome = run(&host, NOW).unwrap();
        assert!(matches!(outcome, RunOutcome::Completed { mismatch: true, .. }));
        assert_eq!(host.dialog_titles(), vec![MISMATCH_TITLE.to_string()]);
    }

    #[test]
    fn test_matching_loader_raises_no_warning() {
        let game = il2cpp_game();
        touch(game.path(), loader_core_dir(), "BepInEx.Unity.IL2CPP.dll");
        let host = FakeHost::new(game.path());
        host.store
            .dispatch(crate::state::SettingsAction::SetMonoMigrationNextReminderTime {
                next_reminder: -1,
            })
            .unwrap();

        let outcome = run(&host, NOW).unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Completed {
                game_build: BuildVariant::Il2Cpp,
                loader_build: Some(BuildVariant::Il2Cpp),
                mismatch: false,
                reminder_shown: false,
            }
        );
        assert!(host.dialogs.lock().is_empty());
    }

    #[test]
    fn test_mono_loader_on_il2cpp_game_warns_once() {
        let game = il2cpp_game();
        touch(game.path(), loader_core_dir(), "BepInEx.dll");
        let host = FakeHost::new(game.path());
        // Reminder dismissed without an answer
        host.answer(None);

        let before = host.store.snapshot();
        let outcome = run(&host, NOW).unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Completed { mismatch: true, reminder_shown: true, .. }
        ));

        let dialogs = host.dialogs.lock();
        let warnings: Vec<&Dialog> = dialogs.iter().filter(|d| d.title == MISMATCH_TITLE).collect();
        assert_eq!(warnings.len(), 1);
        let warning = warnings[0];
        assert_eq!(warning.kind, DialogKind::Error);
        assert!(warning.bbcode.contains("installed with the \"IL2CPP (v6)\" game build"));
        assert!(warning.bbcode.contains("is for the Mono (v5) build"));
        assert!(warning.bbcode.contains("[br][/br][br][/br]"));
        assert_eq!(warning.actions, vec![DialogAction::default_action("Close")]);

        // The warning never touches persisted state
        assert_eq!(host.store.snapshot(), before);
    }

    #[test]
    fn test_snooze_scenario_across_sessions() {
        let game = il2cpp_game();
        let host = FakeHost::new(game.path());
        assert_eq!(host.store.settings(), ExtensionSettings::default());

        // First session: reminder shown, user snoozes
        host.answer(Some(1));
        let first = run(&host, NOW).unwrap();
        assert!(matches!(first, RunOutcome::Completed { reminder_shown: true, .. }));
        assert_eq!(
            host.store.settings().mono_migration_next_reminder_time,
            Some(NOW + REMINDER_SNOOZE_MS)
        );

        // Immediately after: silent
        let second = run(&host, NOW).unwrap();
        assert!(matches!(second, RunOutcome::Completed { reminder_shown: false, .. }));

        // Eight days later: due again
        let third = run(&host, NOW + 8 * DAY_MS).unwrap();
        assert!(matches!(third, RunOutcome::Completed { reminder_shown: true, .. }));
        assert_eq!(host.dialogs.lock().len(), 2);
        assert_eq!(host.installs.lock().len(), 3);
    }
}
