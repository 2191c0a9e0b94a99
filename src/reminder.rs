//! Mono migration reminder
//!
//! Mods are unstable on the IL2CPP build, so IL2CPP users get a dialog
//! suggesting the switch to Mono. The user can snooze it for a week or turn
//! it off for good; both answers are persisted through the state store.

use chrono::{DateTime, Local, Utc};

use crate::error::ExtError;
use crate::game::{GAME_ID, GAME_NAME};
use crate::host::{Dialog, DialogAction, DialogKind, ExtensionApi};
use crate::loader::mono_package_mod_id;
use crate::logging::{log_info, log_warning};
use crate::state::{SettingsAction, DISMISSED_FOREVER, REMINDER_SNOOZE_MS};
use crate::text::Replacements;

const TITLE: &str = "Mono Version available";

const BODY: &str = "Your {{game}} installation is using the IL2CPP build.{{bl}}\
Mods are considered unstable on this version, and your game might crash frequently.{{bl}}\
It is [b]highly recommended[/b] to use the [b]Mono[/b] version instead.{{bl}}{{bl}}\
Follow the BepInEx Mono description on how to switch to the Mono build.{{bl}}{{bl}}\
After switching, delete your existing BepInEx installation and Vortex should automatically download the Mono version for you.";

/// Answers offered by the reminder, in dialog order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderChoice {
    OpenMigrationGuide,
    RemindInAWeek,
    DontRemindAgain,
}

impl ReminderChoice {
    pub const ALL: [ReminderChoice; 3] = [
        ReminderChoice::OpenMigrationGuide,
        ReminderChoice::RemindInAWeek,
        ReminderChoice::DontRemindAgain,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderChoice::OpenMigrationGuide => "Open migration guide",
            ReminderChoice::RemindInAWeek => "Remind me in a week",
            ReminderChoice::DontRemindAgain => "Don't remind me again",
        }
    }
}

/// Whether the reminder is due, given the stored next reminder time
pub fn should_show_reminder(next_reminder: Option<i64>, now_ms: i64) -> bool {
    match next_reminder {
        None => true,
        Some(DISMISSED_FOREVER) => false,
        Some(next) => next <= now_ms,
    }
}

fn describe_next_reminder(next_reminder: Option<i64>, due: bool) -> String {
    match next_reminder {
        _ if due => "Now".to_string(),
        Some(DISMISSED_FOREVER) => "Never".to_string(),
        Some(next) => DateTime::<Utc>::from_timestamp_millis(next)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| next.to_string()),
        None => "Now".to_string(),
    }
}

/// Build the reminder dialog with the host's translator
pub fn reminder_dialog(api: &dyn ExtensionApi) -> Dialog {
    let replace = Replacements::from([
        ("game", GAME_NAME.to_string()),
        ("bl", "[br][/br]".to_string()),
    ]);
    let no_replace = Replacements::new();

    Dialog {
        kind: DialogKind::Info,
        title: TITLE.to_string(),
        bbcode: api.translate(BODY, &replace),
        actions: ReminderChoice::ALL
            .iter()
            .map(|c| DialogAction::new(api.translate(c.label(), &no_replace)))
            .collect(),
    }
}

/// Show the reminder if it is due and apply the user's answer.
///
/// Returns whether the dialog was presented. Closing the dialog without
/// picking an action leaves the state alone, so it comes back next session.
pub fn maybe_show_reminder(api: &dyn ExtensionApi, now_ms: i64) -> Result<bool, ExtError> {
    let next_reminder = api.store().settings().mono_migration_next_reminder_time;
    let due = should_show_reminder(next_reminder, now_ms);

    log_info(&format!(
        "Next Mono migration reminder time: {}",
        describe_next_reminder(next_reminder, due)
    ));

    if !due {
        return Ok(false);
    }

    let dialog = reminder_dialog(api);
    let choice = api
        .show_dialog(&dialog)
        .and_then(|i| ReminderChoice::ALL.get(i).copied());

    match choice {
        Some(ReminderChoice::OpenMigrationGuide) => {
            api.open_mod_page(GAME_ID, &mono_package_mod_id(), "nexus")?;
        }
        Some(ReminderChoice::RemindInAWeek) => {
            api.store().dispatch(SettingsAction::SetMonoMigrationNextReminderTime {
                next_reminder: now_ms + REMINDER_SNOOZE_MS,
            })?;
        }
        Some(ReminderChoice::DontRemindAgain) => {
            api.store().dispatch(SettingsAction::SetMonoMigrationNextReminderTime {
                next_reminder: DISMISSED_FOREVER,
            })?;
        }
        None => log_warning("Mono migration reminder closed without an answer"),
    }

    Ok(true)
}
