//! Persisted extension settings
//!
//! The host keeps one JSON-like state tree; this extension owns the object at
//! `["settings", GAME_ID]` and changes it only through [`settings_reducer`].

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtError;
use crate::game::GAME_ID;
use crate::logging::log_warning;

pub const SETTINGS_NAMESPACE: &str = "settings";

/// Snooze length for "Remind me in a week"
pub const REMINDER_SNOOZE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Stored instead of a timestamp once the user opts out for good
pub const DISMISSED_FOREVER: i64 = -1;

pub const SET_NEXT_REMINDER_TIME: &str = "SET_TGFOA_MONO_MIGRATION_NEXT_REMINDER_TIME";

/// Path of the extension's settings object inside the host state
pub fn settings_path() -> [&'static str; 2] {
    [SETTINGS_NAMESPACE, GAME_ID]
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSettings {
    /// Epoch millis of the next Mono migration reminder, or
    /// [`DISMISSED_FOREVER`]. Absent until the user first answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mono_migration_next_reminder_time: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    SetMonoMigrationNextReminderTime { next_reminder: i64 },
}

impl SettingsAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            SettingsAction::SetMonoMigrationNextReminderTime { .. } => SET_NEXT_REMINDER_TIME,
        }
    }
}

/// Apply `action` to `state`, returning the new settings
pub fn settings_reducer(state: &ExtensionSettings, action: &SettingsAction) -> ExtensionSettings {
    let mut next = state.clone();
    match *action {
        SettingsAction::SetMonoMigrationNextReminderTime { next_reminder } => {
            next.mono_migration_next_reminder_time = Some(next_reminder);
        }
    }
    next
}

// ============================================================================
// Path Helpers
// ============================================================================

/// Value at `path`, or `default` if any segment is missing
pub fn get_safe(state: &Value, path: &[&str], default: Value) -> Value {
    let mut current = state;
    for key in path {
        match current.get(*key) {
            Some(next) => current = next,
            None => return default,
        }
    }
    current.clone()
}

/// Copy of `state` with `value` stored at `path`.
///
/// Missing or non-object intermediate segments are replaced by objects.
pub fn set_safe(state: &Value, path: &[&str], value: Value) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return value;
    };

    let mut map = match state {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let child = map.get(*first).cloned().unwrap_or(Value::Null);
    map.insert((*first).to_string(), set_safe(&child, rest, value));
    Value::Object(map)
}

// ============================================================================
// Store
// ============================================================================

pub trait StateStore {
    /// Current extension settings (defaults if none are stored)
    fn settings(&self) -> ExtensionSettings;

    /// Apply one action as a single state patch
    fn dispatch(&self, action: SettingsAction) -> Result<(), ExtError>;
}

/// State tree held in memory and optionally mirrored to a JSON file
pub struct JsonStateStore {
    tree: Mutex<Value>,
    file: Option<PathBuf>,
}

impl JsonStateStore {
    pub fn in_memory() -> Self {
        Self {
            tree: Mutex::new(Value::Object(Map::new())),
            file: None,
        }
    }

    /// Open a file-backed store. A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let tree = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log_warning(&format!("Ignoring corrupt state file {}: {}", path.display(), e));
                Value::Object(Map::new())
            }),
            Err(_) => Value::Object(Map::new()),
        };

        Self {
            tree: Mutex::new(tree),
            file: Some(path.to_path_buf()),
        }
    }

    pub fn snapshot(&self) -> Value {
        self.tree.lock().clone()
    }

    /// Drop the extension's settings object. Used by `reminder reset`.
    pub fn clear_settings(&self) -> Result<(), ExtError> {
        let mut tree = self.tree.lock();
        let updated = set_safe(&tree, &settings_path(), Value::Object(Map::new()));
        self.persist(&updated)?;
        *tree = updated;
        Ok(())
    }

    fn persist(&self, tree: &Value) -> Result<(), ExtError> {
        let Some(ref path) = self.file else {
            return Ok(());
        };
        let state_err = |e: &dyn std::fmt::Display| ExtError::State {
            reason: format!("{}: {}", path.display(), e),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| state_err(&e))?;
        }
        let json = serde_json::to_string_pretty(tree).map_err(|e| state_err(&e))?;

        // Write-then-rename so a crash never leaves half a file behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| state_err(&e))?;
        fs::rename(&tmp, path).map_err(|e| state_err(&e))
    }
}

impl StateStore for JsonStateStore {
    fn settings(&self) -> ExtensionSettings {
        let tree = self.tree.lock();
        let raw = get_safe(&tree, &settings_path(), Value::Object(Map::new()));
        serde_json::from_value(raw).unwrap_or_default()
    }

    fn dispatch(&self, action: SettingsAction) -> Result<(), ExtError> {
        let mut tree = self.tree.lock();
        let raw = get_safe(&tree, &settings_path(), Value::Object(Map::new()));
        let current: ExtensionSettings = serde_json::from_value(raw).unwrap_or_default();

        let next = settings_reducer(&current, &action);
        let next = serde_json::to_value(next).map_err(|e| ExtError::State {
            reason: format!("{}: {}", action.action_type(), e),
        })?;

        let updated = set_safe(&tree, &settings_path(), next);
        self.persist(&updated)?;
        *tree = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_snooze_constant_is_one_week() {
        assert_eq!(REMINDER_SNOOZE_MS, 604_800_000);
    }

    #[test]
    fn test_reducer_sets_timestamp() {
        let state = ExtensionSettings::default();
        let next = settings_reducer(
            &state,
            &SettingsAction::SetMonoMigrationNextReminderTime { next_reminder: 42 },
        );
        assert_eq!(next.mono_migration_next_reminder_time, Some(42));
        assert_eq!(state.mono_migration_next_reminder_time, None);
    }

    #[test]
    fn test_settings_wire_format() {
        assert_eq!(serde_json::to_value(ExtensionSettings::default()).unwrap(), json!({}));
        let settings = ExtensionSettings {
            mono_migration_next_reminder_time: Some(-1),
        };
        assert_eq!(
            serde_json::to_value(settings).unwrap(),
            json!({ "monoMigrationNextReminderTime": -1 })
        );
    }

    #[test]
    fn test_get_safe_and_set_safe() {
        let state = json!({ "settings": { "other": { "x": 1 } }, "session": 3 });
        assert_eq!(get_safe(&state, &["settings", "other", "x"], json!(0)), json!(1));
        assert_eq!(get_safe(&state, &["settings", "missing"], json!({})), json!({}));

        let updated = set_safe(&state, &["settings", GAME_ID, "a"], json!(5));
        assert_eq!(updated["settings"][GAME_ID]["a"], json!(5));
        assert_eq!(updated["settings"]["other"]["x"], json!(1));
        assert_eq!(updated["session"], json!(3));
        // Input is untouched
        assert!(state["settings"].get(GAME_ID).is_none());

        // Scalars in the way are replaced
        let replaced = set_safe(&json!({ "settings": 7 }), &["settings", "k"], json!(true));
        assert_eq!(replaced, json!({ "settings": { "k": true } }));
    }

    #[test]
    fn test_memory_store_dispatch() {
        let store = JsonStateStore::in_memory();
        assert_eq!(store.settings(), ExtensionSettings::default());

        store
            .dispatch(SettingsAction::SetMonoMigrationNextReminderTime { next_reminder: 1000 })
            .unwrap();
        assert_eq!(store.settings().mono_migration_next_reminder_time, Some(1000));
        assert_eq!(
            store.snapshot(),
            json!({ "settings": { GAME_ID: { "monoMigrationNextReminderTime": 1000 } } })
        );
    }

    #[test]
    fn test_file_store_round_trips_across_sessions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("state.json");

        let store = JsonStateStore::open(&path);
        store
            .dispatch(SettingsAction::SetMonoMigrationNextReminderTime {
                next_reminder: DISMISSED_FOREVER,
            })
            .unwrap();
        drop(store);

        let reopened = JsonStateStore::open(&path);
        assert_eq!(
            reopened.settings().mono_migration_next_reminder_time,
            Some(DISMISSED_FOREVER)
        );
        assert!(!path.with_extension("json.tmp").exists());

        reopened.clear_settings().unwrap();
        assert_eq!(JsonStateStore::open(&path).settings(), ExtensionSettings::default());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStateStore::open(&path);
        assert_eq!(store.settings(), ExtensionSettings::default());
    }
}
