use super::PersistError;
use crate::sim::player::Player;
use crate::sim::state::Screen;
use crate::sim::world::WorldState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub animations_enabled: bool,
    pub active_theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            active_theme: "space".to_string(),
        }
    }
}

/// Everything written to disk. Rebuilt from live state on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    // Saves written before versioning existed deserialize as version 0.
    #[serde(default)]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub last_screen: Screen,
    #[serde(default)]
    pub last_world_id: String,
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub worlds: BTreeMap<String, WorldState>,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for SaveFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            saved_at: Utc::now(),
            last_screen: Screen::Overview,
            last_world_id: String::new(),
            player: Player::new(),
            worlds: BTreeMap::new(),
            achievements: BTreeSet::new(),
            settings: Settings::default(),
        }
    }
}

/// Only the version field, read before the full document so a newer schema
/// is reported instead of failing to parse.
#[derive(Debug, Deserialize)]
pub(super) struct VersionProbe {
    #[serde(default)]
    pub version: u32,
}

struct MigrationStep {
    from_version: u32,
    description: &'static str,
    apply: fn(&mut SaveFile),
}

const MIGRATIONS: &[MigrationStep] = &[MigrationStep {
    from_version: 0,
    description: "unversioned save -> v1 baseline",
    apply: baseline_v1,
}];

fn baseline_v1(save: &mut SaveFile) {
    if save.player.level == 0 {
        save.player.level = 1;
    }
}

/// Upgrades `save` in place to `CURRENT_VERSION`, one step at a time.
pub fn migrate(save: &mut SaveFile) -> Result<(), PersistError> {
    if save.version > CURRENT_VERSION {
        return Err(PersistError::FutureVersion {
            found: save.version,
            current: CURRENT_VERSION,
        });
    }
    for step in MIGRATIONS {
        if save.version == step.from_version {
            (step.apply)(save);
            save.version = step.from_version + 1;
            info!(step = step.description, version = save.version, "migrated save");
        }
    }
    save.version = CURRENT_VERSION;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_first_launch() {
        let settings = Settings::default();
        assert!(settings.animations_enabled);
        assert_eq!(settings.active_theme, "space");
        let save = SaveFile::default();
        assert_eq!(save.version, CURRENT_VERSION);
        assert_eq!(save.last_screen, Screen::Overview);
        assert!(save.worlds.is_empty());
    }

    #[test]
    fn migration_chain_covers_every_version() {
        for version in 0..CURRENT_VERSION {
            assert!(
                MIGRATIONS.iter().any(|step| step.from_version == version),
                "missing migration from v{version}"
            );
        }
    }

    #[test]
    fn legacy_save_migrates_to_current() {
        let mut save = SaveFile {
            version: 0,
            ..SaveFile::default()
        };
        save.player.level = 0;
        migrate(&mut save).expect("legacy saves migrate");
        assert_eq!(save.version, CURRENT_VERSION);
        assert_eq!(save.player.level, 1);
    }

    #[test]
    fn current_save_is_untouched() {
        let mut save = SaveFile::default();
        let before = save.clone();
        migrate(&mut save).expect("current version migrates");
        assert_eq!(save, before);
    }

    #[test]
    fn future_version_is_rejected() {
        let mut save = SaveFile {
            version: CURRENT_VERSION + 1,
            ..SaveFile::default()
        };
        assert!(matches!(
            migrate(&mut save),
            Err(PersistError::FutureVersion { found, current })
                if found == CURRENT_VERSION + 1 && current == CURRENT_VERSION
        ));
    }
}
