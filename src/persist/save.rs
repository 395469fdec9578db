use super::PersistError;
use super::schema::{CURRENT_VERSION, SaveFile, Settings};
use super::signing::Envelope;
use crate::sim::state::GameState;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use ron::ser::PrettyConfig;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Deep copy of live state, stamped with the current time.
pub fn snapshot(state: &GameState, earned: &BTreeSet<String>, settings: &Settings) -> SaveFile {
    SaveFile {
        version: CURRENT_VERSION,
        saved_at: Utc::now(),
        last_screen: state.last_screen,
        last_world_id: state.last_world_id.clone(),
        player: state.player.clone(),
        worlds: state.worlds.clone(),
        achievements: earned.clone(),
        settings: settings.clone(),
    }
}

/// Serializes `save` and wraps it in a signed envelope document.
pub fn encode_save(save: &SaveFile) -> Result<String, PersistError> {
    let payload = ron::ser::to_string_pretty(save, PrettyConfig::new())?;
    let envelope = Envelope::seal(STANDARD.encode(payload.as_bytes()))?;
    Ok(ron::ser::to_string_pretty(&envelope, PrettyConfig::new())?)
}

pub fn save_game(
    state: &GameState,
    earned: &BTreeSet<String>,
    settings: &Settings,
    path: &Path,
) -> Result<(), PersistError> {
    let encoded = encode_save(&snapshot(state, earned, settings))?;
    write_atomic(path, encoded.as_bytes())?;
    debug!(path = %path.display(), "game saved");
    Ok(())
}

// A crash mid-write leaves the previous save intact.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let written = File::create(tmp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(tmp_path, path)
    });
    if written.is_err() {
        let _ = fs::remove_file(tmp_path);
    }
    written
}
