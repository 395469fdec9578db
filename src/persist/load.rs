use super::PersistError;
use super::schema::{CURRENT_VERSION, SaveFile, VersionProbe, migrate};
use super::signing::Envelope;
use crate::sim::state::GameState;
use crate::sim::world::WorldRegistry;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Reads the save at `path`. A missing or damaged file yields a fresh save;
/// only I/O failures and saves from a newer build are errors.
pub fn load_game(path: &Path) -> Result<SaveFile, PersistError> {
    match fs::read_to_string(path) {
        Ok(content) => decode_save(&content),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no save found, starting fresh");
            Ok(SaveFile::default())
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            warn!(path = %path.display(), "save is not valid UTF-8, starting fresh");
            Ok(SaveFile::default())
        }
        Err(err) => Err(err.into()),
    }
}

/// The save a session starts from. `writable` is false when an existing file
/// could not be read; the session must then leave that file alone.
#[derive(Debug)]
pub struct StartupSave {
    pub save: SaveFile,
    pub writable: bool,
}

/// Like [`load_game`], but an unreadable file only costs this session its
/// saves. A save from a newer build is still an error.
pub fn load_for_startup(path: &Path) -> Result<StartupSave, PersistError> {
    match load_game(path) {
        Ok(save) => Ok(StartupSave {
            save,
            writable: true,
        }),
        Err(PersistError::Io(err)) => {
            warn!(path = %path.display(), %err, "save is unreadable, this session will not save");
            Ok(StartupSave {
                save: SaveFile::default(),
                writable: false,
            })
        }
        Err(err) => Err(err),
    }
}

pub fn decode_save(content: &str) -> Result<SaveFile, PersistError> {
    let Some(payload) = open_envelope(content) else {
        return Ok(SaveFile::default());
    };

    let probe: VersionProbe = match ron::from_str(&payload) {
        Ok(probe) => probe,
        Err(err) => {
            warn!(%err, "save payload is unreadable, starting fresh");
            return Ok(SaveFile::default());
        }
    };
    if probe.version > CURRENT_VERSION {
        return Err(PersistError::FutureVersion {
            found: probe.version,
            current: CURRENT_VERSION,
        });
    }

    let mut save: SaveFile = match ron::from_str(&payload) {
        Ok(save) => save,
        Err(err) => {
            warn!(%err, "save payload is corrupt, starting fresh");
            return Ok(SaveFile::default());
        }
    };
    migrate(&mut save)?;
    Ok(save)
}

fn open_envelope(content: &str) -> Option<String> {
    let envelope: Envelope = match ron::from_str(content) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(%err, "save envelope is malformed, starting fresh");
            return None;
        }
    };
    if !envelope.is_authentic() {
        warn!("save signature mismatch, starting fresh");
        return None;
    }
    let bytes = match STANDARD.decode(&envelope.data) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%err, "save payload is not base64, starting fresh");
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(%err, "save payload is not UTF-8, starting fresh");
            None
        }
    }
}

/// Live state for every registered world. Worlds the save never saw start
/// fresh at their base exchange rate; saved worlds no longer registered are
/// dropped.
pub fn game_state_from_save(save: &SaveFile, worlds: &WorldRegistry) -> GameState {
    let mut state = GameState::for_registry(worlds);
    state.player = save.player.clone();
    state.last_screen = save.last_screen;
    state.last_world_id = save.last_world_id.clone();
    for (id, world) in state.worlds.iter_mut() {
        if let Some(saved) = save.worlds.get(id) {
            *world = saved.clone();
            world.world_id = id.clone();
        }
    }
    state
}
