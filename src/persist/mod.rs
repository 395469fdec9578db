mod load;
mod save;
mod schema;
mod signing;

pub use load::{game_state_from_save, load_for_startup};
pub use save::save_game;
pub use schema::{SaveFile, Settings};

use thiserror::Error;

pub const SAVE_FILE_NAME: &str = "save.ron";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode save: {0}")]
    Encode(#[from] ron::Error),
    #[error("failed to sign save: {0}")]
    Sign(#[from] hmac::digest::InvalidLength),
    #[error("save version {found} is newer than this build supports (v{current})")]
    FutureVersion { found: u32, current: u32 },
}
