use crate::persist::SAVE_FILE_NAME;
use clap::Parser;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "idle-orbit";
const LOG_FILE_NAME: &str = "idle-orbit.log";

/// Command-line arguments for the idle-orbit terminal game.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Save file to load from and write to.
    #[arg(long, value_name = "PATH")]
    pub save_file: Option<PathBuf>,
    /// Where diagnostics are written; the terminal belongs to the game.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Ignore any existing save and start a new game.
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub save_file: PathBuf,
    pub log_file: PathBuf,
}

impl Cli {
    pub fn paths(&self) -> Paths {
        let dir = config_dir(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        );
        self.paths_in(&dir)
    }

    fn paths_in(&self, dir: &Path) -> Paths {
        Paths {
            save_file: self
                .save_file
                .clone()
                .unwrap_or_else(|| dir.join(SAVE_FILE_NAME)),
            log_file: self
                .log_file
                .clone()
                .unwrap_or_else(|| dir.join(LOG_FILE_NAME)),
        }
    }
}

fn config_dir(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return xdg.join(APP_DIR);
    }
    if let Some(home) = home.filter(|path| !path.as_os_str().is_empty()) {
        return home.join(".config").join(APP_DIR);
    }
    PathBuf::from(".")
}
