use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    ZeroTileSize(&'static str),
    MissingTileSize,
    MissingBands,
    MissingInputDir,
    OutputDir(PathBuf),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTileSize(axis) => {
                write!(f, "number of {} per tile must be greater than 0", axis)
            }
            ConfigError::MissingTileSize => write!(f, "tile rows and columns are required"),
            ConfigError::MissingBands => write!(f, "three band indices are required"),
            ConfigError::MissingInputDir => write!(f, "input_dir is required"),
            ConfigError::OutputDir(path) => {
                write!(f, "Could not access directory '{}'", path.display())
            }
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
