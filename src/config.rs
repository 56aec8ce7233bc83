use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_path_to_error::Segment;

use crate::constants::DEFAULT_SPAWN_INTERVAL_MS;
use crate::error::ConfigError;

pub const CONFIG_ENV_VAR: &str = "SURVIVOR_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "survivor.json";

/// Runtime settings. Every field is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub asset_dir: PathBuf,
    pub map_path: PathBuf,
    pub log_file: PathBuf,
    /// Minimum wall time per frame; the simulation itself is dt-scaled.
    pub frame_ms: u64,
    pub spawn_interval_ms: u64,
    /// Ring the terminal bell on bullet impacts.
    pub bell: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            map_path: PathBuf::from("data/maps/world.tmx"),
            log_file: PathBuf::from("survivor.log"),
            frame_ms: 33,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            bell: false,
        }
    }
}

impl GameConfig {
    /// `$SURVIVOR_CONFIG`, else `./survivor.json` if present, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::locate().as_deref())
    }

    /// The file `load` reads, or `None` when defaults apply.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        local.exists().then(|| local.to_path_buf())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        match serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer) {
            Ok(config) => Ok(config),
            Err(error) => {
                // Syntax errors carry no known segment, e.g. a path of `?`.
                let located = error
                    .path()
                    .iter()
                    .any(|segment| !matches!(segment, Segment::Unknown));
                let path = error.path().to_string();
                let message = error.into_inner().to_string();
                if located {
                    Err(ConfigError::Field { path, message })
                } else {
                    Err(ConfigError::Parse(message))
                }
            }
        }
    }
}
