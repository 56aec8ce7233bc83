use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed map xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("map root must be <map>, found <{0}>")]
    InvalidRoot(String),
    #[error("missing attribute `{attribute}` on <{element}>")]
    MissingAttribute { element: String, attribute: String },
    #[error("invalid value `{value}` for `{attribute}` on <{element}>")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },
    #[error("external tileset `{0}` is not supported, embed it in the map")]
    ExternalTileset(String),
    #[error("layer `{0}` not found")]
    MissingLayer(String),
    #[error("layer `{layer}` uses unsupported encoding `{encoding}`")]
    UnsupportedEncoding { layer: String, encoding: String },
    #[error("layer `{layer}` has {found} tiles, expected {expected}")]
    TileCount {
        layer: String,
        expected: usize,
        found: usize,
    },
    #[error("gid {0} does not belong to any tileset")]
    UnknownGid(u32),
    #[error("map has no `Player` entity")]
    MissingPlayer,
    #[error("map has no enemy spawn points")]
    NoSpawnPoints,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {0} is empty")]
    EmptySprite(PathBuf),
    #[error("no animation frames in {0}")]
    NoFrames(PathBuf),
    #[error("frame file name {0} must be a number, e.g. `0.txt`")]
    FrameName(PathBuf),
    #[error("no enemy kinds in {0}")]
    NoEnemies(PathBuf),
    #[error("gun sheet {path} needs 4 glyphs, found {found}")]
    GunSheet { path: PathBuf, found: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config json: {0}")]
    Parse(String),
    #[error("parse config json at {path}: {message}")]
    Field { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
