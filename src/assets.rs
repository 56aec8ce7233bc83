/// Text-art sprite loading.
///
/// Sprites are plain text grids: a space is transparent, any other character
/// is drawn and counts as opaque for mask collisions.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::collision::Mask;
use crate::constants::{CELL_H, CELL_W};
use crate::error::AssetError;

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    mask: Mask,
}

impl Sprite {
    /// Parse glyph art. Trailing blank lines are dropped and short rows are
    /// padded with transparent cells. Returns `None` when nothing is opaque.
    pub fn parse(text: &str) -> Option<Sprite> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|row| row.iter().all(|c| *c == ' ')) {
            rows.pop();
        }
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(cols, ' ');
        }
        let mask = Mask::from_rows(&rows, CELL_W as i32, CELL_H as i32);
        if mask.count() == 0 {
            return None;
        }
        Some(Sprite { rows, mask })
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn cols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Size in world pixels.
    pub fn size(&self) -> (f32, f32) {
        (self.cols() as f32 * CELL_W, self.rows.len() as f32 * CELL_H)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyKind {
    pub name: String,
    pub frames: Vec<Sprite>,
}

impl EnemyKind {
    /// Frame for a fractional animation index, wrapping around.
    pub fn frame(&self, frame_index: f32) -> &Sprite {
        let i = frame_index.max(0.0) as usize % self.frames.len();
        &self.frames[i]
    }
}

/// Glyphs for the gun at 0°, -45°, 90° and 45° on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GunSheet {
    pub horizontal: char,
    pub falling: char,
    pub vertical: char,
    pub rising: char,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assets {
    pub bullet: Sprite,
    pub gun: GunSheet,
    pub player: Vec<Sprite>,
    /// Sorted by kind name, never empty.
    pub enemies: Vec<EnemyKind>,
    pub title: Vec<String>,
}

impl Assets {
    pub fn player_frame(&self, frame_index: f32) -> &Sprite {
        let i = frame_index.max(0.0) as usize % self.player.len();
        &self.player[i]
    }
}

pub fn load_assets(dir: &Path) -> Result<Assets, AssetError> {
    let bullet = load_sprite(&dir.join("gun").join("bullet.txt"))?;
    let gun = load_gun_sheet(&dir.join("gun").join("gun.txt"))?;
    let player = load_frames(&dir.join("player"))?;
    let enemies = load_enemy_kinds(&dir.join("enemies"))?;
    let title = read(&dir.join("title.txt"))?
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    info!(
        dir = %dir.display(),
        enemy_kinds = enemies.len(),
        player_frames = player.len(),
        "assets_loaded"
    );
    Ok(Assets {
        bullet,
        gun,
        player,
        enemies,
        title,
    })
}

fn read(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_sprite(path: &Path) -> Result<Sprite, AssetError> {
    Sprite::parse(&read(path)?).ok_or_else(|| AssetError::EmptySprite(path.to_path_buf()))
}

fn load_gun_sheet(path: &Path) -> Result<GunSheet, AssetError> {
    let glyphs: Vec<char> = read(path)?.chars().filter(|c| !c.is_whitespace()).collect();
    match glyphs[..] {
        [horizontal, falling, vertical, rising] => Ok(GunSheet {
            horizontal,
            falling,
            vertical,
            rising,
        }),
        _ => Err(AssetError::GunSheet {
            path: path.to_path_buf(),
            found: glyphs.len(),
        }),
    }
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let entries = fs::read_dir(dir).map_err(|source| AssetError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AssetError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}

/// Load `<n>.txt` frames ordered by their numeric file stem.
pub fn load_frames(dir: &Path) -> Result<Vec<Sprite>, AssetError> {
    let mut numbered = Vec::new();
    for path in read_dir(dir)? {
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let n: u32 = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse().ok())
            .ok_or_else(|| AssetError::FrameName(path.clone()))?;
        numbered.push((n, path));
    }
    if numbered.is_empty() {
        return Err(AssetError::NoFrames(dir.to_path_buf()));
    }
    numbered.sort_by_key(|(n, _)| *n);
    numbered
        .iter()
        .map(|(_, path)| load_sprite(path))
        .collect()
}

fn load_enemy_kinds(dir: &Path) -> Result<Vec<EnemyKind>, AssetError> {
    let mut kinds = Vec::new();
    for path in read_dir(dir)? {
        if !path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frames = load_frames(&path)?;
        debug!(kind = %name, frames = frames.len(), "enemy_kind_loaded");
        kinds.push(EnemyKind { name, frames });
    }
    if kinds.is_empty() {
        return Err(AssetError::NoEnemies(dir.to_path_buf()));
    }
    kinds.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(kinds)
}
