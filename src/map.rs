/// Tiled (`.tmx`) map loading.
///
/// Supports the subset the game uses: embedded tilesets whose tiles carry a
/// `glyph` (and optional `color`) property, a CSV `Ground` tile layer and the
/// `Objects`, `Collisions` and `Entities` object groups.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::info;

use crate::entities::{GroundTile, Obstacle, Tile};
use crate::error::MapError;
use crate::geometry::{Rect, Vec2};

pub const GROUND_LAYER: &str = "Ground";
pub const OBJECTS_LAYER: &str = "Objects";
pub const COLLISIONS_LAYER: &str = "Collisions";
pub const ENTITIES_LAYER: &str = "Entities";
pub const PLAYER_ENTITY: &str = "Player";

/// Tiled stores flip/rotation flags in the high bits of a gid.
const GID_FLAGS: u32 = 0xF000_0000;
const UNKNOWN_GLYPH: char = '?';

/// A parsed map, ready for play.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub tile_width: f32,
    pub tile_height: f32,
    pub width_px: f32,
    pub height_px: f32,
    pub ground: Vec<GroundTile>,
    pub obstacles: Vec<Obstacle>,
    pub spawn_points: Vec<Vec2>,
    pub player_start: Vec2,
}

pub fn load_map(path: &Path) -> Result<Level, MapError> {
    let raw = fs::read_to_string(path).map_err(|source| MapError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_map(&raw)?;
    info!(
        path = %path.display(),
        ground = level.ground.len(),
        obstacles = level.obstacles.len(),
        spawn_points = level.spawn_points.len(),
        "map_loaded"
    );
    Ok(level)
}

pub fn parse_map(raw: &str) -> Result<Level, MapError> {
    let doc = Document::parse(raw)?;
    let root = doc.root_element();
    if !root.has_tag_name("map") {
        return Err(MapError::InvalidRoot(root.tag_name().name().to_string()));
    }

    let tile_width: f32 = attr(root, "tilewidth")?;
    let tile_height: f32 = attr(root, "tileheight")?;
    let cols: usize = attr(root, "width")?;
    let rows: usize = attr(root, "height")?;
    let tilesets = parse_tilesets(root)?;

    let ground = parse_ground(root, &tilesets, cols, rows, tile_width, tile_height)?;

    let mut obstacles = Vec::new();
    for object in objects(root, OBJECTS_LAYER)? {
        let rect = object_rect(object)?;
        let tile = match opt_attr::<u32>(object, "gid")? {
            Some(gid) => Some(tilesets.resolve(gid)?),
            None => None,
        };
        // Tile objects are anchored at their bottom-left corner.
        let rect = if tile.is_some() {
            Rect::new(rect.x, rect.y - rect.h, rect.w, rect.h)
        } else {
            rect
        };
        obstacles.push(Obstacle { rect, tile });
    }
    for object in objects(root, COLLISIONS_LAYER)? {
        obstacles.push(Obstacle {
            rect: object_rect(object)?,
            tile: None,
        });
    }

    let mut player_start = None;
    let mut spawn_points = Vec::new();
    for object in objects(root, ENTITIES_LAYER)? {
        let pos = Vec2::new(attr(object, "x")?, attr(object, "y")?);
        if object.attribute("name") == Some(PLAYER_ENTITY) {
            player_start = Some(pos);
        } else {
            spawn_points.push(pos);
        }
    }
    let player_start = player_start.ok_or(MapError::MissingPlayer)?;
    if spawn_points.is_empty() {
        return Err(MapError::NoSpawnPoints);
    }

    Ok(Level {
        tile_width,
        tile_height,
        width_px: cols as f32 * tile_width,
        height_px: rows as f32 * tile_height,
        ground,
        obstacles,
        spawn_points,
        player_start,
    })
}

// ── Tilesets ──────────────────────────────────────────────────────────────────

struct Tileset {
    first_gid: u32,
    tile_count: Option<u32>,
    tiles: HashMap<u32, Tile>,
}

struct Tilesets(Vec<Tileset>);

impl Tilesets {
    fn resolve(&self, gid: u32) -> Result<Tile, MapError> {
        let gid = gid & !GID_FLAGS;
        let set = self
            .0
            .iter()
            .filter(|set| set.first_gid <= gid)
            .max_by_key(|set| set.first_gid)
            .ok_or(MapError::UnknownGid(gid))?;
        let local = gid - set.first_gid;
        if set.tile_count.is_some_and(|count| local >= count) {
            return Err(MapError::UnknownGid(gid));
        }
        Ok(set.tiles.get(&local).cloned().unwrap_or(Tile {
            glyph: UNKNOWN_GLYPH,
            color: None,
        }))
    }
}

fn parse_tilesets(root: Node) -> Result<Tilesets, MapError> {
    let mut sets = Vec::new();
    for node in root.children().filter(|n| n.has_tag_name("tileset")) {
        if let Some(source) = node.attribute("source") {
            return Err(MapError::ExternalTileset(source.to_string()));
        }
        let mut tiles = HashMap::new();
        for tile in node.children().filter(|n| n.has_tag_name("tile")) {
            let id: u32 = attr(tile, "id")?;
            let mut glyph = UNKNOWN_GLYPH;
            let mut color = None;
            for prop in tile
                .descendants()
                .filter(|n| n.has_tag_name("property"))
            {
                let value = prop.attribute("value").unwrap_or_default();
                match prop.attribute("name") {
                    Some("glyph") => glyph = value.chars().next().unwrap_or(UNKNOWN_GLYPH),
                    Some("color") => color = Some(value.to_string()),
                    _ => {}
                }
            }
            tiles.insert(id, Tile { glyph, color });
        }
        sets.push(Tileset {
            first_gid: attr(node, "firstgid")?,
            tile_count: opt_attr(node, "tilecount")?,
            tiles,
        });
    }
    Ok(Tilesets(sets))
}

// ── Layers ────────────────────────────────────────────────────────────────────

fn parse_ground(
    root: Node,
    tilesets: &Tilesets,
    cols: usize,
    rows: usize,
    tile_width: f32,
    tile_height: f32,
) -> Result<Vec<GroundTile>, MapError> {
    let layer = root
        .children()
        .find(|n| n.has_tag_name("layer") && n.attribute("name") == Some(GROUND_LAYER))
        .ok_or_else(|| MapError::MissingLayer(GROUND_LAYER.to_string()))?;
    let data = layer
        .children()
        .find(|n| n.has_tag_name("data"))
        .ok_or_else(|| MapError::MissingLayer(GROUND_LAYER.to_string()))?;
    let encoding = data.attribute("encoding").unwrap_or("xml");
    if encoding != "csv" {
        return Err(MapError::UnsupportedEncoding {
            layer: GROUND_LAYER.to_string(),
            encoding: encoding.to_string(),
        });
    }

    let gids = data
        .text()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| MapError::InvalidValue {
                element: "data".to_string(),
                attribute: GROUND_LAYER.to_string(),
                value: s.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if gids.len() != cols * rows {
        return Err(MapError::TileCount {
            layer: GROUND_LAYER.to_string(),
            expected: cols * rows,
            found: gids.len(),
        });
    }

    let mut ground = Vec::new();
    for (i, gid) in gids.into_iter().enumerate() {
        if gid & !GID_FLAGS == 0 {
            continue;
        }
        let (col, row) = (i % cols, i / cols);
        ground.push(GroundTile {
            rect: Rect::new(
                col as f32 * tile_width,
                row as f32 * tile_height,
                tile_width,
                tile_height,
            ),
            tile: tilesets.resolve(gid)?,
        });
    }
    Ok(ground)
}

fn objects<'a, 'input>(
    root: Node<'a, 'input>,
    layer: &str,
) -> Result<impl Iterator<Item = Node<'a, 'input>>, MapError> {
    let group = root
        .children()
        .find(|n| n.has_tag_name("objectgroup") && n.attribute("name") == Some(layer))
        .ok_or_else(|| MapError::MissingLayer(layer.to_string()))?;
    Ok(group.children().filter(|n| n.has_tag_name("object")))
}

fn object_rect(object: Node) -> Result<Rect, MapError> {
    Ok(Rect::new(
        attr(object, "x")?,
        attr(object, "y")?,
        opt_attr(object, "width")?.unwrap_or(0.0),
        opt_attr(object, "height")?.unwrap_or(0.0),
    ))
}

// ── Attribute helpers ─────────────────────────────────────────────────────────

fn opt_attr<T: FromStr>(node: Node, name: &str) -> Result<Option<T>, MapError> {
    match node.attribute(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| MapError::InvalidValue {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn attr<T: FromStr>(node: Node, name: &str) -> Result<T, MapError> {
    opt_attr(node, name)?.ok_or_else(|| MapError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}
