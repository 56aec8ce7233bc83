/// Rendering layer. All terminal I/O lives here.
///
/// Each frame is composed on a `Canvas` of terminal cells and presented
/// with one batch of queued commands. No game logic is performed; this
/// module only translates state into terminal output.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::{Assets, GunSheet, Sprite};
use crate::constants::{CELL_H, CELL_W, KILL_TARGET, MAX_HEALTH};
use crate::entities::{GameState, HostileState, Tile};
use crate::geometry::{Rect, Vec2};
use crate::map::Level;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_TILE_DEFAULT: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_GUN: Color = Color::Grey;
const C_BULLET: Color = Color::Cyan;
const C_DYING: Color = Color::White;
const C_ENEMIES: [Color; 4] = [Color::Green, Color::Magenta, Color::Yellow, Color::Red];
const C_HEALTH: Color = Color::Red;
const C_HUD_TEXT: Color = Color::White;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const SILHOUETTE: char = '█';
/// Health bar width in cells (400 world pixels).
pub const HEALTH_BAR_CELLS: usize = 25;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Pixel position of the screen center for a terminal of `cols` x `rows`.
pub fn screen_center(cols: u16, rows: u16) -> Vec2 {
    Vec2::new(f32::from(cols) * CELL_W / 2.0, f32::from(rows) * CELL_H / 2.0)
}

/// World position drawn at the top-left cell when the camera follows `target`.
pub fn camera_offset(target: Vec2, cols: u16, rows: u16) -> Vec2 {
    target - screen_center(cols, rows)
}

/// Cell holding world point `world` for a camera at `offset`.
pub fn world_to_cell(world: Vec2, offset: Vec2) -> (i32, i32) {
    (
        ((world.x - offset.x) / CELL_W).floor() as i32,
        ((world.y - offset.y) / CELL_H).floor() as i32,
    )
}

// ── Gun pose ──────────────────────────────────────────────────────────────────

/// Rotation applied to a right-pointing gun sprite: counter-clockwise by
/// `angle_deg`, then mirrored top-to-bottom when `flip_vertical` is set so
/// the grip stays below the barrel when aiming left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunPose {
    pub angle_deg: f32,
    pub flip_vertical: bool,
}

impl GunPose {
    pub fn from_aim(aim: Vec2) -> Self {
        let angle = aim.x.atan2(aim.y).to_degrees() - 90.0;
        if aim.x > 0.0 {
            GunPose {
                angle_deg: angle,
                flip_vertical: false,
            }
        } else {
            GunPose {
                angle_deg: angle.abs(),
                flip_vertical: true,
            }
        }
    }

    /// Screen-space (y down) direction the barrel points after the pose.
    pub fn barrel(&self) -> Vec2 {
        let r = self.angle_deg.to_radians();
        let (x, y) = (r.cos(), -r.sin());
        if self.flip_vertical {
            Vec2::new(x, -y)
        } else {
            Vec2::new(x, y)
        }
    }

    pub fn glyph(&self, sheet: &GunSheet) -> char {
        let barrel = self.barrel();
        let deg = (-barrel.y).atan2(barrel.x).to_degrees().rem_euclid(180.0);
        match deg {
            d if !(22.5..157.5).contains(&d) => sheet.horizontal,
            d if d < 67.5 => sheet.rising,
            d if d < 112.5 => sheet.vertical,
            _ => sheet.falling,
        }
    }
}

// ── HUD helpers ───────────────────────────────────────────────────────────────

/// Filled cells of a `bar_width`-cell health bar.
pub fn health_fill(health: i32, bar_width: usize) -> usize {
    let ratio = health.max(0) as f32 / MAX_HEALTH as f32;
    ((ratio * bar_width as f32) as usize).min(bar_width)
}

pub fn kill_counter(killed: u32) -> String {
    format!("Enemies Killed: {}/{}", killed, KILL_TARGET)
}

fn tile_color(tile: &Tile) -> Color {
    tile.color
        .as_deref()
        .and_then(|name| Color::try_from(name).ok())
        .unwrap_or(C_TILE_DEFAULT)
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: C_BACKGROUND,
};

/// Terminal-sized cell buffer that world drawing is composed on.
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![BLANK; usize::from(cols) * usize::from(rows)],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.cols, self.rows) {
            *self = Canvas::new(cols, rows);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Character at a cell, `None` outside the canvas.
    pub fn glyph_at(&self, col: u16, row: u16) -> Option<char> {
        (col < self.cols && row < self.rows)
            .then(|| self.cells[usize::from(row) * usize::from(self.cols) + usize::from(col)].ch)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return;
        }
        let i = row as usize * usize::from(self.cols) + col as usize;
        self.cells[i] = Cell { ch, color };
    }

    pub fn text(&mut self, col: i32, row: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, color);
        }
    }

    pub fn text_centered(&mut self, row: i32, text: &str, color: Color) {
        let col = (i32::from(self.cols) - text.chars().count() as i32) / 2;
        self.text(col, row, text, color);
    }

    /// Fill the cells covered by a world rectangle with one glyph.
    pub fn fill_rect(&mut self, rect: &Rect, offset: Vec2, ch: char, color: Color) {
        let (c0, r0) = world_to_cell(Vec2::new(rect.left(), rect.top()), offset);
        let cols = (rect.w / CELL_W).ceil() as i32;
        let rows = (rect.h / CELL_H).ceil() as i32;
        for r in r0..r0 + rows {
            for c in c0..c0 + cols {
                self.put(c, r, ch, color);
            }
        }
    }

    /// Draw a sprite with its top-left at world point `top_left`. Blank
    /// cells are transparent. `silhouette` draws every opaque cell solid.
    pub fn blit(
        &mut self,
        sprite: &Sprite,
        top_left: Vec2,
        offset: Vec2,
        color: Color,
        silhouette: bool,
    ) {
        let (c0, r0) = world_to_cell(top_left, offset);
        for (r, row) in sprite.rows().iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let ch = if silhouette { SILHOUETTE } else { ch };
                self.put(c0 + c as i32, r0 + r as i32, ch, color);
            }
        }
    }

    /// Queue the whole canvas and flush once.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let width = usize::from(self.cols);
        for (row, cells) in self.cells.chunks(width.max(1)).enumerate() {
            out.queue(cursor::MoveTo(0, row as u16))?;
            let mut run = String::new();
            let mut run_color = None;
            for cell in cells {
                if run_color != Some(cell.color) {
                    if let Some(color) = run_color {
                        out.queue(style::SetForegroundColor(color))?;
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    run_color = Some(cell.color);
                }
                run.push(cell.ch);
            }
            if let Some(color) = run_color {
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(&run))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

enum Drawable<'a> {
    Obstacle(&'a Rect, &'a Tile),
    Sprite {
        sprite: &'a Sprite,
        top_left: Vec2,
        color: Color,
        silhouette: bool,
    },
    Glyph(Vec2, char, Color),
}

/// Compose one gameplay frame: ground first, then everything else ordered by
/// its center y, with the camera on the player, then the HUD.
pub fn draw_world(canvas: &mut Canvas, state: &GameState, level: &Level, assets: &Assets) {
    canvas.clear();
    let player_center = state.player.rect.center();
    let offset = camera_offset(player_center, canvas.cols(), canvas.rows());

    for ground in &level.ground {
        canvas.fill_rect(&ground.rect, offset, ground.tile.glyph, tile_color(&ground.tile));
    }

    let mut layer: Vec<(f32, Drawable)> = Vec::new();
    for obstacle in &level.obstacles {
        if let Some(tile) = &obstacle.tile {
            layer.push((obstacle.rect.center().y, Drawable::Obstacle(&obstacle.rect, tile)));
        }
    }
    for hostile in &state.hostiles {
        let kind = &assets.enemies[hostile.kind];
        let (sprite, color, silhouette) = match hostile.state {
            HostileState::Alive => (
                kind.frame(hostile.frame_index),
                C_ENEMIES[hostile.kind % C_ENEMIES.len()],
                false,
            ),
            HostileState::Dying { .. } => (&kind.frames[0], C_DYING, true),
        };
        layer.push((
            hostile.rect.center().y,
            Drawable::Sprite {
                sprite,
                top_left: Vec2::new(hostile.rect.x, hostile.rect.y),
                color,
                silhouette,
            },
        ));
    }
    for projectile in &state.projectiles {
        layer.push((
            projectile.rect.center().y,
            Drawable::Sprite {
                sprite: &assets.bullet,
                top_left: Vec2::new(projectile.rect.x, projectile.rect.y),
                color: C_BULLET,
                silhouette: false,
            },
        ));
    }
    layer.push((
        player_center.y,
        Drawable::Sprite {
            sprite: assets.player_frame(state.player.frame_index),
            top_left: Vec2::new(state.player.rect.x, state.player.rect.y),
            color: C_PLAYER,
            silhouette: false,
        },
    ));
    let gun_at = player_center + state.weapon.aim * state.weapon.offset_distance;
    let gun = GunPose::from_aim(state.weapon.aim).glyph(&assets.gun);
    layer.push((gun_at.y, Drawable::Glyph(gun_at, gun, C_GUN)));

    layer.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (_, drawable) in layer {
        match drawable {
            Drawable::Obstacle(rect, tile) => {
                canvas.fill_rect(rect, offset, tile.glyph, tile_color(tile));
            }
            Drawable::Sprite {
                sprite,
                top_left,
                color,
                silhouette,
            } => canvas.blit(sprite, top_left, offset, color, silhouette),
            Drawable::Glyph(at, ch, color) => {
                let (c, r) = world_to_cell(at, offset);
                canvas.put(c, r, ch, color);
            }
        }
    }

    draw_hud(canvas, state);
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud(canvas: &mut Canvas, state: &GameState) {
    let fill = health_fill(state.player.health, HEALTH_BAR_CELLS);
    canvas.text(0, 0, "[", C_HUD_TEXT);
    canvas.text(1, 0, &"█".repeat(fill), C_HEALTH);
    canvas.text(1 + fill as i32, 0, &" ".repeat(HEALTH_BAR_CELLS - fill), C_BACKGROUND);
    canvas.text(1 + HEALTH_BAR_CELLS as i32, 0, "]", C_HUD_TEXT);
    canvas.text(0, 1, &kill_counter(state.killed_count), C_HUD_TEXT);
}

// ── Modal screens ─────────────────────────────────────────────────────────────

pub fn draw_title(canvas: &mut Canvas, assets: &Assets) {
    canvas.clear();
    let top = (i32::from(canvas.rows()) - assets.title.len() as i32) / 2;
    for (i, line) in assets.title.iter().enumerate() {
        canvas.text_centered(top + i as i32, line, C_HINT);
    }
    let mid = i32::from(canvas.rows()) / 2;
    canvas.text_centered(mid - 1, "S U R V I V O R", C_TITLE);
    canvas.text_centered(mid + 1, "Press any key to start", C_HUD_TEXT);
    canvas.text_centered(
        i32::from(canvas.rows()) - 1,
        "WASD / arrows: move   mouse: aim   click / SPACE: shoot   ESC: quit",
        C_HINT,
    );
}

pub fn draw_game_over(canvas: &mut Canvas, killed: u32) {
    draw_modal(canvas, "Game Over", "Press R to Respawn or Q to Quit", killed);
}

pub fn draw_finished(canvas: &mut Canvas, killed: u32) {
    draw_modal(canvas, "Game Finished!", "Press R to Restart or Q to Quit", killed);
}

fn draw_modal(canvas: &mut Canvas, title: &str, hint: &str, killed: u32) {
    canvas.clear();
    let mid = i32::from(canvas.rows()) / 2;
    canvas.text_centered(mid - 1, title, C_TITLE);
    canvas.text_centered(mid + 1, hint, C_HUD_TEXT);
    canvas.text_centered(mid + 3, &kill_counter(killed), C_HINT);
}
