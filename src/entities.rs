/// All game entity types: pure data, no logic.

use crate::constants::{
    BULLET_LIFETIME_MS, BULLET_SPEED, GUN_COOLDOWN_MS, GUN_DISTANCE, HOSTILE_ANIMATION_SPEED,
    HOSTILE_DEATH_MS, HOSTILE_HITBOX_INSET, HOSTILE_SPEED, MAX_HEALTH, PLAYER_HITBOX_INSET,
    PLAYER_SPEED,
};
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    Finished,
}

/// Top-level application screens, dispatched by the binary's main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Title,
    Playing,
    GameOver,
    Finished,
    Quit,
}

/// Discrete input relevant to screen transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenInput {
    Key(char),
    /// Any key without a character, e.g. Enter or an arrow.
    OtherKey,
    Click,
    /// Esc, Ctrl-C or the input source closing.
    QuitSignal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenCommand {
    Stay,
    Start,
    Restart { keep_kills: bool },
    Quit,
}

/// Side effects produced by a tick, consumed by audio and logging.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    Shot,
    Impact,
    HostileSpawned { kind: usize, at: Vec2 },
    HostileKilled { kind: usize },
    PlayerDamaged { amount: i32, health: i32 },
    StatusChanged(GameStatus),
}

// ── Static level geometry ─────────────────────────────────────────────────────

/// A tile visual: one glyph repeated over the covered area.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub glyph: char,
    /// Crossterm colour name, e.g. `"dark_green"`.
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundTile {
    pub rect: Rect,
    pub tile: Tile,
}

/// Static collider. `tile` is `None` for invisible collision rects.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub tile: Option<Tile>,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    /// Unit length at creation.
    pub direction: Vec2,
    pub speed: f32,
    pub spawn_time: u64,
    pub lifetime_ms: u64,
}

impl Projectile {
    pub fn new(center: Vec2, size: (f32, f32), direction: Vec2, now: u64) -> Self {
        Self {
            rect: Rect::from_center(center, size.0, size.1),
            direction,
            speed: BULLET_SPEED,
            spawn_time: now,
            lifetime_ms: BULLET_LIFETIME_MS,
        }
    }
}

// ── Hostiles ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostileState {
    Alive,
    /// Hit by a bullet at `since`; removed once the death duration has passed.
    Dying { since: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hostile {
    /// Visual rect, kept centered on the hitbox.
    pub rect: Rect,
    pub hitbox: Rect,
    /// Index into the loaded enemy animation sets.
    pub kind: usize,
    pub frame_index: f32,
    pub animation_speed: f32,
    pub direction: Vec2,
    pub speed: f32,
    pub state: HostileState,
    pub death_duration_ms: u64,
}

impl Hostile {
    pub fn new(center: Vec2, size: (f32, f32), kind: usize) -> Self {
        let rect = Rect::from_center(center, size.0, size.1);
        Self {
            rect,
            hitbox: rect.inflate(HOSTILE_HITBOX_INSET.0, HOSTILE_HITBOX_INSET.1),
            kind,
            frame_index: 0.0,
            animation_speed: HOSTILE_ANIMATION_SPEED,
            direction: Vec2::ZERO,
            speed: HOSTILE_SPEED,
            state: HostileState::Alive,
            death_duration_ms: HOSTILE_DEATH_MS,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == HostileState::Alive
    }
}

// ── Player & weapon ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub hitbox: Rect,
    pub direction: Vec2,
    pub speed: f32,
    pub frame_index: f32,
    pub health: i32,
}

impl Player {
    pub fn new(center: Vec2, size: (f32, f32)) -> Self {
        let rect = Rect::from_center(center, size.0, size.1);
        Self {
            rect,
            hitbox: rect.inflate(PLAYER_HITBOX_INSET.0, PLAYER_HITBOX_INSET.1),
            direction: Vec2::ZERO,
            speed: PLAYER_SPEED,
            frame_index: 0.0,
            health: MAX_HEALTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerWeapon {
    pub aim: Vec2,
    pub offset_distance: f32,
    pub can_shoot: bool,
    pub last_shot_time: u64,
    pub cooldown_ms: u64,
}

impl Default for PlayerWeapon {
    fn default() -> Self {
        Self {
            aim: Vec2::new(0.0, 1.0),
            offset_distance: GUN_DISTANCE,
            can_shoot: true,
            last_shot_time: 0,
            cooldown_ms: GUN_COOLDOWN_MS,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything that changes during play. Cloneable so the tick function can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub weapon: PlayerWeapon,
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    pub killed_count: u32,
    pub spawn_interval_ms: u64,
    pub next_spawn_at: u64,
    pub status: GameStatus,
}
