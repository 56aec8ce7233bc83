/// Gameplay tuning values. Distances are world pixels, times are milliseconds.

// ── World scale ──────────────────────────────────────────────────────────────

/// World pixels covered by one terminal column.
pub const CELL_W: f32 = 16.0;
/// World pixels covered by one terminal row (terminal cells are ~1:2).
pub const CELL_H: f32 = 32.0;

// ── Player ───────────────────────────────────────────────────────────────────

pub const MAX_HEALTH: i32 = 1000;
pub const PLAYER_SPEED: f32 = 500.0;
pub const PLAYER_ANIMATION_SPEED: f32 = 5.0;
pub const PLAYER_HITBOX_INSET: (f32, f32) = (-20.0, -40.0);
/// Damage taken on every tick the player overlaps a live hostile.
pub const CONTACT_DAMAGE: i32 = 10;

// ── Weapon & projectiles ─────────────────────────────────────────────────────

pub const GUN_DISTANCE: f32 = 50.0;
pub const GUN_COOLDOWN_MS: u64 = 300;
pub const BULLET_SPEED: f32 = 1200.0;
pub const BULLET_LIFETIME_MS: u64 = 1000;

// ── Hostiles ─────────────────────────────────────────────────────────────────

pub const HOSTILE_SPEED: f32 = 200.0;
pub const HOSTILE_ANIMATION_SPEED: f32 = 6.0;
pub const HOSTILE_HITBOX_INSET: (f32, f32) = (-20.0, -40.0);
pub const HOSTILE_DEATH_MS: u64 = 400;
pub const DEFAULT_SPAWN_INTERVAL_MS: u64 = 1000;

/// The game is finished once the kill counter goes past this value.
pub const KILL_TARGET: u32 = 50;
