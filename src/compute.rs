/// Game-logic functions.
///
/// Component operations mutate the entity they are given. The per-tick
/// `tick` function takes an immutable reference to the current `GameState`
/// (and an RNG handle) and returns a brand-new `GameState` together with the
/// side effects the caller should perform.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::assets::Assets;
use crate::collision::{masks_collide, resolve_axis, Axis};
use crate::constants::{CONTACT_DAMAGE, KILL_TARGET, PLAYER_ANIMATION_SPEED};
use crate::entities::{
    FrameEvent, GameState, GameStatus, Hostile, HostileState, Obstacle, Player, PlayerWeapon,
    Projectile, Screen, ScreenCommand, ScreenInput,
};
use crate::geometry::Vec2;
use crate::map::Level;

/// Everything the loop samples from the outside world for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    /// Game clock in milliseconds.
    pub now: u64,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Pointer in screen pixels, if known.
    pub pointer: Option<Vec2>,
    pub screen_center: Vec2,
    /// Sampled every tick; holding fires at the cooldown rate.
    pub fire_held: bool,
    /// Raw movement axes in -1..=1, not yet normalised.
    pub movement: Vec2,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh game on `level`, carrying over `killed_count`.
pub fn new_game(
    level: &Level,
    assets: &Assets,
    now: u64,
    killed_count: u32,
    spawn_interval_ms: u64,
) -> GameState {
    GameState {
        player: Player::new(level.player_start, assets.player_frame(0.0).size()),
        weapon: PlayerWeapon::default(),
        hostiles: Vec::new(),
        projectiles: Vec::new(),
        killed_count,
        spawn_interval_ms,
        next_spawn_at: now + spawn_interval_ms,
        status: GameStatus::Playing,
    }
}

// ── Weapon ───────────────────────────────────────────────────────────────────

/// Aim from the screen center towards the pointer. A pointer sitting exactly
/// on the center keeps the previous aim.
pub fn update_aim(weapon: &mut PlayerWeapon, pointer: Vec2, screen_center: Vec2) {
    if let Some(aim) = (pointer - screen_center).normalize() {
        weapon.aim = aim;
    }
}

/// Fire if the cooldown allows it. The bullet starts `offset_distance`
/// along the aim from the owner's center.
pub fn try_fire(
    weapon: &mut PlayerWeapon,
    owner_center: Vec2,
    now: u64,
    bullet_size: (f32, f32),
) -> Option<Projectile> {
    if !weapon.can_shoot {
        return None;
    }
    weapon.can_shoot = false;
    weapon.last_shot_time = now;
    let origin = owner_center + weapon.aim * weapon.offset_distance;
    Some(Projectile::new(origin, bullet_size, weapon.aim, now))
}

pub fn weapon_tick(weapon: &mut PlayerWeapon, now: u64) {
    if !weapon.can_shoot && now.saturating_sub(weapon.last_shot_time) >= weapon.cooldown_ms {
        weapon.can_shoot = true;
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Advance a projectile. Returns `false` once its lifetime has elapsed.
pub fn projectile_tick(projectile: &mut Projectile, dt: f32, now: u64) -> bool {
    projectile
        .rect
        .translate(projectile.direction * (projectile.speed * dt));
    now.saturating_sub(projectile.spawn_time) < projectile.lifetime_ms
}

// ── Hostiles ─────────────────────────────────────────────────────────────────

/// Start the death timer. Already-dying hostiles keep their original time.
pub fn destroy_hostile(hostile: &mut Hostile, now: u64) {
    if hostile.is_alive() {
        hostile.state = HostileState::Dying { since: now };
    }
}

/// Advance a hostile. Returns `false` once a dying hostile should be removed.
pub fn hostile_tick(
    hostile: &mut Hostile,
    player_center: Vec2,
    obstacles: &[Obstacle],
    dt: f32,
    now: u64,
) -> bool {
    if let HostileState::Dying { since } = hostile.state {
        return now.saturating_sub(since) < hostile.death_duration_ms;
    }

    if let Some(direction) = (player_center - hostile.hitbox.center()).normalize() {
        hostile.direction = direction;
        let step = hostile.speed * dt;
        hostile.hitbox.x += direction.x * step;
        resolve_axis(&mut hostile.hitbox, direction, Axis::Horizontal, obstacles);
        hostile.hitbox.y += direction.y * step;
        resolve_axis(&mut hostile.hitbox, direction, Axis::Vertical, obstacles);
        hostile.rect.set_center(hostile.hitbox.center());
    }

    hostile.frame_index += hostile.animation_speed * dt;
    true
}

fn spawn_hostile(
    state: &mut GameState,
    level: &Level,
    assets: &Assets,
    rng: &mut impl Rng,
) -> Option<FrameEvent> {
    let at = *level.spawn_points.choose(rng)?;
    let kind = rng.gen_range(0..assets.enemies.len());
    let size = assets.enemies[kind].frames[0].size();
    state.hostiles.push(Hostile::new(at, size, kind));
    debug!(kind = %assets.enemies[kind].name, x = at.x, y = at.y, "hostile_spawned");
    Some(FrameEvent::HostileSpawned { kind, at })
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Move the player along the input axes with the same axis-separated
/// obstacle resolution hostiles use.
pub fn move_player(player: &mut Player, movement: Vec2, obstacles: &[Obstacle], dt: f32) {
    player.direction = movement.normalize().unwrap_or(Vec2::ZERO);
    let step = player.speed * dt;
    player.hitbox.x += player.direction.x * step;
    resolve_axis(&mut player.hitbox, player.direction, Axis::Horizontal, obstacles);
    player.hitbox.y += player.direction.y * step;
    resolve_axis(&mut player.hitbox, player.direction, Axis::Vertical, obstacles);
    player.rect.set_center(player.hitbox.center());

    if player.direction == Vec2::ZERO {
        player.frame_index = 0.0;
    } else {
        player.frame_index += PLAYER_ANIMATION_SPEED * dt;
    }
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Advance the simulation by one tick. All randomness comes through `rng`
/// so callers control determinism (tests use a seeded RNG).
pub fn tick(
    state: &GameState,
    level: &Level,
    assets: &Assets,
    input: &TickInput,
    rng: &mut impl Rng,
) -> (GameState, Vec<FrameEvent>) {
    let mut next = state.clone();
    let mut events = Vec::new();
    if next.status != GameStatus::Playing {
        return (next, events);
    }
    let now = input.now;

    // ── 1. Spawn timer ───────────────────────────────────────────────────────
    if now >= next.next_spawn_at {
        events.extend(spawn_hostile(&mut next, level, assets, rng));
        next.next_spawn_at += next.spawn_interval_ms.max(1);
        if next.next_spawn_at <= now {
            next.next_spawn_at = now + next.spawn_interval_ms.max(1);
        }
    }

    // ── 2. Weapon cooldown & fire input ──────────────────────────────────────
    weapon_tick(&mut next.weapon, now);
    if input.fire_held {
        let center = next.player.rect.center();
        if let Some(projectile) = try_fire(&mut next.weapon, center, now, assets.bullet.size()) {
            next.projectiles.push(projectile);
            events.push(FrameEvent::Shot);
        }
    }

    // ── 3. Update entities ───────────────────────────────────────────────────
    move_player(&mut next.player, input.movement, &level.obstacles, input.dt);
    if let Some(pointer) = input.pointer {
        update_aim(&mut next.weapon, pointer, input.screen_center);
    }
    let player_center = next.player.rect.center();
    next.hostiles
        .retain_mut(|h| hostile_tick(h, player_center, &level.obstacles, input.dt, now));
    next.projectiles
        .retain_mut(|p| projectile_tick(p, input.dt, now));

    // ── 4. Collision: bullets ↔ hostiles ─────────────────────────────────────
    let bullet_mask = assets.bullet.mask();
    let mut spent: Vec<usize> = Vec::new();
    for (pi, projectile) in next.projectiles.iter().enumerate() {
        let hits: Vec<usize> = next
            .hostiles
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_alive())
            .filter(|(_, h)| {
                let frame = assets.enemies[h.kind].frame(h.frame_index);
                masks_collide(&projectile.rect, bullet_mask, &h.rect, frame.mask())
            })
            .map(|(i, _)| i)
            .collect();
        if hits.is_empty() {
            continue;
        }

        events.push(FrameEvent::Impact);
        spent.push(pi);
        for hi in hits {
            let hostile = &mut next.hostiles[hi];
            destroy_hostile(hostile, now);
            next.killed_count += 1;
            events.push(FrameEvent::HostileKilled { kind: hostile.kind });
            debug!(kills = next.killed_count, "hostile_killed");
            if next.killed_count > KILL_TARGET && next.status == GameStatus::Playing {
                next.status = GameStatus::Finished;
            }
        }
    }
    next.projectiles = next
        .projectiles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent.contains(i))
        .map(|(_, p)| p)
        .collect();

    if next.status == GameStatus::Finished {
        info!(kills = next.killed_count, "game_finished");
        events.push(FrameEvent::StatusChanged(GameStatus::Finished));
        return (next, events);
    }

    // ── 5. Collision: hostiles ↔ player ──────────────────────────────────────
    let player_mask = assets.player_frame(next.player.frame_index).mask();
    let touching = next.hostiles.iter().filter(|h| h.is_alive()).any(|h| {
        let frame = assets.enemies[h.kind].frame(h.frame_index);
        masks_collide(&next.player.rect, player_mask, &h.rect, frame.mask())
    });
    if touching {
        next.player.health -= CONTACT_DAMAGE;
        events.push(FrameEvent::PlayerDamaged {
            amount: CONTACT_DAMAGE,
            health: next.player.health,
        });
    }
    if next.player.health <= 0 {
        next.status = GameStatus::GameOver;
        info!(kills = next.killed_count, "game_over");
        events.push(FrameEvent::StatusChanged(GameStatus::GameOver));
    }

    (next, events)
}

// ── Screen transitions (pure) ────────────────────────────────────────────────

/// What a discrete input does on a given screen.
pub fn screen_command(screen: Screen, input: ScreenInput) -> ScreenCommand {
    if input == ScreenInput::QuitSignal {
        return ScreenCommand::Quit;
    }
    match (screen, input) {
        (Screen::Title, _) => ScreenCommand::Start,
        (Screen::GameOver, ScreenInput::Key('r' | 'R')) => {
            ScreenCommand::Restart { keep_kills: true }
        }
        (Screen::Finished, ScreenInput::Key('r' | 'R')) => {
            ScreenCommand::Restart { keep_kills: false }
        }
        (Screen::GameOver | Screen::Finished, ScreenInput::Key('q' | 'Q')) => ScreenCommand::Quit,
        _ => ScreenCommand::Stay,
    }
}

/// Screen shown once the simulation reports `status`.
pub fn screen_for(status: GameStatus) -> Screen {
    match status {
        GameStatus::Playing => Screen::Playing,
        GameStatus::GameOver => Screen::GameOver,
        GameStatus::Finished => Screen::Finished,
    }
}
