use crossterm::style::Color;

use survivor::assets::{Assets, EnemyKind, GunSheet, Sprite};
use survivor::compute::new_game;
use survivor::display::*;
use survivor::entities::{Hostile, HostileState};
use survivor::geometry::Vec2;
use survivor::map::Level;

const SHEET: GunSheet = GunSheet {
    horizontal: '-',
    falling: '\\',
    vertical: '|',
    rising: '/',
};

fn sprite(art: &str) -> Sprite {
    Sprite::parse(art).unwrap()
}

fn make_assets() -> Assets {
    Assets {
        bullet: sprite("*"),
        gun: SHEET,
        player: vec![sprite("@")],
        enemies: vec![EnemyKind {
            name: "bat".to_string(),
            frames: vec![sprite("v"), sprite("^")],
        }],
        title: vec!["~~~".to_string()],
    }
}

fn make_level() -> Level {
    Level {
        tile_width: 64.0,
        tile_height: 64.0,
        width_px: 2560.0,
        height_px: 1920.0,
        ground: Vec::new(),
        obstacles: Vec::new(),
        spawn_points: vec![Vec2::new(0.0, 0.0)],
        player_start: Vec2::new(1000.0, 1000.0),
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[test]
fn camera_centers_the_target() {
    let center = screen_center(80, 24);
    assert_eq!(center, Vec2::new(640.0, 384.0));
    let offset = camera_offset(Vec2::new(1000.0, 1000.0), 80, 24);
    assert_eq!(offset, Vec2::new(360.0, 616.0));
    assert_eq!(world_to_cell(Vec2::new(1000.0, 1000.0), offset), (40, 12));
}

#[test]
fn world_to_cell_floors_negative_positions() {
    assert_eq!(world_to_cell(Vec2::new(-1.0, -1.0), Vec2::ZERO), (-1, -1));
    assert_eq!(world_to_cell(Vec2::new(15.9, 31.9), Vec2::ZERO), (0, 0));
}

// ── Gun pose ──────────────────────────────────────────────────────────────────

#[test]
fn gun_pose_faces_right_unflipped() {
    let pose = GunPose::from_aim(Vec2::new(1.0, 0.0));
    assert!(pose.angle_deg.abs() < 1e-4);
    assert!(!pose.flip_vertical);
}

#[test]
fn gun_pose_faces_left_flipped() {
    let pose = GunPose::from_aim(Vec2::new(-1.0, 0.0));
    assert!((pose.angle_deg - 180.0).abs() < 1e-4);
    assert!(pose.flip_vertical);
}

#[test]
fn barrel_follows_aim() {
    for (x, y) in [(1.0, 0.0), (0.6, 0.8), (0.6, -0.8), (-0.6, 0.8), (-0.6, -0.8), (-1.0, 0.0)] {
        let aim = Vec2::new(x, y);
        let barrel = GunPose::from_aim(aim).barrel();
        assert!((barrel.x - aim.x).abs() < 1e-4, "{aim:?} -> {barrel:?}");
        assert!((barrel.y - aim.y).abs() < 1e-4, "{aim:?} -> {barrel:?}");
    }
}

#[test]
fn gun_glyph_by_direction() {
    let d = std::f32::consts::FRAC_1_SQRT_2;
    let glyph = |x, y| GunPose::from_aim(Vec2::new(x, y)).glyph(&SHEET);
    assert_eq!(glyph(1.0, 0.0), '-');
    assert_eq!(glyph(-1.0, 0.0), '-');
    assert_eq!(glyph(0.0, 1.0), '|');
    assert_eq!(glyph(0.0, -1.0), '|');
    assert_eq!(glyph(d, -d), '/');
    assert_eq!(glyph(-d, d), '/');
    assert_eq!(glyph(d, d), '\\');
    assert_eq!(glyph(-d, -d), '\\');
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[test]
fn health_bar_fill() {
    assert_eq!(health_fill(1000, HEALTH_BAR_CELLS), 25);
    assert_eq!(health_fill(500, HEALTH_BAR_CELLS), 12);
    assert_eq!(health_fill(0, HEALTH_BAR_CELLS), 0);
    assert_eq!(health_fill(-30, HEALTH_BAR_CELLS), 0);
    assert_eq!(health_fill(5000, HEALTH_BAR_CELLS), 25);
}

#[test]
fn kill_counter_text() {
    assert_eq!(kill_counter(7), "Enemies Killed: 7/50");
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[test]
fn blit_skips_transparent_cells_and_clips() {
    let mut canvas = Canvas::new(4, 2);
    canvas.blit(&sprite("a b"), Vec2::new(16.0, 0.0), Vec2::ZERO, Color::White, false);
    assert_eq!(canvas.glyph_at(1, 0), Some('a'));
    assert_eq!(canvas.glyph_at(2, 0), Some(' '));
    assert_eq!(canvas.glyph_at(3, 0), Some('b'));
    assert_eq!(canvas.glyph_at(4, 0), None);

    canvas.blit(&sprite("xyz"), Vec2::new(32.0, 32.0), Vec2::ZERO, Color::White, true);
    assert_eq!(canvas.glyph_at(2, 1), Some('█'));
    assert_eq!(canvas.glyph_at(3, 1), Some('█'));
}

#[test]
fn resize_discards_contents() {
    let mut canvas = Canvas::new(4, 2);
    canvas.text(0, 0, "hi", Color::White);
    canvas.resize(6, 3);
    assert_eq!((canvas.cols(), canvas.rows()), (6, 3));
    assert_eq!(canvas.glyph_at(0, 0), Some(' '));
}

#[test]
fn present_writes_every_row() {
    let mut canvas = Canvas::new(5, 2);
    canvas.text(0, 0, "abc", Color::White);
    let mut out: Vec<u8> = Vec::new();
    canvas.present(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("abc"));
}

// ── Scenes ────────────────────────────────────────────────────────────────────

#[test]
fn world_centers_player_and_draws_hud() {
    let (level, assets) = (make_level(), make_assets());
    let state = new_game(&level, &assets, 0, 3, 1000);
    let mut canvas = Canvas::new(80, 24);
    draw_world(&mut canvas, &state, &level, &assets);

    assert_eq!(canvas.glyph_at(39, 11), Some('@'));
    // default aim is straight down
    assert_eq!(canvas.glyph_at(40, 13), Some('|'));
    assert_eq!(canvas.glyph_at(0, 0), Some('['));
    assert_eq!(canvas.glyph_at(1, 0), Some('█'));
    assert_eq!(canvas.glyph_at(26, 0), Some(']'));
    assert_eq!(canvas.glyph_at(0, 1), Some('E'));
}

#[test]
fn dying_hostile_is_a_silhouette() {
    let (level, assets) = (make_level(), make_assets());
    let mut state = new_game(&level, &assets, 0, 0, 1000);
    // two cells right of the player sprite
    let mut hostile = Hostile::new(Vec2::new(1040.0, 1000.0), (16.0, 32.0), 0);
    hostile.frame_index = 1.0;
    state.hostiles.push(hostile.clone());

    let mut canvas = Canvas::new(80, 24);
    draw_world(&mut canvas, &state, &level, &assets);
    assert_eq!(canvas.glyph_at(42, 11), Some('^'));

    hostile.state = HostileState::Dying { since: 0 };
    state.hostiles[0] = hostile;
    draw_world(&mut canvas, &state, &level, &assets);
    assert_eq!(canvas.glyph_at(42, 11), Some('█'));
}

#[test]
fn modal_screens_show_their_prompts() {
    let mut canvas = Canvas::new(40, 10);
    draw_game_over(&mut canvas, 4);
    let row: String = (0..40).filter_map(|c| canvas.glyph_at(c, 6)).collect();
    assert!(row.contains("Press R to Respawn or Q to Quit"));

    draw_finished(&mut canvas, 51);
    let row: String = (0..40).filter_map(|c| canvas.glyph_at(c, 4)).collect();
    assert!(row.contains("Game Finished!"));
}
