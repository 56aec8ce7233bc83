use std::fs;
use std::path::Path;

use survivor::assets::{load_assets, load_frames, load_sprite, Sprite};
use survivor::error::AssetError;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn write_asset_tree(root: &Path) {
    write(&root.join("gun/bullet.txt"), "*\n");
    write(&root.join("gun/gun.txt"), "- \\ | /\n");
    write(&root.join("player/0.txt"), " o \n/|\\\n");
    write(&root.join("player/1.txt"), " o \n<|>\n");
    write(&root.join("enemies/skeleton/0.txt"), "S\n");
    write(&root.join("enemies/bat/0.txt"), "v\n");
    write(&root.join("enemies/bat/1.txt"), "^\n");
    write(&root.join("title.txt"), "SURVIVOR\n\n");
}

// ── Sprite ────────────────────────────────────────────────────────────────────

#[test]
fn sprite_pads_rows_and_drops_trailing_blanks() {
    let s = Sprite::parse(" o\n/|\\\n\n   \n").unwrap();
    assert_eq!(s.rows().len(), 2);
    assert_eq!(s.cols(), 3);
    assert_eq!(s.rows()[0], vec![' ', 'o', ' ']);
    assert_eq!(s.size(), (48.0, 64.0));
    assert_eq!(s.mask().count(), 4);
}

#[test]
fn blank_sprite_is_rejected() {
    assert!(Sprite::parse("").is_none());
    assert!(Sprite::parse("   \n  ").is_none());
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn loads_a_full_asset_tree() {
    let dir = tempfile::tempdir().unwrap();
    write_asset_tree(dir.path());

    let assets = load_assets(dir.path()).unwrap();
    assert_eq!(assets.bullet.size(), (16.0, 32.0));
    assert_eq!(
        (assets.gun.horizontal, assets.gun.falling, assets.gun.vertical, assets.gun.rising),
        ('-', '\\', '|', '/')
    );
    assert_eq!(assets.player.len(), 2);
    let names: Vec<&str> = assets.enemies.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, ["bat", "skeleton"]);
    assert_eq!(assets.enemies[0].frames.len(), 2);
    assert_eq!(assets.title, vec!["SURVIVOR".to_string(), String::new()]);
}

#[test]
fn frames_sort_numerically() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("10.txt"), "c");
    write(&dir.path().join("2.txt"), "b");
    write(&dir.path().join("1.txt"), "a");
    write(&dir.path().join("notes.md"), "ignored");

    let frames = load_frames(dir.path()).unwrap();
    let glyphs: Vec<char> = frames.iter().map(|f| f.rows()[0][0]).collect();
    assert_eq!(glyphs, ['a', 'b', 'c']);
}

#[test]
fn non_numeric_frame_name_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("walk.txt"), "a");
    assert!(matches!(
        load_frames(dir.path()),
        Err(AssetError::FrameName(_))
    ));
}

#[test]
fn empty_frame_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load_frames(dir.path()), Err(AssetError::NoFrames(_))));
}

#[test]
fn empty_sprite_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bullet.txt");
    write(&path, "  \n");
    assert!(matches!(load_sprite(&path), Err(AssetError::EmptySprite(_))));
}

#[test]
fn missing_asset_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    write_asset_tree(dir.path());
    fs::remove_file(dir.path().join("gun/bullet.txt")).unwrap();
    match load_assets(dir.path()) {
        Err(AssetError::Read { path, .. }) => assert!(path.ends_with("gun/bullet.txt")),
        other => panic!("expected Read error, got {other:?}"),
    }
}

#[test]
fn gun_sheet_needs_four_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    write_asset_tree(dir.path());
    write(&dir.path().join("gun/gun.txt"), "-|");
    assert!(matches!(
        load_assets(dir.path()),
        Err(AssetError::GunSheet { found: 2, .. })
    ));
}

#[test]
fn no_enemy_kinds_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_asset_tree(dir.path());
    fs::remove_dir_all(dir.path().join("enemies")).unwrap();
    fs::create_dir(dir.path().join("enemies")).unwrap();
    assert!(matches!(load_assets(dir.path()), Err(AssetError::NoEnemies(_))));
}

#[test]
fn bundled_assets_load() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let assets = load_assets(&dir).unwrap();
    assert!(!assets.player.is_empty());
    assert_eq!(assets.enemies.len(), 3);
    assert!(assets.enemies.iter().all(|k| !k.frames.is_empty()));
}
