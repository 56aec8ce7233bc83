use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use survivor::entities::ScreenInput;
use survivor::geometry::Vec2;
use survivor::input::{cell_center_px, InputTracker, HOLD_WINDOW};

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn keys_map_to_screen_inputs() {
    let mut input = InputTracker::new();
    assert_eq!(input.handle(&press(KeyCode::Char('r')), 0), Some(ScreenInput::Key('r')));
    assert_eq!(input.handle(&press(KeyCode::Enter), 0), Some(ScreenInput::OtherKey));
    assert_eq!(input.handle(&press(KeyCode::Esc), 0), Some(ScreenInput::QuitSignal));
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(input.handle(&ctrl_c, 0), Some(ScreenInput::QuitSignal));
    assert_eq!(input.handle(&release(KeyCode::Char('r')), 0), None);
    assert_eq!(input.handle(&Event::FocusGained, 0), None);
}

#[test]
fn key_is_held_within_window() {
    let mut input = InputTracker::new();
    input.handle(&press(KeyCode::Char('d')), 10);
    assert_eq!(input.movement(10), Vec2::new(1.0, 0.0));
    assert_eq!(input.movement(10 + HOLD_WINDOW), Vec2::new(1.0, 0.0));
    assert_eq!(input.movement(11 + HOLD_WINDOW), Vec2::ZERO);
}

#[test]
fn release_drops_key_immediately() {
    let mut input = InputTracker::new();
    input.handle(&press(KeyCode::Up), 1);
    assert!(input.is_held(KeyCode::Up, 1));
    input.handle(&release(KeyCode::Up), 2);
    assert!(!input.is_held(KeyCode::Up, 2));
}

#[test]
fn combined_keys_give_diagonal_axes() {
    let mut input = InputTracker::new();
    input.handle(&press(KeyCode::Char('w')), 1);
    input.handle(&press(KeyCode::Left), 1);
    assert_eq!(input.movement(1), Vec2::new(-1.0, -1.0));

    input.handle(&press(KeyCode::Right), 1);
    assert_eq!(input.movement(1), Vec2::new(0.0, -1.0));
}

#[test]
fn mouse_button_holds_fire() {
    let mut input = InputTracker::new();
    assert!(!input.fire_held(0));
    assert_eq!(
        input.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4), 0),
        Some(ScreenInput::Click)
    );
    assert!(input.fire_held(100));
    input.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 4), 1);
    assert!(input.fire_held(100));
    input.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 4), 2);
    assert!(!input.fire_held(100));
}

#[test]
fn any_button_clicks_but_only_left_fires() {
    let mut input = InputTracker::new();
    for button in [MouseButton::Right, MouseButton::Middle] {
        assert_eq!(
            input.handle(&mouse(MouseEventKind::Down(button), 1, 1), 0),
            Some(ScreenInput::Click)
        );
        assert!(!input.fire_held(0));
    }
}

#[test]
fn space_fires_from_keyboard() {
    let mut input = InputTracker::new();
    input.handle(&press(KeyCode::Char(' ')), 7);
    assert!(input.fire_held(7));
}

#[test]
fn pointer_tracks_last_mouse_cell() {
    let mut input = InputTracker::new();
    assert_eq!(input.pointer_px(), None);
    input.handle(&mouse(MouseEventKind::Moved, 2, 1), 0);
    assert_eq!(input.pointer_px(), Some(Vec2::new(40.0, 48.0)));
    assert_eq!(cell_center_px(0, 0), Vec2::new(8.0, 16.0));
}

#[test]
fn release_all_clears_held_state() {
    let mut input = InputTracker::new();
    input.handle(&press(KeyCode::Char('s')), 1);
    input.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), 1);
    input.release_all();
    assert_eq!(input.movement(1), Vec2::ZERO);
    assert!(!input.fire_held(1));
}
