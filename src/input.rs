/// Terminal input tracking.
///
/// Instead of acting on each key event individually, the tracker records the
/// frame number of the last press/repeat event for every key. A key is
/// "held" while that record is fresh (within `HOLD_WINDOW` frames), which
/// lets movement and fire keys be held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper `Press` /
///   `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence.
///
/// The mouse is tracked directly: left button down/drag until up means
/// held. Any button press counts as a click.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::constants::{CELL_H, CELL_W};
use crate::entities::ScreenInput;
use crate::geometry::Vec2;

/// Frames a key stays held after its last press/repeat event.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Debug, Default)]
pub struct InputTracker {
    key_frame: HashMap<KeyCode, u64>,
    pointer: Option<(u16, u16)>,
    mouse_held: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminal event seen during `frame`. Returns the discrete
    /// input it represents for screen transitions, if any.
    pub fn handle(&mut self, event: &Event, frame: u64) -> Option<ScreenInput> {
        match event {
            Event::Key(key) => self.handle_key(key, frame),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, frame: u64) -> Option<ScreenInput> {
        match key.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(key.code, frame);
                match key.code {
                    KeyCode::Esc => Some(ScreenInput::QuitSignal),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(ScreenInput::QuitSignal)
                    }
                    KeyCode::Char(c) => Some(ScreenInput::Key(c)),
                    _ => Some(ScreenInput::OtherKey),
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
                None
            }
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> Option<ScreenInput> {
        self.pointer = Some((mouse.column, mouse.row));
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if button == MouseButton::Left {
                    self.mouse_held = true;
                }
                Some(ScreenInput::Click)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.mouse_held = true;
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_held = false;
                None
            }
            _ => None,
        }
    }

    /// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
    pub fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|&key| self.is_held(key, frame))
    }

    /// Raw movement axes from WASD / arrow keys, each in -1..=1.
    pub fn movement(&self, frame: u64) -> Vec2 {
        let left = self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        let right = self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        let up = self.any_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        let down = self.any_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        let axis = |neg: bool, pos: bool| f32::from(pos as u8) - f32::from(neg as u8);
        Vec2::new(axis(left, right), axis(up, down))
    }

    /// Left mouse button held, or Space held as a keyboard fallback.
    pub fn fire_held(&self, frame: u64) -> bool {
        self.mouse_held || self.is_held(KeyCode::Char(' '), frame)
    }

    /// Pointer position as the world-pixel center of the hovered cell.
    pub fn pointer_px(&self) -> Option<Vec2> {
        self.pointer.map(|(col, row)| cell_center_px(col, row))
    }

    /// Forget held keys and buttons, e.g. when leaving a modal screen.
    pub fn release_all(&mut self) {
        self.key_frame.clear();
        self.mouse_held = false;
    }
}

pub fn cell_center_px(col: u16, row: u16) -> Vec2 {
    Vec2::new(
        f32::from(col) * CELL_W + CELL_W / 2.0,
        f32::from(row) * CELL_H + CELL_H / 2.0,
    )
}
