/// Keyboard and mouse state gathered between frames
use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::model::MoveDirections;

/// Input events the engine cares about, decoupled from winit's event types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseMove { dx: f32, dy: f32 },
    FocusLost,
    CursorGrabChanged { grabbed: bool },
}

#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    pub look_delta: (f32, f32),
    pub cursor_grabbed: bool,
    pub show_overlay: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(&key);
            }
            InputEvent::MouseMove { dx, dy } => {
                // Relative motion only counts while the cursor is captured
                if self.cursor_grabbed {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.look_delta = (0.0, 0.0);
            }
            InputEvent::CursorGrabChanged { grabbed } => {
                self.cursor_grabbed = grabbed;
            }
        }
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub quit: KeyCode,
    pub toggle_overlay: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyQ,
            down: KeyCode::KeyE,
            quit: KeyCode::Escape,
            toggle_overlay: KeyCode::F3,
        }
    }
}

/// Translates held keys into camera intent
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn directions(&self, input: &InputState) -> MoveDirections {
        MoveDirections {
            forward: input.is_key_pressed(self.bindings.forward),
            backward: input.is_key_pressed(self.bindings.backward),
            left: input.is_key_pressed(self.bindings.left),
            right: input.is_key_pressed(self.bindings.right),
            up: input.is_key_pressed(self.bindings.up),
            down: input.is_key_pressed(self.bindings.down),
        }
    }

    pub fn is_quit(&self, key: KeyCode) -> bool {
        key == self.bindings.quit
    }

    pub fn is_overlay_toggle(&self, key: KeyCode) -> bool {
        key == self.bindings.toggle_overlay
    }
}
