use std::collections::HashSet;

use super::controller::{Button, Controller, Key};

/// What the viewer wants to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer travel in pixels since the previous frame
    pub look_delta: (f32, f32),
    /// Confirm key went down at least once since the previous frame
    pub confirm_pressed: bool,
}

impl MoveIntent {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// What keeps a button held: a physical key, or a direct role-level press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source {
    Key(Key),
    Direct(Button),
}

impl Source {
    fn button(self) -> Button {
        match self {
            Source::Key(key) => key.button(),
            Source::Direct(button) => button,
        }
    }
}

/// Records raw device events between frames.
/// Event callbacks are the only writers; the frame loop drains it with [`InputSampler::take_intent`].
/// A button stays held while any key mapped to it is down.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HashSet<Source>,
    pressed_vec: Vec<Button>,
    dragging: bool,
    last_pointer: Option<(f32, f32)>,
    look_delta: (f32, f32),
    confirm_presses: u32,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    fn press(&mut self, source: Source) -> bool {
        let button = source.button();
        let was_down = self.is_down(button);
        if !self.held.insert(source) || was_down {
            return false;
        }
        self.pressed_vec.push(button);
        if button == Button::Confirm {
            self.confirm_presses += 1;
        }
        true
    }

    fn release(&mut self, source: Source) {
        let button = source.button();
        if self.held.remove(&source) && !self.is_down(button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    /// Returns true when the button was not already held (auto-repeat is a no-op)
    pub fn key_down(&mut self, button: Button) -> bool {
        self.press(Source::Direct(button))
    }

    pub fn key_up(&mut self, button: Button) {
        self.release(Source::Direct(button))
    }

    /// Physical key press. Returns true when its button was not already held.
    pub fn physical_key_down(&mut self, key: Key) -> bool {
        self.press(Source::Key(key))
    }

    pub fn physical_key_up(&mut self, key: Key) {
        self.release(Source::Key(key))
    }

    /// Key event by name; unrecognized names are ignored
    pub fn key_down_named(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.physical_key_down(key);
        } else if let Some(button) = Button::from_key_name(name) {
            self.key_down(button);
        }
    }

    pub fn key_up_named(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.physical_key_up(key);
        } else if let Some(button) = Button::from_key_name(name) {
            self.key_up(button);
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = Some((x, y));
        self.key_down(Button::Pointer);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.key_up(Button::Pointer);
    }

    /// Each move contributes its offset from the previous move, not from drag start
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        if let Some((last_x, last_y)) = self.last_pointer {
            self.look_delta.0 += x - last_x;
            self.look_delta.1 += y - last_y;
        }
        self.last_pointer = Some((x, y));
    }

    /// Raw relative motion (e.g. from a locked pointer), applied only while dragging
    pub fn pointer_motion(&mut self, dx: f32, dy: f32) {
        if self.dragging {
            self.look_delta.0 += dx;
            self.look_delta.1 += dy;
        }
    }

    /// Focus lost: nothing can stay held
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed_vec.clear();
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pending_look_delta(&self) -> (f32, f32) {
        self.look_delta
    }

    /// Snapshot held state and drain the per-frame accumulators
    pub fn take_intent(&mut self) -> MoveIntent {
        let intent = MoveIntent {
            forward: self.is_down(Button::Forward),
            backward: self.is_down(Button::Backward),
            left: self.is_down(Button::Left),
            right: self.is_down(Button::Right),
            look_delta: self.look_delta,
            confirm_pressed: self.confirm_presses > 0,
        };
        self.look_delta = (0.0, 0.0);
        self.confirm_presses = 0;
        intent
    }
}

impl Controller for InputSampler {
    fn is_down(&self, button: Button) -> bool {
        self.held.iter().any(|source| source.button() == button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
