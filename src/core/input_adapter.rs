use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Key};
use super::input_sampler::InputSampler;

/// Adapter that bridges Winit events into an [`InputSampler`]
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Last known cursor position, needed to start a drag where the pointer is
    cursor: Option<(f32, f32)>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a window event. Returns true if the event was an input the sampler uses.
    pub fn process_event(&mut self, event: &WindowEvent, sampler: &mut InputSampler) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return false;
                };
                let Some(key) = Self::keycode_to_key(keycode) else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => {
                        sampler.physical_key_down(key);
                    }
                    ElementState::Released => sampler.physical_key_up(key),
                }
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
                        sampler.pointer_down(x, y);
                    }
                    ElementState::Released => sampler.pointer_up(),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = (position.x as f32, position.y as f32);
                self.cursor = Some(pos);
                sampler.pointer_move(pos.0, pos.1);
                true
            }
            WindowEvent::Focused(false) => {
                sampler.release_all();
                true
            }
            _ => false,
        }
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Map Winit KeyCode to Key
    pub fn keycode_to_key(keycode: KeyCode) -> Option<Key> {
        match keycode {
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::KeyF => Some(Key::F),
            KeyCode::ArrowUp => Some(Key::ArrowUp),
            KeyCode::ArrowDown => Some(Key::ArrowDown),
            KeyCode::ArrowLeft => Some(Key::ArrowLeft),
            KeyCode::ArrowRight => Some(Key::ArrowRight),
            _ => None,
        }
    }

    pub fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        Self::keycode_to_key(keycode).map(Key::button)
    }
}
