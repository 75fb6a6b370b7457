/// Input button identifier, named by role rather than by physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Forward,
    Backward,
    Left,
    Right,
    /// Enter a door while in range
    Confirm,
    /// Primary pointer button, drag to look
    Pointer,
}

impl Button {
    /// Map a key name (as a browser or script reports it) to a button.
    /// Case-insensitive; unknown names yield None.
    pub fn from_key_name(name: &str) -> Option<Button> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" | "forward" => Some(Button::Forward),
            "s" | "arrowdown" | "backward" => Some(Button::Backward),
            "a" | "arrowleft" | "left" => Some(Button::Left),
            "d" | "arrowright" | "right" => Some(Button::Right),
            "f" | "confirm" => Some(Button::Confirm),
            _ => None,
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Button::Forward | Button::Backward | Button::Left | Button::Right
        )
    }
}

/// Physical key identity. Several keys can drive the same [`Button`], and each
/// one is held or released on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    F,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Case-insensitive browser-style key name
    pub fn from_name(name: &str) -> Option<Key> {
        match name.to_ascii_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "f" => Some(Key::F),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            _ => None,
        }
    }

    pub fn button(self) -> Button {
        match self {
            Key::W | Key::ArrowUp => Button::Forward,
            Key::S | Key::ArrowDown => Button::Backward,
            Key::A | Key::ArrowLeft => Button::Left,
            Key::D | Key::ArrowRight => Button::Right,
            Key::F => Button::Confirm,
        }
    }
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons, in press order
    fn get_down_keys(&self) -> &[Button];
}
