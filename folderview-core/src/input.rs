use std::time::Instant;

use kurbo::Point;

use crate::window::{ElementState, Key, ModifiersState, MouseButton};

/// A pointer button event in the coordinate space of the widget receiving it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// The button that changed state.
    pub button: MouseButton,
    /// Whether the button was pressed or released.
    pub state: ElementState,
    /// Position local to the receiving widget.
    pub position: Point,
    /// Keyboard modifiers held while the event happened.
    pub modifiers: ModifiersState,
    /// When the event happened. Used for double-click detection.
    pub time: Instant,
}

impl PointerEvent {
    /// Create a press event at `position`, stamped with the current time.
    pub fn press(button: MouseButton, position: impl Into<Point>) -> Self {
        Self {
            button,
            state: ElementState::Pressed,
            position: position.into(),
            modifiers: ModifiersState::empty(),
            time: Instant::now(),
        }
    }

    /// Create a release event at `position`, stamped with the current time.
    pub fn release(button: MouseButton, position: impl Into<Point>) -> Self {
        Self {
            state: ElementState::Released,
            ..Self::press(button, position)
        }
    }

    /// Set the held modifiers (builder pattern).
    pub fn with_modifiers(mut self, modifiers: ModifiersState) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the timestamp (builder pattern).
    pub fn at(mut self, time: Instant) -> Self {
        self.time = time;
        self
    }

    /// Same event, moved to another coordinate space.
    pub fn translated(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Returns true for a press of the given button.
    pub fn is_press_of(&self, button: MouseButton) -> bool {
        self.button == button && self.state == ElementState::Pressed
    }
}

/// A key press delivered to the focused widget.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Keyboard modifiers held while the key was pressed.
    pub modifiers: ModifiersState,
}

impl KeyEvent {
    /// Create a key event without modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: ModifiersState::empty(),
        }
    }
}
