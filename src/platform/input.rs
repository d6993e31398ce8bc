//! Player input
//!
//! Browser callbacks push actions into an `InputQueue`; the frame loop drains
//! it once per frame.

use super::InputSource;

/// A player action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Pointer moved to this x coordinate (CSS pixels)
    PointerMove { x: f32 },
    /// Pause key or pause button
    TogglePause,
    /// The settings surface was opened
    OpenSettings,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn key_action(key: &str) -> Option<InputAction> {
    match key {
        "p" | "P" => Some(InputAction::TogglePause),
        _ => None,
    }
}

/// Actions collected between frames
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: Vec<InputAction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action; consecutive pointer moves collapse into the latest
    pub fn push(&mut self, action: InputAction) {
        if let (Some(InputAction::PointerMove { x }), InputAction::PointerMove { x: new_x }) =
            (self.pending.last_mut(), action)
        {
            *x = new_x;
            return;
        }
        self.pending.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl InputSource for InputQueue {
    fn drain(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.pending)
    }
}
