//! Mouse click edge detection

use glam::Vec2;

use crate::sim::SpawnRequest;

/// Reports a spawn request only on the frame the button goes down
#[derive(Debug, Clone, Default)]
pub struct ClickEdge {
    was_pressed: bool,
}

impl ClickEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current button state and cursor position
    pub fn update(&mut self, pressed: bool, cursor: Vec2) -> Option<SpawnRequest> {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        rising.then_some(SpawnRequest { pos: cursor })
    }
}
