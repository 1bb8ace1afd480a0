use serde::{Deserialize, Serialize};

/// Phase of the current gesture sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureMode {
    #[default]
    Idle,
    Panning,
    Scaling,
}

/// Gesture bookkeeping owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    mode: GestureMode,
    scale_changed: bool,
}

impl GestureState {
    #[must_use]
    pub fn mode(self) -> GestureMode {
        self.mode
    }

    /// `true` once the current sequence applied at least one scale step.
    #[must_use]
    pub fn scale_changed(self) -> bool {
        self.scale_changed
    }

    pub fn on_gesture_begin(&mut self) {
        self.mode = GestureMode::Idle;
        self.scale_changed = false;
    }

    pub fn on_pan(&mut self) {
        if self.mode == GestureMode::Idle {
            self.mode = GestureMode::Panning;
        }
    }

    pub fn on_scale(&mut self) {
        self.mode = GestureMode::Scaling;
        self.scale_changed = true;
    }

    /// Returns to idle and reports whether the finished sequence zoomed.
    pub fn on_gesture_end(&mut self) -> bool {
        let scaled = self.scale_changed;
        self.mode = GestureMode::Idle;
        self.scale_changed = false;
        scaled
    }
}
