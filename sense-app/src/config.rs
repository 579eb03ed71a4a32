//! Session configuration.

use crate::effects::Effect;
use crate::gesture::DEFAULT_COOLDOWN;
use sense_data::{BorderPolicy, MeshScale};

/// Number of hand models placed in the scene.
pub const DEFAULT_HAND_SLOTS: usize = 2;

/// Tunables for a [`crate::SessionManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Unit conversion for reconstructed depth meshes.
    pub scale: MeshScale,
    /// Depth used for the far border row and column of mesh vertices.
    pub border: BorderPolicy,
    /// Seconds between accepted gestures.
    pub gesture_cooldown: f64,
    /// Effect active after init.
    pub initial_effect: Effect,
    /// Hand models available; extra tracked hands are ignored.
    pub hand_slots: usize,
}

impl SessionConfig {
    pub fn with_scale(mut self, scale: MeshScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_border(mut self, border: BorderPolicy) -> Self {
        self.border = border;
        self
    }

    pub fn with_gesture_cooldown(mut self, seconds: f64) -> Self {
        self.gesture_cooldown = seconds;
        self
    }

    pub fn with_initial_effect(mut self, effect: Effect) -> Self {
        self.initial_effect = effect;
        self
    }

    pub fn with_hand_slots(mut self, slots: usize) -> Self {
        self.hand_slots = slots;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scale: MeshScale::REFERENCE,
            border: BorderPolicy::ClampToEdge,
            gesture_cooldown: DEFAULT_COOLDOWN,
            initial_effect: Effect::Idle,
            hand_slots: DEFAULT_HAND_SLOTS,
        }
    }
}
