//! Gesture debounce and gesture-to-action mapping.

/// Seconds a recognised gesture blocks further gestures.
pub const DEFAULT_COOLDOWN: f64 = 2.5;

/// Actions a fired gesture can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// Switch the preview between depth and colour.
    ToggleView,
    /// Advance to the next effect.
    NextEffect,
}

impl GestureAction {
    /// Map a provider gesture name to an action.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "v_sign" => Some(GestureAction::ToggleView),
            "thumb_down" => Some(GestureAction::NextEffect),
            _ => None,
        }
    }
}

/// Whether a gesture may fire at `now`, given when the last one fired.
pub fn should_fire(last_fire: Option<f64>, now: f64, cooldown: f64) -> bool {
    match last_fire {
        None => true,
        Some(last) => now - last >= cooldown,
    }
}

/// Tracks the last accepted gesture time.
#[derive(Debug, Clone)]
pub struct GestureDebounce {
    cooldown: f64,
    last_fire: Option<f64>,
}

impl GestureDebounce {
    pub fn new(cooldown: f64) -> Self {
        Self {
            cooldown,
            last_fire: None,
        }
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn last_fire(&self) -> Option<f64> {
        self.last_fire
    }

    /// Accept a gesture at `now` if the cooldown has elapsed.
    pub fn try_fire(&mut self, now: f64) -> bool {
        if should_fire(self.last_fire, now, self.cooldown) {
            self.last_fire = Some(now);
            true
        } else {
            false
        }
    }

    /// Seconds until the next gesture can fire.
    pub fn remaining(&self, now: f64) -> f64 {
        self.last_fire
            .map(|last| (self.cooldown - (now - last)).max(0.0))
            .unwrap_or(0.0)
    }
}

impl Default for GestureDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
