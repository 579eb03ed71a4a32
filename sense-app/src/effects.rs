//! Scene effects and the view toggle.

use std::fmt;
use std::str::FromStr;

/// Effects the scene cycles through, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    /// No effect, hands only.
    #[default]
    Idle,
    /// Ambient particles.
    Sparkle,
    /// Particle emitters pinned to the primary hand's joints.
    JointTrails,
    /// Live depth mesh reconstruction.
    DepthMesh,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Idle => write!(f, "Idle"),
            Effect::Sparkle => write!(f, "Sparkle"),
            Effect::JointTrails => write!(f, "JointTrails"),
            Effect::DepthMesh => write!(f, "DepthMesh"),
        }
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(Effect::Idle),
            "sparkle" => Ok(Effect::Sparkle),
            "joint-trails" | "joints" => Ok(Effect::JointTrails),
            "depth-mesh" | "mesh" => Ok(Effect::DepthMesh),
            other => Err(format!("unknown effect '{}'", other)),
        }
    }
}

impl Effect {
    /// Get all effects in cycle order.
    pub fn all() -> &'static [Effect] {
        &[
            Effect::Idle,
            Effect::Sparkle,
            Effect::JointTrails,
            Effect::DepthMesh,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Effect> {
        Self::all().get(index).copied()
    }

    /// Cycle to the next effect, wrapping after the last.
    pub fn next(self) -> Self {
        let next = next_effect(self.index(), Self::all().len());
        Self::from_index(next).unwrap_or_default()
    }
}

/// Index of the effect after `current` in a cycle of `count` effects.
///
/// An empty cycle always yields 0.
pub fn next_effect(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (current + 1) % count
}

/// Which camera stream is shown on the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Depth,
    Colour,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Depth => ViewMode::Colour,
            ViewMode::Colour => ViewMode::Depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_effect_wraps() {
        assert_eq!(next_effect(0, 4), 1);
        assert_eq!(next_effect(2, 4), 3);
        assert_eq!(next_effect(3, 4), 0);
        assert_eq!(next_effect(0, 1), 0);
    }

    #[test]
    fn test_next_effect_empty_cycle() {
        assert_eq!(next_effect(0, 0), 0);
        assert_eq!(next_effect(5, 0), 0);
    }

    #[test]
    fn test_effect_cycle() {
        let mut effect = Effect::Idle;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(effect);
            effect = effect.next();
        }
        assert_eq!(
            seen,
            vec![
                Effect::Idle,
                Effect::Sparkle,
                Effect::JointTrails,
                Effect::DepthMesh,
                Effect::Idle,
            ]
        );
    }

    #[test]
    fn test_effect_indices() {
        assert_eq!(Effect::JointTrails.index(), 2);
        assert_eq!(Effect::DepthMesh.index(), 3);
        assert_eq!(Effect::from_index(3), Some(Effect::DepthMesh));
        assert_eq!(Effect::from_index(4), None);
    }

    #[test]
    fn test_effect_parse() {
        assert_eq!("mesh".parse::<Effect>(), Ok(Effect::DepthMesh));
        assert_eq!("Joint-Trails".parse::<Effect>(), Ok(Effect::JointTrails));
        assert!("fireworks".parse::<Effect>().is_err());
    }

    #[test]
    fn test_view_toggle() {
        assert_eq!(ViewMode::Depth.toggled(), ViewMode::Colour);
        assert_eq!(ViewMode::Colour.toggled(), ViewMode::Depth);
    }
}
