//! Hand tracking data as delivered by the tracking provider.
//!
//! These types carry whatever the provider reports for a frame; nothing here
//! performs tracking or recognition.

use glam::{Quat, Vec3};

/// Number of tracked joints per hand.
pub const JOINTS_PER_HAND: usize = 22;

/// A single tracked joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// Joint position in sensor world space (meters).
    pub position_world: Vec3,
    /// Tracking confidence (0-100).
    pub confidence: f32,
}

impl Joint {
    pub fn new(position_world: Vec3, confidence: f32) -> Self {
        Self {
            position_world,
            confidence,
        }
    }
}

/// One tracked hand.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedHand {
    /// Center of mass in sensor world space.
    pub mass_center: Vec3,
    /// Palm orientation.
    pub palm_orientation: Quat,
    /// Palm radius in world units.
    pub palm_radius: f32,
    /// Height of the hand's bounding box in image pixels.
    pub bounding_box_height: f32,
    /// Tracked joints, ordered by joint type.
    pub joints: Vec<Joint>,
}

impl TrackedHand {
    /// Create a hand at `mass_center` with an identity orientation and no joints.
    pub fn at(mass_center: Vec3) -> Self {
        Self {
            mass_center,
            palm_orientation: Quat::IDENTITY,
            palm_radius: 0.0,
            bounding_box_height: 0.0,
            joints: Vec::new(),
        }
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.palm_orientation = orientation;
        self
    }

    pub fn with_bounding_box_height(mut self, height: f32) -> Self {
        self.bounding_box_height = height;
        self
    }

    pub fn with_palm_radius(mut self, radius: f32) -> Self {
        self.palm_radius = radius;
        self
    }

    pub fn with_joints(mut self, joints: Vec<Joint>) -> Self {
        self.joints = joints;
        self
    }
}

/// A discrete gesture event fired during a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredGesture {
    pub name: String,
}

impl FiredGesture {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Everything the tracking provider reported for one frame.
///
/// Hands are ordered by time of appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    pub hands: Vec<TrackedHand>,
    pub gestures: Vec<FiredGesture>,
}

impl HandFrame {
    pub fn new(hands: Vec<TrackedHand>, gestures: Vec<FiredGesture>) -> Self {
        Self { hands, gestures }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// The first hand to appear, if any.
    pub fn primary(&self) -> Option<&TrackedHand> {
        self.hands.first()
    }
}
