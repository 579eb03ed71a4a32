//! Mapping from sensor space hand data to scene transforms.
//!
//! The sensor reports meters in a right-handed frame facing the user; the
//! scene mirrors X and Z and scales everything up to scene units.

use glam::{Quat, Vec3};
use sense_capture::{Joint, TrackedHand};

/// Scene units per sensor meter for hand positions.
pub const HAND_SCALE: f32 = 25.0;
/// Distance the hand plane is pushed away from the scene camera.
pub const HAND_DEPTH_OFFSET: f32 = 10.0;
/// Depth scale and offset for joint anchors.
pub const JOINT_DEPTH_SCALE: f32 = 7.5;
pub const JOINT_DEPTH_OFFSET: f32 = 2.5;
/// Hand model size per bounding-box pixel.
pub const HAND_SIZE_PER_PIXEL: f32 = 0.0075;

/// Placement of a hand model in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Map a tracked hand to its scene transform.
pub fn hand_transform(hand: &TrackedHand) -> HandTransform {
    let p = hand.mass_center;
    let h = hand.bounding_box_height;
    HandTransform {
        position: Vec3::new(
            -p.x * HAND_SCALE,
            p.y * HAND_SCALE,
            -p.z * HAND_SCALE + HAND_DEPTH_OFFSET,
        ),
        rotation: hand.palm_orientation,
        scale: Vec3::new(h, h, h * 2.0) * HAND_SIZE_PER_PIXEL,
    }
}

/// Map a tracked joint to the scene position of its particle emitter.
pub fn joint_anchor(joint: &Joint) -> Vec3 {
    let p = joint.position_world;
    Vec3::new(
        -p.x * HAND_SCALE,
        p.y * HAND_SCALE,
        -p.z * JOINT_DEPTH_SCALE + JOINT_DEPTH_OFFSET,
    )
}

/// Depth readout for a hand placed at `position`, in hundredths.
pub fn hand_depth_label(position: Vec3) -> String {
    // `+ 0.0` turns a negated zero into positive zero.
    let depth = -(position.z * 100.0).round() / 100.0 + 0.0;
    format!("Hand Depth: {:.2}", depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_transform() {
        let hand = TrackedHand::at(Vec3::new(0.1, 0.2, 0.4))
            .with_orientation(Quat::from_rotation_y(0.5))
            .with_bounding_box_height(100.0);
        let t = hand_transform(&hand);
        assert!((t.position - Vec3::new(-2.5, 5.0, 0.0)).length() < 1e-5);
        assert_eq!(t.rotation, Quat::from_rotation_y(0.5));
        assert!((t.scale - Vec3::new(0.75, 0.75, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_joint_anchor() {
        let joint = Joint::new(Vec3::new(0.2, -0.1, 0.4), 100.0);
        let anchor = joint_anchor(&joint);
        assert!((anchor - Vec3::new(-5.0, -2.5, -0.5)).length() < 1e-5);
    }

    #[test]
    fn test_hand_depth_label() {
        assert_eq!(hand_depth_label(Vec3::new(0.0, 0.0, -1.234)), "Hand Depth: 1.23");
        assert_eq!(hand_depth_label(Vec3::new(0.0, 0.0, 2.5)), "Hand Depth: -2.50");
    }

    #[test]
    fn test_hand_depth_label_at_zero() {
        assert_eq!(hand_depth_label(Vec3::ZERO), "Hand Depth: 0.00");
        assert_eq!(hand_depth_label(Vec3::new(0.0, 0.0, 0.004)), "Hand Depth: 0.00");

        let hand = TrackedHand::at(Vec3::new(0.0, 0.0, 0.4));
        let t = hand_transform(&hand);
        assert_eq!(hand_depth_label(t.position), "Hand Depth: 0.00");
    }
}
