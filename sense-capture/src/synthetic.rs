//! Procedural depth source for demos and tests.

use crate::hands::{FiredGesture, HandFrame, JOINTS_PER_HAND, Joint, TrackedHand};
use crate::source::{CaptureError, DEFAULT_RESOLUTION, DepthSource, FrameData};
use glam::{Quat, Vec3};
use image::{Rgb, RgbImage};
use sense_data::DepthGrid;
use tracing::{debug, info};

/// Generates a moving depth bump and orbiting hands, with scripted gestures.
///
/// Every call to `next_frame` is one tick. Ticks start at 1.
pub struct SyntheticSource {
    resolution: (u32, u32),
    frame_rate: f32,
    tick: u64,
    frame_limit: Option<u64>,
    drop_every: Option<u64>,
    hand_count: usize,
    color: bool,
    gestures: Vec<(u64, String)>,
    active: bool,
}

impl SyntheticSource {
    /// Create a source at the default 640x480 resolution.
    pub fn new() -> Self {
        Self::with_resolution(DEFAULT_RESOLUTION.0, DEFAULT_RESOLUTION.1)
    }

    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            resolution: (width, height),
            frame_rate: 30.0,
            tick: 0,
            frame_limit: None,
            drop_every: None,
            hand_count: 1,
            color: false,
            gestures: Vec::new(),
            active: true,
        }
    }

    /// End the stream after `frames` ticks.
    pub fn frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Report no frame ready on every `n`th tick.
    pub fn drop_every(mut self, n: u64) -> Self {
        self.drop_every = (n > 0).then_some(n);
        self
    }

    pub fn hands(mut self, count: usize) -> Self {
        self.hand_count = count;
        self
    }

    /// Also produce a colour image with each frame.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Fire gesture `name` on tick `tick`.
    pub fn gesture_at(mut self, tick: u64, name: impl Into<String>) -> Self {
        self.gestures.push((tick, name.into()));
        self
    }

    fn depth_at(&self, t: f32) -> DepthGrid {
        let (width, height) = self.resolution;
        let cx = width as f32 * (0.5 + 0.25 * t.cos());
        let cy = height as f32 * (0.5 + 0.25 * t.sin());
        let radius = (width.min(height) as f32 * 0.2).max(1.0);
        DepthGrid::from_fn(width, height, |x, y| {
            let dx = (x as f32 - cx) / radius;
            let dy = (y as f32 - cy) / radius;
            0.2 + 0.6 * (-(dx * dx + dy * dy)).exp()
        })
    }

    fn hands_at(&self, t: f32) -> Vec<TrackedHand> {
        (0..self.hand_count)
            .map(|i| {
                let phase = t + i as f32 * std::f32::consts::PI;
                let center = Vec3::new(0.1 * phase.cos(), 0.05 * phase.sin(), 0.4);
                let joints = (0..JOINTS_PER_HAND)
                    .map(|j| {
                        let angle = j as f32 / JOINTS_PER_HAND as f32 * std::f32::consts::TAU;
                        let offset = Vec3::new(angle.cos(), angle.sin(), 0.0) * 0.03;
                        Joint::new(center + offset, 100.0)
                    })
                    .collect();
                TrackedHand::at(center)
                    .with_orientation(Quat::from_rotation_z(phase))
                    .with_palm_radius(0.04)
                    .with_bounding_box_height(120.0)
                    .with_joints(joints)
            })
            .collect()
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<FrameData>, CaptureError> {
        if !self.active {
            return Err(CaptureError::StreamEnded);
        }
        if let Some(limit) = self.frame_limit {
            if self.tick >= limit {
                return Err(CaptureError::StreamEnded);
            }
        }

        self.tick += 1;
        if let Some(n) = self.drop_every {
            if self.tick % n == 0 {
                debug!("Synthetic tick {} not ready", self.tick);
                return Ok(None);
            }
        }

        let timestamp = self.tick as f64 / self.frame_rate as f64;
        let t = timestamp as f32;
        let gestures = self
            .gestures
            .iter()
            .filter(|(tick, _)| *tick == self.tick)
            .map(|(_, name)| FiredGesture::new(name.clone()))
            .collect();

        let mut frame = FrameData::new(self.depth_at(t), timestamp, self.tick)
            .with_hands(HandFrame::new(self.hands_at(t), gestures));

        if self.color {
            let (width, height) = self.resolution;
            let image = RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x % 256) as u8, (y % 256) as u8, (self.tick % 256) as u8])
            });
            frame = frame.with_color(image);
        }

        Ok(Some(frame))
    }

    fn frame_rate(&self) -> Option<f32> {
        Some(self.frame_rate)
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
        info!("Synthetic source stopped after {} ticks", self.tick);
    }
}
