//! Per-frame session driver.
//!
//! The caller owns the loop: `init` once, `step` every frame, `shutdown` at
//! the end. Each processed frame runs, in order: preview update, the active
//! effect, hand placement, then gesture handling. Effect changes triggered by
//! a gesture therefore take effect on the following frame.

use crate::config::SessionConfig;
use crate::effects::{Effect, ViewMode};
use crate::errors::SessionError;
use crate::gesture::{GestureAction, GestureDebounce};
use crate::pose::{HandTransform, hand_depth_label, hand_transform, joint_anchor};
use glam::Vec3;
use image::{GrayImage, imageops};
use sense_capture::{DepthSource, FrameData, Session};
use sense_data::{Mesh, build_mesh_into};
use tracing::{debug, info};

/// What happened during one `step`.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No frame was ready; nothing changed.
    Skipped,
    Processed(FrameReport),
}

/// Summary of one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_number: u64,
    pub timestamp: f64,
    /// Effect that was active while the frame was processed.
    pub effect: Effect,
    pub view: ViewMode,
    pub hands_visible: usize,
    pub mesh_rebuilt: bool,
    /// Gesture actions accepted this frame.
    pub actions: Vec<GestureAction>,
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub processed: u64,
    pub skipped: u64,
    pub meshes_built: u64,
    pub gestures_accepted: u64,
}

/// Drives a depth source: effects, hands, gestures and mesh reconstruction.
pub struct SessionManager<S: DepthSource> {
    session: Session<S>,
    config: SessionConfig,
    effect: Effect,
    view: ViewMode,
    debounce: GestureDebounce,
    mesh: Mesh,
    hands: Vec<Option<HandTransform>>,
    joint_anchors: Vec<Vec3>,
    depth_label: Option<String>,
    display: Option<GrayImage>,
    stats: SessionStats,
}

impl<S: DepthSource> SessionManager<S> {
    /// Open `source` and prepare the scene.
    ///
    /// If anything after opening fails, the source is stopped before returning.
    pub fn init(source: S, config: SessionConfig) -> Result<Self, SessionError> {
        let session = Session::open(source)?;

        config.scale.validate()?;
        if !config.gesture_cooldown.is_finite() || config.gesture_cooldown < 0.0 {
            return Err(SessionError::InvalidConfig(format!(
                "gesture cooldown must be a non-negative number of seconds, got {}",
                config.gesture_cooldown
            )));
        }

        info!(
            "Session ready: effect {}, {} hand slots, border {:?}",
            config.initial_effect, config.hand_slots, config.border
        );

        Ok(Self {
            session,
            effect: config.initial_effect,
            view: ViewMode::default(),
            debounce: GestureDebounce::new(config.gesture_cooldown),
            mesh: Mesh::new(),
            hands: vec![None; config.hand_slots],
            joint_anchors: Vec::new(),
            depth_label: None,
            display: None,
            stats: SessionStats::default(),
            config,
        })
    }

    /// Process one frame if the source has one ready.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        let frame = match self.session.acquire()? {
            Some(frame) => frame,
            None => {
                self.stats.skipped += 1;
                debug!("No frame ready, keeping previous state");
                return Ok(StepOutcome::Skipped);
            }
        };

        let effect = self.effect;
        let view = self.view;
        self.update_display(&frame);

        let mut mesh_rebuilt = false;
        match effect {
            Effect::JointTrails => self.follow_joints(&frame),
            Effect::DepthMesh => {
                build_mesh_into(&frame.depth, self.config.scale, self.config.border, &mut self.mesh)?;
                self.stats.meshes_built += 1;
                mesh_rebuilt = true;
            }
            Effect::Idle | Effect::Sparkle => {}
        }

        let hands_visible = self.move_hands(&frame);
        let actions = self.handle_gestures(&frame);

        self.stats.processed += 1;
        Ok(StepOutcome::Processed(FrameReport {
            frame_number: frame.frame_number,
            timestamp: frame.timestamp,
            effect,
            view,
            hands_visible,
            mesh_rebuilt,
            actions,
        }))
    }

    /// Stop the source and return the session totals.
    pub fn shutdown(mut self) -> SessionStats {
        self.session.stop();
        let stats = self.stats;
        info!(
            "Session shut down: {} frames processed, {} skipped, {} meshes built, {} gestures",
            stats.processed, stats.skipped, stats.meshes_built, stats.gestures_accepted
        );
        stats
    }

    fn update_display(&mut self, frame: &FrameData) {
        let image = match (self.view, &frame.color) {
            (ViewMode::Colour, Some(color)) => imageops::grayscale(color),
            (ViewMode::Colour, None) => {
                debug!("No colour stream, showing depth");
                frame.depth.to_luma()
            }
            (ViewMode::Depth, _) => frame.depth.to_luma(),
        };
        self.display = Some(image);
    }

    fn follow_joints(&mut self, frame: &FrameData) {
        self.joint_anchors.clear();
        if let Some(hand) = frame.hands.primary() {
            self.joint_anchors.extend(hand.joints.iter().map(joint_anchor));
        }
    }

    fn move_hands(&mut self, frame: &FrameData) -> usize {
        let tracked = &frame.hands.hands;
        if tracked.len() > self.hands.len() {
            debug!(
                "{} hands tracked, only {} slots",
                tracked.len(),
                self.hands.len()
            );
        }

        let mut visible = 0;
        for (index, slot) in self.hands.iter_mut().enumerate() {
            *slot = tracked.get(index).map(hand_transform);
            if let Some(transform) = slot {
                self.depth_label = Some(hand_depth_label(transform.position));
                visible += 1;
            }
        }
        visible
    }

    fn handle_gestures(&mut self, frame: &FrameData) -> Vec<GestureAction> {
        let mut actions = Vec::new();
        for gesture in &frame.hands.gestures {
            let Some(action) = GestureAction::from_name(&gesture.name) else {
                debug!("Ignoring gesture '{}'", gesture.name);
                continue;
            };
            if !self.debounce.try_fire(frame.timestamp) {
                debug!(
                    "Gesture '{}' in cooldown ({:.2}s left)",
                    gesture.name,
                    self.debounce.remaining(frame.timestamp)
                );
                continue;
            }

            match action {
                GestureAction::ToggleView => {
                    self.view = self.view.toggled();
                    info!("View switched to {:?}", self.view);
                }
                GestureAction::NextEffect => {
                    let previous = self.effect;
                    self.effect = self.effect.next();
                    if previous == Effect::JointTrails {
                        self.joint_anchors.clear();
                    }
                    info!("Effect {} -> {}", previous, self.effect);
                }
            }
            self.stats.gestures_accepted += 1;
            actions.push(action);
        }
        actions
    }

    pub fn current_effect(&self) -> Effect {
        self.effect
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    /// The most recently built depth mesh. Empty until the first rebuild.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Hand model placement per slot; `None` hides the slot.
    pub fn hands(&self) -> &[Option<HandTransform>] {
        &self.hands
    }

    pub fn joint_anchors(&self) -> &[Vec3] {
        &self.joint_anchors
    }

    pub fn depth_label(&self) -> Option<&str> {
        self.depth_label.as_deref()
    }

    /// Grayscale preview of the selected stream for the last processed frame.
    pub fn display(&self) -> Option<&GrayImage> {
        self.display.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        self.session.inner()
    }
}
