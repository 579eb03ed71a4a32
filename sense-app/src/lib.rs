//! Sense Application
//!
//! Scene control for a depth camera session:
//! - Effect cycling and the depth/colour view toggle, driven by gestures
//! - Hand and joint placement from tracking data
//! - Live depth mesh reconstruction
//! - A full-screen smoothing pass for the preview

pub mod config;
pub mod effects;
pub mod errors;
pub mod gesture;
pub mod pose;
pub mod post;
pub mod session;

pub use config::SessionConfig;
pub use effects::{Effect, ViewMode, next_effect};
pub use errors::SessionError;
pub use gesture::{GestureAction, GestureDebounce, should_fire};
pub use pose::{HandTransform, hand_transform, joint_anchor};
pub use post::{BlitTarget, CpuSmoothing, PostPass};
pub use session::{FrameReport, SessionManager, SessionStats, StepOutcome};
