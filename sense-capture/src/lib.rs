//! Sense Capture - depth frames and hand tracking data
//!
//! This crate provides the `DepthSource` trait and implementations that feed
//! depth frames (plus hand tracking output) into a sense session:
//!
//! - Recorded depth image sequences (via `image`)
//! - A procedural source for demos and tests
//!
//! ## Example
//!
//! ```ignore
//! use sense_capture::{Session, SyntheticSource};
//!
//! let mut session = Session::open(SyntheticSource::new())?;
//! if let Some(frame) = session.acquire()? {
//!     // Process frame...
//! }
//! // `None` means no frame was ready this cycle; try again next tick.
//! ```

mod hands;
mod image_sequence;
mod source;
mod synthetic;

pub use hands::{FiredGesture, HandFrame, JOINTS_PER_HAND, Joint, TrackedHand};
pub use image_sequence::ImageSequenceSource;
pub use source::{CaptureError, DEFAULT_RESOLUTION, DepthSource, FrameData, Session};
pub use synthetic::SyntheticSource;
