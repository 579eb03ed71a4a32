//! Common depth source types and traits.

use crate::hands::HandFrame;
use image::RgbImage;
use sense_data::DepthGrid;
use std::ops::{Deref, DerefMut};
use thiserror::Error;
use tracing::{debug, info};

/// Resolution the depth and colour streams are requested at.
pub const DEFAULT_RESOLUTION: (u32, u32) = (640, 480);

/// Errors that can occur during capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    #[error("Failed to capture frame: {0}")]
    CaptureFailed(String),

    #[error("Stream ended")]
    StreamEnded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// One acquired sensor frame.
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Depth samples for this frame.
    pub depth: DepthGrid,
    /// Colour stream image, if the source provides one.
    pub color: Option<RgbImage>,
    /// Hand tracking output for this frame.
    pub hands: HandFrame,
    /// Frame timestamp in seconds (relative to stream start).
    pub timestamp: f64,
    /// Frame number.
    pub frame_number: u64,
}

impl FrameData {
    /// Create a depth-only frame with no tracked hands.
    pub fn new(depth: DepthGrid, timestamp: f64, frame_number: u64) -> Self {
        Self {
            depth,
            color: None,
            hands: HandFrame::default(),
            timestamp,
            frame_number,
        }
    }

    pub fn with_color(mut self, color: RgbImage) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_hands(mut self, hands: HandFrame) -> Self {
        self.hands = hands;
        self
    }

    /// Get depth dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.depth.dimensions()
    }
}

/// Trait for sources that deliver depth frames.
pub trait DepthSource {
    /// Acquire the next frame.
    ///
    /// `Ok(None)` means no frame is ready this cycle; callers should skip
    /// and try again. `Err(CaptureError::StreamEnded)` means the source is done.
    fn next_frame(&mut self) -> Result<Option<FrameData>, CaptureError>;

    /// Get the frame rate, if known.
    fn frame_rate(&self) -> Option<f32>;

    /// Get the resolution (width, height).
    fn resolution(&self) -> (u32, u32);

    /// Check if the source is still active.
    fn is_active(&self) -> bool;

    /// Stop capturing and release the device.
    fn stop(&mut self);
}

/// Scoped ownership of an open depth source.
///
/// The source is stopped when the session is dropped, whichever way the
/// owner exits.
pub struct Session<S: DepthSource> {
    source: S,
    frames: u64,
}

impl<S: DepthSource> Session<S> {
    /// Take ownership of a source. Fails if the source is not active.
    pub fn open(source: S) -> Result<Self, CaptureError> {
        if !source.is_active() {
            return Err(CaptureError::OpenFailed(
                "depth source is not active".to_string(),
            ));
        }
        let (width, height) = source.resolution();
        info!(
            "Depth session opened: {}x{} @ {:?} fps",
            width,
            height,
            source.frame_rate()
        );
        Ok(Self { source, frames: 0 })
    }

    /// Acquire the next frame, counting frames delivered.
    pub fn acquire(&mut self) -> Result<Option<FrameData>, CaptureError> {
        let frame = self.source.next_frame()?;
        if let Some(frame) = &frame {
            self.frames += 1;
            debug!(
                "Acquired frame {} at {:.3}s",
                frame.frame_number, frame.timestamp
            );
        }
        Ok(frame)
    }

    /// Number of frames delivered so far.
    pub fn frames_acquired(&self) -> u64 {
        self.frames
    }

    /// Get the underlying source.
    pub fn inner(&self) -> &S {
        &self.source
    }
}

impl<S: DepthSource> Deref for Session<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.source
    }
}

impl<S: DepthSource> DerefMut for Session<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: DepthSource> Drop for Session<S> {
    fn drop(&mut self) {
        if self.source.is_active() {
            self.source.stop();
        }
        info!("Depth session closed after {} frames", self.frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSource {
        active: bool,
        stops: Rc<Cell<u32>>,
        ready: bool,
    }

    impl DepthSource for CountingSource {
        fn next_frame(&mut self) -> Result<Option<FrameData>, CaptureError> {
            if !self.active {
                return Err(CaptureError::StreamEnded);
            }
            if !self.ready {
                return Ok(None);
            }
            Ok(Some(FrameData::new(DepthGrid::filled(2, 2, 0.5), 0.0, 1)))
        }

        fn frame_rate(&self) -> Option<f32> {
            None
        }

        fn resolution(&self) -> (u32, u32) {
            (2, 2)
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn stop(&mut self) {
            self.active = false;
            self.stops.set(self.stops.get() + 1);
        }
    }

    fn source(active: bool, ready: bool) -> (CountingSource, Rc<Cell<u32>>) {
        let stops = Rc::new(Cell::new(0));
        (
            CountingSource {
                active,
                stops: stops.clone(),
                ready,
            },
            stops,
        )
    }

    #[test]
    fn test_session_stops_source_on_drop() {
        let (src, stops) = source(true, true);
        {
            let mut session = Session::open(src).unwrap();
            assert!(session.acquire().unwrap().is_some());
            assert_eq!(session.frames_acquired(), 1);
        }
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_session_stops_on_early_return() {
        fn fails_midway(src: CountingSource) -> Result<(), CaptureError> {
            let _session = Session::open(src)?;
            Err(CaptureError::CaptureFailed("hand module init".to_string()))
        }

        let (src, stops) = source(true, true);
        assert!(fails_midway(src).is_err());
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_session_open_inactive_fails() {
        let (src, stops) = source(false, true);
        let result = Session::open(src);
        assert!(matches!(result, Err(CaptureError::OpenFailed(_))));
        assert_eq!(stops.get(), 0);
    }

    #[test]
    fn test_session_unavailable_frame_not_counted() {
        let (src, _stops) = source(true, false);
        let mut session = Session::open(src).unwrap();
        assert!(session.acquire().unwrap().is_none());
        assert_eq!(session.frames_acquired(), 0);
    }

    #[test]
    fn test_session_explicit_stop_not_repeated() {
        let (src, stops) = source(true, true);
        let mut session = Session::open(src).unwrap();
        session.stop();
        drop(session);
        assert_eq!(stops.get(), 1);
    }
}
