//! Depth replay from a directory of recorded depth images.

use crate::source::{CaptureError, DepthSource, FrameData};
use sense_data::DepthGrid;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "pgm", "bmp", "tga", "tiff", "tif", "jpg", "jpeg"];

/// Replays depth frames from image files, in file name order.
///
/// Each image is converted to grayscale with 0.299 / 0.587 / 0.114 luminance
/// weights and normalized to `[0, 1]`.
pub struct ImageSequenceSource {
    frames: Vec<PathBuf>,
    cursor: usize,
    frame_rate: f32,
    active: bool,
    looping: bool,
    resolution: (u32, u32),
}

impl ImageSequenceSource {
    /// Open every supported image in `dir`, replayed at 30 fps.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CaptureError> {
        Self::with_frame_rate(dir, 30.0)
    }

    /// Open every supported image in `dir` with an explicit frame rate.
    pub fn with_frame_rate<P: AsRef<Path>>(dir: P, frame_rate: f32) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        info!("Opening depth image sequence in {}", dir.display());

        let frames = Self::list_frames(dir)?;
        let first = frames.first().ok_or_else(|| {
            CaptureError::DeviceNotFound(format!("no depth images in {}", dir.display()))
        })?;

        let resolution = image::image_dimensions(first)?;
        info!(
            "Image sequence opened: {} frames, {}x{} @ {} fps",
            frames.len(),
            resolution.0,
            resolution.1,
            frame_rate
        );

        Ok(Self {
            frames,
            cursor: 0,
            frame_rate,
            active: true,
            looping: false,
            resolution,
        })
    }

    /// Restart from the first frame instead of ending.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// List supported image files in `dir`, sorted by file name.
    pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();
        Ok(frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl DepthSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<FrameData>, CaptureError> {
        if !self.active {
            return Err(CaptureError::StreamEnded);
        }

        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Err(CaptureError::StreamEnded);
            }
            self.cursor = 0;
        }

        let frame_number = self.cursor as u64 + 1;
        let path = &self.frames[self.cursor];
        self.cursor += 1;

        let image = image::open(path)?.to_rgba8();
        if image.dimensions() != self.resolution {
            warn!(
                "Skipping {}: {:?} does not match stream resolution {:?}",
                path.display(),
                image.dimensions(),
                self.resolution
            );
            return Ok(None);
        }

        let timestamp = (frame_number - 1) as f64 / self.frame_rate as f64;
        debug!("Loaded depth frame {} from {}", frame_number, path.display());

        Ok(Some(FrameData::new(
            DepthGrid::from_rgba(&image),
            timestamp,
            frame_number,
        )))
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
        info!("Image sequence stopped after {} frames", self.cursor);
    }
}
