//! Core data types for depth grids and mesh reconstruction.
//!
//! These are CPU-side representations used throughout the sense workspace.
//! The GPU-ready vertex layout lives in [`crate::mesh`].

use crate::error::MeshError;
use glam::Vec3;
use image::{GrayImage, Luma, RgbaImage};

/// A rectangular grid of depth samples, stored row-major (`samples[y * width + x]`).
///
/// Samples are usually normalized gray values in `[0, 1]`, but any finite float
/// is accepted; the caller decides what the values mean.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthGrid {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl DepthGrid {
    /// Create a grid from a row-major sample buffer.
    ///
    /// Fails if `samples.len() != width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, MeshError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(MeshError::invalid(format!(
                "grid {}x{} expects {} samples, got {}",
                width,
                height,
                expected,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a grid from signed dimensions, as reported by some sensor APIs.
    ///
    /// Negative or out-of-range dimensions fail with `InvalidArgument`.
    pub fn from_dims(width: i64, height: i64, samples: Vec<f32>) -> Result<Self, MeshError> {
        let (width, height) = checked_dims(width, height)?;
        Self::new(width, height, samples)
    }

    /// Create a grid with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width as usize * height as usize],
        }
    }

    /// Create a grid by evaluating `f(x, y)` for every sample.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Convert an 8-bit grayscale depth image into normalized samples.
    pub fn from_luma(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let samples = image.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        Self {
            width,
            height,
            samples,
        }
    }

    /// Convert an RGBA depth visualization into normalized samples.
    ///
    /// Uses the 0.299 / 0.587 / 0.114 luminance weights; alpha is ignored.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let samples = image
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
            })
            .collect();
        Self {
            width,
            height,
            samples,
        }
    }

    /// Render the grid back into an 8-bit grayscale image, clamping to `[0, 1]`.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let v = self.samples[self.index(x, y)].clamp(0.0, 1.0);
            Luma([(v * 255.0).round() as u8])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get grid dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the sample at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(self.index(x, y)).copied()
    }

    /// Resolve the sample for vertex coordinate `(x, y)`, where `x` may equal
    /// `width` and `y` may equal `height`.
    ///
    /// Grids with no samples always resolve to 0.0.
    pub fn sample(&self, x: u32, y: u32, border: BorderPolicy) -> f32 {
        if let Some(v) = self.get(x, y) {
            return v;
        }
        if self.samples.is_empty() {
            return 0.0;
        }
        match border {
            BorderPolicy::ClampToEdge => {
                let cx = x.min(self.width - 1);
                let cy = y.min(self.height - 1);
                self.samples[self.index(cx, cy)]
            }
            BorderPolicy::Zero => 0.0,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Validate signed grid dimensions.
pub(crate) fn checked_dims(width: i64, height: i64) -> Result<(u32, u32), MeshError> {
    if width < 0 || height < 0 {
        return Err(MeshError::invalid(format!(
            "grid dimensions must be non-negative, got {}x{}",
            width, height
        )));
    }
    let width = u32::try_from(width)
        .map_err(|_| MeshError::invalid(format!("grid width {} out of range", width)))?;
    let height = u32::try_from(height)
        .map_err(|_| MeshError::invalid(format!("grid height {} out of range", height)))?;
    Ok((width, height))
}

/// How vertices on the far border (`x == width` or `y == height`) pick a depth.
///
/// A `W x H` grid produces `(W + 1) x (H + 1)` vertices, so the last row and
/// column of vertices have no sample of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Reuse the nearest edge sample (matches a clamping texture read).
    #[default]
    ClampToEdge,
    /// Place border vertices at depth zero.
    Zero,
}

/// Unit conversion applied to vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshScale {
    /// World units per grid column.
    pub horizontal: f32,
    /// World units per grid row.
    pub vertical: f32,
    /// World units per unit of sample value (pushed along -Z).
    pub depth: f32,
}

impl MeshScale {
    /// Scale used by the hand-tracking scene: a 640x480 frame spans 64x48
    /// units and full-white depth sits 10 units back.
    pub const REFERENCE: MeshScale = MeshScale {
        horizontal: 0.1,
        vertical: 0.1,
        depth: 10.0,
    };

    pub fn new(horizontal: f32, vertical: f32, depth: f32) -> Self {
        Self {
            horizontal,
            vertical,
            depth,
        }
    }

    /// Same scale on every axis.
    pub fn uniform(scale: f32) -> Self {
        Self::new(scale, scale, scale)
    }

    /// All scales must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (name, value) in [
            ("horizontal", self.horizontal),
            ("vertical", self.vertical),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MeshError::invalid(format!(
                    "{} scale must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for MeshScale {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// A triangle referenced by position, used for face normal accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the normal of the triangle (not normalized, length = 2 * area).
    pub fn normal(&self) -> Vec3 {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(e2)
    }

    /// Compute the normalized normal of the triangle.
    pub fn unit_normal(&self) -> Vec3 {
        self.normal().normalize_or_zero()
    }

    /// Compute the area of the triangle.
    pub fn area(&self) -> f32 {
        self.normal().length() * 0.5
    }

    /// Signed area of the triangle projected onto the XY plane.
    ///
    /// Negative for clockwise winding when viewed from +Z.
    pub fn signed_area_xy(&self) -> f32 {
        self.normal().z * 0.5
    }
}
