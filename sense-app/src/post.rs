//! Full-screen post-process pass.

use image::GrayImage;
use image::imageops;
use tracing::debug;

/// Shader used for the preview smoothing pass.
pub const DEFAULT_POST_SHADER: &str = "Custom/PostSmoothing";

/// A surface that can run a full-screen shader from one image into another.
pub trait BlitTarget {
    type Image;

    fn blit(&mut self, source: &Self::Image, destination: &mut Self::Image, shader: &str);
}

/// A full-screen shader pass applied to every rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPass {
    shader: String,
}

impl PostPass {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
        }
    }

    pub fn shader(&self) -> &str {
        &self.shader
    }

    /// Run the pass from `source` into `destination` on `target`.
    pub fn apply<T: BlitTarget>(&self, target: &mut T, source: &T::Image, destination: &mut T::Image) {
        debug!("Post pass: {}", self.shader);
        target.blit(source, destination, &self.shader);
    }
}

impl Default for PostPass {
    fn default() -> Self {
        Self::new(DEFAULT_POST_SHADER)
    }
}

/// CPU stand-in for the smoothing shader, used for headless previews.
///
/// Any shader name runs the same gaussian blur.
#[derive(Debug, Clone)]
pub struct CpuSmoothing {
    sigma: f32,
    passes: u64,
}

impl CpuSmoothing {
    pub fn new(sigma: f32) -> Self {
        Self { sigma, passes: 0 }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl Default for CpuSmoothing {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl BlitTarget for CpuSmoothing {
    type Image = GrayImage;

    fn blit(&mut self, source: &GrayImage, destination: &mut GrayImage, _shader: &str) {
        *destination = imageops::blur(source, self.sigma);
        self.passes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[derive(Default)]
    struct RecordingTarget {
        calls: Vec<String>,
    }

    impl BlitTarget for RecordingTarget {
        type Image = Vec<u8>;

        fn blit(&mut self, source: &Vec<u8>, destination: &mut Vec<u8>, shader: &str) {
            destination.clone_from(source);
            self.calls.push(shader.to_string());
        }
    }

    #[test]
    fn test_post_pass_delegates_to_target() {
        let pass = PostPass::default();
        let mut target = RecordingTarget::default();
        let source = vec![1, 2, 3];
        let mut destination = Vec::new();
        pass.apply(&mut target, &source, &mut destination);
        assert_eq!(destination, source);
        assert_eq!(target.calls, vec![DEFAULT_POST_SHADER.to_string()]);
    }

    #[test]
    fn test_cpu_smoothing_spreads_spike() {
        let mut source = GrayImage::from_pixel(9, 9, Luma([0]));
        source.put_pixel(4, 4, Luma([255]));
        let mut destination = GrayImage::new(1, 1);

        let mut target = CpuSmoothing::new(1.5);
        PostPass::default().apply(&mut target, &source, &mut destination);

        assert_eq!(destination.dimensions(), (9, 9));
        assert!(destination.get_pixel(4, 4).0[0] < 255);
        assert!(destination.get_pixel(5, 4).0[0] > 0);
        assert_eq!(target.passes(), 1);
    }
}
