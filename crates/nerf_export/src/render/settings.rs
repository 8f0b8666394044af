use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scene::ObjectId;

/// Image file format written by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Lossless PNG, required by Gaussian splatting loaders
    #[default]
    Png,
    /// JPEG
    Jpeg,
}

impl ImageFormat {
    /// File extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
        }
    }
}

/// Host render output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Horizontal resolution before percentage scaling
    pub resolution_x: u32,
    /// Vertical resolution before percentage scaling
    pub resolution_y: u32,
    /// Resolution scale in percent
    pub resolution_percentage: u32,
    /// Horizontal pixel aspect
    pub pixel_aspect_x: f64,
    /// Vertical pixel aspect
    pub pixel_aspect_y: f64,
    /// Output path prefix for animation renders (a directory when it ends with a separator)
    pub output_path: PathBuf,
    /// Output image format
    pub file_format: ImageFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            resolution_percentage: 100,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
            output_path: PathBuf::from("/tmp/"),
            file_format: ImageFormat::Png,
        }
    }
}

impl RenderSettings {
    /// Rendered image size in pixels after percentage scaling
    pub fn scaled_resolution(&self) -> (f64, f64) {
        let scale = f64::from(self.resolution_percentage) / 100.0;
        (f64::from(self.resolution_x) * scale, f64::from(self.resolution_y) * scale)
    }
}

/// Scene frame range, inclusive at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame
    pub start: i32,
    /// Last frame, inclusive
    pub end: i32,
    /// Frame step used by animation renders
    pub step: u32,
}

impl Default for FrameRange {
    fn default() -> Self {
        Self { start: 1, end: 250, step: 1 }
    }
}

impl FrameRange {
    /// Create a frame range
    pub fn new(start: i32, end: i32, step: u32) -> Self {
        Self { start, end, step }
    }

    /// Frames visited by this range in increasing order; a zero step is treated as one
    pub fn frames(&self) -> impl Iterator<Item = i32> {
        let step = self.step.max(1) as usize;
        (self.start..=self.end).step_by(step)
    }

    /// Same range visited with another step
    pub fn with_step(self, step: u32) -> Self {
        Self { step, ..self }
    }
}

/// A single still image of a render job
#[derive(Debug, Clone, PartialEq)]
pub struct StillShot {
    /// Camera to render through
    pub camera: ObjectId,
    /// Output file, extension included
    pub output_file: PathBuf,
}

/// Work handed to the host renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderJob {
    /// Render the frame range through the active camera into `output_dir`
    Animation {
        /// Frames to render
        range: FrameRange,
        /// Directory receiving one file per frame
        output_dir: PathBuf,
    },
    /// Render one still per camera with the scene frame held constant
    Stills(Vec<StillShot>),
}

impl RenderJob {
    /// Number of images the job produces
    pub fn image_count(&self) -> usize {
        match self {
            Self::Animation { range, .. } => range.frames().count(),
            Self::Stills(shots) => shots.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_stride() {
        let frames: Vec<_> = FrameRange::new(1, 10, 3).frames().collect();
        assert_eq!(frames, vec![1, 4, 7, 10]);
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(FrameRange::new(5, 4, 1).frames().count(), 0);
    }

    #[test]
    fn test_zero_step_visits_every_frame() {
        assert_eq!(FrameRange::new(1, 3, 0).frames().count(), 3);
    }

    #[test]
    fn test_scaled_resolution() {
        let settings = RenderSettings { resolution_percentage: 25, ..Default::default() };
        assert_eq!(settings.scaled_resolution(), (480.0, 270.0));
    }
}
