use serde::{Deserialize, Serialize};

use crate::foundation::math::utils;

/// Projection type of a host camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Pinhole perspective projection, the only one supported for datasets
    #[default]
    Perspective,
    /// Orthographic projection
    Orthographic,
    /// Panoramic / fisheye projection
    Panoramic,
}

/// How the sensor is fitted to the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorFit {
    /// Fit the larger image dimension to the sensor width
    #[default]
    Auto,
    /// Fit the image width to the sensor width
    Horizontal,
    /// Fit the image height to the sensor height
    Vertical,
}

/// Lens and sensor description of a host camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraData {
    /// Projection type
    pub projection: Projection,
    /// Focal length in millimeters
    pub lens_mm: f64,
    /// Sensor width in millimeters
    pub sensor_width: f64,
    /// Sensor height in millimeters
    pub sensor_height: f64,
    /// Sensor fit mode
    pub sensor_fit: SensorFit,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            lens_mm: 50.0,
            sensor_width: 36.0,
            sensor_height: 24.0,
            sensor_fit: SensorFit::Auto,
        }
    }
}

impl CameraData {
    /// Perspective camera with the given focal length and the default 36x24mm sensor
    pub fn perspective(lens_mm: f64) -> Self {
        Self {
            lens_mm,
            ..Default::default()
        }
    }

    /// Whether this camera can produce a pinhole dataset
    pub fn is_perspective(&self) -> bool {
        self.projection == Projection::Perspective
    }

    /// Field of view spanned by the sensor width, radians
    pub fn angle_x(&self) -> f64 {
        utils::fov_from_focal(self.lens_mm, self.sensor_width)
    }

    /// Field of view spanned by the sensor height, radians
    pub fn angle_y(&self) -> f64 {
        utils::fov_from_focal(self.lens_mm, self.sensor_height)
    }
}
