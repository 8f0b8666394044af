//! # Pinhole intrinsics derivation
//!
//! Converts the host camera model (focal length and sensor in millimeters, sensor fit,
//! render resolution, pixel aspect) into the normalized pinhole record consumed by NeRF and
//! Gaussian splatting loaders.
//!
//! ## Conventions
//! - The principal point is always the exact image center.
//! - Lens distortion is not calibrated: `k1`, `k2`, `p1`, `p2` are always zero.
//! - `camera_angle_x` follows the horizontal sensor axis; the two angles are swapped when the
//!   vertical axis is fitted on a portrait or square image.

use serde::{Deserialize, Serialize};

use super::{CameraData, SensorFit};
use crate::render::RenderSettings;

/// Manifest convention to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputDialect {
    /// instant-ngp: full intrinsics plus `aabb_scale`
    #[default]
    InstantNgp,
    /// Original NeRF synthetic format: only `camera_angle_x`
    Nerf,
}

impl OutputDialect {
    /// Label used in run logs
    pub fn label(self) -> &'static str {
        match self {
            Self::InstantNgp => "NGP",
            Self::Nerf => "NeRF",
        }
    }
}

/// Full pinhole intrinsics record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Horizontal field of view, radians
    pub camera_angle_x: f64,
    /// Vertical field of view, radians
    pub camera_angle_y: f64,
    /// Horizontal focal length in pixels
    pub fl_x: f64,
    /// Vertical focal length in pixels
    pub fl_y: f64,
    /// Radial distortion, always zero
    pub k1: f64,
    /// Radial distortion, always zero
    pub k2: f64,
    /// Tangential distortion, always zero
    pub p1: f64,
    /// Tangential distortion, always zero
    pub p2: f64,
    /// Principal point x, pixels
    pub cx: f64,
    /// Principal point y, pixels
    pub cy: f64,
    /// Image width in pixels
    pub w: u32,
    /// Image height in pixels
    pub h: u32,
    /// Scene bounding box scale
    pub aabb_scale: u32,
}

/// Intrinsics as written at the top level of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntrinsicsRecord {
    /// instant-ngp dialect
    Full(CameraIntrinsics),
    /// NeRF dialect
    AngleOnly {
        /// Horizontal field of view, radians
        camera_angle_x: f64,
    },
}

impl IntrinsicsRecord {
    /// Horizontal field of view, present in both dialects
    pub fn camera_angle_x(&self) -> f64 {
        match self {
            Self::Full(full) => full.camera_angle_x,
            Self::AngleOnly { camera_angle_x } => *camera_angle_x,
        }
    }

    /// Full record, if this is the instant-ngp dialect
    pub fn full(&self) -> Option<&CameraIntrinsics> {
        match self {
            Self::Full(full) => Some(full),
            Self::AngleOnly { .. } => None,
        }
    }
}

/// Derive the manifest intrinsics of `camera` rendered with `render`
///
/// Total over valid inputs: camera type and `aabb_scale` are validated by the caller.
pub fn derive_intrinsics(
    camera: &CameraData,
    render: &RenderSettings,
    aabb_scale: u32,
    dialect: OutputDialect,
) -> IntrinsicsRecord {
    let intrinsics = pinhole_intrinsics(camera, render, aabb_scale);
    match dialect {
        OutputDialect::Nerf => IntrinsicsRecord::AngleOnly {
            camera_angle_x: intrinsics.camera_angle_x,
        },
        OutputDialect::InstantNgp => IntrinsicsRecord::Full(intrinsics),
    }
}

/// Full pinhole model of `camera` rendered with `render`
pub fn pinhole_intrinsics(camera: &CameraData, render: &RenderSettings, aabb_scale: u32) -> CameraIntrinsics {
    let (width, height) = render.scaled_resolution();
    let pixel_aspect_ratio = render.pixel_aspect_y / render.pixel_aspect_x;

    let fit = effective_fit(camera.sensor_fit, render, width, height);

    // Auto fit measures the larger image axis against the sensor width
    let sensor_size = if camera.sensor_fit == SensorFit::Vertical {
        camera.sensor_height
    } else {
        camera.sensor_width
    };

    let view_factor = match fit {
        SensorFit::Vertical => pixel_aspect_ratio * height,
        _ => width,
    };
    let fl_x = camera.lens_mm / sensor_size * view_factor;
    let fl_y = fl_x / pixel_aspect_ratio;

    let (mut angle_x, mut angle_y) = (camera.angle_x(), camera.angle_y());
    if fit == SensorFit::Vertical && width <= height {
        std::mem::swap(&mut angle_x, &mut angle_y);
    }

    log::trace!(
        "Intrinsics: {width}x{height}px, fit {fit:?}, fl=({fl_x:.3}, {fl_y:.3})"
    );

    CameraIntrinsics {
        camera_angle_x: angle_x,
        camera_angle_y: angle_y,
        fl_x,
        fl_y,
        k1: 0.0,
        k2: 0.0,
        p1: 0.0,
        p2: 0.0,
        cx: width / 2.0,
        cy: height / 2.0,
        w: width.round() as u32,
        h: height.round() as u32,
        aabb_scale,
    }
}

/// Resolve `Auto` against the pixel-aspect-scaled image size
fn effective_fit(fit: SensorFit, render: &RenderSettings, width: f64, height: f64) -> SensorFit {
    match fit {
        SensorFit::Auto => {
            let size_x = render.pixel_aspect_x * width;
            let size_y = render.pixel_aspect_y * height;
            if size_x >= size_y {
                SensorFit::Horizontal
            } else {
                SensorFit::Vertical
            }
        }
        explicit => explicit,
    }
}
