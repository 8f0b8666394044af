//! # Export Settings
//!
//! The persisted property set of the exporter: shared toggles plus one block per sampling
//! method. Every field has a default so partial files load cleanly.

use serde::{Deserialize, Serialize};

use super::Config;
use crate::camera::OutputDialect;
use crate::foundation::math::Vec3;
use crate::sampling::SphereConfig;

const DEFAULT_DATASET_NAME: &str = "dataset";

/// Settings shared by every sampling method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSettings {
    /// Construct the training split
    pub train_data: bool,
    /// Construct the testing split
    pub test_data: bool,
    /// AABB scale as defined by instant-ngp
    pub aabb: u32,
    /// Render the frames, otherwise only the manifests are written
    pub render_frames: bool,
    /// Write a `log.txt` run log next to the manifests
    pub logs: bool,
    /// Export a `points3d.ply` for Gaussian splatting
    pub splats: bool,
    /// Write a placeholder test manifest instead of the full test poses when exporting splats
    pub splats_test_dummy: bool,
    /// Use the original NeRF manifest convention instead of instant-ngp's
    pub nerf: bool,
    /// Directory receiving `<dataset name>.zip`
    pub save_path: String,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            train_data: true,
            test_data: true,
            aabb: 4,
            render_frames: true,
            logs: false,
            splats: false,
            splats_test_dummy: true,
            nerf: false,
            save_path: String::new(),
        }
    }
}

impl CommonSettings {
    /// Manifest dialect selected by the `nerf` toggle
    pub fn dialect(&self) -> OutputDialect {
        if self.nerf {
            OutputDialect::Nerf
        } else {
            OutputDialect::InstantNgp
        }
    }

    /// Whether the test split is replaced with a placeholder manifest
    pub fn dummy_test_split(&self) -> bool {
        self.splats && self.splats_test_dummy
    }
}

/// Subset of Frames settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SofSettings {
    /// Name of the dataset directory and archive
    pub dataset_name: String,
    /// Every N-th frame is used for training
    pub train_frame_steps: u32,
}

impl Default for SofSettings {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            train_frame_steps: 3,
        }
    }
}

/// Train and Test Cameras settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtcSettings {
    /// Name of the dataset directory and archive
    pub dataset_name: String,
    /// Number of training frames captured from the training camera
    pub nb_frames: u32,
    /// Name of the training camera object
    pub train_camera: Option<String>,
    /// Name of the testing camera object
    pub test_camera: Option<String>,
}

impl Default for TtcSettings {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            nb_frames: 100,
            train_camera: None,
            test_camera: None,
        }
    }
}

/// Camera on Sphere settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosSettings {
    /// Name of the dataset directory and archive
    pub dataset_name: String,
    /// Center of the training sphere
    pub location: Vec3,
    /// XYZ Euler rotation of the training sphere, radians
    pub rotation: Vec3,
    /// Per-axis scale of the training sphere
    pub scale: Vec3,
    /// Radius of the training sphere
    pub radius: f64,
    /// Focal length of the sphere camera, millimeters
    pub focal: f64,
    /// Random seed for sampling views on the sphere
    pub seed: i64,
    /// Number of training frames sampled from the sphere
    pub nb_frames: u32,
    /// Sample the upper hemisphere only
    pub upper_views: bool,
    /// Point the camera away from the sphere center
    pub outwards: bool,
}

impl Default for CosSettings {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            location: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            radius: 4.0,
            focal: 50.0,
            seed: 0,
            nb_frames: 100,
            upper_views: false,
            outwards: false,
        }
    }
}

impl CosSettings {
    /// Sampling sphere described by these settings
    pub fn sphere(&self) -> SphereConfig {
        SphereConfig {
            center: self.location,
            rotation: self.rotation,
            scale: self.scale,
            radius: self.radius,
            upper_hemisphere_only: self.upper_views,
            outward_facing: self.outwards,
            seed: self.seed,
            focal_mm: self.focal,
        }
    }

    /// Copy an edited sphere back into the settings
    pub fn set_sphere(&mut self, sphere: &SphereConfig) {
        self.location = sphere.center;
        self.rotation = sphere.rotation;
        self.scale = sphere.scale;
        self.radius = sphere.radius;
        self.upper_views = sphere.upper_hemisphere_only;
        self.outwards = sphere.outward_facing;
        self.seed = sphere.seed;
        self.focal = sphere.focal_mm;
    }
}

/// Dataset From Cameras settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DfcSettings {
    /// Name of the dataset directory and archive
    pub dataset_name: String,
    /// Collection holding the training cameras
    pub train_collection: Option<String>,
    /// Collection holding the testing cameras
    pub test_collection: Option<String>,
}

impl Default for DfcSettings {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            train_collection: None,
            test_collection: None,
        }
    }
}

/// Complete exporter property set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Shared toggles
    pub common: CommonSettings,
    /// Subset of Frames
    pub sof: SofSettings,
    /// Train and Test Cameras
    pub ttc: TtcSettings,
    /// Camera on Sphere
    pub cos: CosSettings,
    /// Dataset From Cameras
    pub dfc: DfcSettings,
}

impl Config for ExportSettings {}
