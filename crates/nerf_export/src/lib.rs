//! # NeRF Export
//!
//! Camera calibration and dataset export for NeRF and Gaussian splatting pipelines.
//!
//! A scene host (anything implementing [`scene::SceneHost`]) provides cameras, frames and
//! meshes; the exporter samples camera poses with one of four methods, writes
//! `transforms_train.json` / `transforms_test.json` manifests, optionally drives the host
//! renderer, and packs everything into a zip archive.
//!
//! ## Features
//!
//! - **Subset of Frames**: every N-th frame of the active camera animation
//! - **Train and Test Cameras**: separate animated cameras per split
//! - **Camera on Sphere**: seeded random views on a (hemi)sphere around the subject
//! - **Dataset from Cameras**: one view per camera of a named collection
//! - **Dialects**: instant-ngp (with AABB scale) and NeRF manifests
//! - **Gaussian Splatting**: PLY point cloud of the visible meshes
//! - **Reference host**: an in-memory scene with a point-splat rasterizer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nerf_export::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     nerf_export::foundation::logging::init();
//!
//!     let mut scene = SceneDescription::load_from_file("scene.ron")?.build()?;
//!     let mut settings = ExportSettings::default();
//!     settings.common.render_frames = false;
//!
//!     let mut exporter = DatasetExporter::new(settings);
//!     if let ExportOutcome::Archived(path) = exporter.export(&mut scene, MethodKind::Cos)? {
//!         println!("Dataset written to {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod config;
pub mod camera;
pub mod sampling;
pub mod scene;
pub mod render;
pub mod preview;
pub mod dataset;

/// Common imports for exporter users
pub mod prelude {
    pub use crate::{
        camera::{CameraData, IntrinsicsRecord, OutputDialect},
        config::{CommonSettings, Config, CosSettings, DfcSettings, ExportSettings, SofSettings, TtcSettings},
        dataset::{DatasetExporter, ExportError, ExportOutcome, MethodKind, SamplingMethod, ValidationError},
        foundation::math::{Mat4, Transform, Vec3},
        preview::{Echo, PreviewRig},
        render::{FrameRange, ImageFormat, RenderJob, RenderSettings},
        sampling::{sample_sphere, SphereConfig},
        scene::{HostEvent, MemoryScene, ObjectId, SceneDescription, SceneError, SceneHost},
    };
}
