//! # Dataset export
//!
//! Everything between the scene and the archive: validation, intrinsics and extrinsics
//! manifests, the run log, the splatting point cloud, the four sampling methods and the final
//! restore/cleanup/archive step.
//!
//! ## Output layout
//! ```text
//! <save_path>/<dataset>/
//!     transforms_train.json
//!     transforms_test.json
//!     train/          rendered training images
//!     test/           rendered test images (Dataset From Cameras)
//!     points3d.ply    with Gaussian splatting export
//!     log.txt         with logs enabled
//! ```
//! The directory is zipped into `<save_path>/<dataset>.zip` and removed.

pub mod archive;
mod exporter;
pub mod extrinsics;
mod finalize;
pub mod manifest;
mod method;
mod methods;
pub mod paths;
pub mod point_cloud;
pub mod run_log;
pub mod validation;

pub use exporter::{DatasetExporter, ExportOutcome, LOG_FILE, POINT_CLOUD_FILE};
pub use extrinsics::{enumerate_cameras, enumerate_frames, FileNaming, Split};
pub use finalize::{finalize, Finalizer, MethodCleanup};
pub use manifest::{DatasetManifest, FrameRecord};
pub use method::{MethodKind, SamplingMethod, UnknownMethod};
pub use run_log::RunLog;
pub use validation::{validate, ValidationError};

use crate::render::SessionError;

/// Export errors
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// A precondition failed; nothing was written
    #[error("{0}")]
    Invalid(ValidationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Directory traversal error
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Render session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A scene object disappeared during the export
    #[error("Missing scene object: {0}")]
    MissingObject(String),
}

#[cfg(test)]
mod tests;
