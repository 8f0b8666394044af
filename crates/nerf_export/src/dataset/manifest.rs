//! Dataset manifests (`transforms_<split>.json`)

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::IntrinsicsRecord;
use crate::foundation::math::{matrix_rows, Mat4};

use super::ExportError;

/// Pose of one image of a split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Image path relative to the dataset root
    pub file_path: String,
    /// Camera-to-world matrix, row-major
    pub transform_matrix: [[f64; 4]; 4],
}

impl FrameRecord {
    /// Record of `file_path` seen from `camera_to_world`
    pub fn new(file_path: String, camera_to_world: &Mat4) -> Self {
        Self {
            file_path,
            transform_matrix: matrix_rows(camera_to_world),
        }
    }
}

/// One split of a dataset: shared intrinsics at the top level plus the frame poses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Intrinsics, flattened into the top level
    #[serde(flatten)]
    pub intrinsics: IntrinsicsRecord,
    /// Camera model tag read by some NeRF loaders, e.g. `OPENCV`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    /// Frame poses in enumeration order
    pub frames: Vec<FrameRecord>,
}

impl DatasetManifest {
    /// Manifest of `frames` seen through `intrinsics`
    pub fn new(intrinsics: IntrinsicsRecord, frames: Vec<FrameRecord>) -> Self {
        Self {
            intrinsics,
            camera_model: None,
            frames,
        }
    }

    /// Tag the manifest with a camera model name
    pub fn with_camera_model(mut self, model: impl Into<String>) -> Self {
        self.camera_model = Some(model.into());
        self
    }

    /// Placeholder manifest with intrinsics and no frames
    pub fn placeholder(intrinsics: IntrinsicsRecord) -> Self {
        Self::new(intrinsics, Vec::new())
    }

    /// Write as JSON with a 4-space indent
    pub fn write(&self, path: &Path) -> Result<(), ExportError> {
        write_json(path, self)
    }

    /// Read a manifest back
    pub fn read(path: &Path) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Pretty-print `value` to `path` with a 4-space indent
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    serializer.into_inner().flush()?;
    Ok(())
}
