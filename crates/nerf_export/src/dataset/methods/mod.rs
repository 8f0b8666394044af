//! Per-method export steps
//!
//! Each method writes its manifests into the dataset directory and, when frames are to be
//! rendered, points the host at the render output and returns the job to start.

pub(crate) mod cos;
pub(crate) mod dfc;
pub(crate) mod sof;
pub(crate) mod ttc;

use std::path::{Path, PathBuf};

use crate::camera::{derive_intrinsics, IntrinsicsRecord};
use crate::config::CommonSettings;
use crate::render::{FrameRange, RenderJob};
use crate::scene::{ObjectId, SceneHost};

use super::extrinsics::{enumerate_frames, FileNaming, Split};
use super::{DatasetManifest, ExportError, MethodCleanup};

/// Result of running a method's export steps
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodRun {
    /// Render to start, if frames are rendered
    pub render: Option<RenderJob>,
    /// Scene cleanup once finalized
    pub cleanup: MethodCleanup,
}

impl MethodRun {
    pub fn new(render: Option<RenderJob>) -> Self {
        Self { render, cleanup: MethodCleanup::None }
    }
}

/// Settings and paths shared by the steps of one export
pub(crate) struct ExportContext<'a> {
    pub common: &'a CommonSettings,
    pub dataset_dir: &'a Path,
    pub naming: FileNaming,
}

impl<'a> ExportContext<'a> {
    pub fn new(host: &dyn SceneHost, common: &'a CommonSettings, dataset_dir: &'a Path) -> Self {
        let naming = FileNaming::new(host.render_settings().file_format, common.splats, common.dialect());
        Self { common, dataset_dir, naming }
    }

    /// Image directory of `split`
    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.dataset_dir.join(split.dir_name())
    }

    /// Manifest intrinsics of `camera`
    pub fn intrinsics(&self, host: &dyn SceneHost, camera: ObjectId) -> Result<IntrinsicsRecord, ExportError> {
        let data = host
            .camera_data(camera)
            .ok_or_else(|| ExportError::MissingObject(object_label(host, camera)))?;
        Ok(derive_intrinsics(&data, host.render_settings(), self.common.aabb, self.common.dialect()))
    }

    /// Write the manifest of `split`
    pub fn write_manifest(&self, split: Split, manifest: &DatasetManifest) -> Result<(), ExportError> {
        let path = self.dataset_dir.join(split.manifest_name());
        manifest.write(&path)?;
        log::debug!("Wrote {} ({} frame(s))", path.display(), manifest.frames.len());
        Ok(())
    }

    /// Manifest of `camera` over `range` for `split`
    pub fn write_frames(
        &self,
        host: &mut dyn SceneHost,
        split: Split,
        camera: ObjectId,
        range: FrameRange,
    ) -> Result<(), ExportError> {
        let intrinsics = self.intrinsics(host, camera)?;
        let frames = enumerate_frames(host, camera, range, split, &self.naming, None)?;
        self.write_manifest(split, &DatasetManifest::new(intrinsics, frames))
    }

    /// Test manifest of `camera` over `range`, or its placeholder in dummy splat mode
    pub fn write_test_frames(
        &self,
        host: &mut dyn SceneHost,
        camera: ObjectId,
        range: FrameRange,
    ) -> Result<(), ExportError> {
        if self.common.dummy_test_split() {
            log::debug!("Writing placeholder test manifest");
            let intrinsics = self.intrinsics(host, camera)?;
            return self.write_manifest(Split::Test, &DatasetManifest::placeholder(intrinsics));
        }
        self.write_frames(host, Split::Test, camera, range)
    }

    /// Point the host at the train image directory and build the animation job of `range`
    pub fn train_animation(
        &self,
        host: &mut dyn SceneHost,
        camera: ObjectId,
        range: FrameRange,
    ) -> Result<RenderJob, ExportError> {
        let output_dir = self.split_dir(Split::Train);
        std::fs::create_dir_all(&output_dir)?;

        host.set_frame_range(range);
        host.set_active_camera(Some(camera));
        host.set_output_path(output_dir.join(""));

        Ok(RenderJob::Animation { range, output_dir })
    }
}

/// Camera named `name`
pub(crate) fn named_camera(host: &dyn SceneHost, name: Option<&str>) -> Result<ObjectId, ExportError> {
    let name = name.unwrap_or_default();
    host.find_object(name)
        .filter(|id| host.camera_data(*id).is_some())
        .ok_or_else(|| ExportError::MissingObject(name.to_string()))
}

/// The active camera
pub(crate) fn active_camera(host: &dyn SceneHost) -> Result<ObjectId, ExportError> {
    host.active_camera()
        .ok_or_else(|| ExportError::MissingObject("active camera".to_string()))
}

fn object_label(host: &dyn SceneHost, id: ObjectId) -> String {
    host.object_name(id).unwrap_or("camera").to_string()
}
