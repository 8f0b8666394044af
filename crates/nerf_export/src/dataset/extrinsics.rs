//! # Extrinsics enumeration
//!
//! Two ways of producing the frame poses of a split:
//!
//! - **frame stride**: one camera over a frame range, the host frame being set for every
//!   frame so animated cameras are captured where they are at that frame;
//! - **explicit cameras**: one pose per camera of a list, with the frame held constant.
//!
//! Poses are emitted in enumeration order, never sorted or deduplicated.

use std::fmt;

use crate::camera::OutputDialect;
use crate::render::{FrameRange, ImageFormat};
use crate::scene::{ObjectId, SceneHost};

use super::{ExportError, FrameRecord};

/// Dataset split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training views
    Train,
    /// Evaluation views
    Test,
}

impl Split {
    /// Image directory of the split inside the dataset
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }

    /// Manifest file of the split
    pub fn manifest_name(self) -> &'static str {
        match self {
            Self::Train => "transforms_train.json",
            Self::Test => "transforms_test.json",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// How `file_path` entries are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileNaming {
    extension: Option<&'static str>,
}

impl FileNaming {
    /// Naming for renders in `format`
    ///
    /// Splat loaders append `.png` themselves and the original NeRF synthetic manifests carry
    /// no extension, so both drop it.
    pub fn new(format: ImageFormat, splats: bool, dialect: OutputDialect) -> Self {
        let extension = (!splats && dialect == OutputDialect::InstantNgp).then(|| format.extension());
        Self { extension }
    }

    /// Extension written after each stem, if any
    pub fn extension(&self) -> Option<&'static str> {
        self.extension
    }

    /// `<split>/<stem><ext>`
    pub fn file_path(&self, split: Split, stem: &str) -> String {
        format!("{}/{}{}", split.dir_name(), stem, self.extension.unwrap_or(""))
    }
}

/// Callback run after the host entered a frame and before the pose is read
pub type FrameObserver<'a> = &'a mut dyn FnMut(&mut dyn SceneHost, i32);

/// Poses of `camera` over `range`
///
/// `camera` becomes the active camera. The host frame is restored afterwards, also when a
/// pose cannot be read.
pub fn enumerate_frames(
    host: &mut dyn SceneHost,
    camera: ObjectId,
    range: FrameRange,
    split: Split,
    naming: &FileNaming,
    mut observer: Option<FrameObserver<'_>>,
) -> Result<Vec<FrameRecord>, ExportError> {
    host.set_active_camera(Some(camera));
    let initial_frame = host.frame_current();

    let mut frames = Vec::new();
    let mut result = Ok(());
    for frame in range.frames() {
        host.set_frame(frame);
        if let Some(observer) = observer.as_mut() {
            observer(&mut *host, frame);
        }

        let Some(matrix) = host.world_matrix(camera) else {
            result = Err(ExportError::MissingObject(format!("camera of {split} frame {frame}")));
            break;
        };
        let file_path = naming.file_path(split, &host.frame_stem(frame));
        log::trace!("{split} frame {frame} -> {file_path}");
        frames.push(FrameRecord::new(file_path, &matrix));
    }

    host.set_frame(initial_frame);
    result.map(|()| frames)
}

/// One pose per camera, named after the camera
pub fn enumerate_cameras(
    host: &dyn SceneHost,
    cameras: &[ObjectId],
    split: Split,
    naming: &FileNaming,
) -> Result<Vec<FrameRecord>, ExportError> {
    cameras
        .iter()
        .map(|&camera| {
            let name = host
                .object_name(camera)
                .ok_or_else(|| ExportError::MissingObject(format!("{split} camera")))?;
            let matrix = host
                .world_matrix(camera)
                .ok_or_else(|| ExportError::MissingObject(name.to_string()))?;
            Ok(FrameRecord::new(naming.file_path(split, name), &matrix))
        })
        .collect()
}
