//! # Export preconditions
//!
//! Every check runs before any file is written or any scene state is touched. All failures
//! are collected in a fixed order and the first one is reported:
//!
//! 1. missing camera(s); the remaining camera checks are skipped when one is missing
//! 2. non-perspective camera(s)
//! 3. empty dataset name
//! 4. AABB scale not a power of two (instant-ngp dialect only)
//! 5. empty save path
//! 6. method parameters: frame step, sphere scale and radius, collections of enabled splits
//! 7. Gaussian splatting requirements: test data enabled, PNG renders

use crate::camera::OutputDialect;
use crate::config::{CommonSettings, CosSettings, DfcSettings, TtcSettings};
use crate::render::ImageFormat;
use crate::scene::{ObjectId, SceneHost};

use super::methods::dfc::collection_cameras;
use super::{SamplingMethod, Split};

/// A failed export precondition
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No active camera
    #[error("Be sure to have a selected camera!")]
    MissingCamera,

    /// Train or test camera not set or not found
    #[error("Be sure to have selected a train and test camera!")]
    MissingTrainTestCameras,

    /// A camera is orthographic or panoramic
    #[error("Only perspective cameras are supported!")]
    NonPerspectiveCamera,

    /// Dataset name is empty
    #[error("Dataset name cannot be empty!")]
    EmptyDatasetName,

    /// AABB scale is not a power of two
    #[error("AABB scale needs to be a power of two!")]
    AabbNotPowerOfTwo,

    /// Save path is empty
    #[error("Save path cannot be empty!")]
    EmptySavePath,

    /// Frame step of zero
    #[error("Frame step needs to be at least 1!")]
    ZeroFrameStep,

    /// Sphere scale has a zero axis
    #[error("Sphere scale cannot be zero along any axis!")]
    ZeroSphereScale,

    /// Sphere radius is zero or negative
    #[error("Sphere radius needs to be positive!")]
    NonPositiveRadius,

    /// An enabled split has no camera collection
    #[error("Be sure to have selected a {0} camera collection!")]
    MissingCollection(Split),

    /// Gaussian splatting export without the test split
    #[error("Gaussian splatting export needs test data enabled!")]
    SplatsWithoutTestData,

    /// Gaussian splatting export with a lossy render format
    #[error("Gaussian splatting export needs PNG renders!")]
    SplatsRequirePng,
}

/// Whether `value` is a positive power of two
pub fn is_power_of_two(value: u32) -> bool {
    value.is_power_of_two()
}

/// Every failed precondition of exporting `method`, in reporting order
pub fn validate(host: &dyn SceneHost, common: &CommonSettings, method: &SamplingMethod) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match method {
        SamplingMethod::SubsetOfFrames(_) | SamplingMethod::CameraOnSphere(_) => {
            check_active_camera(host, &mut errors);
        }
        SamplingMethod::TrainTestCameras(ttc) => check_train_test_cameras(host, ttc, &mut errors),
        SamplingMethod::DatasetFromCameras(dfc) => check_collection_cameras(host, common, dfc, &mut errors),
    }

    if method.dataset_name().is_empty() {
        errors.push(ValidationError::EmptyDatasetName);
    }
    if common.dialect() == OutputDialect::InstantNgp && !is_power_of_two(common.aabb) {
        errors.push(ValidationError::AabbNotPowerOfTwo);
    }
    if common.save_path.is_empty() {
        errors.push(ValidationError::EmptySavePath);
    }

    match method {
        SamplingMethod::SubsetOfFrames(sof) if sof.train_frame_steps == 0 => {
            errors.push(ValidationError::ZeroFrameStep);
        }
        SamplingMethod::CameraOnSphere(cos) => check_sphere(cos, &mut errors),
        SamplingMethod::DatasetFromCameras(dfc) => {
            for split in enabled_splits(common) {
                let collection = collection_name(dfc, split);
                if collection.and_then(|name| host.collection(name)).is_none() {
                    errors.push(ValidationError::MissingCollection(split));
                }
            }
        }
        _ => {}
    }

    if common.splats {
        if !common.test_data {
            errors.push(ValidationError::SplatsWithoutTestData);
        }
        if host.render_settings().file_format != ImageFormat::Png {
            errors.push(ValidationError::SplatsRequirePng);
        }
    }

    errors
}

/// Splits enabled by the train/test toggles
pub(crate) fn enabled_splits(common: &CommonSettings) -> impl Iterator<Item = Split> {
    [(Split::Train, common.train_data), (Split::Test, common.test_data)]
        .into_iter()
        .filter_map(|(split, enabled)| enabled.then_some(split))
}

/// Collection configured for `split`
pub(crate) fn collection_name(dfc: &DfcSettings, split: Split) -> Option<&str> {
    match split {
        Split::Train => dfc.train_collection.as_deref(),
        Split::Test => dfc.test_collection.as_deref(),
    }
}

fn is_perspective(host: &dyn SceneHost, camera: ObjectId) -> bool {
    host.camera_data(camera).is_some_and(|data| data.is_perspective())
}

fn check_active_camera(host: &dyn SceneHost, errors: &mut Vec<ValidationError>) {
    match host.active_camera().filter(|id| host.camera_data(*id).is_some()) {
        None => errors.push(ValidationError::MissingCamera),
        Some(camera) if !is_perspective(host, camera) => errors.push(ValidationError::NonPerspectiveCamera),
        Some(_) => {}
    }
}

fn check_train_test_cameras(host: &dyn SceneHost, ttc: &TtcSettings, errors: &mut Vec<ValidationError>) {
    let find = |name: &Option<String>| {
        name.as_deref()
            .and_then(|name| host.find_object(name))
            .filter(|id| host.camera_data(*id).is_some())
    };

    match (find(&ttc.train_camera), find(&ttc.test_camera)) {
        (Some(train), Some(test)) => {
            if !(is_perspective(host, train) && is_perspective(host, test)) {
                errors.push(ValidationError::NonPerspectiveCamera);
            }
        }
        _ => errors.push(ValidationError::MissingTrainTestCameras),
    }
}

fn check_collection_cameras(
    host: &dyn SceneHost,
    common: &CommonSettings,
    dfc: &DfcSettings,
    errors: &mut Vec<ValidationError>,
) {
    let all_perspective = enabled_splits(common)
        .filter_map(|split| collection_name(dfc, split))
        .filter_map(|name| collection_cameras(host, name))
        .flatten()
        .all(|camera| is_perspective(host, camera));

    if !all_perspective {
        errors.push(ValidationError::NonPerspectiveCamera);
    }
}

fn check_sphere(cos: &CosSettings, errors: &mut Vec<ValidationError>) {
    let sphere = cos.sphere();
    if !sphere.has_valid_scale() {
        errors.push(ValidationError::ZeroSphereScale);
    }
    if sphere.radius <= 0.0 {
        errors.push(ValidationError::NonPositiveRadius);
    }
}
