//! Dataset From Cameras: one still per camera of the train and test collections

use crate::config::DfcSettings;
use crate::render::{RenderJob, StillShot};
use crate::scene::{ObjectId, SceneHost};

use super::super::extrinsics::enumerate_cameras;
use super::super::validation::{collection_name, enabled_splits};
use super::super::{DatasetManifest, ExportError};
use super::{ExportContext, MethodRun};

/// Camera members of the collection `name`, in collection order
pub(crate) fn collection_cameras(host: &dyn SceneHost, name: &str) -> Option<Vec<ObjectId>> {
    let members = host.collection(name)?;
    Some(
        members
            .into_iter()
            .filter(|id| host.camera_data(*id).is_some())
            .collect(),
    )
}

pub(crate) fn run(host: &mut dyn SceneHost, ctx: &ExportContext<'_>, dfc: &DfcSettings) -> Result<MethodRun, ExportError> {
    let extension = host.render_settings().file_format.extension();
    let mut shots = Vec::new();

    for split in enabled_splits(ctx.common) {
        let name = collection_name(dfc, split).unwrap_or_default();
        let cameras = collection_cameras(host, name)
            .ok_or_else(|| ExportError::MissingObject(name.to_string()))?;

        let Some(&first) = cameras.first() else {
            log::warn!("Collection '{name}' has no cameras, skipping {split} split");
            continue;
        };

        let intrinsics = ctx.intrinsics(host, first)?;
        let frames = enumerate_cameras(host, &cameras, split, &ctx.naming)?;
        ctx.write_manifest(split, &DatasetManifest::new(intrinsics, frames))?;

        let split_dir = ctx.split_dir(split);
        for &camera in &cameras {
            let camera_name = host.object_name(camera).unwrap_or_default();
            shots.push(StillShot {
                camera,
                output_file: split_dir.join(format!("{camera_name}{extension}")),
            });
        }
    }

    if !ctx.common.render_frames || shots.is_empty() {
        return Ok(MethodRun::new(None));
    }

    for split in enabled_splits(ctx.common) {
        std::fs::create_dir_all(ctx.split_dir(split))?;
    }
    Ok(MethodRun::new(Some(RenderJob::Stills(shots))))
}
