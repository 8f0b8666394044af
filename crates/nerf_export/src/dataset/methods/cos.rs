//! Camera on Sphere: the sphere helper camera over frames `1..=nb_frames` for training, the
//! active camera over the scene range for testing

use crate::config::CosSettings;
use crate::preview::{PreviewRig, CAMERA_NAME};
use crate::render::{FrameRange, RenderJob};
use crate::scene::SceneHost;

use super::super::extrinsics::enumerate_frames;
use super::super::{DatasetManifest, ExportError, MethodCleanup, Split};
use super::{active_camera, ExportContext, MethodRun};

/// Frames sampled on the sphere
pub(crate) fn train_range(nb_frames: u32) -> FrameRange {
    FrameRange::new(1, i32::try_from(nb_frames).unwrap_or(i32::MAX), 1)
}

pub(crate) fn run(
    host: &mut dyn SceneHost,
    ctx: &ExportContext<'_>,
    cos: &CosSettings,
    preview: &mut PreviewRig,
) -> Result<MethodRun, ExportError> {
    let camera = active_camera(host)?;

    if ctx.common.test_data {
        let scene_range = host.frame_range();
        ctx.write_test_frames(host, camera, scene_range)?;
    }

    if !ctx.common.train_data {
        return Ok(MethodRun::new(None));
    }

    let cleanup = MethodCleanup::RemovePreview {
        sphere_existed: preview.sphere(host).is_some(),
        camera_existed: preview.camera(host).is_some(),
    };
    preview.set_show_camera(host, cos, true);

    match run_train(host, ctx, cos, preview) {
        Ok(render) => Ok(MethodRun { render, cleanup }),
        Err(err) => {
            cleanup.apply(host, preview);
            Err(err)
        }
    }
}

fn run_train(
    host: &mut dyn SceneHost,
    ctx: &ExportContext<'_>,
    cos: &CosSettings,
    preview: &PreviewRig,
) -> Result<Option<RenderJob>, ExportError> {
    let sphere_camera = preview
        .camera(host)
        .ok_or_else(|| ExportError::MissingObject(CAMERA_NAME.to_string()))?;
    let sphere = cos.sphere();
    let range = train_range(cos.nb_frames);

    let intrinsics = ctx.intrinsics(host, sphere_camera)?;
    let mut move_camera = |host: &mut dyn SceneHost, frame: i32| preview.reposition_camera(host, &sphere, frame);
    let frames = enumerate_frames(host, sphere_camera, range, Split::Train, &ctx.naming, Some(&mut move_camera))?;
    ctx.write_manifest(Split::Train, &DatasetManifest::new(intrinsics, frames))?;

    if !ctx.common.render_frames {
        return Ok(None);
    }
    ctx.train_animation(host, sphere_camera, range).map(Some)
}
