//! Subset of Frames: the active camera over the scene range, every N-th frame for training

use crate::config::SofSettings;
use crate::scene::SceneHost;

use super::super::{ExportError, Split};
use super::{active_camera, ExportContext, MethodRun};

pub(crate) fn run(host: &mut dyn SceneHost, ctx: &ExportContext<'_>, sof: &SofSettings) -> Result<MethodRun, ExportError> {
    let camera = active_camera(host)?;
    let scene_range = host.frame_range();

    if ctx.common.test_data {
        ctx.write_test_frames(host, camera, scene_range)?;
    }

    let mut render = None;
    if ctx.common.train_data {
        let train_range = scene_range.with_step(sof.train_frame_steps);
        ctx.write_frames(host, Split::Train, camera, train_range)?;

        if ctx.common.render_frames {
            render = Some(ctx.train_animation(host, camera, train_range)?);
        }
    }

    Ok(MethodRun::new(render))
}
