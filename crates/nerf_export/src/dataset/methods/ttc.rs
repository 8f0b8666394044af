//! Train and Test Cameras: `nb_frames` frames of the train camera from the scene start, the
//! whole scene range for the test camera

use crate::config::TtcSettings;
use crate::render::FrameRange;
use crate::scene::SceneHost;

use super::super::{ExportError, Split};
use super::{named_camera, ExportContext, MethodRun};

/// First `nb_frames` frames of `scene_range`, keeping its step
pub(crate) fn train_range(scene_range: FrameRange, nb_frames: u32) -> FrameRange {
    let count = i32::try_from(nb_frames).unwrap_or(i32::MAX);
    let end = scene_range.start.saturating_add(count).saturating_sub(1);
    FrameRange::new(scene_range.start, end, scene_range.step)
}

pub(crate) fn run(host: &mut dyn SceneHost, ctx: &ExportContext<'_>, ttc: &TtcSettings) -> Result<MethodRun, ExportError> {
    let train_camera = named_camera(host, ttc.train_camera.as_deref())?;
    let test_camera = named_camera(host, ttc.test_camera.as_deref())?;
    let scene_range = host.frame_range();

    if ctx.common.test_data {
        ctx.write_test_frames(host, test_camera, scene_range)?;
    }

    let mut render = None;
    if ctx.common.train_data {
        let range = train_range(scene_range, ttc.nb_frames);
        ctx.write_frames(host, Split::Train, train_camera, range)?;

        if ctx.common.render_frames {
            render = Some(ctx.train_animation(host, train_camera, range)?);
        }
    }

    Ok(MethodRun::new(render))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_range_keeps_start_and_step() {
        assert_eq!(train_range(FrameRange::new(10, 250, 2), 5), FrameRange::new(10, 14, 2));
        assert_eq!(train_range(FrameRange::new(1, 250, 1), 0), FrameRange::new(1, 0, 1));
        assert_eq!(train_range(FrameRange::new(1, 250, 1), u32::MAX).end, i32::MAX);
    }
}
