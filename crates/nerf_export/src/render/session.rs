//! # Render lifecycle
//!
//! The host renders asynchronously: an export mutates the scene render settings, hands a job
//! to the host and returns. Completion or cancellation arrives later as a host event, at which
//! point the scene must be put back the way it was and the dataset finalized.
//!
//! [`RenderLifecycleController`] holds the one session that carries that state across the
//! gap:
//!
//! ```text
//! Idle --begin--> Rendering(session) --end--> Idle
//! ```
//!
//! There is no timeout. A render that never reports back leaves the controller rendering.

use std::path::PathBuf;

use crate::dataset::{Finalizer, MethodKind};
use crate::scene::{ObjectId, SceneHost};

use super::{FrameRange, RenderJob};

/// Scene state changed by a render handoff
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    /// Frame range and step
    pub frame_range: FrameRange,
    /// Render output path
    pub output_path: PathBuf,
    /// Active camera
    pub active_camera: Option<ObjectId>,
}

impl SceneSnapshot {
    /// Record the current host state
    pub fn capture(host: &dyn SceneHost) -> Self {
        Self {
            frame_range: host.frame_range(),
            output_path: host.render_settings().output_path.clone(),
            active_camera: host.active_camera(),
        }
    }

    /// Put the recorded state back into the host
    pub fn restore(&self, host: &mut dyn SceneHost) {
        host.set_frame_range(self.frame_range);
        host.set_output_path(self.output_path.clone());
        host.set_active_camera(self.active_camera);
    }
}

/// State carried from the render handoff to the post-render callback
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSession {
    /// Method that started the render
    pub method: MethodKind,
    /// Scene state to restore
    pub snapshot: SceneSnapshot,
    /// What to clean up and archive afterwards
    pub finalizer: Finalizer,
}

/// Controller state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenderState {
    /// No export render in flight
    #[default]
    Idle,
    /// An export render is in flight
    Rendering(RenderSession),
}

/// Render session errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session is already in flight
    #[error("A {0} render is already in progress")]
    AlreadyRendering(MethodKind),
}

/// Owner of the single render session
#[derive(Debug, Default)]
pub struct RenderLifecycleController {
    state: RenderState,
}

impl RenderLifecycleController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Whether a session is in flight
    pub fn is_rendering(&self) -> bool {
        matches!(self.state, RenderState::Rendering(_))
    }

    /// Method of the session in flight
    pub fn active_method(&self) -> Option<MethodKind> {
        match &self.state {
            RenderState::Idle => None,
            RenderState::Rendering(session) => Some(session.method),
        }
    }

    /// Store `session` and start `job` on the host
    pub fn begin(
        &mut self,
        host: &mut dyn SceneHost,
        session: RenderSession,
        job: RenderJob,
    ) -> Result<(), SessionError> {
        if let RenderState::Rendering(current) = &self.state {
            return Err(SessionError::AlreadyRendering(current.method));
        }

        log::info!(
            "{} render started: {} image(s) for {}",
            session.method,
            job.image_count(),
            session.finalizer.dataset_dir.display()
        );

        self.state = RenderState::Rendering(session);
        host.invoke_render(job);
        Ok(())
    }

    /// Take the session out, returning to idle
    ///
    /// Completion and cancellation both end up here.
    pub fn end(&mut self) -> Option<RenderSession> {
        match std::mem::take(&mut self.state) {
            RenderState::Idle => None,
            RenderState::Rendering(session) => {
                log::info!("{} render finished", session.method);
                Some(session)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraData;
    use crate::dataset::MethodCleanup;
    use crate::foundation::math::Transform;
    use crate::scene::{HostEvent, MemoryScene};

    fn session(method: MethodKind, host: &dyn SceneHost) -> RenderSession {
        RenderSession {
            method,
            snapshot: SceneSnapshot::capture(host),
            finalizer: Finalizer {
                dataset_dir: PathBuf::from("/tmp/dataset"),
                archive_path: PathBuf::from("/tmp/dataset.zip"),
                cleanup: MethodCleanup::None,
            },
        }
    }

    #[test]
    fn test_begin_and_end() {
        let mut scene = MemoryScene::new();
        let camera = scene.create_camera("Camera", CameraData::default(), Transform::identity());
        let mut controller = RenderLifecycleController::new();
        assert!(!controller.is_rendering());

        let session = session(MethodKind::Sof, &scene);
        let job = RenderJob::Stills(vec![crate::render::StillShot {
            camera,
            output_file: PathBuf::from("/tmp/none.png"),
        }]);
        controller.begin(&mut scene, session.clone(), job).unwrap();

        assert!(controller.is_rendering());
        assert_eq!(controller.active_method(), Some(MethodKind::Sof));
        assert!(scene.is_rendering());

        assert_eq!(controller.end(), Some(session));
        assert!(!controller.is_rendering());
        assert_eq!(controller.end(), None);
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut scene = MemoryScene::new();
        let mut controller = RenderLifecycleController::new();

        let job = RenderJob::Stills(Vec::new());
        let cos_session = session(MethodKind::Cos, &scene);
        controller.begin(&mut scene, cos_session, job.clone()).unwrap();

        let ttc_session = session(MethodKind::Ttc, &scene);
        let err = controller
            .begin(&mut scene, ttc_session, job)
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyRendering(MethodKind::Cos));
        assert_eq!(controller.active_method(), Some(MethodKind::Cos));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut scene = MemoryScene::new();
        let camera = scene.create_camera("Camera", CameraData::default(), Transform::identity());
        let other = scene.create_camera("Other", CameraData::default(), Transform::identity());
        scene.set_active_camera(Some(camera));
        scene.set_frame_range(FrameRange::new(1, 40, 2));

        let snapshot = SceneSnapshot::capture(&scene);

        scene.set_frame_range(FrameRange::new(1, 10, 5));
        scene.set_output_path(PathBuf::from("/elsewhere/train/"));
        scene.set_active_camera(Some(other));

        snapshot.restore(&mut scene);
        assert_eq!(scene.frame_range(), FrameRange::new(1, 40, 2));
        assert_eq!(scene.render_settings().output_path, snapshot.output_path);
        assert_eq!(scene.active_camera(), Some(camera));
    }

    #[test]
    fn test_unfinished_render_stays_rendering() {
        let mut scene = MemoryScene::new();
        let mut controller = RenderLifecycleController::new();
        let dfc_session = session(MethodKind::Dfc, &scene);
        controller
            .begin(&mut scene, dfc_session, RenderJob::Stills(Vec::new()))
            .unwrap();

        // Nobody pumps the host: no completion event, no transition
        assert!(controller.is_rendering());
        assert_eq!(scene.poll_event().unwrap(), Some(HostEvent::RenderComplete));
        assert!(controller.is_rendering());
    }
}
