//! Rendering
//!
//! Host render settings, the jobs handed to the host renderer, and the lifecycle controller
//! that owns the single in-flight render session.

mod settings;
pub mod session;

pub use settings::{FrameRange, ImageFormat, RenderJob, RenderSettings, StillShot};
pub use session::{
    RenderLifecycleController, RenderSession, RenderState, SceneSnapshot, SessionError,
};
