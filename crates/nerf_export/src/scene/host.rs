//! Host scene interface
//!
//! Everything the exporter needs from the 3D application it runs inside: frame control,
//! render settings and invocation, object lookup and creation, and mesh data. The host owns
//! the scene; the exporter only talks to it through this trait.

use std::path::PathBuf;

use crate::camera::CameraData;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::render::{FrameRange, RenderJob, RenderSettings};

slotmap::new_key_type! {
    /// Handle of an object in the host scene
    pub struct ObjectId;
}

/// Axis of a track-to constraint pointed at its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum TrackAxis {
    /// Local -Z towards the target, the regular camera view direction
    #[default]
    NegativeZ,
    /// Local +Z towards the target, a camera looking away from it
    PositiveZ,
}

/// A mesh vertex in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// World space position
    pub position: Vec3,
    /// World space normal
    pub normal: Vec3,
    /// Vertex color
    pub color: [u8; 3],
}

/// Notifications delivered by the host outside of any exporter call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The scene frame changed (fired per frame while an animation render runs)
    FrameChanged(i32),
    /// Objects were edited outside the exporter
    SceneUpdated,
    /// The render job finished
    RenderComplete,
    /// The render job was cancelled by the user
    RenderCancelled,
}

/// Interface to the 3D application hosting the exporter
pub trait SceneHost {
    /// Current scene frame
    fn frame_current(&self) -> i32;

    /// Set the current frame and re-evaluate the scene
    fn set_frame(&mut self, frame: i32);

    /// Scene frame range and step
    fn frame_range(&self) -> FrameRange;

    /// Replace the scene frame range and step
    fn set_frame_range(&mut self, range: FrameRange);

    /// File stem the renderer uses for `frame`
    fn frame_stem(&self, frame: i32) -> String {
        format!("{frame:04}")
    }

    /// Render output settings
    fn render_settings(&self) -> &RenderSettings;

    /// Replace the render output path
    fn set_output_path(&mut self, path: PathBuf);

    /// Start rendering asynchronously; completion arrives as a [`HostEvent`]
    fn invoke_render(&mut self, job: RenderJob);

    /// Camera the scene renders through
    fn active_camera(&self) -> Option<ObjectId>;

    /// Change the camera the scene renders through
    fn set_active_camera(&mut self, camera: Option<ObjectId>);

    /// Look an object up by name
    fn find_object(&self, name: &str) -> Option<ObjectId>;

    /// Name of an object
    fn object_name(&self, id: ObjectId) -> Option<&str>;

    /// Lens and sensor of a camera object, `None` for other objects
    fn camera_data(&self, id: ObjectId) -> Option<CameraData>;

    /// Evaluated camera-to-world (object-to-world) matrix, constraints applied
    fn world_matrix(&self, id: ObjectId) -> Option<Mat4>;

    /// Local transform of an object
    fn object_transform(&self, id: ObjectId) -> Option<Transform>;

    /// Replace the local transform of an object
    fn set_object_transform(&mut self, id: ObjectId, transform: Transform);

    /// Display size of an empty object
    fn empty_display_size(&self, id: ObjectId) -> Option<f64>;

    /// Change the display size of an empty object
    fn set_empty_display_size(&mut self, id: ObjectId, size: f64);

    /// Change the focal length of a camera object
    fn set_camera_lens(&mut self, id: ObjectId, lens_mm: f64);

    /// Axis of the track-to constraint on an object, if any
    fn track_axis(&self, id: ObjectId) -> Option<TrackAxis>;

    /// Change the axis of the track-to constraint on an object
    fn set_track_axis(&mut self, id: ObjectId, axis: TrackAxis);

    /// Members of a named collection in collection order
    fn collection(&self, name: &str) -> Option<Vec<ObjectId>>;

    /// Create a camera object
    fn create_camera(&mut self, name: &str, data: CameraData, transform: Transform) -> ObjectId;

    /// Create an empty (locator) object
    fn create_empty(&mut self, name: &str, transform: Transform, display_size: f64) -> ObjectId;

    /// Constrain `object` to point `axis` at `target`, world +Z up
    fn add_track_to(&mut self, object: ObjectId, target: ObjectId, axis: TrackAxis);

    /// Delete an object and its data
    fn remove_object(&mut self, id: ObjectId);

    /// World space vertices of every visible mesh
    fn visible_mesh_vertices(&self) -> Vec<MeshVertex>;

    /// Directory of the open project file, if saved
    fn project_dir(&self) -> Option<PathBuf>;
}
