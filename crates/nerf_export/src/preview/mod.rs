//! # Sphere preview rig
//!
//! Two helper objects visualize the Camera on Sphere setup in the host scene:
//!
//! - an empty named [`SPHERE_NAME`] carrying the sphere location, rotation and scale, its
//!   display size standing for the radius;
//! - a camera named [`CAMERA_NAME`] placed on the sphere sample of the current frame and
//!   constrained to track the sphere (or to look away from it when outward facing).
//!
//! Settings and helper objects are synchronized explicitly in both directions:
//! [`PreviewRig::push_to_scene`] after a settings edit, [`PreviewRig::pull_from_scene`] after
//! the objects were edited in the scene. A push made in response to a pull can pass
//! [`Echo::Suppress`] so the scene update it causes is not read back.

use crate::camera::CameraData;
use crate::config::CosSettings;
use crate::foundation::math::Transform;
use crate::sampling::{sample_sphere, SphereConfig};
use crate::scene::{ObjectId, SceneHost, TrackAxis};

/// Name of the sphere helper empty
pub const SPHERE_NAME: &str = "NeRF Sphere";

/// Name of the sphere helper camera
pub const CAMERA_NAME: &str = "NeRF Camera";

/// Whether a push should be read back by the next pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Echo {
    /// Next scene update is pulled as usual
    #[default]
    Propagate,
    /// Next scene update is ignored
    Suppress,
}

/// Track axis of the sphere camera
pub fn camera_track_axis(sphere: &SphereConfig) -> TrackAxis {
    if sphere.outward_facing {
        TrackAxis::PositiveZ
    } else {
        TrackAxis::NegativeZ
    }
}

/// Transform of the sphere helper empty
fn sphere_transform(sphere: &SphereConfig) -> Transform {
    Transform::from_euler(sphere.center, sphere.rotation, sphere.scale)
}

/// Visibility state of the helper objects
#[derive(Debug, Clone, Default)]
pub struct PreviewRig {
    show_sphere: bool,
    show_camera: bool,
    suppress_next_pull: bool,
}

impl PreviewRig {
    /// Create a rig with both helpers hidden
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sphere helper is shown
    pub fn show_sphere(&self) -> bool {
        self.show_sphere
    }

    /// Whether the camera helper is shown
    pub fn show_camera(&self) -> bool {
        self.show_camera
    }

    /// Sphere helper object, if present in the scene
    pub fn sphere(&self, host: &dyn SceneHost) -> Option<ObjectId> {
        host.find_object(SPHERE_NAME)
    }

    /// Camera helper object, if present in the scene
    pub fn camera(&self, host: &dyn SceneHost) -> Option<ObjectId> {
        host.find_object(CAMERA_NAME)
    }

    /// Show or hide the sphere helper; hiding it removes the camera helper too
    pub fn set_show_sphere(&mut self, host: &mut dyn SceneHost, settings: &CosSettings, on: bool) {
        self.show_sphere = on;
        if on {
            self.ensure_sphere(host, &settings.sphere());
        } else {
            self.show_camera = false;
            self.remove(host, CAMERA_NAME);
            self.remove(host, SPHERE_NAME);
        }
    }

    /// Show or hide the camera helper; showing it shows the sphere helper first
    pub fn set_show_camera(&mut self, host: &mut dyn SceneHost, settings: &CosSettings, on: bool) {
        self.show_camera = on;
        if on {
            self.show_sphere = true;
            let frame = host.frame_current();
            self.ensure_camera(host, &settings.sphere(), frame);
        } else {
            self.remove(host, CAMERA_NAME);
        }
    }

    /// Create the sphere helper unless it exists
    pub fn ensure_sphere(&mut self, host: &mut dyn SceneHost, sphere: &SphereConfig) -> ObjectId {
        if let Some(id) = self.sphere(host) {
            return id;
        }
        log::debug!("Creating {SPHERE_NAME}");
        host.create_empty(SPHERE_NAME, sphere_transform(sphere), sphere.radius)
    }

    /// Create the camera helper (and the sphere it tracks) unless it exists
    pub fn ensure_camera(&mut self, host: &mut dyn SceneHost, sphere: &SphereConfig, frame: i32) -> ObjectId {
        let target = self.ensure_sphere(host, sphere);
        if let Some(id) = self.camera(host) {
            return id;
        }

        log::debug!("Creating {CAMERA_NAME}");
        let position = sample_sphere(sphere, frame).point;
        let camera = host.create_camera(
            CAMERA_NAME,
            CameraData::perspective(sphere.focal_mm),
            Transform::from_position(position),
        );
        host.add_track_to(camera, target, camera_track_axis(sphere));
        camera
    }

    /// Remove helpers an export created; the flags of removed helpers are cleared
    pub fn remove_helpers(&mut self, host: &mut dyn SceneHost, camera: bool, sphere: bool) {
        if camera {
            self.show_camera = false;
            self.remove(host, CAMERA_NAME);
        }
        if sphere {
            self.show_sphere = false;
            self.remove(host, SPHERE_NAME);
        }
    }

    fn remove(&self, host: &mut dyn SceneHost, name: &str) {
        if let Some(id) = host.find_object(name) {
            log::debug!("Removing {name}");
            host.remove_object(id);
        }
    }

    /// Move the camera helper to the sample of `frame`
    pub fn reposition_camera(&self, host: &mut dyn SceneHost, sphere: &SphereConfig, frame: i32) {
        let Some(camera) = self.camera(host) else {
            return;
        };
        let mut transform = host.object_transform(camera).unwrap_or_default();
        transform.position = sample_sphere(sphere, frame).point;
        host.set_object_transform(camera, transform);
        log::trace!("{CAMERA_NAME} moved to frame {frame} sample");
    }

    /// Write the settings into the helper objects
    pub fn push_to_scene(&mut self, host: &mut dyn SceneHost, settings: &CosSettings, echo: Echo) {
        let sphere = settings.sphere();

        if let Some(id) = self.sphere(host) {
            host.set_object_transform(id, sphere_transform(&sphere));
            host.set_empty_display_size(id, sphere.radius);
        }
        if let Some(id) = self.camera(host) {
            host.set_camera_lens(id, sphere.focal_mm);
            host.set_track_axis(id, camera_track_axis(&sphere));
            let frame = host.frame_current();
            self.reposition_camera(host, &sphere, frame);
        }

        self.suppress_next_pull = echo == Echo::Suppress;
    }

    /// Read edits made to the helper objects back into the settings
    pub fn pull_from_scene(&mut self, host: &mut dyn SceneHost, settings: &mut CosSettings) {
        if std::mem::take(&mut self.suppress_next_pull) {
            return;
        }

        let sphere_id = self.sphere(host);
        let camera_id = self.camera(host);

        // Helpers deleted by hand
        if self.show_sphere && sphere_id.is_none() {
            log::debug!("{SPHERE_NAME} was removed from the scene");
            self.show_sphere = false;
        }
        if self.show_camera && camera_id.is_none() {
            log::debug!("{CAMERA_NAME} was removed from the scene");
            self.show_camera = false;
        }

        let mut sphere = settings.sphere();
        if let Some(id) = sphere_id.filter(|_| self.show_sphere) {
            if let Some(transform) = host.object_transform(id) {
                sphere.center = transform.position;
                sphere.rotation = transform.euler();
                sphere.scale = transform.scale;
            }
            if let Some(size) = host.empty_display_size(id) {
                sphere.radius = size;
            }
        }
        if let Some(id) = camera_id.filter(|_| self.show_camera) {
            if let Some(data) = host.camera_data(id) {
                sphere.focal_mm = data.lens_mm;
            }
        }
        settings.set_sphere(&sphere);

        let frame = host.frame_current();
        self.reposition_camera(host, &sphere, frame);
    }
}
