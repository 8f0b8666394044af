//! Serializable scene descriptions
//!
//! A [`SceneDescription`] is a plain data file (TOML or RON through [`Config`]) that builds a
//! [`MemoryScene`]: render settings, frame range, cameras, empties, procedural meshes,
//! keyframes, track-to constraints and collections, all referenced by object name.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::camera::CameraData;
use crate::config::Config;
use crate::foundation::math::{Transform, Vec3};
use crate::render::{FrameRange, RenderSettings};

use super::mesh::{Mesh, MeshPrimitive};
use super::{MemoryScene, ObjectId, SceneError, SceneHost, TrackAxis};

/// Object kind and payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Camera object
    Camera(CameraData),
    /// Empty (locator) object
    Empty {
        /// Display size
        display_size: f64,
    },
    /// Mesh object
    Mesh {
        /// Shape
        primitive: MeshPrimitive,
        /// Vertex color
        color: [u8; 3],
    },
}

/// Transform keyed at a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDescription {
    /// Frame number
    pub frame: i32,
    /// Location
    pub location: Vec3,
    /// XYZ Euler rotation, radians
    #[serde(default = "Vec3::zeros")]
    pub rotation: Vec3,
}

/// Track-to constraint by target name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackToDescription {
    /// Target object name
    pub target: String,
    /// Axis pointed at the target
    #[serde(default)]
    pub axis: TrackAxis,
}

/// One scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Object name
    pub name: String,
    /// Kind and payload
    pub kind: ObjectKind,
    /// Location
    #[serde(default = "Vec3::zeros")]
    pub location: Vec3,
    /// XYZ Euler rotation, radians
    #[serde(default = "Vec3::zeros")]
    pub rotation: Vec3,
    /// Scale
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Keyed transforms
    #[serde(default)]
    pub keyframes: Vec<KeyframeDescription>,
    /// Track-to constraint
    #[serde(default)]
    pub track_to: Option<TrackToDescription>,
    /// Visibility in renders
    #[serde(default = "visible")]
    pub visible: bool,
}

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

fn visible() -> bool {
    true
}

/// Named list of objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescription {
    /// Collection name
    pub name: String,
    /// Member object names, in order
    pub objects: Vec<String>,
}

/// Complete scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Directory reported as the project location
    pub project_dir: Option<PathBuf>,
    /// Render settings
    pub render: RenderSettings,
    /// Frame range and step
    pub frame_range: FrameRange,
    /// Current frame
    pub frame_current: i32,
    /// Name of the active camera
    pub active_camera: Option<String>,
    /// Objects
    pub objects: Vec<ObjectDescription>,
    /// Collections
    pub collections: Vec<CollectionDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            project_dir: None,
            render: RenderSettings::default(),
            frame_range: FrameRange::default(),
            frame_current: 1,
            active_camera: None,
            objects: Vec::new(),
            collections: Vec::new(),
        }
    }
}

impl Config for SceneDescription {}

impl SceneDescription {
    /// Build the described scene
    pub fn build(&self) -> Result<MemoryScene, SceneError> {
        let mut scene = MemoryScene::new();
        *scene.render_settings_mut() = self.render.clone();
        scene.set_frame_range(self.frame_range);
        scene.set_project_dir(self.project_dir.clone());

        for object in &self.objects {
            if scene.find_object(&object.name).is_some() {
                return Err(SceneError::DuplicateName(object.name.clone()));
            }
            let transform = Transform::from_euler(object.location, object.rotation, object.scale);
            let id = match &object.kind {
                ObjectKind::Camera(data) => scene.create_camera(&object.name, *data, transform),
                ObjectKind::Empty { display_size } => scene.create_empty(&object.name, transform, *display_size),
                ObjectKind::Mesh { primitive, color } => {
                    scene.add_mesh(&object.name, Mesh::from_primitive(primitive, *color), transform)
                }
            };
            for key in &object.keyframes {
                scene.insert_keyframe(id, key.frame, Transform::from_euler(key.location, key.rotation, object.scale));
            }
            scene.set_visible(id, object.visible);
        }

        for object in &self.objects {
            if let Some(track) = &object.track_to {
                let id = lookup(&scene, &object.name)?;
                let target = lookup(&scene, &track.target)?;
                scene.add_track_to(id, target, track.axis);
            }
        }

        for collection in &self.collections {
            for name in &collection.objects {
                let id = lookup(&scene, name)?;
                scene.link_to_collection(&collection.name, id);
            }
        }

        if let Some(name) = &self.active_camera {
            let id = lookup(&scene, name)?;
            scene.set_active_camera(Some(id));
        }
        scene.set_frame(self.frame_current);

        log::debug!(
            "Scene built: {} object(s), {} collection(s)",
            scene.object_count(),
            self.collections.len()
        );
        Ok(scene)
    }
}

fn lookup(scene: &MemoryScene, name: &str) -> Result<ObjectId, SceneError> {
    scene
        .find_object(name)
        .ok_or_else(|| SceneError::UnknownObject(name.to_string()))
}
