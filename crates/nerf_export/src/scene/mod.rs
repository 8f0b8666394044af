//! # Scene host
//!
//! The exporter never owns the scene: it reads cameras, frames and meshes and drives renders
//! through the [`SceneHost`] trait. [`MemoryScene`] is the bundled in-memory host, built by
//! hand or from a [`SceneDescription`] file.

mod constraint;
mod description;
mod host;
mod memory;
mod mesh;
pub mod raster;

pub use constraint::track_to_rotation;
pub use description::{
    CollectionDescription, KeyframeDescription, ObjectDescription, ObjectKind, SceneDescription,
    TrackToDescription,
};
pub use host::{HostEvent, MeshVertex, ObjectId, SceneHost, TrackAxis};
pub use memory::MemoryScene;
pub use mesh::{Mesh, MeshPrimitive};

use crate::config::ConfigError;

/// Scene host errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// A name does not match any object
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// Two described objects share a name
    #[error("Duplicate object name: {0}")]
    DuplicateName(String),

    /// No camera to render through
    #[error("No active camera to render through")]
    NoCamera,

    /// Rendering through an object that is not a camera
    #[error("Object is not a camera: {0}")]
    NotACamera(String),

    /// Camera transform cannot be inverted
    #[error("Degenerate camera transform: {0}")]
    DegenerateTransform(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Scene file error
    #[error("Scene file error: {0}")]
    Config(#[from] ConfigError),
}
