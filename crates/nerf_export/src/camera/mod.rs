//! # Camera model
//!
//! Host camera description (lens, sensor, fit) and its conversion into the pinhole
//! intrinsics written to dataset manifests.

mod data;
pub mod intrinsics;

pub use data::{CameraData, Projection, SensorFit};
pub use intrinsics::{
    derive_intrinsics, pinhole_intrinsics, CameraIntrinsics, IntrinsicsRecord, OutputDialect,
};
