//! View sampling

pub mod sphere;

pub use sphere::{sample_sphere, SphereConfig, SphereSample};
