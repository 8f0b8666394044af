//! # Sphere sampling
//!
//! Deterministic camera positions on an oriented, non-uniformly scaled sphere. Each sample is
//! drawn from its own generator seeded from the configured seed and the sample index, so a
//! frame always maps to the same position no matter which frames were sampled before it.
//!
//! Directions are uniform over the unit sphere: the azimuth is uniform in `[0, 2π)` and the
//! polar angle is `acos(1 - 2u)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, euler_to_matrix, Vec3};

/// Sampling sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// World space center
    pub center: Vec3,
    /// XYZ Euler rotation, radians
    pub rotation: Vec3,
    /// Per-axis scale applied before rotation
    pub scale: Vec3,
    /// Radius
    pub radius: f64,
    /// Restrict samples to the `z >= 0` half of the unit sphere
    pub upper_hemisphere_only: bool,
    /// Sphere camera looks away from the center
    pub outward_facing: bool,
    /// Sampling seed
    pub seed: i64,
    /// Focal length of the sphere camera, millimeters
    pub focal_mm: f64,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            radius: 4.0,
            upper_hemisphere_only: false,
            outward_facing: false,
            seed: 0,
            focal_mm: 50.0,
        }
    }
}

impl SphereConfig {
    /// Whether every axis of the scale is non-zero
    pub fn has_valid_scale(&self) -> bool {
        self.scale.iter().all(|axis| *axis != 0.0)
    }
}

/// One sample on the sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSample {
    /// Direction on the unit sphere, before scale and rotation
    pub unit: Vec3,
    /// World space position
    pub point: Vec3,
}

/// Generator seed of sample `index`
fn sample_seed(seed: i64, index: i32) -> u64 {
    let seed = seed.wrapping_mul(2).wrapping_add(1);
    let index = i64::from(index).wrapping_add(1);
    seed.wrapping_mul(index) as u64
}

/// Sample `index` (usually the scene frame) of `sphere`
pub fn sample_sphere(sphere: &SphereConfig, index: i32) -> SphereSample {
    let mut rng = StdRng::seed_from_u64(sample_seed(sphere.seed, index));

    let theta = rng.gen::<f64>() * constants::TAU;
    let phi = (1.0 - 2.0 * rng.gen::<f64>()).acos();

    let mut unit = Vec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
    if sphere.upper_hemisphere_only {
        unit.z = unit.z.abs();
    }

    let local = (sphere.scale * sphere.radius).component_mul(&unit);
    let point = sphere.center + euler_to_matrix(sphere.rotation) * local;

    SphereSample { unit, point }
}
