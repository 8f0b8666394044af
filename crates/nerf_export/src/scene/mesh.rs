use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Vec3};

/// Vertex cloud of a mesh object in object space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex normals, one per position
    pub normals: Vec<Vec3>,
    /// Uniform vertex color
    pub color: [u8; 3],
}

/// Procedural mesh shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshPrimitive {
    /// Explicit points, normals pointing away from the origin
    Points(Vec<Vec3>),
    /// Axis aligned cube centered on the origin, each face a grid of points
    Cube {
        /// Edge length
        size: f64,
        /// Grid cells along each face edge
        subdivisions: u32,
    },
    /// UV sphere centered on the origin
    UvSphere {
        /// Radius
        radius: f64,
        /// Latitude bands
        rings: u32,
        /// Longitude segments
        segments: u32,
    },
}

impl Mesh {
    /// Build the vertex cloud of `primitive`
    pub fn from_primitive(primitive: &MeshPrimitive, color: [u8; 3]) -> Self {
        let (positions, normals) = match primitive {
            MeshPrimitive::Points(points) => {
                let normals = points
                    .iter()
                    .map(|p| p.try_normalize(1e-12).unwrap_or_else(Vec3::z))
                    .collect();
                (points.clone(), normals)
            }
            MeshPrimitive::Cube { size, subdivisions } => cube(*size, *subdivisions),
            MeshPrimitive::UvSphere { radius, rings, segments } => uv_sphere(*radius, *rings, *segments),
        };

        Self { positions, normals, color }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn cube(size: f64, subdivisions: u32) -> (Vec<Vec3>, Vec<Vec3>) {
    let cells = subdivisions.max(1);
    let half = size / 2.0;
    let mut positions = Vec::new();
    let mut normals = Vec::new();

    for axis in 0..3 {
        for sign in [-1.0, 1.0] {
            let mut normal = Vec3::zeros();
            normal[axis] = sign;
            let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);

            for i in 0..=cells {
                for j in 0..=cells {
                    let mut p = Vec3::zeros();
                    p[axis] = sign * half;
                    p[u_axis] = -half + size * f64::from(i) / f64::from(cells);
                    p[v_axis] = -half + size * f64::from(j) / f64::from(cells);
                    positions.push(p);
                    normals.push(normal);
                }
            }
        }
    }

    (positions, normals)
}

fn uv_sphere(radius: f64, rings: u32, segments: u32) -> (Vec<Vec3>, Vec<Vec3>) {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let mut positions = vec![Vec3::new(0.0, 0.0, radius)];
    let mut normals = vec![Vec3::z()];

    for ring in 1..rings {
        let phi = constants::PI * f64::from(ring) / f64::from(rings);
        for segment in 0..segments {
            let theta = constants::TAU * f64::from(segment) / f64::from(segments);
            let normal = Vec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
            positions.push(normal * radius);
            normals.push(normal);
        }
    }

    positions.push(Vec3::new(0.0, 0.0, -radius));
    normals.push(-Vec3::z());
    (positions, normals)
}
