//! Initial point cloud for Gaussian splatting (`points3d.ply`)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::scene::MeshVertex;

/// Save mesh vertices as an ASCII PLY 1.0 point cloud with normals and colors
pub fn write_points_ply(vertices: &[MeshVertex], path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "ply")?;
    writeln!(file, "format ascii 1.0")?;
    writeln!(file, "element vertex {}", vertices.len())?;
    for property in ["x", "y", "z", "nx", "ny", "nz"] {
        writeln!(file, "property float {property}")?;
    }
    for property in ["red", "green", "blue"] {
        writeln!(file, "property uchar {property}")?;
    }
    writeln!(file, "end_header")?;

    for vertex in vertices {
        let (p, n, c) = (vertex.position, vertex.normal, vertex.color);
        writeln!(
            file,
            "{} {} {} {} {} {} {} {} {}",
            p.x as f32, p.y as f32, p.z as f32, n.x as f32, n.y as f32, n.z as f32, c[0], c[1], c[2]
        )?;
    }

    file.flush()
}
