//! Point-splat rasterizer used by [`super::MemoryScene`] renders
//!
//! Projects every visible mesh vertex through the pinhole model of the camera and draws it as
//! a small square splat with a depth test and simple facing-ratio shading.

use image::{Rgb, RgbImage};

use crate::camera::pinhole_intrinsics;
use crate::foundation::math::Vec3;

use super::{ObjectId, SceneError, SceneHost};

/// Splat half size in pixels
const SPLAT_RADIUS: i64 = 1;

/// Points closer than this to the camera plane are clipped
const NEAR_CLIP: f64 = 1e-3;

const BACKGROUND_TOP: [f64; 3] = [48.0, 52.0, 60.0];
const BACKGROUND_BOTTOM: [f64; 3] = [18.0, 20.0, 24.0];

/// Draw the view of `camera`
pub fn render_view(host: &dyn SceneHost, camera: ObjectId) -> Result<RgbImage, SceneError> {
    let name = || host.object_name(camera).unwrap_or("<removed>").to_string();

    let data = host.camera_data(camera).ok_or_else(|| SceneError::NotACamera(name()))?;
    let camera_to_world = host.world_matrix(camera).ok_or_else(|| SceneError::NotACamera(name()))?;
    let world_to_camera = camera_to_world
        .try_inverse()
        .ok_or_else(|| SceneError::DegenerateTransform(name()))?;

    let k = pinhole_intrinsics(&data, host.render_settings(), 1);
    let (width, height) = (k.w, k.h);

    let mut image = RgbImage::from_fn(width, height, |_, y| {
        let t = if height > 1 { f64::from(y) / f64::from(height - 1) } else { 0.0 };
        let channel = |i: usize| (BACKGROUND_TOP[i] + (BACKGROUND_BOTTOM[i] - BACKGROUND_TOP[i]) * t) as u8;
        Rgb([channel(0), channel(1), channel(2)])
    });
    let mut depth = vec![f64::INFINITY; width as usize * height as usize];

    let eye = camera_to_world.fixed_view::<3, 1>(0, 3).into_owned();

    for vertex in host.visible_mesh_vertices() {
        let p = world_to_camera.transform_point(&vertex.position.into());

        // Cameras look down -Z
        let distance = -p.z;
        if distance < NEAR_CLIP {
            continue;
        }

        let u = k.cx + k.fl_x * p.x / distance;
        let v = k.cy - k.fl_y * p.y / distance;

        let to_eye = (eye - vertex.position).try_normalize(1e-12).unwrap_or_else(Vec3::zeros);
        let shade = vertex.normal.dot(&to_eye).abs().max(0.25);
        let color = Rgb(vertex.color.map(|c| (f64::from(c) * shade).round() as u8));

        let (cu, cv) = (u.floor() as i64, v.floor() as i64);
        for y in (cv - SPLAT_RADIUS)..=(cv + SPLAT_RADIUS) {
            for x in (cu - SPLAT_RADIUS)..=(cu + SPLAT_RADIUS) {
                if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                    continue;
                }
                let index = y as usize * width as usize + x as usize;
                if distance < depth[index] {
                    depth[index] = distance;
                    image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    Ok(image)
}
