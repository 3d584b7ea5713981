//! CPU projection of a mesh into flat-shaded screen triangles.
//!
//! Output is painter-ordered (farthest first) so the shell can hand it to the
//! 2D painter without a depth buffer.

use glam::{Mat4, Vec2, Vec3};
use rayon::prelude::*;

use super::camera::{ndc_to_screen, Camera};
use super::model::Mesh;

/// Ambient plus one directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub directional: f32,
    /// Direction *towards* the light.
    pub direction: Vec3,
}

impl Lighting {
    pub fn mascot() -> Self {
        Self {
            ambient: 0.45,
            directional: 0.7,
            direction: Vec3::new(1.0, 1.0, 1.0).normalize(),
        }
    }

    pub fn globe() -> Self {
        Self {
            ambient: 0.35,
            directional: 0.9,
            direction: Vec3::new(5.0, 3.0, 5.0).normalize(),
        }
    }

    fn shade(&self, normal: Vec3) -> f32 {
        (self.ambient + self.directional * normal.dot(self.direction).max(0.0)).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Mean NDC depth; larger is farther.
    pub depth: f32,
    pub color: [u8; 4],
}

/// Project, cull and shade every triangle of `mesh` under `model`.
/// `origin` and `viewport` describe the target rectangle in screen pixels.
pub fn rasterize(
    mesh: &Mesh,
    model: Mat4,
    camera: &Camera,
    lighting: &Lighting,
    origin: Vec2,
    viewport: Vec2,
) -> Vec<ScreenTriangle> {
    let view_projection = camera.view_projection();

    let mut out: Vec<ScreenTriangle> = mesh
        .triangles
        .par_iter()
        .filter_map(|tri| {
            let world = tri.positions.map(|p| model.transform_point3(p));
            let normal = (world[1] - world[0]).cross(world[2] - world[0]).try_normalize()?;
            let centroid = (world[0] + world[1] + world[2]) / 3.0;
            if normal.dot(camera.position - centroid) <= 0.0 {
                return None;
            }

            let mut points = [Vec2::ZERO; 3];
            let mut depth = 0.0;
            for (i, p) in world.iter().enumerate() {
                let ndc = camera.project(&view_projection, *p)?;
                if !(-1.0..=1.0).contains(&ndc.z) {
                    return None;
                }
                points[i] = ndc_to_screen(ndc.truncate(), origin, viewport);
                depth += ndc.z / 3.0;
            }

            let light = lighting.shade(normal);
            let channel = |c: f32| (c * light * 255.0).round().clamp(0.0, 255.0) as u8;
            Some(ScreenTriangle {
                points,
                depth,
                color: [channel(tri.color[0]), channel(tri.color[1]), channel(tri.color[2]), 255],
            })
        })
        .collect();

    out.par_sort_unstable_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}
