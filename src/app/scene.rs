//! Painting 3D into the 2D painter: the page scene and tilted images.

use eframe::egui;
use glam::{Quat, Vec2, Vec3};

use folio::anim::hover::TiltPose;
use folio::scene::raster::ScreenTriangle;
use folio::scene::SceneContext;

/// CSS-style perspective distance for image tilt, in logical px.
const PERSPECTIVE: f32 = 1000.0;
/// Grid resolution of a tilted image; affine UVs per cell hide the seam.
const TILT_GRID: u32 = 8;

/// Advance the scene one frame and paint it behind the page inside `rect`.
pub fn paint_scene(
    painter: &egui::Painter,
    scene: &mut SceneContext,
    rect: egui::Rect,
    pointer: Option<egui::Pos2>,
) {
    let canvas = Vec2::new(rect.width(), rect.height());
    if let Some(pos) = pointer.filter(|p| rect.contains(*p)) {
        scene.pointer_moved(Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y), canvas);
    }

    let frame = scene.frame(Vec2::new(rect.min.x, rect.min.y), canvas);
    if frame.triangles.is_empty() {
        return;
    }
    painter
        .with_clip_rect(rect)
        .add(egui::Shape::mesh(triangles_to_mesh(&frame.triangles)));
}

/// Painter-ordered triangles into one untextured mesh.
pub fn triangles_to_mesh(triangles: &[ScreenTriangle]) -> egui::Mesh {
    let mut mesh = egui::Mesh::default();
    mesh.reserve_vertices(triangles.len() * 3);
    mesh.reserve_triangles(triangles.len());
    for tri in triangles {
        let [r, g, b, a] = tri.color;
        let color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
        let base = mesh.vertices.len() as u32;
        for p in tri.points {
            mesh.colored_vertex(egui::pos2(p.x, p.y), color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }
    mesh
}

/// A textured grid for `rect` scaled about its center, rotated by `tilt`
/// and projected with perspective.
pub fn tilted_image_mesh(
    texture: egui::TextureId,
    rect: egui::Rect,
    scale: f32,
    tilt: TiltPose,
    tint: egui::Color32,
) -> egui::Mesh {
    let rotation = Quat::from_rotation_y(tilt.rotate_y_deg.to_radians())
        * Quat::from_rotation_x(tilt.rotate_x_deg.to_radians());
    let center = rect.center();
    let (w, h) = (rect.width() * scale, rect.height() * scale);

    let mut mesh = egui::Mesh::with_texture(texture);
    let n = TILT_GRID;
    for row in 0..=n {
        for col in 0..=n {
            let u = col as f32 / n as f32;
            let v = row as f32 / n as f32;
            // Screen y grows downward; flip into a y-up space for the rotation.
            let local = rotation * Vec3::new((u - 0.5) * w, (0.5 - v) * h, 0.0);
            let f = PERSPECTIVE / (PERSPECTIVE - local.z).max(1.0);
            mesh.vertices.push(egui::epaint::Vertex {
                pos: egui::pos2(center.x + local.x * f, center.y - local.y * f),
                uv: egui::pos2(u, v),
                color: tint,
            });
        }
    }
    let stride = n + 1;
    for row in 0..n {
        for col in 0..n {
            let i = row * stride + col;
            mesh.add_triangle(i, i + 1, i + stride);
            mesh.add_triangle(i + 1, i + stride + 1, i + stride);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(200.0, 100.0))
    }

    fn flat() -> TiltPose {
        TiltPose {
            rotate_x_deg: 0.0,
            rotate_y_deg: 0.0,
            scale: 1.0,
        }
    }

    fn image_mesh(scale: f32, tilt: TiltPose) -> egui::Mesh {
        tilted_image_mesh(egui::TextureId::default(), rect(), scale, tilt, egui::Color32::WHITE)
    }

    #[test]
    fn flat_image_covers_its_rect() {
        let mesh = image_mesh(1.0, flat());
        assert_eq!(mesh.vertices.len(), ((TILT_GRID + 1) * (TILT_GRID + 1)) as usize);
        let first = mesh.vertices[0].pos;
        let last = mesh.vertices[mesh.vertices.len() - 1].pos;
        assert!((first - egui::pos2(100.0, 50.0)).length() < 1e-3);
        assert!((last - egui::pos2(300.0, 150.0)).length() < 1e-3);
        assert_eq!(mesh.vertices[0].uv, egui::pos2(0.0, 0.0));
    }

    #[test]
    fn scale_grows_about_the_center() {
        let mesh = image_mesh(1.5, flat());
        let first = mesh.vertices[0].pos;
        assert!((first - egui::pos2(50.0, 25.0)).length() < 1e-3);
    }

    #[test]
    fn yaw_brings_one_edge_closer() {
        let tilt = TiltPose {
            rotate_y_deg: 24.0,
            ..flat()
        };
        let mesh = image_mesh(1.0, tilt);
        let stride = (TILT_GRID + 1) as usize;
        let left = mesh.vertices[stride * TILT_GRID as usize].pos.y - mesh.vertices[0].pos.y;
        let right = mesh.vertices[stride * stride - 1].pos.y - mesh.vertices[stride - 1].pos.y;
        assert!((left - right).abs() > 1.0, "edges should differ in height: {} vs {}", left, right);
    }

    #[test]
    fn triangles_keep_their_order_and_color() {
        let tris = [
            ScreenTriangle {
                points: [Vec2::ZERO, Vec2::X, Vec2::Y],
                depth: 0.9,
                color: [255, 0, 0, 255],
            },
            ScreenTriangle {
                points: [Vec2::ONE, Vec2::X, Vec2::Y],
                depth: 0.1,
                color: [0, 0, 255, 255],
            },
        ];
        let mesh = triangles_to_mesh(&tris);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices[0].color, egui::Color32::RED);
        assert_eq!(mesh.vertices[3].color, egui::Color32::BLUE);
    }
}
