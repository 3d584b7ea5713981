//! Binary glTF loading into a flat triangle list.

use std::sync::mpsc;

use glam::{Mat4, Vec2, Vec3};

use crate::error::AssetError;
use crate::net::fetch::AssetSource;

pub const MASCOT_MODEL: &str = "objects/duckie.glb";
pub const GLOBE_MODEL: &str = "objects/earth.glb";

/// A world-space triangle with its flat colour (linear RGB, 0..1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Decode a `.glb` (or embedded `.gltf`) document. Node transforms are
    /// baked in; each triangle takes the material colour, multiplied by the
    /// base colour texture sampled at the triangle's centroid UV.
    pub fn from_glb(bytes: &[u8]) -> Result<Mesh, AssetError> {
        let (doc, buffers, images) = gltf::import_slice(bytes)?;
        let mut mesh = Mesh::default();

        match doc.default_scene().or_else(|| doc.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    visit_node(&node, Mat4::IDENTITY, &buffers, &images, &mut mesh.triangles);
                }
            }
            None => {
                for m in doc.meshes() {
                    add_mesh(&m, Mat4::IDENTITY, &buffers, &images, &mut mesh.triangles);
                }
            }
        }

        if mesh.triangles.is_empty() {
            return Err(AssetError::EmptyModel);
        }
        Ok(mesh)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.triangles.iter().flat_map(|t| t.positions);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    out: &mut Vec<Triangle>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(m) = node.mesh() {
        add_mesh(&m, world, buffers, images, out);
    }
    for child in node.children() {
        visit_node(&child, world, buffers, images, out);
    }
}

fn add_mesh(
    mesh: &gltf::Mesh,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    out: &mut Vec<Triangle>,
) {
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions
            .map(|p| world.transform_point3(Vec3::from(p)))
            .collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(i) => i.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let pbr = prim.material().pbr_metallic_roughness();
        let [r, g, b, _] = pbr.base_color_factor();
        let texture = pbr.base_color_texture().and_then(|info| {
            let image = images.get(info.texture().source().index())?;
            let uvs: Vec<Vec2> = reader
                .read_tex_coords(info.tex_coord())?
                .into_f32()
                .map(Vec2::from)
                .collect();
            Some((image, uvs))
        });

        for tri in indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if [i0, i1, i2].iter().any(|&i| i >= positions.len()) {
                continue;
            }
            let mut color = [r, g, b];
            if let Some((image, uvs)) = &texture {
                if let (Some(u0), Some(u1), Some(u2)) = (uvs.get(i0), uvs.get(i1), uvs.get(i2)) {
                    let tex = sample(image, (*u0 + *u1 + *u2) / 3.0);
                    color = [color[0] * tex[0], color[1] * tex[1], color[2] * tex[2]];
                }
            }
            out.push(Triangle {
                positions: [positions[i0], positions[i1], positions[i2]],
                color,
            });
        }
    }
}

/// Nearest-texel lookup with repeat wrapping. Unsupported formats read white.
fn sample(image: &gltf::image::Data, uv: Vec2) -> [f32; 3] {
    use gltf::image::Format;

    if image.width == 0 || image.height == 0 {
        return [1.0; 3];
    }
    let channels = match image.format {
        Format::R8 => 1,
        Format::R8G8 => 2,
        Format::R8G8B8 => 3,
        Format::R8G8B8A8 => 4,
        _ => return [1.0; 3],
    };
    let x = ((uv.x.rem_euclid(1.0) * image.width as f32) as u32).min(image.width - 1);
    let y = ((uv.y.rem_euclid(1.0) * image.height as f32) as u32).min(image.height - 1);
    let at = ((y * image.width + x) as usize) * channels;
    let Some(px) = image.pixels.get(at..at + channels) else {
        return [1.0; 3];
    };
    let f = |v: u8| v as f32 / 255.0;
    match channels {
        1 | 2 => [f(px[0]); 3],
        _ => [f(px[0]), f(px[1]), f(px[2])],
    }
}

/// A model that may still be on its way from a background thread.
pub enum ModelSlot {
    Loading(mpsc::Receiver<Option<Mesh>>),
    Ready(Mesh),
    Missing,
}

impl ModelSlot {
    /// Start fetching and decoding `path` from `source` on a worker thread.
    pub fn load(source: &AssetSource, path: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        let source = source.clone();
        let path = path.to_string();

        std::thread::spawn(move || {
            let result = source
                .read(&path)
                .and_then(|bytes| Mesh::from_glb(&bytes));
            let mesh = match result {
                Ok(mesh) => {
                    log::debug!("model {} loaded: {} triangles", path, mesh.triangle_count());
                    Some(mesh)
                }
                Err(e) => {
                    log::warn!("model {} unavailable: {}", source.locate(&path), e);
                    None
                }
            };
            // The scene may have been unmounted already.
            let _ = tx.send(mesh);
        });

        ModelSlot::Loading(rx)
    }

    /// Pick up a finished load. Call once per frame.
    pub fn poll(&mut self) {
        if let ModelSlot::Loading(rx) = self {
            match rx.try_recv() {
                Ok(Some(mesh)) => *self = ModelSlot::Ready(mesh),
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => *self = ModelSlot::Missing,
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match self {
            ModelSlot::Ready(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ModelSlot::Loading(_))
    }
}
