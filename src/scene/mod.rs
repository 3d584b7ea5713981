//! Per-page 3D scenes: the pointer-chasing mascot on the home page and the
//! spinning globe behind the blog listing.
//!
//! A `SceneContext` is created when a page mounts and dropped when it
//! unmounts. It owns the camera, the actor state, the model (or its pending
//! load) and the RNG; nothing is shared between mounts.

pub mod camera;
pub mod globe;
pub mod mascot;
pub mod model;
pub mod raster;

use glam::{Mat4, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::net::fetch::AssetSource;
use camera::{pointer_to_ndc, Camera};
use globe::AutoSpinner;
use mascot::PointerChaser;
use model::{Mesh, ModelSlot, GLOBE_MODEL, MASCOT_MODEL};
use raster::{rasterize, Lighting, ScreenTriangle};

/// What moves in the scene.
#[derive(Debug, Clone)]
pub enum Actor {
    Mascot(PointerChaser),
    Globe(AutoSpinner),
}

impl Actor {
    fn name(&self) -> &'static str {
        match self {
            Actor::Mascot(_) => "mascot",
            Actor::Globe(_) => "globe",
        }
    }
}

/// Everything a frame needs to paint the scene.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub triangles: Vec<ScreenTriangle>,
    /// Extra vertical offset of the canvas, in logical px.
    pub canvas_offset: f32,
}

pub struct SceneContext {
    actor: Actor,
    camera: Camera,
    lighting: Lighting,
    model: ModelSlot,
    rng: StdRng,
    scroll_y: f32,
    frames: u64,
}

impl SceneContext {
    /// Mount the home page mascot; the duck model loads in the background.
    pub fn mount_mascot(assets: &AssetSource) -> Self {
        Self::mount(Actor::Mascot(PointerChaser::new()), ModelSlot::load(assets, MASCOT_MODEL))
    }

    /// Mount the listing page globe.
    pub fn mount_globe(assets: &AssetSource) -> Self {
        Self::mount(Actor::Globe(AutoSpinner::new()), ModelSlot::load(assets, GLOBE_MODEL))
    }

    /// Mount with an already-decoded mesh and a fixed RNG seed.
    pub fn with_mesh(actor: Actor, mesh: Mesh, seed: u64) -> Self {
        let mut scene = Self::mount(actor, ModelSlot::Ready(mesh));
        scene.rng = StdRng::seed_from_u64(seed);
        scene
    }

    fn mount(actor: Actor, model: ModelSlot) -> Self {
        let lighting = match actor {
            Actor::Mascot(_) => Lighting::mascot(),
            Actor::Globe(_) => Lighting::globe(),
        };
        log::info!("{} scene mounted", actor.name());
        Self {
            actor,
            camera: Camera::new(1.0),
            lighting,
            model,
            rng: StdRng::from_entropy(),
            scroll_y: 0.0,
            frames: 0,
        }
    }

    /// Pointer moved, in pixels relative to the canvas. Last write wins.
    pub fn pointer_moved(&mut self, pointer: Vec2, canvas: Vec2) {
        if let Actor::Mascot(ref mut chaser) = self.actor {
            chaser.aim_at_ndc(pointer_to_ndc(pointer, canvas));
        }
    }

    pub fn scrolled(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    /// Advance one frame and project the model into `origin`/`size`.
    ///
    /// Motion only runs once the model is present; a missing model leaves
    /// an empty frame but the scene stays mounted.
    pub fn frame(&mut self, origin: Vec2, size: Vec2) -> Frame {
        self.frames += 1;
        self.model.poll();
        self.camera.resize(size.x, size.y);

        let canvas_offset = match self.actor {
            Actor::Globe(_) => globe::canvas_offset(self.scroll_y),
            Actor::Mascot(_) => 0.0,
        };

        let Some(mesh) = self.model.mesh() else {
            return Frame {
                triangles: Vec::new(),
                canvas_offset,
            };
        };

        let transform: Mat4 = match self.actor {
            Actor::Mascot(ref mut chaser) => {
                chaser.step(&mut self.rng);
                chaser.transform()
            }
            Actor::Globe(ref mut spinner) => {
                spinner.step(self.scroll_y);
                spinner.transform()
            }
        };

        let origin = origin + Vec2::new(0.0, canvas_offset);
        Frame {
            triangles: rasterize(mesh, transform, &self.camera, &self.lighting, origin, size),
            canvas_offset,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn has_model(&self) -> bool {
        self.model.mesh().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.model.is_loading()
    }

    /// Tear the scene down. Pending loads are abandoned with the receiver.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for SceneContext {
    fn drop(&mut self) {
        log::info!("{} scene unmounted after {} frames", self.actor.name(), self.frames);
    }
}
