//! The spinning earth behind the blog listing.

use std::f32::consts::TAU;

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Base rotation per frame around y, in radians.
pub const BASE_SPIN: f32 = 0.005;
/// Extra rotation per frame for every 100px scrolled.
pub const SCROLL_SPIN: f32 = 0.01;
/// Amplitude of the nod around x, in radians.
pub const WOBBLE: f32 = 0.1;
pub const GLOBE_SCALE: f32 = 1.2;

#[derive(Debug, Clone, Default)]
pub struct AutoSpinner {
    rotation_x: f32,
    rotation_y: f32,
}

impl AutoSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame spin increment for a scroll offset.
    pub fn spin_speed(scroll_y: f32) -> f32 {
        BASE_SPIN + SCROLL_SPIN * (scroll_y / 100.0)
    }

    /// One frame. The x nod completes one cycle per revolution.
    /// The y angle is kept in `[0, TAU)` so long sessions keep their precision.
    pub fn step(&mut self, scroll_y: f32) {
        self.rotation_y = (self.rotation_y + Self::spin_speed(scroll_y)).rem_euclid(TAU);
        self.rotation_x = WOBBLE * self.rotation_y.sin();
    }

    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation_x, self.rotation_y, 0.0);
        Mat4::from_scale_rotation_translation(Vec3::splat(GLOBE_SCALE), rotation, Vec3::ZERO)
    }
}

/// Vertical offset of the globe canvas: it scrolls at half speed.
pub fn canvas_offset(scroll_y: f32) -> f32 {
    scroll_y / 2.0
}
