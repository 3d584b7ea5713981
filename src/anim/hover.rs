//! Pointer hover effects: 3D image tilt and the blog button shake.

use std::time::Duration;

use super::{Ease, Lerp, Motion, Step};

/// Maximum tilt in degrees at the image edge.
pub const TILT_DEGREES: f32 = 24.0;
/// Scale while hovered, relative to the scrolled-in size of 1.12.
pub const HOVER_SCALE: f32 = 1.18;
pub const REST_SCALE: f32 = 1.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltPose {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub scale: f32,
}

impl TiltPose {
    pub const REST: TiltPose = TiltPose {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        scale: REST_SCALE,
    };

    /// Multiplier to apply on top of the scroll tween's scale.
    pub fn scale_boost(&self) -> f32 {
        self.scale / REST_SCALE
    }
}

impl Lerp for TiltPose {
    fn lerp(self, to: Self, t: f32) -> Self {
        TiltPose {
            rotate_x_deg: self.rotate_x_deg.lerp(to.rotate_x_deg, t),
            rotate_y_deg: self.rotate_y_deg.lerp(to.rotate_y_deg, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// Pointer position inside `[min, min + size]` mapped to [-1, 1] per axis.
pub fn normalized_offset(min: [f32; 2], size: [f32; 2], pointer: [f32; 2]) -> [f32; 2] {
    let axis = |i: usize| {
        if size[i] <= 0.0 {
            0.0
        } else {
            (((pointer[i] - min[i]) / size[i]) * 2.0 - 1.0).clamp(-1.0, 1.0)
        }
    };
    [axis(0), axis(1)]
}

#[derive(Debug, Clone)]
pub struct ImageTilt {
    motion: Motion<TiltPose>,
    hovered: bool,
}

impl Default for ImageTilt {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageTilt {
    pub fn new() -> Self {
        Self {
            motion: Motion::new(TiltPose::REST),
            hovered: false,
        }
    }

    /// Pointer moved over the image; `offset` comes from `normalized_offset`.
    pub fn pointer_at(&mut self, offset: [f32; 2]) {
        self.hovered = true;
        let target = TiltPose {
            rotate_x_deg: -offset[1] * TILT_DEGREES,
            rotate_y_deg: offset[0] * TILT_DEGREES,
            scale: HOVER_SCALE,
        };
        self.motion.to(target, Duration::from_millis(300), Ease::POWER3_OUT);
    }

    pub fn pointer_left(&mut self) {
        if !self.hovered {
            return;
        }
        self.hovered = false;
        self.motion.to(TiltPose::REST, Duration::from_millis(500), Ease::POWER2_OUT);
    }

    pub fn advance(&mut self, dt: Duration) -> TiltPose {
        self.motion.advance(dt)
    }

    pub fn pose(&self) -> TiltPose {
        self.motion.value()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }
}

/// Vertical shake played when the pointer enters the blog button.
#[derive(Debug, Clone)]
pub struct ButtonShake {
    motion: Motion<f32>,
    hovered: bool,
}

impl Default for ButtonShake {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonShake {
    pub fn new() -> Self {
        Self {
            motion: Motion::new(0.0),
            hovered: false,
        }
    }

    fn shake_steps() -> Vec<Step<f32>> {
        vec![
            Step::new(-25.0, Duration::from_millis(80), Ease::POWER1_IN_OUT),
            Step::new(50.0, Duration::from_millis(80), Ease::POWER1_IN_OUT),
            Step::new(0.0, Duration::from_millis(120), Ease::POWER2_IN_OUT),
        ]
    }

    /// Feed this frame's hover state; edges start or replace the motion.
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        if hovered {
            self.motion.play(Self::shake_steps());
        } else {
            self.motion.to(0.0, Duration::from_millis(120), Ease::POWER2_IN_OUT);
        }
    }

    /// Vertical offset in logical px.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.motion.advance(dt)
    }

    pub fn offset(&self) -> f32 {
        self.motion.value()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }
}
