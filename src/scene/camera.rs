use glam::{Mat4, Vec2, Vec3, Vec4};

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 3.0;

/// Perspective camera on the +z axis looking at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y_degrees: FOV_Y_DEGREES,
            near: NEAR,
            far: FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            aspect: sane_aspect(aspect),
        }
    }

    /// Follow the canvas size; degenerate sizes keep the last good aspect.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World point → normalised device coordinates. `None` when the point is
    /// behind the near plane.
    pub fn project(&self, view_projection: &Mat4, point: Vec3) -> Option<Vec3> {
        let clip = *view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= self.near {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

fn sane_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Pointer position in a viewport → NDC (x right, y up, both in [-1, 1]).
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(pointer.x / viewport.x * 2.0 - 1.0, -(pointer.y / viewport.y) * 2.0 + 1.0)
}

/// NDC → pixel position inside a viewport whose top-left corner is `origin`.
pub fn ndc_to_screen(ndc: Vec2, origin: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        origin.x + (ndc.x + 1.0) * 0.5 * viewport.x,
        origin.y + (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}
