//! The duck that chases the pointer.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::Rng;

/// Fraction of the remaining distance covered each frame.
pub const FOLLOW_FACTOR: f32 = 0.18;
/// Distance under which the mascot counts as arrived.
pub const PROXIMITY: f32 = 0.05;
/// Spin per frame while arrived, in radians.
pub const SPIN_STEP: f32 = 0.08;
/// NDC → scene units.
pub const TARGET_SCALE: Vec2 = Vec2::new(1.5, 1.2);
pub const MASCOT_SCALE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct PointerChaser {
    position: Vec3,
    rotation: Quat,
    target: Vec3,
    spinning: bool,
    spin_axis: Vec3,
}

impl Default for PointerChaser {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerChaser {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            target: Vec3::ZERO,
            spinning: false,
            spin_axis: Vec3::Y,
        }
    }

    /// Aim at a pointer position given in NDC. Last call wins.
    pub fn aim_at_ndc(&mut self, ndc: Vec2) {
        let t = ndc * TARGET_SCALE;
        self.target = Vec3::new(t.x, t.y, 0.0);
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// One frame: close in on the target, spin once arrived.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = self.position.lerp(self.target, FOLLOW_FACTOR);

        if self.position.distance(self.target) < PROXIMITY {
            if !self.spinning {
                self.spinning = true;
                self.spin_axis = random_axis(rng);
            }
            let spin = Quat::from_axis_angle(self.spin_axis, SPIN_STEP);
            self.rotation = (self.rotation * spin).normalize();
        } else {
            self.spinning = false;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(MASCOT_SCALE),
            self.rotation,
            self.position,
        )
    }
}

fn random_axis<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
        .try_normalize()
        .unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pointer_maps_to_scaled_target() {
        let mut m = PointerChaser::new();
        m.aim_at_ndc(Vec2::new(1.0, -1.0));
        assert_eq!(m.target(), Vec3::new(1.5, -1.2, 0.0));
    }

    #[test]
    fn moves_eighteen_percent_per_frame() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = PointerChaser::new();
        m.set_target(Vec3::new(1.0, 0.0, 0.0));
        m.step(&mut rng);
        assert!((m.position().x - 0.18).abs() < 1e-6);
        m.step(&mut rng);
        assert!((m.position().x - (0.18 + 0.82 * 0.18)).abs() < 1e-6);
    }

    #[test]
    fn spins_once_arrived() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut m = PointerChaser::new();
        m.step(&mut rng);
        assert!(m.is_spinning());
        assert!((m.spin_axis().length() - 1.0).abs() < 1e-5);
        let before = m.rotation();
        m.step(&mut rng);
        assert!(before.angle_between(m.rotation()) > 0.07);
    }

    #[test]
    fn axis_changes_only_on_fresh_entry() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut m = PointerChaser::new();
        m.step(&mut rng);
        let first = m.spin_axis();
        for _ in 0..10 {
            m.step(&mut rng);
            assert_eq!(m.spin_axis(), first);
        }

        m.set_target(Vec3::new(1.0, 1.0, 0.0));
        m.step(&mut rng);
        assert!(!m.is_spinning());
        assert_eq!(m.spin_axis(), first);

        for _ in 0..60 {
            m.step(&mut rng);
        }
        assert!(m.is_spinning());
        assert_ne!(m.spin_axis(), first);
    }

    #[test]
    fn transform_carries_the_mascot_scale() {
        let m = PointerChaser::new();
        let (scale, _, _) = m.transform().to_scale_rotation_translation();
        assert!((scale - Vec3::splat(0.7)).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn converges_geometrically(x in -1.0f32..1.0, y in -1.0f32..1.0, frames in 1usize..40) {
            let mut rng = StdRng::seed_from_u64(0);
            let mut m = PointerChaser::new();
            m.aim_at_ndc(Vec2::new(x, y));
            let start = m.position().distance(m.target());
            for _ in 0..frames {
                m.step(&mut rng);
            }
            let expected = start * (1.0 - FOLLOW_FACTOR).powi(frames as i32);
            prop_assert!((m.position().distance(m.target()) - expected).abs() < 1e-4);
        }
    }
}
