//! Tweening primitives shared by the scroll and hover effects.
//!
//! - `Ease`: the power-curve family (`power1` … `power4`, in/out/inOut)
//! - `Tween`: one value moving from A to B over a duration
//! - `Timeline`: an ordered list of steps played back to back
//! - `Motion`: a value that can be re-targeted mid-flight ("tween to")

pub mod hover;
pub mod reveal;
pub mod scroll;

use std::time::Duration;

/// Easing curve. `Out(2)` is the `power2.out` curve (cubic), and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    In(u8),
    Out(u8),
    InOut(u8),
}

impl Ease {
    pub const POWER1_IN_OUT: Ease = Ease::InOut(1);
    pub const POWER2_IN_OUT: Ease = Ease::InOut(2);
    pub const POWER2_OUT: Ease = Ease::Out(2);
    pub const POWER3_OUT: Ease = Ease::Out(3);
    pub const POWER4_OUT: Ease = Ease::Out(4);

    /// Map linear progress `t` ∈ [0, 1] onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::In(p) => t.powi(p as i32 + 1),
            Ease::Out(p) => 1.0 - (1.0 - t).powi(p as i32 + 1),
            Ease::InOut(p) => {
                let e = p as i32 + 1;
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(e)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - t)).powi(e)
                }
            }
        }
    }
}

/// Values that can be blended.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// A single from→to interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub duration: f32,
    pub ease: Ease,
    elapsed: f32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.as_secs_f32(),
            ease,
            elapsed: 0.0,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.ease.apply(self.progress()))
    }

    /// Advance by `dt` seconds; returns the time left over past the end.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let remaining = (self.duration - self.elapsed).max(0.0);
        self.elapsed += dt;
        (dt - remaining).max(0.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One step of a `Timeline`: tween to `to` over `duration` with `ease`.
#[derive(Debug, Clone, Copy)]
pub struct Step<T: Lerp> {
    pub to: T,
    pub duration: Duration,
    pub ease: Ease,
}

impl<T: Lerp> Step<T> {
    pub fn new(to: T, duration: Duration, ease: Ease) -> Self {
        Self { to, duration, ease }
    }
}

/// Steps played in order; each starts where the previous one ended.
#[derive(Debug, Clone)]
pub struct Timeline<T: Lerp> {
    steps: Vec<Step<T>>,
    index: usize,
    current: Option<Tween<T>>,
    value: T,
}

impl<T: Lerp> Timeline<T> {
    pub fn new(start: T, steps: Vec<Step<T>>) -> Self {
        let current = steps.first().map(|s| Tween::new(start, s.to, s.duration, s.ease));
        Self {
            steps,
            index: 0,
            current,
            value: start,
        }
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Index of the step currently playing (equals the step count once done).
    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    pub fn advance(&mut self, dt: Duration) -> T {
        let mut left = dt.as_secs_f32();
        while let Some(ref mut tween) = self.current {
            left = tween.advance(left);
            self.value = tween.value();
            if !tween.is_done() {
                break;
            }
            self.value = tween.to;
            self.index += 1;
            self.current = self
                .steps
                .get(self.index)
                .map(|s| Tween::new(self.value, s.to, s.duration, s.ease));
            if left <= 0.0 {
                break;
            }
        }
        self.value
    }
}

/// A value that animates toward whatever it was last told to.
/// Starting a new motion replaces the one in flight, from the current value.
#[derive(Debug, Clone)]
pub struct Motion<T: Lerp> {
    value: T,
    active: Option<Timeline<T>>,
}

impl<T: Lerp> Motion<T> {
    pub fn new(value: T) -> Self {
        Self { value, active: None }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_moving(&self) -> bool {
        self.active.is_some()
    }

    /// Tween from the current value to `to`.
    pub fn to(&mut self, to: T, duration: Duration, ease: Ease) {
        self.play(vec![Step::new(to, duration, ease)]);
    }

    /// Play `steps` in order, starting from the current value.
    pub fn play(&mut self, steps: Vec<Step<T>>) {
        self.active = Some(Timeline::new(self.value, steps));
    }

    pub fn advance(&mut self, dt: Duration) -> T {
        if let Some(ref mut timeline) = self.active {
            self.value = timeline.advance(dt);
            if timeline.is_done() {
                self.active = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn eases_hit_their_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::POWER1_IN_OUT,
            Ease::POWER2_OUT,
            Ease::POWER3_OUT,
            Ease::POWER4_OUT,
            Ease::In(2),
        ] {
            assert!(ease.apply(0.0).abs() < 1e-6, "{:?}", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", ease);
        }
    }

    #[test]
    fn out_curves_lead_linear_progress() {
        assert!(Ease::POWER2_OUT.apply(0.3) > 0.3);
        assert!(Ease::POWER4_OUT.apply(0.3) > Ease::POWER2_OUT.apply(0.3));
        assert!((Ease::POWER2_IN_OUT.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tween_reports_overflow() {
        let mut t = Tween::new(0.0f32, 10.0, ms(100), Ease::Linear);
        assert_eq!(t.advance(0.05), 0.0);
        assert!((t.value() - 5.0).abs() < 1e-4);
        let left = t.advance(0.08);
        assert!((left - 0.03).abs() < 1e-4);
        assert!(t.is_done());
        assert_eq!(t.value(), 10.0);
    }

    #[test]
    fn timeline_runs_steps_in_order() {
        let mut tl = Timeline::new(
            0.0f32,
            vec![
                Step::new(-25.0, ms(80), Ease::POWER1_IN_OUT),
                Step::new(50.0, ms(80), Ease::POWER1_IN_OUT),
                Step::new(0.0, ms(120), Ease::POWER2_IN_OUT),
            ],
        );
        tl.advance(ms(80));
        assert_eq!(tl.step_index(), 1);
        assert!((tl.value() + 25.0).abs() < 1e-3);
        tl.advance(ms(80));
        assert_eq!(tl.step_index(), 2);
        assert!((tl.value() - 50.0).abs() < 1e-3);
        tl.advance(ms(120));
        assert!(tl.is_done());
        assert_eq!(tl.value(), 0.0);
    }

    #[test]
    fn timeline_carries_leftover_time_into_next_step() {
        let mut tl = Timeline::new(
            0.0f32,
            vec![Step::new(1.0, ms(100), Ease::Linear), Step::new(3.0, ms(100), Ease::Linear)],
        );
        tl.advance(ms(150));
        assert_eq!(tl.step_index(), 1);
        assert!((tl.value() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn motion_retargets_from_current_value() {
        let mut m = Motion::new(0.0f32);
        m.to(10.0, ms(100), Ease::Linear);
        m.advance(ms(50));
        m.to(0.0, ms(100), Ease::Linear);
        assert!((m.value() - 5.0).abs() < 1e-3);
        m.advance(ms(50));
        assert!((m.value() - 2.5).abs() < 1e-3);
        m.advance(ms(50));
        assert!(!m.is_moving());
        assert_eq!(m.value(), 0.0);
    }
}
