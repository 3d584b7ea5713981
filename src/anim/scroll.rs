//! Scroll-triggered section entrances.
//!
//! Each tracked section owns a small state machine (`Hidden → Entering →
//! Revealed`), a heading reveal and two scrubbed tweens whose progress follows
//! the scroll position rather than the clock.

use std::time::Duration;

use super::reveal::CharacterReveal;
use super::{Ease, Lerp};

/// Fraction of the viewport height at which a section starts entering.
pub const SECTION_START: f32 = 0.85;
/// Fraction the section's bottom edge must reach for the entrance to finish.
pub const SECTION_END: f32 = 0.5;
pub const SECTION_SCRUB: Duration = Duration::from_millis(400);

pub const IMAGE_START: f32 = 0.95;
pub const IMAGE_END: f32 = 0.5;
pub const IMAGE_SCRUB: Duration = Duration::from_millis(700);

/// Opacity, vertical offset (logical px) and scale applied to a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Pose {
    pub const REST: Pose = Pose {
        opacity: 1.0,
        offset_y: 0.0,
        scale: 1.0,
    };
}

impl Lerp for Pose {
    fn lerp(self, to: Self, t: f32) -> Self {
        Pose {
            opacity: self.opacity.lerp(to.opacity, t),
            offset_y: self.offset_y.lerp(to.offset_y, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// A tween whose progress is tied to where an element sits in the viewport.
#[derive(Debug, Clone)]
pub struct ScrubbedTween {
    from: Pose,
    to: Pose,
    ease: Ease,
    start: f32,
    end: f32,
    smoothing: f32,
    target: f32,
    progress: f32,
}

impl ScrubbedTween {
    pub fn new(
        from: Pose,
        to: Pose,
        ease: Ease,
        start: f32,
        end: f32,
        smoothing: Duration,
    ) -> Self {
        Self {
            from,
            to,
            ease,
            start,
            end,
            smoothing: smoothing.as_secs_f32(),
            target: 0.0,
            progress: 0.0,
        }
    }

    /// Section entrance: fade in, rise 60px, grow from 98%.
    pub fn section() -> Self {
        Self::new(
            Pose {
                opacity: 0.0,
                offset_y: 60.0,
                scale: 0.98,
            },
            Pose::REST,
            Ease::POWER2_OUT,
            SECTION_START,
            SECTION_END,
            SECTION_SCRUB,
        )
    }

    /// Section image: fade in, rise 80px, grow from 85% to 112%.
    pub fn image() -> Self {
        Self::new(
            Pose {
                opacity: 0.0,
                offset_y: 80.0,
                scale: 0.85,
            },
            Pose {
                opacity: 1.0,
                offset_y: 0.0,
                scale: 1.12,
            },
            Ease::POWER4_OUT,
            IMAGE_START,
            IMAGE_END,
            IMAGE_SCRUB,
        )
    }

    /// Recompute the target progress. The tween starts when the element's
    /// top edge reaches the start line and ends when its bottom edge reaches
    /// the end line. `top` is relative to the top of the viewport.
    pub fn observe(&mut self, top: f32, height: f32, viewport_height: f32) {
        let start = self.start * viewport_height;
        let end_top = self.end * viewport_height - height.max(0.0);
        let span = start - end_top;
        self.target = if span <= f32::EPSILON {
            if top <= end_top { 1.0 } else { 0.0 }
        } else {
            ((start - top) / span).clamp(0.0, 1.0)
        };
    }

    /// Ease the displayed progress toward the target.
    pub fn advance(&mut self, dt: Duration) {
        let gap = self.target - self.progress;
        if gap.abs() < 1e-3 || self.smoothing <= 0.0 {
            self.progress = self.target;
            return;
        }
        let k = (dt.as_secs_f32() / self.smoothing).min(1.0);
        self.progress += gap * k;
    }

    pub fn is_settled(&self) -> bool {
        self.progress == self.target
    }

    pub fn pose(&self) -> Pose {
        self.from.lerp(self.to, self.ease.apply(self.progress))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPhase {
    Hidden,
    Entering,
    Revealed,
}

#[derive(Debug, Clone)]
struct TrackedSection {
    heading: String,
    top: f32,
    height: f32,
    /// Image top and height, when laid out separately from the section.
    image: Option<(f32, f32)>,
    phase: SectionPhase,
    /// Cleared once the section has entered; set again when it is back
    /// below the start line.
    armed: bool,
    reveal: Option<CharacterReveal>,
    entrance: ScrubbedTween,
    image_tween: ScrubbedTween,
}

/// Drives every section of a page from scroll offsets and frame times.
#[derive(Debug, Clone)]
pub struct ScrollAnimationController {
    sections: Vec<TrackedSection>,
    viewport_height: f32,
    last_scroll: Option<f32>,
    reveals_started: u64,
}

impl ScrollAnimationController {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            sections: Vec::new(),
            viewport_height,
            last_scroll: None,
            reveals_started: 0,
        }
    }

    /// Start tracking a section whose top edge sits `top` px into the page.
    pub fn track(&mut self, heading: impl Into<String>, top: f32) -> usize {
        self.sections.push(TrackedSection {
            heading: heading.into(),
            top,
            height: 0.0,
            image: None,
            phase: SectionPhase::Hidden,
            armed: true,
            reveal: None,
            entrance: ScrubbedTween::section(),
            image_tween: ScrubbedTween::image(),
        });
        self.sections.len() - 1
    }

    /// Layout moves between frames; bounds are refreshed after each paint.
    pub fn set_section_bounds(&mut self, index: usize, top: f32, height: f32) {
        if let Some(s) = self.sections.get_mut(index) {
            s.top = top;
            s.height = height;
        }
    }

    pub fn set_image_bounds(&mut self, index: usize, top: f32, height: f32) {
        if let Some(s) = self.sections.get_mut(index) {
            s.image = Some((top, height));
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }

    /// Feed the current scroll offset. Returns the sections that entered.
    pub fn on_scroll(&mut self, scroll_y: f32) -> Vec<usize> {
        let downward = self.last_scroll.map_or(true, |last| scroll_y >= last);
        self.last_scroll = Some(scroll_y);
        let line = SECTION_START * self.viewport_height;

        let mut entered = Vec::new();
        for (i, s) in self.sections.iter_mut().enumerate() {
            let rel_top = s.top - scroll_y;
            let inside = rel_top <= line;
            if !inside {
                s.armed = true;
            } else if s.armed && downward {
                s.armed = false;
                s.phase = SectionPhase::Entering;
                // Replacing the reveal drops the old timer.
                s.reveal = Some(CharacterReveal::new(s.heading.clone()));
                self.reveals_started += 1;
                entered.push(i);
            }

            s.entrance.observe(rel_top, s.height, self.viewport_height);
            let (image_top, image_height) = s.image.unwrap_or((s.top, s.height));
            s.image_tween
                .observe(image_top - scroll_y, image_height, self.viewport_height);
        }
        if !entered.is_empty() {
            log::debug!("sections entered at scroll {}: {:?}", scroll_y, entered);
        }
        entered
    }

    /// Advance reveal timers and scrub smoothing.
    pub fn tick(&mut self, dt: Duration) {
        for s in &mut self.sections {
            if let Some(reveal) = s.reveal.as_mut() {
                reveal.tick(dt);
                if reveal.is_complete() && s.phase == SectionPhase::Entering {
                    s.phase = SectionPhase::Revealed;
                }
            }
            s.entrance.advance(dt);
            s.image_tween.advance(dt);
        }
    }

    pub fn phase(&self, index: usize) -> Option<SectionPhase> {
        self.sections.get(index).map(|s| s.phase)
    }

    /// Visible part of the section heading. Empty until the section enters.
    pub fn heading_text(&self, index: usize) -> &str {
        self.sections
            .get(index)
            .and_then(|s| s.reveal.as_ref())
            .map_or("", CharacterReveal::visible)
    }

    pub fn section_pose(&self, index: usize) -> Pose {
        self.sections.get(index).map_or(Pose::REST, |s| s.entrance.pose())
    }

    pub fn image_pose(&self, index: usize) -> Pose {
        self.sections.get(index).map_or(Pose::REST, |s| s.image_tween.pose())
    }

    /// Total reveals started since creation.
    pub fn reveals_started(&self) -> u64 {
        self.reveals_started
    }

    /// True while anything still needs frames.
    pub fn is_animating(&self) -> bool {
        self.sections.iter().any(|s| {
            s.phase == SectionPhase::Entering
                || !s.entrance.is_settled()
                || !s.image_tween.is_settled()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::reveal::REVEAL_INTERVAL;

    const VH: f32 = 1000.0;

    fn controller() -> ScrollAnimationController {
        let mut c = ScrollAnimationController::new(VH);
        c.track("About Me", 1200.0);
        c
    }

    #[test]
    fn section_below_the_band_stays_hidden() {
        let mut c = controller();
        assert!(c.on_scroll(0.0).is_empty());
        assert_eq!(c.phase(0), Some(SectionPhase::Hidden));
        assert_eq!(c.heading_text(0), "");
    }

    #[test]
    fn crossing_the_start_line_downward_enters() {
        let mut c = controller();
        c.on_scroll(0.0);
        // top at 1200 - 400 = 800px, above the 850px line
        assert_eq!(c.on_scroll(400.0), vec![0]);
        assert_eq!(c.phase(0), Some(SectionPhase::Entering));
        assert_eq!(c.heading_text(0), "");
        c.tick(REVEAL_INTERVAL);
        assert_eq!(c.heading_text(0), "A");
    }

    #[test]
    fn section_already_in_band_enters_on_first_frame() {
        let mut c = ScrollAnimationController::new(VH);
        c.track("Hi. I'm Ethan", 100.0);
        assert_eq!(c.on_scroll(0.0), vec![0]);
    }

    #[test]
    fn reveal_completes_into_revealed() {
        let mut c = controller();
        c.on_scroll(400.0);
        for _ in 0.."About Me".chars().count() {
            c.tick(REVEAL_INTERVAL);
        }
        assert_eq!(c.heading_text(0), "About Me");
        assert_eq!(c.phase(0), Some(SectionPhase::Revealed));
    }

    #[test]
    fn further_scrolling_inside_the_band_does_not_restart() {
        let mut c = controller();
        c.on_scroll(400.0);
        c.tick(REVEAL_INTERVAL * 3);
        assert!(c.on_scroll(600.0).is_empty());
        assert_eq!(c.heading_text(0), "Abo");
        assert_eq!(c.reveals_started(), 1);
    }

    #[test]
    fn scrolling_back_does_not_rehide() {
        let mut c = controller();
        c.on_scroll(400.0);
        c.tick(REVEAL_INTERVAL * 20);
        c.on_scroll(0.0);
        assert_eq!(c.phase(0), Some(SectionPhase::Revealed));
        assert_eq!(c.heading_text(0), "About Me");
    }

    #[test]
    fn reentry_replaces_the_running_reveal() {
        let mut c = controller();
        c.on_scroll(400.0);
        c.tick(REVEAL_INTERVAL * 5);
        assert_eq!(c.heading_text(0), "About");

        c.on_scroll(0.0);
        assert_eq!(c.on_scroll(400.0), vec![0]);
        assert_eq!(c.heading_text(0), "");
        c.tick(REVEAL_INTERVAL);
        // one timer: exactly one character, not two racing prefixes
        assert_eq!(c.heading_text(0), "A");
        assert_eq!(c.reveals_started(), 2);
    }

    #[test]
    fn entrance_tween_follows_scroll_position() {
        let mut c = controller();
        c.on_scroll(0.0);
        c.tick(Duration::from_secs(5));
        let hidden = c.section_pose(0);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.offset_y, 60.0);

        // top at 1200 - 700 = 500px: the 50% end line
        c.on_scroll(700.0);
        c.tick(Duration::from_secs(5));
        let shown = c.section_pose(0);
        assert!((shown.opacity - 1.0).abs() < 1e-3);
        assert!(shown.offset_y.abs() < 1e-2);
        assert!((shown.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn scrub_smoothing_lags_behind_the_scroll() {
        let mut c = controller();
        c.on_scroll(700.0);
        c.tick(Duration::from_millis(100));
        let pose = c.section_pose(0);
        assert!(pose.opacity > 0.0 && pose.opacity < 1.0);
        assert!(c.is_animating());
    }

    #[test]
    fn image_tween_uses_its_own_band() {
        let mut c = controller();
        c.set_image_bounds(0, 1500.0, 0.0);
        // image top at 1500 - 600 = 900px: just inside the 95% band
        c.on_scroll(600.0);
        c.tick(Duration::from_secs(5));
        assert!(c.image_pose(0).opacity > 0.0);

        c.on_scroll(1000.0);
        c.tick(Duration::from_secs(5));
        assert!((c.image_pose(0).scale - 1.12).abs() < 1e-3);
    }

    #[test]
    fn tall_sections_finish_when_their_bottom_reaches_mid_screen() {
        let mut c = controller();
        c.set_section_bounds(0, 1200.0, 400.0);
        // top at 500px, bottom at 900px: past the start, not yet at the end
        c.on_scroll(700.0);
        c.tick(Duration::from_secs(5));
        let mid = c.section_pose(0);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);

        // bottom at 500px
        c.on_scroll(1100.0);
        c.tick(Duration::from_secs(5));
        assert!((c.section_pose(0).opacity - 1.0).abs() < 1e-3);
    }

    #[test]
    fn unknown_index_is_harmless() {
        let c = controller();
        assert_eq!(c.phase(7), None);
        assert_eq!(c.heading_text(7), "");
        assert_eq!(c.section_pose(7), Pose::REST);
    }
}
