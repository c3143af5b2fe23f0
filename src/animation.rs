//! Eased scroll animation
//!
//! A [`ScrollAnimator`] moves a [`ScrollSurface`] from its current offset to
//! `current + delta` over a fixed duration. The animation is a small state
//! machine advanced once per frame by [`ScrollAnimator::tick`]; it stays
//! scheduled while progress is below 1 and is dropped once it reaches 1.
//!
//! Starting an animation claims the surface. Any animation holding an older
//! claim, from this animator or another one, stops on its next tick without
//! writing, so the latest request always wins cleanly.

use std::time::{Duration, Instant};

/// Something with a vertical scroll offset measured in nominal pixels
pub trait ScrollSurface {
    fn scroll_offset(&self) -> f64;

    fn set_scroll_offset(&mut self, offset: f64);

    /// Hand out a new claim, invalidating all earlier ones
    fn claim(&mut self) -> u64;

    /// The most recently issued claim
    fn current_claim(&self) -> u64;
}

/// Cubic ease-in-out over normalized progress `p` in `[0, 1]`
pub fn ease_in_out_cubic(p: f64) -> f64 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    /// Still in flight, tick again next frame
    Running,
    /// Reached its target on this tick
    Finished,
    /// Another animation claimed the surface
    Superseded,
    /// Nothing in flight
    Idle,
}

/// One in-flight scroll request
#[derive(Debug, Clone)]
pub struct ScrollAnimation {
    start_offset: f64,
    delta: i64,
    duration: Duration,
    started_at: Instant,
    claim: u64,
}

impl ScrollAnimation {
    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn target(&self) -> f64 {
        self.start_offset + self.delta as f64
    }

    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn offset_at(&self, now: Instant) -> f64 {
        let p = self.progress(now);
        if p >= 1.0 {
            return self.target();
        }
        self.start_offset + self.delta as f64 * ease_in_out_cubic(p)
    }
}

#[derive(Debug)]
pub struct ScrollAnimator {
    name: &'static str,
    active: Option<ScrollAnimation>,
    started: u64,
}

impl ScrollAnimator {
    pub fn new(name: &'static str) -> Self {
        ScrollAnimator {
            name,
            active: None,
            started: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The animation currently in flight, if any
    pub fn active(&self) -> Option<&ScrollAnimation> {
        self.active.as_ref()
    }

    /// Number of animations this animator has started
    pub fn started_count(&self) -> u64 {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Start scrolling `surface` by `delta` pixels over `duration_ms`.
    ///
    /// Without a surface this is a no-op and returns `false`. The start
    /// offset is read from the surface now, so a request that replaces a
    /// running animation continues from wherever that one left off.
    pub fn animate<S: ScrollSurface + ?Sized>(
        &mut self,
        surface: Option<&mut S>,
        delta: i64,
        duration_ms: u64,
        now: Instant,
    ) -> bool {
        let Some(surface) = surface else {
            tracing::trace!("{} animator: no surface, ignoring scroll of {}", self.name, delta);
            return false;
        };

        if self.active.take().is_some() {
            tracing::trace!("{} animator: replacing in-flight animation", self.name);
        }

        let animation = ScrollAnimation {
            start_offset: surface.scroll_offset(),
            delta,
            duration: Duration::from_millis(duration_ms),
            started_at: now,
            claim: surface.claim(),
        };
        tracing::debug!(
            "{} animator: scroll {} px over {} ms from {:.1}",
            self.name,
            delta,
            duration_ms,
            animation.start_offset
        );

        self.started += 1;
        self.active = Some(animation);

        // A zero-length animation lands immediately
        if duration_ms == 0 {
            self.tick(Some(surface), now);
        }
        true
    }

    /// Advance the in-flight animation to `now`
    pub fn tick<S: ScrollSurface + ?Sized>(
        &mut self,
        surface: Option<&mut S>,
        now: Instant,
    ) -> AnimationStatus {
        let Some(animation) = &self.active else {
            return AnimationStatus::Idle;
        };

        let Some(surface) = surface else {
            tracing::trace!("{} animator: surface went away, dropping animation", self.name);
            self.active = None;
            return AnimationStatus::Idle;
        };

        if surface.current_claim() != animation.claim {
            tracing::trace!("{} animator: superseded", self.name);
            self.active = None;
            return AnimationStatus::Superseded;
        }

        surface.set_scroll_offset(animation.offset_at(now));

        if animation.progress(now) < 1.0 {
            AnimationStatus::Running
        } else {
            self.active = None;
            AnimationStatus::Finished
        }
    }

    /// Drop the in-flight animation without touching the surface
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unbounded surface for exercising the animation math
    #[derive(Debug, Default)]
    struct FreeSurface {
        offset: f64,
        claim: u64,
        writes: usize,
    }

    impl ScrollSurface for FreeSurface {
        fn scroll_offset(&self) -> f64 {
            self.offset
        }

        fn set_scroll_offset(&mut self, offset: f64) {
            self.offset = offset;
            self.writes += 1;
        }

        fn claim(&mut self) -> u64 {
            self.claim += 1;
            self.claim
        }

        fn current_claim(&self) -> u64 {
            self.claim
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_easing_boundaries() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn test_easing_piecewise() {
        for i in 0..50 {
            let p = i as f64 / 100.0;
            assert!((ease_in_out_cubic(p) - 4.0 * p.powi(3)).abs() < 1e-12);
        }
        for i in 50..=100 {
            let p = i as f64 / 100.0;
            let expected = 1.0 - (2.0 - 2.0 * p).powi(3) / 2.0;
            assert!((ease_in_out_cubic(p) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=1000 {
            let eased = ease_in_out_cubic(i as f64 / 1000.0);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn test_converges_exactly_at_duration() {
        for (start, delta, duration) in [(0.0, 50, 300), (123.4, -77, 10), (9.0, 1_000_003, 999)] {
            let t0 = Instant::now();
            let mut surface = FreeSurface {
                offset: start,
                ..Default::default()
            };
            let mut animator = ScrollAnimator::new("test");
            assert!(animator.animate(Some(&mut surface), delta, duration, t0));

            let status = animator.tick(Some(&mut surface), t0 + ms(duration));
            assert_eq!(status, AnimationStatus::Finished);
            assert_eq!(surface.offset, start + delta as f64);
            assert!(!animator.is_running());
        }
    }

    #[test]
    fn test_intermediate_offsets_follow_curve() {
        let t0 = Instant::now();
        let mut surface = FreeSurface::default();
        let mut animator = ScrollAnimator::new("test");
        animator.animate(Some(&mut surface), 100, 400, t0);

        assert_eq!(animator.tick(Some(&mut surface), t0 + ms(100)), AnimationStatus::Running);
        assert!((surface.offset - 100.0 * ease_in_out_cubic(0.25)).abs() < 1e-9);

        animator.tick(Some(&mut surface), t0 + ms(200));
        assert!((surface.offset - 50.0).abs() < 1e-9);

        // Late frames overshoot in time but never in space
        assert_eq!(animator.tick(Some(&mut surface), t0 + ms(5_000)), AnimationStatus::Finished);
        assert_eq!(surface.offset, 100.0);
        assert_eq!(animator.tick(Some(&mut surface), t0 + ms(6_000)), AnimationStatus::Idle);
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut animator = ScrollAnimator::new("test");
        assert!(!animator.animate::<FreeSurface>(None, 50, 300, Instant::now()));
        assert!(!animator.is_running());
        assert_eq!(animator.started_count(), 0);
    }

    #[test]
    fn test_surface_unmounted_mid_flight() {
        let t0 = Instant::now();
        let mut surface = FreeSurface::default();
        let mut animator = ScrollAnimator::new("test");
        animator.animate(Some(&mut surface), 50, 300, t0);
        assert_eq!(animator.tick::<FreeSurface>(None, t0 + ms(16)), AnimationStatus::Idle);
        assert!(!animator.is_running());
    }

    #[test]
    fn test_new_request_replaces_in_flight_one() {
        let t0 = Instant::now();
        let mut surface = FreeSurface::default();
        let mut animator = ScrollAnimator::new("test");
        animator.animate(Some(&mut surface), 100, 200, t0);
        animator.tick(Some(&mut surface), t0 + ms(100));
        let midway = surface.offset;

        animator.animate(Some(&mut surface), -20, 200, t0 + ms(100));
        assert_eq!(animator.active().unwrap().start_offset(), midway);

        animator.tick(Some(&mut surface), t0 + ms(300));
        assert_eq!(surface.offset, midway - 20.0);
    }

    #[test]
    fn test_other_animator_supersedes_without_writing() {
        let t0 = Instant::now();
        let mut surface = FreeSurface::default();
        let mut coarse = ScrollAnimator::new("coarse");
        let mut fine = ScrollAnimator::new("fine");

        coarse.animate(Some(&mut surface), 500, 300, t0);
        coarse.tick(Some(&mut surface), t0 + ms(50));
        fine.animate(Some(&mut surface), 10, 100, t0 + ms(60));

        let writes_before = surface.writes;
        assert_eq!(coarse.tick(Some(&mut surface), t0 + ms(70)), AnimationStatus::Superseded);
        assert_eq!(surface.writes, writes_before);
        assert!(!coarse.is_running());

        fine.tick(Some(&mut surface), t0 + ms(160));
        assert!(!fine.is_running());
    }

    #[test]
    fn test_zero_duration_lands_immediately() {
        let mut surface = FreeSurface::default();
        let mut animator = ScrollAnimator::new("test");
        animator.animate(Some(&mut surface), 42, 0, Instant::now());
        assert_eq!(surface.offset, 42.0);
        assert!(!animator.is_running());
    }
}
