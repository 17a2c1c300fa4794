use std::time::{Duration, Instant};

use squaregrid_core::ScrollConfig;

use super::easing::EasingTypeExt;

/// Duration helpers for [`ScrollConfig`]
pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Frame interval while an animation is running
    fn animation_tick_duration(&self) -> Duration;

    /// Smooth scrolling is on and has a non-zero duration
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
}

/// Moves the grid viewport towards a target offset.
///
/// `scroll_to` starts an eased animation (or jumps when smooth scrolling is off);
/// `update` is called once per frame and returns the offset to draw at.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: u16,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Offset the viewport is drawn at right now
    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current
    }

    /// Offset the viewport will settle at
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, offset: u16) {
        self.animation = None;
        self.current = offset;
    }

    /// Animate towards `target`, clamped to `max_scroll`
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);

        if !self.config.is_smooth() || target == self.current {
            self.set_scroll(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: Instant::now(),
            from: self.current,
            to: target,
        });
    }

    /// Move by `delta` lines immediately (mouse wheel)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        let offset = (self.target_scroll() as i32 + delta).clamp(0, max_scroll as i32);
        self.set_scroll(offset as u16);
    }

    /// Advance the animation and return the current offset
    pub fn update(&mut self, max_scroll: u16) -> u16 {
        self.update_at(Instant::now(), max_scroll)
    }

    pub(crate) fn update_at(&mut self, now: Instant, max_scroll: u16) -> u16 {
        if let Some(anim) = &self.animation {
            let duration = self.config.animation_duration();
            let elapsed = now.saturating_duration_since(anim.start);

            if elapsed >= duration {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                let eased = self.config.easing.apply(t);
                let from = anim.from as f64;
                self.current = (from + (anim.to as f64 - from) * eased).round() as u16;
            }
        }

        // Content may have shrunk since the animation started
        self.current = self.current.min(max_scroll);
        self.current
    }
}
