use super::tween::{Easing, Tween};
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const RIPPLE_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RippleStyle {
    /// Buttons and chips: expands to 4x.
    Button,
    /// Navigation tabs: expands to 2x.
    NavLink,
}

impl RippleStyle {
    fn max_scale(self) -> f32 {
        match self {
            RippleStyle::Button => 4.0,
            RippleStyle::NavLink => 2.0,
        }
    }
}

/// Expanding circle anchored at the click position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub origin: (u16, u16),
    pub diameter: u16,
    style: RippleStyle,
    tween: Tween,
}

impl Ripple {
    pub fn radius(&self, now: Instant) -> f32 {
        f32::from(self.diameter) / 2.0 * self.style.max_scale() * self.tween.progress(now)
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        1.0 - self.tween.raw(now)
    }

    /// Whether cell `(x, y)` lies inside the ripple. Terminal cells are about
    /// twice as tall as wide, so rows count double.
    pub fn covers(&self, x: u16, y: u16, now: Instant) -> bool {
        let dx = f32::from(x) - f32::from(self.origin.0);
        let dy = (f32::from(y) - f32::from(self.origin.1)) * 2.0;
        let r = self.radius(now);
        dx * dx + dy * dy <= r * r
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.tween.is_finished(now)
    }
}

/// At most one live ripple per control.
#[derive(Debug)]
pub struct RippleEngine<K> {
    ripples: HashMap<K, Ripple>,
}

impl<K> Default for RippleEngine<K> {
    fn default() -> Self {
        Self { ripples: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> RippleEngine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a ripple on `key` for a click at `pointer`. Replaces any ripple
    /// already running on the same control. Clicks outside `area` are ignored.
    pub fn trigger(&mut self, key: K, area: Rect, pointer: (u16, u16), style: RippleStyle, now: Instant) -> bool {
        let (x, y) = pointer;
        if !area.contains(ratatui::layout::Position { x, y }) {
            return false;
        }
        let ripple = Ripple {
            origin: pointer,
            diameter: area.width.max(area.height),
            style,
            tween: Tween::new(now, RIPPLE_DURATION, Easing::EaseOut),
        };
        self.ripples.insert(key, ripple);
        true
    }

    pub fn get(&self, key: &K) -> Option<&Ripple> {
        self.ripples.get(key)
    }

    pub fn prune(&mut self, now: Instant) {
        self.ripples.retain(|_, r| !r.is_finished(now));
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }
}
