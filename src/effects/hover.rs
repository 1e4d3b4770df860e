use super::tween::{Easing, Tween};
use ratatui::layout::{Position, Rect};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const LIFT_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent<K> {
    Enter(K),
    Leave(K),
}

#[derive(Debug, Clone, Copy)]
struct Lift {
    rising: bool,
    tween: Tween,
}

/// Tracks which card is under the pointer and animates its lift.
#[derive(Debug)]
pub struct HoverTracker<K> {
    hovered: Option<K>,
    lifts: HashMap<K, Lift>,
}

impl<K> Default for HoverTracker<K> {
    fn default() -> Self {
        Self { hovered: None, lifts: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> HoverTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&K> {
        self.hovered.as_ref()
    }

    /// Pointer moved to `pointer`; `regions` are the hoverable cards in draw
    /// order. Emits a leave before an enter when moving between cards.
    pub fn update(&mut self, pointer: (u16, u16), regions: &[(K, Rect)], now: Instant) -> Vec<HoverEvent<K>> {
        let pos = Position { x: pointer.0, y: pointer.1 };
        let target = regions
            .iter()
            .rev()
            .find(|(_, area)| area.contains(pos))
            .map(|(k, _)| k.clone());

        if target == self.hovered {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(old) = self.hovered.take() {
            self.start_lift(old.clone(), false, now);
            events.push(HoverEvent::Leave(old));
        }
        if let Some(new) = target {
            self.start_lift(new.clone(), true, now);
            events.push(HoverEvent::Enter(new.clone()));
            self.hovered = Some(new);
        }
        events
    }

    /// 0.0 at rest, 1.0 fully lifted.
    pub fn lift(&self, key: &K, now: Instant) -> f32 {
        match self.lifts.get(key) {
            Some(l) if l.rising => l.tween.progress(now),
            Some(l) => 1.0 - l.tween.progress(now),
            None => 0.0,
        }
    }

    pub fn prune(&mut self, now: Instant) {
        self.lifts.retain(|_, l| l.rising || !l.tween.is_finished(now));
    }

    fn start_lift(&mut self, key: K, rising: bool, now: Instant) {
        self.lifts.insert(key, Lift { rising, tween: Tween::new(now, LIFT_DURATION, Easing::EaseOut) });
    }
}

/// Card tilt in degrees `(rotate_x, rotate_y)` for a pointer over `area`.
pub fn tilt(area: Rect, pointer: (u16, u16)) -> (f32, f32) {
    let x = f32::from(pointer.0) - f32::from(area.x);
    let y = f32::from(pointer.1) - f32::from(area.y);
    let cx = f32::from(area.width) / 2.0;
    let cy = f32::from(area.height) / 2.0;
    ((y - cy) / 20.0, (cx - x) / 20.0)
}
