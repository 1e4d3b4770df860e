//! Scroll-triggered reveals.
//!
//! Elements register with a visibility threshold. Each [`ScrollAnimator::observe`]
//! pass compares what is on screen now against the last pass and reports a
//! transition only when an element actually crosses its threshold.

use super::tween::{Easing, Tween};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: f32 = 0.1;
pub const REVEAL_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// Reveal on first entry and stay revealed.
    Once,
    /// Reveal on every entry, hide again on exit.
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<K> {
    Enter(K),
    Exit(K),
}

/// Vertical extent of an element or of the viewport, in content rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub top: u32,
    pub height: u32,
}

impl Span {
    pub fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    fn bottom(self) -> u32 {
        self.top + self.height
    }
}

/// Share of `element` inside `viewport`, 0.0..=1.0.
pub fn visible_ratio(viewport: Span, element: Span) -> f32 {
    if element.height == 0 {
        return 0.0;
    }
    let top = viewport.top.max(element.top);
    let bottom = viewport.bottom().min(element.bottom());
    if bottom <= top {
        return 0.0;
    }
    (bottom - top) as f32 / element.height as f32
}

/// Entrance delay for the `index`-th item of a staggered group.
pub fn stagger_delay(index: usize, base: Duration, step: Duration) -> Duration {
    base + step * index as u32
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    threshold: f32,
    mode: RevealMode,
    visible: bool,
    done: bool,
    reveal: Option<Tween>,
}

#[derive(Debug)]
pub struct ScrollAnimator<K> {
    entries: HashMap<K, Entry>,
}

impl<K> Default for ScrollAnimator<K> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> ScrollAnimator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`. Re-registering keeps the existing state.
    pub fn register(&mut self, key: K, threshold: f32, mode: RevealMode) {
        self.entries.entry(key).or_insert(Entry {
            threshold: threshold.clamp(0.0, 1.0),
            mode,
            visible: false,
            done: false,
            reveal: None,
        });
    }

    /// Keep only the keys for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.entries.retain(|k, _| keep(k));
    }

    /// Compare the current layout against the previous pass. Registered
    /// elements missing from `layout` count as off-screen.
    pub fn observe(&mut self, viewport: Span, layout: &[(K, Span)], now: Instant) -> Vec<Transition<K>> {
        let positions: HashMap<&K, Span> = layout.iter().map(|(k, s)| (k, *s)).collect();
        let mut transitions = Vec::new();

        // Walk in layout order so transitions come out top to bottom.
        let mut keys: Vec<K> = layout.iter().map(|(k, _)| k.clone()).collect();
        keys.extend(self.entries.keys().filter(|k| !positions.contains_key(k)).cloned());

        for key in keys {
            let Some(entry) = self.entries.get_mut(&key) else { continue };
            if entry.done {
                continue;
            }
            let ratio = positions.get(&key).map_or(0.0, |span| visible_ratio(viewport, *span));
            let now_visible = ratio > 0.0 && ratio >= entry.threshold;
            if now_visible == entry.visible {
                continue;
            }
            entry.visible = now_visible;
            if now_visible {
                entry.reveal = Some(Tween::new(now, REVEAL_DURATION, Easing::EaseOutCubic));
                if entry.mode == RevealMode::Once {
                    entry.done = true;
                }
                transitions.push(Transition::Enter(key));
            } else {
                entry.reveal = None;
                transitions.push(Transition::Exit(key));
            }
        }
        transitions
    }

    /// 0.0 hidden, 1.0 fully revealed. Unregistered keys are always shown.
    pub fn reveal_progress(&self, key: &K, now: Instant) -> f32 {
        match self.entries.get(key) {
            None => 1.0,
            Some(entry) => entry.reveal.map_or(0.0, |t| t.progress(now)),
        }
    }
}

/// Whether the header should switch to its condensed style.
pub fn is_scrolled(offset: usize, threshold: usize) -> bool {
    offset > threshold
}
