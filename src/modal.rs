use crate::effects::tween::{Easing, Tween};
use std::time::{Duration, Instant};

/// Interval between successive "thinking" steps lighting up.
pub const STEP_INTERVAL: Duration = Duration::from_millis(800);

/// The progress bar starts filling shortly after the modal opens.
const PROGRESS_DELAY: Duration = Duration::from_millis(100);

/// Expected generation time; the bar reaches 100% after this.
const PROGRESS_DURATION: Duration = Duration::from_millis(4000);

pub const THINKING_STEPS: [&str; 4] = [
    "Reading the article",
    "Extracting key points",
    "Drafting the tweet",
    "Polishing hashtags",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Tweet generation in progress.
    Progress { opened_at: Instant },
    /// Waiting for the user to confirm removal of a feed.
    ConfirmRemove { url: String },
}

/// Explicit open/close for the console's overlays. At most one modal is
/// shown at a time; opening another replaces it.
#[derive(Debug, Default)]
pub struct ModalController {
    current: Option<Modal>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn open_progress(&mut self, now: Instant) {
        self.current = Some(Modal::Progress { opened_at: now });
    }

    pub fn open_confirm_remove(&mut self, url: impl Into<String>) {
        self.current = Some(Modal::ConfirmRemove { url: url.into() });
    }

    /// Returns the modal that was open, if any.
    pub fn close(&mut self) -> Option<Modal> {
        self.current.take()
    }

    /// Number of thinking steps lit at `now`.
    pub fn active_steps(&self, now: Instant) -> usize {
        match self.current {
            Some(Modal::Progress { opened_at }) => {
                let elapsed = now.saturating_duration_since(opened_at);
                let lit = (elapsed.as_millis() / STEP_INTERVAL.as_millis()) as usize + 1;
                lit.min(THINKING_STEPS.len())
            }
            _ => 0,
        }
    }

    /// Progress bar fill, 0.0..=1.0.
    pub fn progress(&self, now: Instant) -> f32 {
        match self.current {
            Some(Modal::Progress { opened_at }) => Tween::new(opened_at, PROGRESS_DURATION, Easing::Linear)
                .with_delay(PROGRESS_DELAY)
                .progress(now),
            _ => 0.0,
        }
    }
}
