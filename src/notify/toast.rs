use std::time::{Duration, Instant};

/// Delay between the start of a toast's fade-out and its removal.
pub const FADE_DELAY: Duration = Duration::from_millis(300);

/// How long a toast stays fully visible unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

impl ToastId {
    fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastKind {
    pub fn icon(self) -> char {
        match self {
            ToastKind::Success => '✓',
            ToastKind::Error => '✕',
            ToastKind::Warning => '⚠',
            ToastKind::Info => 'ℹ',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    /// Fading out; removed once `since + FADE_DELAY` has passed.
    FadingOut { since: Instant },
}

#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    message: String,
    kind: ToastKind,
    created_at: Instant,
    duration: Duration,
    phase: ToastPhase,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind, duration: Duration, now: Instant) -> Self {
        Self {
            id: ToastId::next(),
            message: message.into(),
            kind,
            created_at: now,
            duration,
            phase: ToastPhase::Visible,
        }
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase
    }

    /// Start fading now. Returns false if the toast was already fading.
    pub fn begin_fade(&mut self, now: Instant) -> bool {
        match self.phase {
            ToastPhase::Visible => {
                self.phase = ToastPhase::FadingOut { since: now };
                true
            }
            ToastPhase::FadingOut { .. } => false,
        }
    }

    /// Advance the lifecycle to `now`. Returns false once the toast should
    /// leave the container.
    ///
    /// The scheduled fade starts at `created_at + duration` even when the
    /// tick arrives late, so removal never drifts past `duration + FADE_DELAY`.
    pub fn advance(&mut self, now: Instant) -> bool {
        if let ToastPhase::Visible = self.phase {
            let fade_at = self.created_at + self.duration;
            if now >= fade_at {
                self.phase = ToastPhase::FadingOut { since: fade_at };
            }
        }
        match self.phase {
            ToastPhase::Visible => true,
            ToastPhase::FadingOut { since } => now < since + FADE_DELAY,
        }
    }

    /// 0.0 while fully visible, rising to 1.0 at removal.
    pub fn fade_progress(&self, now: Instant) -> f32 {
        match self.phase {
            ToastPhase::Visible => 0.0,
            ToastPhase::FadingOut { since } => {
                let elapsed = now.saturating_duration_since(since);
                (elapsed.as_secs_f32() / FADE_DELAY.as_secs_f32()).min(1.0)
            }
        }
    }
}
