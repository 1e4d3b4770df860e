use super::toast::{Toast, ToastId, ToastKind, ToastPhase, DEFAULT_DURATION};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// What the renderer needs to draw one toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub fading: bool,
    pub fade_progress: f32,
}

#[derive(Debug, Default)]
struct ToastContainer {
    /// Insertion order, newest last.
    toasts: Vec<Toast>,
}

/// Shared toast service. Clones refer to the same container, so any
/// component holding a handle can raise a toast.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Mutex<ToastContainer>>,
    default_duration: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl Notifier {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToastContainer::default())),
            default_duration,
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Show `message` for the default duration.
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) -> Option<ToastId> {
        self.notify_for(message, kind, self.default_duration)
    }

    pub fn notify_for(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> Option<ToastId> {
        self.notify_at(message, kind, duration, Instant::now())
    }

    /// Append a toast created at `now`. Returns `None` only when the
    /// container is unusable, in which case nothing is shown.
    pub fn notify_at(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Duration,
        now: Instant,
    ) -> Option<ToastId> {
        let toast = Toast::new(message, kind, duration, now);
        match kind {
            ToastKind::Error => tracing::error!(message = toast.message(), "toast"),
            ToastKind::Warning => tracing::warn!(message = toast.message(), "toast"),
            ToastKind::Success | ToastKind::Info => {
                tracing::debug!(kind = kind.as_str(), message = toast.message(), "toast")
            }
        }
        let id = toast.id();
        self.with_container(|c| c.toasts.push(toast))?;
        Some(id)
    }

    pub fn success(&self, message: impl Into<String>) -> Option<ToastId> {
        self.notify(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Option<ToastId> {
        self.notify(message, ToastKind::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> Option<ToastId> {
        self.notify(message, ToastKind::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> Option<ToastId> {
        self.notify(message, ToastKind::Info)
    }

    /// Click-to-dismiss: start the fade at `now`. Returns true if a visible
    /// toast with this id existed.
    pub fn dismiss_at(&self, id: ToastId, now: Instant) -> bool {
        self.with_container(|c| {
            c.toasts
                .iter_mut()
                .find(|t| t.id() == id)
                .is_some_and(|t| t.begin_fade(now))
        })
        .unwrap_or(false)
    }

    /// Advance every toast to `now` and drop the finished ones. Returns how
    /// many were removed.
    pub fn tick(&self, now: Instant) -> usize {
        self.with_container(|c| {
            let before = c.toasts.len();
            c.toasts.retain_mut(|t| t.advance(now));
            before - c.toasts.len()
        })
        .unwrap_or(0)
    }

    pub fn snapshot(&self, now: Instant) -> Vec<ToastView> {
        self.with_container(|c| {
            c.toasts
                .iter()
                .map(|t| ToastView {
                    id: t.id(),
                    message: t.message().to_string(),
                    kind: t.kind(),
                    fading: matches!(t.phase(), ToastPhase::FadingOut { .. }),
                    fade_progress: t.fade_progress(now),
                })
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.with_container(|c| c.toasts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_container<R>(&self, f: impl FnOnce(&mut ToastContainer) -> R) -> Option<R> {
        match self.inner.lock() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(_) => {
                tracing::debug!("toast container poisoned, dropping request");
                None
            }
        }
    }
}
