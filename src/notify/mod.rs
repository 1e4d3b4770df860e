//! Transient on-screen notifications.
//!
//! Toasts are appended to a single shared container in call order and each
//! one runs its own lifecycle: visible for its duration, then a short fade,
//! then removal. A click starts the fade early. There is no cap and no
//! queue; every toast prunes itself independently on [`Notifier::tick`].

mod notifier;
mod toast;

pub use notifier::{Notifier, ToastView};
pub use toast::{Toast, ToastId, ToastKind, ToastPhase, DEFAULT_DURATION, FADE_DELAY};
