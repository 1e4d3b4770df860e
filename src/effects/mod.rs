//! Pointer and scroll driven visual feedback: ripples, hover lift and
//! scroll-triggered reveals. Everything here is driven by explicit `Instant`s
//! so the renderer and the tests see the same timeline.

pub mod hover;
pub mod ripple;
pub mod scroll;
pub mod tween;

pub use hover::{HoverEvent, HoverTracker};
pub use ripple::{Ripple, RippleEngine, RippleStyle};
pub use scroll::{RevealMode, ScrollAnimator, Span, Transition};
pub use tween::{Easing, Tween};
