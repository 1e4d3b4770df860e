//! Click → request → feedback pipeline for every actionable button.
//!
//! Each button runs `Idle → Pending → (Success | Error) → Idle`. The disabled
//! flag set on `Pending` is the only thing preventing a second request from
//! the same button; different buttons never wait on each other.

mod button;
mod deferred;
mod dispatcher;
pub mod forms;

pub use button::{Button, ButtonId, ButtonState};
pub use deferred::Schedule;
pub use dispatcher::{
    Action, ActionDispatcher, ActionTimings, Completion, FollowUp, PendingCall, Refresh, Reply,
};
pub use forms::{SettingsField, SettingsForm};
