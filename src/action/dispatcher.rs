use super::button::{Button, ButtonId};
use super::deferred::Schedule;
use super::forms::validate_feed_url;
use crate::api::types::{Article, FetchArticlesRequest, PostTweetResponse, SaveSettingsRequest, TweetDraft};
use crate::api::Backend;
use crate::error::ActionError;
use crate::notify::{Notifier, ToastKind};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A network call a button can trigger, with the payload built from the
/// current form or selection state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchArticles { sources: Vec<String>, limit: u32 },
    GenerateTweet { article_url: String },
    RegenerateTweet { temperature: f64, tone: String },
    PostTweet { tweet: String },
    SaveSettings(SaveSettingsRequest),
    AddFeed { url: String },
    AddSuggestedFeed { url: String },
    RemoveFeed { url: String },
}

impl Action {
    /// Client-side preconditions. Returns the action with normalized input.
    pub fn validated(self) -> Result<Self, ActionError> {
        match self {
            Action::FetchArticles { sources, .. } if sources.is_empty() => Err(ActionError::Validation(
                "Please select at least one source".into(),
            )),
            Action::GenerateTweet { article_url } if article_url.trim().is_empty() => {
                Err(ActionError::Validation("This article has no link".into()))
            }
            Action::PostTweet { tweet } if tweet.trim().is_empty() => {
                Err(ActionError::Validation("Tweet is empty".into()))
            }
            Action::AddFeed { url } => Ok(Action::AddFeed { url: validate_feed_url(&url)? }),
            Action::AddSuggestedFeed { url } => Ok(Action::AddSuggestedFeed { url: validate_feed_url(&url)? }),
            Action::RemoveFeed { url } => Ok(Action::RemoveFeed { url: validate_feed_url(&url)? }),
            other => Ok(other),
        }
    }

    /// Single attempt against the backend.
    pub async fn execute(&self, backend: &dyn Backend) -> Result<Reply, ActionError> {
        match self {
            Action::FetchArticles { sources, limit } => {
                let req = FetchArticlesRequest { sources: sources.clone(), limit: *limit };
                let resp = backend.fetch_articles(&req).await?;
                Ok(Reply::Articles { count: resp.count, articles: resp.articles })
            }
            Action::GenerateTweet { article_url } => backend.generate_tweet(article_url).await.map(Reply::Draft),
            Action::RegenerateTweet { temperature, tone } => {
                backend.regenerate_tweet(*temperature, tone).await.map(Reply::Draft)
            }
            Action::PostTweet { tweet } => backend.post_tweet(tweet).await.map(Reply::Posted),
            Action::SaveSettings(req) => backend.save_settings(req).await.map(|_| Reply::Ack),
            Action::AddFeed { url } | Action::AddSuggestedFeed { url } => {
                backend.add_feed(url).await.map(|_| Reply::Ack)
            }
            Action::RemoveFeed { url } => backend.remove_feed(url).await.map(|_| Reply::Ack),
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self {
            Action::FetchArticles { .. } => "Failed to fetch",
            Action::GenerateTweet { .. } => "Failed to generate tweet",
            Action::RegenerateTweet { .. } => "Failed to regenerate tweet",
            Action::PostTweet { .. } => "Failed to post tweet",
            Action::SaveSettings(_) => "Failed to save settings",
            Action::AddFeed { .. } => "Failed to add feed",
            Action::AddSuggestedFeed { .. } => "Feed already exists",
            Action::RemoveFeed { .. } => "Failed to remove",
        }
    }
}

/// Successful backend reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Articles { count: u32, articles: Vec<Article> },
    Draft(TweetDraft),
    Posted(PostTweetResponse),
    Ack,
}

/// Work left for the page after a successful action, applied when due.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    /// Re-render the page with server-side changes applied.
    Reload(Refresh),
    /// Switch to the draft page showing this tweet.
    ShowDraft(TweetDraft),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    Articles(Vec<Article>),
    FeedAdded(String),
    FeedRemoved(String),
}

#[derive(Debug)]
enum Deferred {
    /// Put the button back to idle.
    Revert(ButtonId),
    /// Reset the button and hand the follow-up to the page.
    Page(ButtonId, FollowUp),
    /// Hand the follow-up to the page, leaving the button alone.
    Notice(FollowUp),
}

/// A click that passed validation and is waiting on the network.
#[derive(Debug, Clone)]
pub struct PendingCall {
    pub id: ButtonId,
    pub action: Action,
}

/// How a finished call ended, for page-specific side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub id: ButtonId,
    pub action: Action,
    pub result: Result<(), ActionError>,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionTimings {
    /// Delay before a reload or navigation after success.
    pub reload_delay: Duration,
    /// How long a confirmation label stays up before reverting.
    pub confirm_delay: Duration,
}

impl Default for ActionTimings {
    fn default() -> Self {
        Self {
            reload_delay: Duration::from_millis(1000),
            confirm_delay: Duration::from_millis(2000),
        }
    }
}

/// Owns every button's state and turns clicks into requests, toasts and
/// follow-ups.
pub struct ActionDispatcher {
    buttons: HashMap<ButtonId, Button>,
    notifier: Notifier,
    timings: ActionTimings,
    deferred: Schedule<Deferred>,
}

impl ActionDispatcher {
    pub fn new(notifier: Notifier, timings: ActionTimings) -> Self {
        Self {
            buttons: HashMap::new(),
            notifier,
            timings,
            deferred: Schedule::new(),
        }
    }

    /// Current state of a button; untouched buttons report idle.
    pub fn button(&self, id: &ButtonId) -> Button {
        self.buttons.get(id).cloned().unwrap_or_else(|| Button::new(id.clone()))
    }

    pub fn button_mut(&mut self, id: &ButtonId) -> &mut Button {
        self.buttons.entry(id.clone()).or_insert_with(|| Button::new(id.clone()))
    }

    pub fn in_flight(&self) -> usize {
        self.buttons.values().filter(|b| b.state() == super::ButtonState::Pending).count()
    }

    /// Click on `id`. Returns the call to run, or `None` when the button is
    /// disabled or a precondition failed (one warning toast, state unchanged).
    pub fn begin(&mut self, id: ButtonId, action: Action) -> Option<PendingCall> {
        if self.button(&id).is_disabled() {
            tracing::debug!(?id, "click ignored: button disabled");
            return None;
        }
        let action = match action.validated() {
            Ok(a) => a,
            Err(e) => {
                self.notifier.warning(e.to_string());
                return None;
            }
        };
        if !self.button_mut(&id).begin() {
            return None;
        }
        tracing::info!(?id, "action started");
        Some(PendingCall { id, action })
    }

    /// Apply the result of a call started by [`begin`](Self::begin).
    pub fn finish(&mut self, call: PendingCall, result: Result<Reply, ActionError>, now: Instant) -> Completion {
        let PendingCall { id, action } = call;
        let outcome = match result {
            Ok(reply) => {
                self.on_success(&id, &action, reply, now);
                Ok(())
            }
            Err(e) => {
                self.on_failure(&id, &action, &e);
                Err(e)
            }
        };
        Completion { id, action, result: outcome }
    }

    /// Run a click end to end: validate, request, feedback.
    pub async fn dispatch(&mut self, backend: &dyn Backend, id: ButtonId, action: Action) -> Option<Completion> {
        let call = self.begin(id, action)?;
        let result = call.action.execute(backend).await;
        Some(self.finish(call, result, Instant::now()))
    }

    /// Release follow-ups due at `now`. Label reverts are handled here; the
    /// rest is returned for the page to apply.
    pub fn due(&mut self, now: Instant) -> Vec<FollowUp> {
        let mut out = Vec::new();
        for item in self.deferred.drain_due(now) {
            match item {
                Deferred::Revert(id) => self.button_mut(&id).reset(),
                Deferred::Page(id, follow_up) => {
                    self.button_mut(&id).reset();
                    out.push(follow_up);
                }
                Deferred::Notice(follow_up) => out.push(follow_up),
            }
        }
        out
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    fn on_success(&mut self, id: &ButtonId, action: &Action, reply: Reply, now: Instant) {
        let reload_at = now + self.timings.reload_delay;
        let revert_at = now + self.timings.confirm_delay;
        tracing::info!(?id, "action succeeded");

        match (action, reply) {
            (Action::FetchArticles { .. }, Reply::Articles { count, articles }) => {
                self.notifier.success(format!("Fetched {} articles! Reloading...", count));
                self.button_mut(id).succeed(None);
                self.deferred
                    .push(reload_at, Deferred::Page(id.clone(), FollowUp::Reload(Refresh::Articles(articles))));
            }
            (Action::GenerateTweet { .. }, Reply::Draft(draft)) => {
                self.notifier.success("Tweet generated! Redirecting to draft...");
                self.button_mut(id).succeed(None);
                self.deferred.push(reload_at, Deferred::Page(id.clone(), FollowUp::ShowDraft(draft)));
            }
            (Action::RegenerateTweet { .. }, Reply::Draft(draft)) => {
                self.notifier.success("Tweet regenerated!");
                self.button_mut(id).succeed(Some("✓ Regenerated!"));
                self.deferred.push(now, Deferred::Notice(FollowUp::ShowDraft(draft)));
                self.deferred.push(revert_at, Deferred::Revert(id.clone()));
            }
            (Action::PostTweet { .. }, Reply::Posted(posted)) => {
                let msg = if posted.url.is_empty() {
                    "Tweet posted!".to_string()
                } else {
                    format!("Tweet posted! {}", posted.url)
                };
                self.notifier.success(msg);
                self.button_mut(id).succeed(Some("✓ Posted!"));
                self.deferred.push(revert_at, Deferred::Revert(id.clone()));
            }
            (Action::SaveSettings(_), _) => {
                self.notifier.success("All settings saved and applied successfully!");
                self.button_mut(id).succeed(Some("✓ Saved!"));
                self.deferred.push(revert_at, Deferred::Revert(id.clone()));
            }
            (Action::AddFeed { url }, _) => {
                self.notifier.success("RSS feed added! Reloading...");
                self.button_mut(id).succeed(None);
                self.deferred
                    .push(reload_at, Deferred::Page(id.clone(), FollowUp::Reload(Refresh::FeedAdded(url.clone()))));
            }
            (Action::AddSuggestedFeed { url }, _) => {
                self.notifier.success("Feed added! Reloading...");
                self.button_mut(id).succeed_pending_reload();
                self.deferred
                    .push(reload_at, Deferred::Page(id.clone(), FollowUp::Reload(Refresh::FeedAdded(url.clone()))));
            }
            (Action::RemoveFeed { url }, _) => {
                self.notifier.success("Feed removed! Reloading...");
                self.button_mut(id).succeed_pending_reload();
                self.deferred
                    .push(reload_at, Deferred::Page(id.clone(), FollowUp::Reload(Refresh::FeedRemoved(url.clone()))));
            }
            (action, reply) => {
                // A reply of the wrong shape means the request/reply pairing in
                // `Action::execute` is broken; surface it like a bad body.
                tracing::error!(?action, ?reply, "unexpected reply for action");
                self.on_failure(id, action, &ActionError::Decode("unexpected reply".into()));
            }
        }
    }

    fn on_failure(&mut self, id: &ButtonId, action: &Action, err: &ActionError) {
        tracing::warn!(?id, error = %err, "action failed");
        let fallback = action.failure_fallback();
        let (kind, message) = match (action, err) {
            (Action::AddSuggestedFeed { .. }, ActionError::Server { message, .. }) => {
                (ToastKind::Warning, message.clone().unwrap_or_else(|| fallback.to_string()))
            }
            _ => (ToastKind::Error, err.user_message(fallback)),
        };
        self.notifier.notify(message, kind);

        let button = self.button_mut(id);
        button.fail();
        button.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ButtonState;

    fn dispatcher() -> (ActionDispatcher, Notifier) {
        let notifier = Notifier::default();
        (ActionDispatcher::new(notifier.clone(), ActionTimings::default()), notifier)
    }

    #[test]
    fn empty_source_selection_never_starts() {
        let (mut d, notifier) = dispatcher();
        let call = d.begin(ButtonId::FetchArticles, Action::FetchArticles { sources: vec![], limit: 30 });
        assert!(call.is_none());
        assert_eq!(notifier.len(), 1);
        let toast = &notifier.snapshot(Instant::now())[0];
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(d.button(&ButtonId::FetchArticles).state(), ButtonState::Idle);
        assert!(!d.button(&ButtonId::FetchArticles).is_disabled());
    }

    #[test]
    fn pending_button_rejects_second_click_silently() {
        let (mut d, notifier) = dispatcher();
        let action = Action::FetchArticles { sources: vec!["https://a.test/rss".into()], limit: 30 };
        assert!(d.begin(ButtonId::FetchArticles, action.clone()).is_some());
        assert!(d.begin(ButtonId::FetchArticles, action).is_none());
        assert!(notifier.is_empty());
        assert_eq!(d.in_flight(), 1);
    }

    #[test]
    fn save_settings_confirmation_reverts_after_delay() {
        let (mut d, notifier) = dispatcher();
        let form = crate::action::SettingsForm::default();
        let call = d.begin(ButtonId::SaveSettings, Action::SaveSettings(form.to_request())).unwrap();
        let t0 = Instant::now();
        let done = d.finish(call, Ok(Reply::Ack), t0);
        assert!(done.result.is_ok());
        assert_eq!(d.button(&ButtonId::SaveSettings).label(), "✓ Saved!");
        assert_eq!(notifier.snapshot(t0)[0].kind, ToastKind::Success);

        assert!(d.due(t0 + Duration::from_millis(1999)).is_empty());
        assert_eq!(d.button(&ButtonId::SaveSettings).label(), "✓ Saved!");
        assert!(d.due(t0 + Duration::from_millis(2000)).is_empty());
        assert_eq!(d.button(&ButtonId::SaveSettings).label(), "💾 Save All Settings");
    }

    #[test]
    fn server_failure_restores_button_and_shows_one_error() {
        let (mut d, notifier) = dispatcher();
        let id = ButtonId::RemoveFeed("https://a.test/rss".into());
        let call = d.begin(id.clone(), Action::RemoveFeed { url: "https://a.test/rss".into() }).unwrap();
        let err = ActionError::Server { status: 404, message: Some("Feed not found".into()) };
        let done = d.finish(call, Err(err), Instant::now());
        assert!(done.result.is_err());

        let btn = d.button(&id);
        assert_eq!(btn.state(), ButtonState::Idle);
        assert_eq!(btn.label(), "🗑️ Remove");
        assert!(!btn.is_disabled());
        let toasts = notifier.snapshot(Instant::now());
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "Error: Feed not found");
        assert_eq!(toasts[0].kind, ToastKind::Error);
    }

    #[test]
    fn suggested_feed_conflict_is_a_warning() {
        let (mut d, notifier) = dispatcher();
        let url = "https://b.test/feed".to_string();
        let id = ButtonId::AddSuggestedFeed(url.clone());
        let call = d.begin(id, Action::AddSuggestedFeed { url }).unwrap();
        d.finish(call, Err(ActionError::Server { status: 400, message: None }), Instant::now());
        let toast = &notifier.snapshot(Instant::now())[0];
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.message, "Feed already exists");
    }

    #[test]
    fn fetch_success_reloads_with_articles_after_delay() {
        let (mut d, _) = dispatcher();
        let call = d
            .begin(ButtonId::FetchArticles, Action::FetchArticles { sources: vec!["s".into()], limit: 30 })
            .unwrap();
        let t0 = Instant::now();
        d.finish(call, Ok(Reply::Articles { count: 0, articles: vec![] }), t0);
        assert!(d.due(t0 + Duration::from_millis(999)).is_empty());
        let follow = d.due(t0 + Duration::from_millis(1000));
        assert_eq!(follow, [FollowUp::Reload(Refresh::Articles(vec![]))]);
        assert!(!d.has_deferred());
    }
}
