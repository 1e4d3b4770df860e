// End-to-end button flows against an in-memory backend.

use async_trait::async_trait;
use curator_console::action::{
    Action, ActionDispatcher, ActionTimings, ButtonId, FollowUp, Refresh, SettingsForm,
};
use curator_console::api::types::{
    Ack, Article, FetchArticlesRequest, FetchArticlesResponse, PostTweetResponse,
    SaveSettingsRequest, TweetDraft,
};
use curator_console::api::Backend;
use curator_console::error::ActionError;
use curator_console::notify::{Notifier, ToastKind};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Default)]
struct MockBackend {
    calls: Mutex<Vec<String>>,
    saved: Mutex<Option<SaveSettingsRequest>>,
    fail: Option<ActionError>,
}

impl MockBackend {
    fn failing(err: ActionError) -> Self {
        Self { fail: Some(err), ..Self::default() }
    }

    fn record(&self, call: &str) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(call.to_string());
        match &self.fail {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn draft(text: &str) -> TweetDraft {
    TweetDraft { content: text.into(), full_tweet: text.into(), char_count: text.chars().count() as u32 }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_articles(&self, req: &FetchArticlesRequest) -> Result<FetchArticlesResponse, ActionError> {
        self.record("fetch-articles")?;
        let articles = req
            .sources
            .iter()
            .map(|s| Article {
                title: format!("From {}", s),
                link: format!("{}/1", s),
                summary: String::new(),
                published: String::new(),
                source: s.clone(),
                is_posted: false,
            })
            .collect::<Vec<_>>();
        Ok(FetchArticlesResponse { count: articles.len() as u32, articles })
    }

    async fn generate_tweet(&self, _article_url: &str) -> Result<TweetDraft, ActionError> {
        self.record("generate-tweet")?;
        Ok(draft("generated"))
    }

    async fn regenerate_tweet(&self, _temperature: f64, _tone: &str) -> Result<TweetDraft, ActionError> {
        self.record("regenerate-tweet")?;
        Ok(draft("regenerated"))
    }

    async fn post_tweet(&self, _tweet: &str) -> Result<PostTweetResponse, ActionError> {
        self.record("post-tweet")?;
        Ok(PostTweetResponse { tweet_id: "1".into(), url: "https://x.test/status/1".into() })
    }

    async fn save_settings(&self, req: &SaveSettingsRequest) -> Result<Ack, ActionError> {
        self.record("save-settings")?;
        *self.saved.lock().unwrap() = Some(req.clone());
        Ok(Ack::default())
    }

    async fn add_feed(&self, _url: &str) -> Result<Ack, ActionError> {
        self.record("add-feed")?;
        Ok(Ack::default())
    }

    async fn remove_feed(&self, _url: &str) -> Result<Ack, ActionError> {
        self.record("remove-feed")?;
        Ok(Ack::default())
    }
}

fn dispatcher() -> (ActionDispatcher, Notifier) {
    let notifier = Notifier::default();
    (ActionDispatcher::new(notifier.clone(), ActionTimings::default()), notifier)
}

#[tokio::test]
async fn fetch_with_no_sources_makes_no_request() {
    let backend = MockBackend::default();
    let (mut d, notifier) = dispatcher();

    let done = d
        .dispatch(&backend, ButtonId::FetchArticles, Action::FetchArticles { sources: vec![], limit: 30 })
        .await;

    assert!(done.is_none());
    assert!(backend.calls().is_empty());
    let toasts = notifier.snapshot(Instant::now());
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Warning);
    assert_eq!(toasts[0].message, "Please select at least one source");
    assert!(!d.button(&ButtonId::FetchArticles).is_disabled());
}

#[tokio::test]
async fn fetch_success_reloads_after_delay() {
    let backend = MockBackend::default();
    let (mut d, notifier) = dispatcher();
    let sources = vec!["https://a.test".to_string(), "https://b.test".to_string()];

    let call = d
        .begin(ButtonId::FetchArticles, Action::FetchArticles { sources, limit: 30 })
        .unwrap();
    assert!(d.button(&ButtonId::FetchArticles).is_disabled());
    assert_eq!(d.button(&ButtonId::FetchArticles).label(), "⏳ Fetching...");

    let t0 = Instant::now();
    let result = call.action.execute(&backend).await;
    d.finish(call, result, t0);

    assert_eq!(notifier.snapshot(t0)[0].message, "Fetched 2 articles! Reloading...");
    assert!(d.due(t0 + Duration::from_millis(999)).is_empty());
    let follow = d.due(t0 + Duration::from_millis(1000));
    assert!(matches!(&follow[..], [FollowUp::Reload(Refresh::Articles(list))] if list.len() == 2));
    assert_eq!(d.button(&ButtonId::FetchArticles).label(), "🔄 Fetch Latest Articles");
}

#[tokio::test]
async fn save_settings_sends_form_and_reverts_label() {
    let backend = MockBackend::default();
    let (mut d, notifier) = dispatcher();
    let mut form = SettingsForm::with_topics(&["AI".to_string(), "Security".to_string()]);
    form.temperature_pct = 70;
    form.max_hashtags = 2;
    form.toggle_topic(1);

    let call = d.begin(ButtonId::SaveSettings, Action::SaveSettings(form.to_request())).unwrap();
    let t0 = Instant::now();
    let result = call.action.execute(&backend).await;
    d.finish(call, result, t0);

    let saved = backend.saved.lock().unwrap().clone().unwrap();
    assert!((saved.ai_settings.temperature - 0.7).abs() < 1e-9);
    assert_eq!(saved.tweet_style.max_hashtags, 2);
    assert_eq!(saved.topic_preferences, ["Security"]);

    assert_eq!(notifier.snapshot(t0)[0].message, "All settings saved and applied successfully!");
    assert_eq!(d.button(&ButtonId::SaveSettings).label(), "✓ Saved!");
    assert!(!d.button(&ButtonId::SaveSettings).is_disabled());

    d.due(t0 + Duration::from_millis(1999));
    assert_eq!(d.button(&ButtonId::SaveSettings).label(), "✓ Saved!");
    d.due(t0 + Duration::from_millis(2000));
    assert_eq!(d.button(&ButtonId::SaveSettings).label(), "💾 Save All Settings");
}

#[tokio::test]
async fn malformed_feed_url_is_rejected_locally() {
    let backend = MockBackend::default();
    let (mut d, notifier) = dispatcher();

    let done = d
        .dispatch(&backend, ButtonId::SaveFeed, Action::AddFeed { url: "ftp://bad".into() })
        .await;

    assert!(done.is_none());
    assert!(backend.calls().is_empty());
    let toasts = notifier.snapshot(Instant::now());
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("valid URL"));
}

#[tokio::test]
async fn transport_failure_restores_button_with_one_error() {
    let backend = MockBackend::failing(ActionError::Transport("connection refused".into()));
    let (mut d, notifier) = dispatcher();
    let id = ButtonId::GenerateTweet("https://n.test/1".into());

    let done = d
        .dispatch(&backend, id.clone(), Action::GenerateTweet { article_url: "https://n.test/1".into() })
        .await
        .unwrap();

    assert!(done.result.is_err());
    assert_eq!(backend.calls(), ["generate-tweet"]);
    let button = d.button(&id);
    assert!(!button.is_disabled());
    assert_eq!(button.label(), "✨ Generate Tweet");
    let toasts = notifier.snapshot(Instant::now());
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "Network error: connection refused");
    assert!(!d.has_deferred());
}

#[tokio::test]
async fn server_error_message_reaches_the_toast() {
    let backend = MockBackend::failing(ActionError::Server { status: 400, message: Some("Invalid feed".into()) });
    let (mut d, notifier) = dispatcher();

    d.dispatch(&backend, ButtonId::SaveFeed, Action::AddFeed { url: "https://ok.test/rss".into() })
        .await
        .unwrap();

    let toasts = notifier.snapshot(Instant::now());
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Error: Invalid feed");
    assert_eq!(d.button(&ButtonId::SaveFeed).label(), "Save Feed");
}

#[tokio::test]
async fn suggested_feed_conflict_is_a_warning() {
    let backend = MockBackend::failing(ActionError::Server { status: 400, message: None });
    let (mut d, notifier) = dispatcher();
    let url = "https://dup.test/rss".to_string();

    d.dispatch(&backend, ButtonId::AddSuggestedFeed(url.clone()), Action::AddSuggestedFeed { url })
        .await
        .unwrap();

    let toasts = notifier.snapshot(Instant::now());
    assert_eq!(toasts[0].kind, ToastKind::Warning);
    assert_eq!(toasts[0].message, "Feed already exists");
}

#[tokio::test]
async fn removed_feed_button_stays_disabled_until_reload() {
    let backend = MockBackend::default();
    let (mut d, notifier) = dispatcher();
    let url = "https://a.test/rss".to_string();
    let id = ButtonId::RemoveFeed(url.clone());

    let call = d.begin(id.clone(), Action::RemoveFeed { url: url.clone() }).unwrap();
    let t0 = Instant::now();
    let result = call.action.execute(&backend).await;
    d.finish(call, result, t0);

    assert_eq!(notifier.snapshot(t0)[0].message, "Feed removed! Reloading...");
    assert!(d.button(&id).is_disabled());
    assert!(d.begin(id.clone(), Action::RemoveFeed { url: url.clone() }).is_none());
    assert!(d.due(t0 + Duration::from_millis(999)).is_empty());

    let follow = d.due(t0 + Duration::from_millis(1000));
    assert_eq!(follow, [FollowUp::Reload(Refresh::FeedRemoved(url))]);
    assert!(!d.button(&id).is_disabled());
    assert_eq!(backend.calls(), ["remove-feed"]);
}

#[tokio::test]
async fn added_suggested_feed_button_stays_disabled_until_reload() {
    let backend = MockBackend::default();
    let (mut d, _notifier) = dispatcher();
    let url = "https://c.test/rss".to_string();
    let id = ButtonId::AddSuggestedFeed(url.clone());

    let call = d.begin(id.clone(), Action::AddSuggestedFeed { url: url.clone() }).unwrap();
    let t0 = Instant::now();
    let result = call.action.execute(&backend).await;
    d.finish(call, result, t0);

    assert!(d.begin(id.clone(), Action::AddSuggestedFeed { url: url.clone() }).is_none());
    d.due(t0 + Duration::from_millis(1000));
    assert!(!d.button(&id).is_disabled());
    assert_eq!(d.button(&id).label(), "Add");
}

#[tokio::test]
async fn second_click_while_pending_is_ignored() {
    let (mut d, _notifier) = dispatcher();
    let action = Action::PostTweet { tweet: "hello".into() };

    assert!(d.begin(ButtonId::PostTweet, action.clone()).is_some());
    assert!(d.begin(ButtonId::PostTweet, action).is_none());
    assert_eq!(d.in_flight(), 1);
}

#[tokio::test]
async fn regenerate_shows_draft_immediately_and_keeps_confirmation() {
    let backend = MockBackend::default();
    let (mut d, _notifier) = dispatcher();

    let call = d
        .begin(ButtonId::RegenerateTweet, Action::RegenerateTweet { temperature: 0.9, tone: "default".into() })
        .unwrap();
    let t0 = Instant::now();
    let result = call.action.execute(&backend).await;
    d.finish(call, result, t0);

    assert_eq!(d.due(t0), [FollowUp::ShowDraft(draft("regenerated"))]);
    assert_eq!(d.button(&ButtonId::RegenerateTweet).label(), "✓ Regenerated!");
    d.due(t0 + Duration::from_millis(2000));
    assert_eq!(d.button(&ButtonId::RegenerateTweet).label(), "🔁 Regenerate");
}

#[test]
fn toasts_raised_close_together_expire_independently() {
    let notifier = Notifier::default();
    let t0 = Instant::now();
    let duration = Duration::from_millis(3000);
    notifier.notify_at("first", ToastKind::Success, duration, t0);
    notifier.notify_at("second", ToastKind::Error, duration, t0 + Duration::from_millis(50));

    let shown = notifier.snapshot(t0 + Duration::from_millis(60));
    assert_eq!(shown.iter().map(|t| t.message.as_str()).collect::<Vec<_>>(), ["first", "second"]);

    notifier.tick(t0 + Duration::from_millis(3000));
    notifier.tick(t0 + Duration::from_millis(3300));
    let shown = notifier.snapshot(t0 + Duration::from_millis(3300));
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, "second");

    notifier.tick(t0 + Duration::from_millis(3350));
    assert!(notifier.is_empty());
}
