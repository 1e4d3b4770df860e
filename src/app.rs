//! The console's controller: builds every component once and routes
//! terminal input, timer ticks and finished requests to them.

use crate::action::{
    Action, ActionDispatcher, ActionTimings, ButtonId, Completion, FollowUp, PendingCall, Refresh,
    Reply, SettingsField, SettingsForm,
};
use crate::api::types::{Article, TweetDraft};
use crate::articles::{self, SourceSelection, Topic};
use crate::config::Config;
use crate::effects::scroll::{self, Span};
use crate::effects::{Easing, HoverTracker, RevealMode, RippleEngine, RippleStyle, ScrollAnimator, Tween};
use crate::error::ActionError;
use crate::modal::{Modal, ModalController};
use crate::notify::Notifier;
use crate::theme::{LocalStore, ThemeManager};
use crate::tui::state::{ArticlesFocus, HitMap, HitTarget, Page, SettingsRow, CARD_HEIGHT};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Base delay and per-card step of the article entrance stagger.
const STAGGER_BASE: Duration = Duration::from_millis(500);
const STAGGER_STEP: Duration = Duration::from_millis(80);
const ENTRANCE_DURATION: Duration = Duration::from_millis(500);

/// Results arriving from spawned requests.
#[derive(Debug)]
pub enum Msg {
    Finished(PendingCall, Result<Reply, ActionError>),
    /// Startup article load; not tied to a button.
    Initial(Result<Reply, ActionError>),
}

pub struct App {
    pub page: Page,
    pub notifier: Notifier,
    pub dispatcher: ActionDispatcher,
    pub theme: ThemeManager,
    pub modal: ModalController,
    pub ripples: RippleEngine<HitTarget>,
    pub hover: HoverTracker<usize>,
    pub reveal: ScrollAnimator<String>,
    pub hits: HitMap,
    /// Last pointer position seen.
    pub pointer: Option<(u16, u16)>,

    pub articles: Vec<Article>,
    pub topic: Topic,
    pub sources: SourceSelection,
    pub articles_focus: ArticlesFocus,
    pub source_cursor: usize,
    /// Position in the filtered list.
    pub article_cursor: usize,
    /// First filtered card shown.
    pub article_scroll: usize,
    pub last_fetch: Option<String>,
    pub loaded_at: Instant,

    pub draft: Option<TweetDraft>,

    pub settings: SettingsForm,
    pub settings_cursor: usize,
    pub feeds: Vec<String>,
    pub suggested: Vec<String>,
    pub feed_input: String,
    pub editing_feed: bool,

    pub should_quit: bool,
    limit: u32,
    fetch_on_start: bool,
    scrolled_threshold: usize,
    reveal_threshold: f32,
}

impl App {
    pub fn new(config: &Config, now: Instant) -> Self {
        let notifier = Notifier::new(config.ui.toast_duration());
        let store = LocalStore::new(config.storage.resolve());
        Self::with_parts(config, notifier, ThemeManager::load(store), config.ui.timings(), now)
    }

    pub fn with_parts(
        config: &Config,
        notifier: Notifier,
        theme: ThemeManager,
        timings: ActionTimings,
        now: Instant,
    ) -> Self {
        Self {
            page: Page::default(),
            dispatcher: ActionDispatcher::new(notifier.clone(), timings),
            notifier,
            theme,
            modal: ModalController::new(),
            ripples: RippleEngine::new(),
            hover: HoverTracker::new(),
            reveal: ScrollAnimator::new(),
            hits: HitMap::default(),
            pointer: None,
            articles: Vec::new(),
            topic: Topic::All,
            sources: SourceSelection::new(&config.feeds.rss),
            articles_focus: ArticlesFocus::List,
            source_cursor: 0,
            article_cursor: 0,
            article_scroll: 0,
            last_fetch: None,
            loaded_at: now,
            draft: None,
            settings: SettingsForm::with_topics(&config.feeds.topics),
            settings_cursor: 0,
            feeds: config.feeds.rss.clone(),
            suggested: config.feeds.suggested.clone(),
            feed_input: String::new(),
            editing_feed: false,
            should_quit: false,
            limit: config.articles.limit,
            fetch_on_start: config.articles.fetch_on_start,
            scrolled_threshold: config.ui.scrolled_threshold,
            reveal_threshold: config.ui.reveal_threshold,
        }
    }

    /// Article load to run once at startup, if enabled. The fetch button
    /// shows as busy until the result arrives.
    pub fn initial_load(&mut self) -> Option<Action> {
        if !self.fetch_on_start || self.sources.is_empty() {
            return None;
        }
        self.dispatcher.button_mut(&ButtonId::FetchArticles).set_loading(true);
        Some(Action::FetchArticles { sources: self.sources.selected(), limit: self.limit })
    }

    // --- derived view data ---

    pub fn visible_articles(&self) -> Vec<usize> {
        articles::visible_indices(&self.articles, self.topic)
    }

    pub fn header_condensed(&self) -> bool {
        self.page == Page::Articles && scroll::is_scrolled(self.article_scroll, self.scrolled_threshold)
    }

    pub fn settings_rows(&self) -> Vec<SettingsRow> {
        let mut rows: Vec<SettingsRow> = SettingsField::ALL.iter().map(|f| SettingsRow::Field(*f)).collect();
        rows.extend((0..self.settings.topics.len()).map(SettingsRow::Topic));
        rows.extend(self.feeds.iter().cloned().map(SettingsRow::Feed));
        rows.push(SettingsRow::FeedInput);
        rows.extend(
            self.suggested
                .iter()
                .filter(|s| !self.feeds.contains(s))
                .cloned()
                .map(SettingsRow::Suggested),
        );
        rows.push(SettingsRow::SaveAll);
        rows
    }

    /// Entrance progress of the card at filtered position `pos`.
    pub fn card_progress(&self, pos: usize, link: &str, now: Instant) -> f32 {
        let delay = scroll::stagger_delay(pos.saturating_sub(self.article_scroll), STAGGER_BASE, STAGGER_STEP);
        let stagger = Tween::new(self.loaded_at, ENTRANCE_DURATION, Easing::BackOut).with_delay(delay).progress(now);
        stagger.min(self.reveal.reveal_progress(&link.to_string(), now))
    }

    // --- loop hooks ---

    pub fn set_hits(&mut self, hits: HitMap) {
        self.hits = hits;
    }

    /// Advance timers: toasts, effects and deferred follow-ups.
    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
        self.ripples.prune(now);
        self.hover.prune(now);
        for follow_up in self.dispatcher.due(now) {
            self.apply_follow_up(follow_up, now);
        }
    }

    /// Feed the article list's current viewport to the scroll animator.
    pub fn observe_scroll(&mut self, now: Instant) {
        let visible = self.visible_articles();
        let card = u32::from(CARD_HEIGHT);
        let layout: Vec<(String, Span)> = visible
            .iter()
            .enumerate()
            .map(|(pos, &i)| (self.articles[i].link.clone(), Span::new(pos as u32 * card, card)))
            .collect();
        let viewport = Span::new(self.article_scroll as u32 * card, u32::from(self.hits.list_height));
        for transition in self.reveal.observe(viewport, &layout, now) {
            tracing::trace!(?transition, "scroll transition");
        }
    }

    pub fn on_message(&mut self, msg: Msg, now: Instant) {
        match msg {
            Msg::Finished(call, result) => {
                let done = self.dispatcher.finish(call, result, now);
                self.after_completion(&done);
            }
            Msg::Initial(result) => {
                self.dispatcher.button_mut(&ButtonId::FetchArticles).set_loading(false);
                match result {
                    Ok(Reply::Articles { articles, .. }) => self.load_articles(articles, now),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "initial article load failed");
                        self.notifier.error(e.user_message("Could not load articles"));
                    }
                }
            }
        }
    }

    /// Returns calls to run on the network.
    pub fn on_event(&mut self, event: Event, now: Instant) -> Vec<PendingCall> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key, now),
            Event::Mouse(mouse) => self.on_mouse(mouse, now),
            _ => Vec::new(),
        }
    }

    // --- input ---

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        if self.modal.is_open() {
            return self.on_modal_key(key, now);
        }
        if self.editing_feed {
            return self.on_feed_input_key(key, now);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyCode::Char('t') => {
                self.toggle_theme(now);
                return Vec::new();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(page) = Page::from_digit(c) {
                    self.activate(HitTarget::Tab(page), None, now);
                }
                return Vec::new();
            }
            _ => {}
        }

        match self.page {
            Page::Articles => self.on_articles_key(key, now),
            Page::Draft => self.on_draft_key(key, now),
            Page::Settings => self.on_settings_key(key, now),
        }
    }

    fn on_modal_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.modal.close();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char('y') if matches!(self.modal.current(), Some(Modal::ConfirmRemove { .. })) => {
                self.activate(HitTarget::ModalChoice(true), None, now)
            }
            _ => Vec::new(),
        }
    }

    fn on_feed_input_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        match key.code {
            KeyCode::Esc => {
                self.editing_feed = false;
                Vec::new()
            }
            KeyCode::Enter => self.activate(HitTarget::Button(ButtonId::SaveFeed), None, now),
            KeyCode::Backspace => {
                self.feed_input.pop();
                Vec::new()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.feed_input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn on_articles_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        match (self.articles_focus, key.code) {
            (_, KeyCode::Tab) => {
                self.articles_focus = match self.articles_focus {
                    ArticlesFocus::List => ArticlesFocus::Sources,
                    ArticlesFocus::Sources => ArticlesFocus::List,
                };
                Vec::new()
            }
            (_, KeyCode::Char('f')) => self.activate(HitTarget::Button(ButtonId::FetchArticles), None, now),
            (ArticlesFocus::Sources, KeyCode::Left) => {
                self.source_cursor = self.source_cursor.saturating_sub(1);
                Vec::new()
            }
            (ArticlesFocus::Sources, KeyCode::Right) => {
                if self.source_cursor + 1 < self.sources.len() {
                    self.source_cursor += 1;
                }
                Vec::new()
            }
            (ArticlesFocus::Sources, KeyCode::Char(' ') | KeyCode::Enter) => {
                self.activate(HitTarget::SourceChip(self.source_cursor), None, now)
            }
            (ArticlesFocus::List, KeyCode::Left | KeyCode::Right) => {
                let idx = Topic::ALL.iter().position(|t| *t == self.topic).unwrap_or(0);
                let next = if key.code == KeyCode::Left {
                    (idx + Topic::ALL.len() - 1) % Topic::ALL.len()
                } else {
                    (idx + 1) % Topic::ALL.len()
                };
                self.activate(HitTarget::TopicChip(Topic::ALL[next]), None, now)
            }
            (ArticlesFocus::List, KeyCode::Up) => {
                self.move_article_cursor(-1);
                Vec::new()
            }
            (ArticlesFocus::List, KeyCode::Down) => {
                self.move_article_cursor(1);
                Vec::new()
            }
            (ArticlesFocus::List, KeyCode::Enter | KeyCode::Char('g')) => {
                match self.cursor_article().map(|a| a.link.clone()) {
                    Some(link) => self.activate(HitTarget::Button(ButtonId::GenerateTweet(link)), None, now),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn on_draft_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        match key.code {
            KeyCode::Char('r') => self.activate(HitTarget::Button(ButtonId::RegenerateTweet), None, now),
            KeyCode::Char('p') => self.activate(HitTarget::Button(ButtonId::PostTweet), None, now),
            _ => Vec::new(),
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent, now: Instant) -> Vec<PendingCall> {
        let rows = self.settings_rows();
        if rows.is_empty() {
            return Vec::new();
        }
        self.settings_cursor = self.settings_cursor.min(rows.len() - 1);
        let row = rows[self.settings_cursor].clone();

        match key.code {
            KeyCode::Up => self.settings_cursor = self.settings_cursor.saturating_sub(1),
            KeyCode::Down => self.settings_cursor = (self.settings_cursor + 1).min(rows.len() - 1),
            KeyCode::Left | KeyCode::Right => {
                if let SettingsRow::Field(field) = row {
                    let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                    self.settings.adjust(field, delta);
                }
            }
            KeyCode::Char('s') => return self.activate(HitTarget::Button(ButtonId::SaveSettings), None, now),
            KeyCode::Char(' ') | KeyCode::Enter => {
                return self.activate(HitTarget::SettingsRow(self.settings_cursor), None, now);
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Vec<PendingCall> {
        let pointer = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.pointer = Some(pointer);
                let cards = self.hits.cards();
                for event in self.hover.update(pointer, &cards, now) {
                    tracing::trace!(?event, "hover");
                }
                Vec::new()
            }
            MouseEventKind::ScrollDown if self.page == Page::Articles => {
                self.scroll_articles(1);
                Vec::new()
            }
            MouseEventKind::ScrollUp if self.page == Page::Articles => {
                self.scroll_articles(-1);
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => match self.hits.hit(pointer.0, pointer.1) {
                // Behind an open modal only the dialog and toasts take clicks.
                Some((target, _))
                    if self.modal.is_open() && !matches!(target, HitTarget::ModalChoice(_) | HitTarget::Toast(_)) =>
                {
                    Vec::new()
                }
                Some((target, area)) => {
                    let target = target.clone();
                    self.activate(target, Some((pointer, area)), now)
                }
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Click or key activation of `target`. `pointer` carries the click
    /// position and the target's area; keyboard activations ripple from the
    /// centre of the last drawn area.
    pub fn activate(
        &mut self,
        target: HitTarget,
        pointer: Option<((u16, u16), Rect)>,
        now: Instant,
    ) -> Vec<PendingCall> {
        self.ripple(&target, pointer, now);

        match target {
            HitTarget::Tab(page) => {
                self.page = page;
                self.editing_feed = false;
                Vec::new()
            }
            HitTarget::ThemeToggle => {
                self.toggle_theme(now);
                Vec::new()
            }
            HitTarget::Toast(id) => {
                self.notifier.dismiss_at(id, now);
                Vec::new()
            }
            HitTarget::TopicChip(topic) => {
                self.topic = topic;
                self.article_cursor = 0;
                self.article_scroll = 0;
                Vec::new()
            }
            HitTarget::SourceChip(i) => {
                self.source_cursor = i;
                self.sources.toggle(i);
                Vec::new()
            }
            HitTarget::ArticleCard(pos) => {
                self.article_cursor = pos;
                self.articles_focus = ArticlesFocus::List;
                Vec::new()
            }
            HitTarget::SettingsRow(i) => {
                self.settings_cursor = i;
                self.activate_settings_row(i, now)
            }
            HitTarget::ModalChoice(confirmed) => match self.modal.close() {
                Some(Modal::ConfirmRemove { url }) if confirmed => {
                    let id = ButtonId::RemoveFeed(url.clone());
                    self.click(id, Action::RemoveFeed { url }, now)
                }
                _ => Vec::new(),
            },
            HitTarget::Button(id) => self.press(id, now),
        }
    }

    fn press(&mut self, id: ButtonId, now: Instant) -> Vec<PendingCall> {
        let action = match &id {
            ButtonId::FetchArticles => Action::FetchArticles { sources: self.sources.selected(), limit: self.limit },
            ButtonId::GenerateTweet(url) => Action::GenerateTweet { article_url: url.clone() },
            ButtonId::RegenerateTweet => Action::RegenerateTweet {
                temperature: f64::from(self.settings.temperature_pct) / 100.0,
                tone: "default".to_string(),
            },
            ButtonId::PostTweet => Action::PostTweet {
                tweet: self.draft.as_ref().map(|d| d.full_tweet.clone()).unwrap_or_default(),
            },
            ButtonId::SaveSettings => Action::SaveSettings(self.settings.to_request()),
            ButtonId::SaveFeed => Action::AddFeed { url: self.feed_input.clone() },
            ButtonId::RemoveFeed(url) => {
                // Removal asks first; the confirm choice issues the request.
                if !self.dispatcher.button(&id).is_disabled() {
                    self.modal.open_confirm_remove(url.clone());
                }
                return Vec::new();
            }
            ButtonId::AddSuggestedFeed(url) => Action::AddSuggestedFeed { url: url.clone() },
        };
        self.click(id, action, now)
    }

    fn click(&mut self, id: ButtonId, action: Action, now: Instant) -> Vec<PendingCall> {
        let is_generate = matches!(id, ButtonId::GenerateTweet(_));
        match self.dispatcher.begin(id, action) {
            Some(call) => {
                if is_generate {
                    self.modal.open_progress(now);
                }
                vec![call]
            }
            None => Vec::new(),
        }
    }

    fn activate_settings_row(&mut self, i: usize, now: Instant) -> Vec<PendingCall> {
        let Some(row) = self.settings_rows().get(i).cloned() else { return Vec::new() };
        match row {
            SettingsRow::Field(SettingsField::AutoPost) => self.settings.adjust(SettingsField::AutoPost, 1),
            SettingsRow::Field(_) => {}
            SettingsRow::Topic(t) => self.settings.toggle_topic(t),
            SettingsRow::Feed(url) => return self.activate(HitTarget::Button(ButtonId::RemoveFeed(url)), None, now),
            SettingsRow::FeedInput => self.editing_feed = true,
            SettingsRow::Suggested(url) => {
                return self.activate(HitTarget::Button(ButtonId::AddSuggestedFeed(url)), None, now)
            }
            SettingsRow::SaveAll => return self.activate(HitTarget::Button(ButtonId::SaveSettings), None, now),
        }
        Vec::new()
    }

    fn ripple(&mut self, target: &HitTarget, pointer: Option<((u16, u16), Rect)>, now: Instant) {
        let style = match target {
            HitTarget::Tab(_) => RippleStyle::NavLink,
            HitTarget::Button(_) | HitTarget::TopicChip(_) | HitTarget::SourceChip(_) | HitTarget::ThemeToggle => {
                RippleStyle::Button
            }
            _ => return,
        };
        let (pos, area) = match pointer {
            Some(p) => p,
            None => match self.hits.area_of(target) {
                Some(area) => ((area.x + area.width / 2, area.y + area.height / 2), area),
                None => return,
            },
        };
        self.ripples.trigger(target.clone(), area, pos, style, now);
    }

    fn toggle_theme(&mut self, now: Instant) {
        let theme = self.theme.toggle();
        self.notifier.notify_at(
            format!("Switched to {} mode", theme.as_str()),
            crate::notify::ToastKind::Success,
            self.notifier.default_duration(),
            now,
        );
    }

    // --- completions and follow-ups ---

    fn after_completion(&mut self, done: &Completion) {
        match (&done.action, &done.result) {
            (Action::GenerateTweet { .. }, Err(_)) => {
                if let Some(Modal::Progress { .. }) = self.modal.current() {
                    self.modal.close();
                }
            }
            (Action::FetchArticles { .. }, Ok(())) => {
                self.last_fetch = Some(chrono::Local::now().format("%H:%M:%S").to_string());
            }
            (Action::AddFeed { .. }, Ok(())) => {
                self.feed_input.clear();
                self.editing_feed = false;
            }
            _ => {}
        }
    }

    fn apply_follow_up(&mut self, follow_up: FollowUp, now: Instant) {
        match follow_up {
            FollowUp::Reload(Refresh::Articles(list)) => self.load_articles(list, now),
            FollowUp::Reload(Refresh::FeedAdded(url)) => {
                if !self.feeds.contains(&url) {
                    self.feeds.push(url.clone());
                }
                self.sources.add(&url);
            }
            FollowUp::Reload(Refresh::FeedRemoved(url)) => {
                self.feeds.retain(|f| f != &url);
                self.sources.remove(&url);
                self.source_cursor = self.source_cursor.min(self.sources.len().saturating_sub(1));
            }
            FollowUp::ShowDraft(draft) => {
                if let Some(Modal::Progress { .. }) = self.modal.current() {
                    self.modal.close();
                }
                self.draft = Some(draft);
                self.page = Page::Draft;
            }
        }
    }

    fn load_articles(&mut self, list: Vec<Article>, now: Instant) {
        tracing::info!(count = list.len(), "articles loaded");
        self.articles = list;
        self.article_cursor = 0;
        self.article_scroll = 0;
        self.loaded_at = now;
        let links: Vec<String> = self.articles.iter().map(|a| a.link.clone()).collect();
        self.reveal.retain(|link| links.contains(link));
        for link in links {
            self.reveal.register(link, self.reveal_threshold, RevealMode::Repeat);
        }
    }

    // --- list navigation ---

    fn cursor_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.article_cursor).map(|&i| &self.articles[i])
    }

    fn cards_per_page(&self) -> usize {
        (usize::from(self.hits.list_height) / usize::from(CARD_HEIGHT)).max(1)
    }

    fn move_article_cursor(&mut self, delta: isize) {
        let count = self.visible_articles().len();
        if count == 0 {
            return;
        }
        let next = self.article_cursor as isize + delta;
        self.article_cursor = next.clamp(0, count as isize - 1) as usize;
        let per_page = self.cards_per_page();
        if self.article_cursor < self.article_scroll {
            self.article_scroll = self.article_cursor;
        } else if self.article_cursor >= self.article_scroll + per_page {
            self.article_scroll = self.article_cursor + 1 - per_page;
        }
    }

    fn scroll_articles(&mut self, delta: isize) {
        let count = self.visible_articles().len();
        let max = count.saturating_sub(self.cards_per_page());
        let next = (self.article_scroll as isize + delta).clamp(0, max as isize);
        self.article_scroll = next as usize;
        self.article_cursor = self.article_cursor.clamp(self.article_scroll, count.saturating_sub(1).max(self.article_scroll));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config: Config = toml::from_str(
            r#"
            [feeds]
            rss = ["https://a.test/rss", "https://b.test/rss"]
            suggested = ["https://c.test/rss"]
            topics = ["AI", "Security"]
            "#,
        )
        .unwrap();
        let notifier = Notifier::default();
        let theme = ThemeManager::load(LocalStore::new(dir.path().join("storage.json")));
        let app = App::with_parts(&config, notifier, theme, ActionTimings::default(), Instant::now());
        (app, dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn article(title: &str, link: &str) -> Article {
        Article {
            title: title.into(),
            link: link.into(),
            summary: String::new(),
            published: String::new(),
            source: String::new(),
            is_posted: false,
        }
    }

    #[test]
    fn fetch_with_no_sources_warns_without_request() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.activate(HitTarget::SourceChip(0), None, now);
        app.activate(HitTarget::SourceChip(1), None, now);
        let calls = app.on_key(key(KeyCode::Char('f')), now);
        assert!(calls.is_empty());
        assert_eq!(app.notifier.len(), 1);
    }

    #[test]
    fn theme_toggle_shows_toast() {
        let (mut app, _dir) = app();
        app.on_key(key(KeyCode::Char('t')), Instant::now());
        assert_eq!(app.theme.current(), Theme::Light);
        assert_eq!(app.notifier.snapshot(Instant::now())[0].message, "Switched to light mode");
    }

    #[test]
    fn generate_failure_closes_progress_modal() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.load_articles(vec![article("Chips", "https://n.test/1")], now);
        let calls = app.on_key(key(KeyCode::Enter), now);
        assert_eq!(calls.len(), 1);
        assert!(matches!(app.modal.current(), Some(Modal::Progress { .. })));

        let call = calls.into_iter().next().unwrap();
        app.on_message(Msg::Finished(call, Err(ActionError::Transport("refused".into()))), now);
        assert!(!app.modal.is_open());
    }

    #[test]
    fn late_generate_failure_leaves_confirm_modal_open() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.load_articles(vec![article("Chips", "https://n.test/1")], now);
        let call = app.on_key(key(KeyCode::Enter), now).pop().unwrap();
        app.on_key(key(KeyCode::Esc), now);
        app.activate(HitTarget::Button(ButtonId::RemoveFeed("https://a.test/rss".into())), None, now);

        app.on_message(Msg::Finished(call, Err(ActionError::Transport("refused".into()))), now);
        assert!(matches!(app.modal.current(), Some(Modal::ConfirmRemove { .. })));
    }

    #[test]
    fn generate_success_navigates_to_draft_after_delay() {
        let (mut app, _dir) = app();
        let t0 = Instant::now();
        app.load_articles(vec![article("Chips", "https://n.test/1")], t0);
        let call = app.on_key(key(KeyCode::Enter), t0).pop().unwrap();
        let draft = TweetDraft { content: "c".into(), full_tweet: "c https://n.test/1".into(), char_count: 18 };
        app.on_message(Msg::Finished(call, Ok(Reply::Draft(draft.clone()))), t0);
        app.tick(t0 + Duration::from_millis(999));
        assert_eq!(app.page, Page::Articles);
        app.tick(t0 + Duration::from_millis(1000));
        assert_eq!(app.page, Page::Draft);
        assert_eq!(app.draft, Some(draft));
        assert!(!app.modal.is_open());
    }

    #[test]
    fn remove_feed_asks_before_requesting() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        let url = "https://a.test/rss".to_string();
        let calls = app.activate(HitTarget::Button(ButtonId::RemoveFeed(url.clone())), None, now);
        assert!(calls.is_empty());
        assert!(matches!(app.modal.current(), Some(Modal::ConfirmRemove { .. })));

        let calls = app.on_key(key(KeyCode::Char('y')), now);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, Action::RemoveFeed { url: url.clone() });

        app.on_message(Msg::Finished(calls[0].clone(), Ok(Reply::Ack)), now);
        app.tick(now + Duration::from_millis(1000));
        assert!(!app.feeds.contains(&url));
        assert_eq!(app.sources.len(), 1);
    }

    #[test]
    fn settings_row_behind_modal_ignores_clicks() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.page = Page::Settings;
        app.activate(HitTarget::Button(ButtonId::RemoveFeed("https://a.test/rss".into())), None, now);
        assert!(app.modal.is_open());

        let save_row = app.settings_rows().len() - 1;
        let mut hits = HitMap::default();
        hits.push(HitTarget::SettingsRow(save_row), Rect::new(0, 20, 40, 1));
        app.set_hits(hits);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 20,
            modifiers: KeyModifiers::NONE,
        };
        let calls = app.on_event(Event::Mouse(click), now);
        assert!(calls.is_empty());
        assert!(matches!(app.modal.current(), Some(Modal::ConfirmRemove { .. })));
        assert!(!app.dispatcher.button(&ButtonId::SaveSettings).is_disabled());
    }

    #[test]
    fn startup_load_clears_busy_fetch_button() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        assert!(app.initial_load().is_some());
        assert!(app.dispatcher.button(&ButtonId::FetchArticles).is_loading());
        assert!(app.on_key(key(KeyCode::Char('f')), now).is_empty());

        let list = vec![article("Chips", "https://n.test/1")];
        app.on_message(Msg::Initial(Ok(Reply::Articles { count: 1, articles: list })), now);
        assert!(!app.dispatcher.button(&ButtonId::FetchArticles).is_loading());
        assert_eq!(app.articles.len(), 1);
        assert_eq!(app.on_key(key(KeyCode::Char('f')), now).len(), 1);
    }

    #[test]
    fn reload_drops_reveal_state_of_removed_articles() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.load_articles(vec![article("A", "https://n.test/a"), article("B", "https://n.test/b")], now);
        app.load_articles(vec![article("B", "https://n.test/b")], now);
        assert_eq!(app.reveal.reveal_progress(&"https://n.test/a".to_string(), now), 1.0);
        assert_eq!(app.reveal.reveal_progress(&"https://n.test/b".to_string(), now), 0.0);
    }

    #[test]
    fn bad_feed_url_keeps_input() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.feed_input = "ftp://bad".into();
        app.editing_feed = true;
        let calls = app.on_key(key(KeyCode::Enter), now);
        assert!(calls.is_empty());
        assert_eq!(app.feed_input, "ftp://bad");
        let toast = &app.notifier.snapshot(now)[0];
        assert!(toast.message.contains("valid URL"));
    }

    #[test]
    fn suggested_feeds_already_configured_are_hidden() {
        let (mut app, _dir) = app();
        assert!(app.settings_rows().contains(&SettingsRow::Suggested("https://c.test/rss".into())));
        app.apply_follow_up(FollowUp::Reload(Refresh::FeedAdded("https://c.test/rss".into())), Instant::now());
        assert!(!app.settings_rows().contains(&SettingsRow::Suggested("https://c.test/rss".into())));
    }

    #[test]
    fn digit_switches_page() {
        let (mut app, _dir) = app();
        app.on_key(key(KeyCode::Char('3')), Instant::now());
        assert_eq!(app.page, Page::Settings);
    }
}
