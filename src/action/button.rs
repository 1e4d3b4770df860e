/// Identifies one actionable control. Row-level buttons carry the URL of
/// the article or feed they act on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonId {
    FetchArticles,
    GenerateTweet(String),
    RegenerateTweet,
    PostTweet,
    SaveSettings,
    SaveFeed,
    RemoveFeed(String),
    AddSuggestedFeed(String),
}

impl ButtonId {
    pub fn idle_label(&self) -> &'static str {
        match self {
            ButtonId::FetchArticles => "🔄 Fetch Latest Articles",
            ButtonId::GenerateTweet(_) => "✨ Generate Tweet",
            ButtonId::RegenerateTweet => "🔁 Regenerate",
            ButtonId::PostTweet => "🚀 Post Tweet",
            ButtonId::SaveSettings => "💾 Save All Settings",
            ButtonId::SaveFeed => "Save Feed",
            ButtonId::RemoveFeed(_) => "🗑️ Remove",
            ButtonId::AddSuggestedFeed(_) => "Add",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            ButtonId::FetchArticles => "⏳ Fetching...",
            ButtonId::GenerateTweet(_) => "⏳ Generating...",
            ButtonId::RegenerateTweet => "⏳ Regenerating...",
            ButtonId::PostTweet => "⏳ Posting...",
            ButtonId::SaveSettings => "⏳ Saving...",
            ButtonId::SaveFeed => "⏳ Adding...",
            ButtonId::RemoveFeed(_) | ButtonId::AddSuggestedFeed(_) => "⏳",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Label, disabled flag and state of a single button.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    id: ButtonId,
    label: String,
    disabled: bool,
    loading: bool,
    state: ButtonState,
}

impl Button {
    pub fn new(id: ButtonId) -> Self {
        Self {
            label: id.idle_label().to_string(),
            id,
            disabled: false,
            loading: false,
            state: ButtonState::Idle,
        }
    }

    pub fn id(&self) -> &ButtonId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Click accepted: disable and show the busy label. A disabled button
    /// refuses, which is what keeps one request in flight per button.
    pub fn begin(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.state = ButtonState::Pending;
        self.disabled = true;
        self.label = self.id.busy_label().to_string();
        true
    }

    /// Request succeeded. The button is re-enabled, showing `confirmation`
    /// if given, otherwise its idle label.
    pub fn succeed(&mut self, confirmation: Option<&str>) {
        self.state = ButtonState::Success;
        self.disabled = false;
        self.label = confirmation.unwrap_or(self.id.idle_label()).to_string();
    }

    /// Request succeeded and a reload is queued. The button stays disabled
    /// until the reload resets it.
    pub fn succeed_pending_reload(&mut self) {
        self.state = ButtonState::Success;
        self.disabled = true;
        self.label = self.id.idle_label().to_string();
    }

    pub fn fail(&mut self) {
        self.state = ButtonState::Error;
    }

    pub fn reset(&mut self) {
        self.state = ButtonState::Idle;
        self.disabled = false;
        self.loading = false;
        self.label = self.id.idle_label().to_string();
    }

    /// Busy flag for controls outside the request state machine.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.disabled = loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_disables_and_shows_busy_label() {
        let mut btn = Button::new(ButtonId::FetchArticles);
        assert!(btn.begin());
        assert!(btn.is_disabled());
        assert_eq!(btn.state(), ButtonState::Pending);
        assert_eq!(btn.label(), "⏳ Fetching...");
    }

    #[test]
    fn second_click_while_pending_is_refused() {
        let mut btn = Button::new(ButtonId::SaveSettings);
        assert!(btn.begin());
        assert!(!btn.begin());
    }

    #[test]
    fn succeed_with_confirmation_then_reset() {
        let mut btn = Button::new(ButtonId::SaveSettings);
        btn.begin();
        btn.succeed(Some("✓ Saved!"));
        assert_eq!(btn.label(), "✓ Saved!");
        assert!(!btn.is_disabled());
        btn.reset();
        assert_eq!(btn.label(), "💾 Save All Settings");
        assert_eq!(btn.state(), ButtonState::Idle);
    }

    #[test]
    fn fail_then_reset_restores_original_label() {
        let mut btn = Button::new(ButtonId::RemoveFeed("https://a.test/rss".into()));
        btn.begin();
        btn.fail();
        assert_eq!(btn.state(), ButtonState::Error);
        btn.reset();
        assert_eq!(btn.label(), "🗑️ Remove");
        assert!(!btn.is_disabled());
    }

    #[test]
    fn pending_reload_keeps_button_disabled_until_reset() {
        let mut btn = Button::new(ButtonId::AddSuggestedFeed("https://c.test/rss".into()));
        btn.begin();
        btn.succeed_pending_reload();
        assert_eq!(btn.state(), ButtonState::Success);
        assert_eq!(btn.label(), "Add");
        assert!(!btn.begin());
        btn.reset();
        assert!(btn.begin());
    }

    #[test]
    fn loading_flag_toggles_disabled() {
        let mut btn = Button::new(ButtonId::PostTweet);
        btn.set_loading(true);
        assert!(btn.is_loading());
        assert!(!btn.begin());
        btn.set_loading(false);
        assert!(btn.begin());
    }
}
