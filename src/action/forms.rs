//! Form state behind the settings and feed actions.

use crate::api::types::{AiSettings, PostingSchedule, SaveSettingsRequest, TweetStyle};
use crate::error::ActionError;

/// Check a feed URL typed by the user. Returns the trimmed URL.
pub fn validate_feed_url(raw: &str) -> Result<String, ActionError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ActionError::Validation("Please enter a feed URL".into()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ActionError::Validation(
            "Please enter a valid URL starting with http:// or https://".into(),
        ));
    }
    Ok(url.to_string())
}

/// Position of a slider value as a percentage of its range.
pub fn slider_fill_percent(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// A field the settings page can focus and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Temperature,
    MaxHashtags,
    MaxLength,
    AutoPost,
    MaxPerDay,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        SettingsField::Temperature,
        SettingsField::MaxHashtags,
        SettingsField::MaxLength,
        SettingsField::AutoPost,
        SettingsField::MaxPerDay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Temperature => "Creativity (temperature)",
            SettingsField::MaxHashtags => "Max hashtags",
            SettingsField::MaxLength => "Max length",
            SettingsField::AutoPost => "Auto-post",
            SettingsField::MaxPerDay => "Max posts per day",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    /// Slider position, 0..=100.
    pub temperature_pct: u8,
    pub max_hashtags: u32,
    pub max_length: u32,
    pub auto_post: bool,
    pub max_per_day: u32,
    pub posting_times: Vec<String>,
    /// (label, checked) for every topic checkbox.
    pub topics: Vec<(String, bool)>,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            temperature_pct: 90,
            max_hashtags: 1,
            max_length: 280,
            auto_post: false,
            max_per_day: 10,
            posting_times: Vec::new(),
            topics: Vec::new(),
        }
    }
}

impl SettingsForm {
    pub fn with_topics(topics: &[String]) -> Self {
        Self {
            topics: topics.iter().map(|t| (t.clone(), false)).collect(),
            ..Self::default()
        }
    }

    /// Build the save request from the current form state.
    pub fn to_request(&self) -> SaveSettingsRequest {
        SaveSettingsRequest {
            ai_settings: AiSettings {
                temperature: f64::from(self.temperature_pct) / 100.0,
            },
            tweet_style: TweetStyle {
                max_hashtags: self.max_hashtags,
                max_length: self.max_length,
            },
            posting_schedule: PostingSchedule {
                times: self
                    .posting_times
                    .iter()
                    .filter(|t| !t.trim().is_empty())
                    .cloned()
                    .collect(),
                auto_post: self.auto_post,
                max_per_day: self.max_per_day,
            },
            topic_preferences: self
                .topics
                .iter()
                .filter(|(_, checked)| *checked)
                .map(|(label, _)| label.trim().to_string())
                .collect(),
        }
    }

    /// Nudge a numeric field by `delta` steps, or flip a boolean one.
    pub fn adjust(&mut self, field: SettingsField, delta: i32) {
        match field {
            SettingsField::Temperature => {
                self.temperature_pct = step(u32::from(self.temperature_pct), delta * 5, 0, 100) as u8;
            }
            SettingsField::MaxHashtags => self.max_hashtags = step(self.max_hashtags, delta, 0, 5),
            SettingsField::MaxLength => self.max_length = step(self.max_length, delta * 10, 100, 280),
            SettingsField::AutoPost => self.auto_post = !self.auto_post,
            SettingsField::MaxPerDay => self.max_per_day = step(self.max_per_day, delta, 1, 50),
        }
    }

    pub fn toggle_topic(&mut self, index: usize) {
        if let Some((_, checked)) = self.topics.get_mut(index) {
            *checked = !*checked;
        }
    }

    pub fn display_value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Temperature => format!("{}%", self.temperature_pct),
            SettingsField::MaxHashtags => self.max_hashtags.to_string(),
            SettingsField::MaxLength => self.max_length.to_string(),
            SettingsField::AutoPost => if self.auto_post { "on" } else { "off" }.to_string(),
            SettingsField::MaxPerDay => self.max_per_day.to_string(),
        }
    }
}

fn step(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    let next = i64::from(value) + i64::from(delta);
    next.clamp(i64::from(min), i64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        let err = validate_feed_url("ftp://bad").unwrap_err();
        assert!(err.to_string().contains("valid URL"));
        assert!(validate_feed_url("   ").unwrap_err().to_string().contains("enter a feed URL"));
        assert_eq!(validate_feed_url(" https://a.test/rss ").unwrap(), "https://a.test/rss");
    }

    #[test]
    fn temperature_slider_maps_to_fraction() {
        let form = SettingsForm { temperature_pct: 90, max_hashtags: 1, ..SettingsForm::default() };
        let req = form.to_request();
        assert!((req.ai_settings.temperature - 0.9).abs() < f64::EPSILON);
        assert_eq!(req.tweet_style.max_hashtags, 1);
        assert_eq!(req.tweet_style.max_length, 280);
    }

    #[test]
    fn empty_posting_times_are_dropped() {
        let form = SettingsForm {
            posting_times: vec!["09:00".into(), "".into(), "18:30".into()],
            ..SettingsForm::default()
        };
        assert_eq!(form.to_request().posting_schedule.times, ["09:00", "18:30"]);
    }

    #[test]
    fn only_checked_topics_are_sent() {
        let mut form = SettingsForm::with_topics(&["AI".into(), "Security".into()]);
        form.toggle_topic(1);
        assert_eq!(form.to_request().topic_preferences, ["Security"]);
    }

    #[test]
    fn adjust_clamps_to_range() {
        let mut form = SettingsForm::default();
        form.adjust(SettingsField::Temperature, 10);
        assert_eq!(form.temperature_pct, 100);
        form.adjust(SettingsField::MaxHashtags, -5);
        assert_eq!(form.max_hashtags, 0);
        form.adjust(SettingsField::AutoPost, 1);
        assert!(form.auto_post);
    }

    #[test]
    fn slider_fill() {
        assert_eq!(slider_fill_percent(90.0, 0.0, 100.0), 90.0);
        assert_eq!(slider_fill_percent(5.0, 0.0, 0.0), 0.0);
    }
}
