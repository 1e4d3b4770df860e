use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct FetchArticlesRequest {
    pub sources: Vec<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchArticlesResponse {
    pub count: u32,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub is_posted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateTweetRequest {
    pub article_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegenerateTweetRequest {
    pub temperature: f64,
    pub tone: String,
}

/// Body of both generate and regenerate responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TweetDraft {
    pub content: String,
    pub full_tweet: String,
    #[serde(default)]
    pub char_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostTweetRequest {
    pub tweet: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostTweetResponse {
    pub tweet_id: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveSettingsRequest {
    pub ai_settings: AiSettings,
    pub tweet_style: TweetStyle,
    pub posting_schedule: PostingSchedule,
    pub topic_preferences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiSettings {
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweetStyle {
    pub max_hashtags: u32,
    pub max_length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingSchedule {
    pub times: Vec<String>,
    pub auto_post: bool,
    pub max_per_day: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedRequest {
    pub url: String,
}

/// Generic acknowledgement returned by settings and feed endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
