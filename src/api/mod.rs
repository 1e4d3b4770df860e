pub mod rest;
pub mod types;

use crate::error::ActionError;
use async_trait::async_trait;
use types::{
    Ack, FetchArticlesRequest, FetchArticlesResponse, PostTweetResponse, SaveSettingsRequest,
    TweetDraft,
};

/// The curator backend as seen by the console. One call per endpoint,
/// single attempt, no retry.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_articles(&self, req: &FetchArticlesRequest) -> Result<FetchArticlesResponse, ActionError>;
    async fn generate_tweet(&self, article_url: &str) -> Result<TweetDraft, ActionError>;
    async fn regenerate_tweet(&self, temperature: f64, tone: &str) -> Result<TweetDraft, ActionError>;
    async fn post_tweet(&self, tweet: &str) -> Result<PostTweetResponse, ActionError>;
    async fn save_settings(&self, req: &SaveSettingsRequest) -> Result<Ack, ActionError>;
    async fn add_feed(&self, url: &str) -> Result<Ack, ActionError>;
    async fn remove_feed(&self, url: &str) -> Result<Ack, ActionError>;
}
