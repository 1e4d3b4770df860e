use super::types::*;
use super::Backend;
use crate::error::ActionError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct CuratorRest {
    client: Client,
    base_url: String,
}

impl CuratorRest {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // The backend keeps the current draft in its session cookie.
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the JSON reply.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ActionError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        let result = decode_response(status, &text);
        if let Err(ref e) = result {
            tracing::warn!(path, status, error = %e, "backend call failed");
        }
        result
    }
}

/// Map a raw status/body pair to the typed reply or an [`ActionError`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ActionError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        return Err(ActionError::Server { status, message });
    }
    serde_json::from_str(body).map_err(|e| ActionError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for CuratorRest {
    async fn fetch_articles(&self, req: &FetchArticlesRequest) -> Result<FetchArticlesResponse, ActionError> {
        self.post_json("/api/fetch-articles", req).await
    }

    async fn generate_tweet(&self, article_url: &str) -> Result<TweetDraft, ActionError> {
        let req = GenerateTweetRequest { article_url: article_url.to_string() };
        self.post_json("/api/generate-tweet", &req).await
    }

    async fn regenerate_tweet(&self, temperature: f64, tone: &str) -> Result<TweetDraft, ActionError> {
        let req = RegenerateTweetRequest { temperature, tone: tone.to_string() };
        self.post_json("/api/regenerate-tweet", &req).await
    }

    async fn post_tweet(&self, tweet: &str) -> Result<PostTweetResponse, ActionError> {
        let req = PostTweetRequest { tweet: tweet.to_string() };
        self.post_json("/api/post-tweet", &req).await
    }

    async fn save_settings(&self, req: &SaveSettingsRequest) -> Result<Ack, ActionError> {
        self.post_json("/api/settings/save", req).await
    }

    async fn add_feed(&self, url: &str) -> Result<Ack, ActionError> {
        let req = FeedRequest { url: url.to_string() };
        self.post_json("/api/rss/add", &req).await
    }

    async fn remove_feed(&self, url: &str) -> Result<Ack, ActionError> {
        let req = FeedRequest { url: url.to_string() };
        self.post_json("/api/rss/remove", &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_decodes() {
        let draft: TweetDraft =
            decode_response(200, r#"{"content":"hi","full_tweet":"hi https://x","char_count":11}"#).unwrap();
        assert_eq!(draft.char_count, 11);
    }

    #[test]
    fn error_status_carries_server_message() {
        let err = decode_response::<Ack>(404, r#"{"success":false,"error":"Feed not found"}"#).unwrap_err();
        assert_eq!(err, ActionError::Server { status: 404, message: Some("Feed not found".into()) });
    }

    #[test]
    fn error_status_with_html_body_has_no_message() {
        let err = decode_response::<Ack>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err, ActionError::Server { status: 502, message: None });
    }

    #[test]
    fn garbage_on_success_is_decode_error() {
        let err = decode_response::<FetchArticlesResponse>(200, "not json").unwrap_err();
        assert!(matches!(err, ActionError::Decode(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let rest = CuratorRest::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(rest.base_url(), "http://localhost:5000");
    }
}
