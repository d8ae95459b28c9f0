//! Tweet engagement lookups. A passthrough to the Twitter v2 API: one call per
//! request, no caching, no retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analytics API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Analytics response carried no data for post {0}")]
    MissingData(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    /// Only reported for elevated API access.
    #[serde(default)]
    pub impression_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetAnalytics {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

#[async_trait]
pub trait SocialAnalytics: Send + Sync {
    async fn tweet_metrics(&self, post_id: &str) -> Result<TweetAnalytics, SocialError>;
}

#[derive(Debug, Deserialize)]
struct TweetEnvelope {
    data: Option<TweetAnalytics>,
}

#[derive(Clone)]
pub struct TwitterClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(client: Client, base_url: &str, bearer_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    fn tweet_url(&self, post_id: &str) -> String {
        format!("{}/2/tweets/{post_id}", self.base_url)
    }
}

#[async_trait]
impl SocialAnalytics for TwitterClient {
    async fn tweet_metrics(&self, post_id: &str) -> Result<TweetAnalytics, SocialError> {
        let response = self
            .client
            .get(self.tweet_url(post_id))
            .query(&[("tweet.fields", "public_metrics")])
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Analytics API returned {status} for post {post_id}");
            return Err(SocialError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_tweet(post_id, &body)
    }
}

fn parse_tweet(post_id: &str, body: &str) -> Result<TweetAnalytics, SocialError> {
    serde_json::from_str::<TweetEnvelope>(body)?
        .data
        .ok_or_else(|| SocialError::MissingData(post_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tweet_unwraps_data() {
        let body = r#"{"data": {"id": "123", "text": "hello", "edit_history_tweet_ids": ["123"],
            "public_metrics": {"retweet_count": 2, "reply_count": 1, "like_count": 10, "quote_count": 0, "bookmark_count": 3}}}"#;
        let tweet = parse_tweet("123", body).unwrap();
        assert_eq!(tweet.id, "123");
        assert_eq!(tweet.public_metrics.like_count, 10);
        assert_eq!(tweet.public_metrics.impression_count, 0);
    }

    #[test]
    fn test_parse_tweet_without_data_is_error() {
        let body = r#"{"errors": [{"detail": "Could not find tweet with id: [1]."}]}"#;
        assert!(matches!(
            parse_tweet("1", body),
            Err(SocialError::MissingData(id)) if id == "1"
        ));
    }

    #[test]
    fn test_tweet_url() {
        let client = TwitterClient::new(Client::new(), "https://api.twitter.com/", "t".into());
        assert_eq!(client.tweet_url("42"), "https://api.twitter.com/2/tweets/42");
    }
}
