use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, warn};

use super::extract::{parse_timeline, parse_user};
use super::types::ProfileSnapshot;
use super::ProfileError;
use crate::config::ProfileApiSettings;

/// Anything that can produce a profile snapshot for a normalized handle.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, handle: &str) -> Result<ProfileSnapshot, ProfileError>;
}

/// RapidAPI-backed profile fetcher: user lookup, then the user's timeline.
#[derive(Clone)]
pub struct ProfileClient {
    http: Client,
    api_key: String,
    host: String,
    tweet_count: u32,
}

impl ProfileClient {
    pub fn new(api_key: impl Into<String>, settings: &ProfileApiSettings) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            host: settings.host.clone(),
            tweet_count: settings.tweet_count,
        }
    }

    fn user_url(&self, handle: &str) -> String {
        format!("https://{}/user?username={}", self.host, handle)
    }

    fn tweets_url(&self, rest_id: &str) -> String {
        format!(
            "https://{}/user-tweets?user={}&count={}",
            self.host, rest_id, self.tweet_count
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProfileError> {
        let response = self
            .http
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Profile API request failed");
                ProfileError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "Profile API error");
            return Err(ProfileError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// GET with exponential backoff, 3 attempts. Only transient errors retry.
    async fn get_json_with_retry(&self, url: &str) -> Result<Value, ProfileError> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        RetryIf::spawn(
            retry_strategy,
            || self.get_json(url),
            |e: &ProfileError| e.is_transient(),
        )
        .await
    }
}

#[async_trait]
impl ProfileSource for ProfileClient {
    async fn fetch(&self, handle: &str) -> Result<ProfileSnapshot, ProfileError> {
        let start = std::time::Instant::now();

        let user_body = match self.get_json_with_retry(&self.user_url(handle)).await {
            Err(ProfileError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(ProfileError::NotFound(handle.to_string()))
            }
            other => other?,
        };
        let profile = parse_user(handle, &user_body)?;

        let tweets_body = self
            .get_json_with_retry(&self.tweets_url(&profile.rest_id))
            .await?;
        let timeline = parse_timeline(&tweets_body);

        debug!(
            handle,
            followers = profile.followers_count,
            tweets = timeline.tweets.len(),
            pinned = timeline.pinned.is_some(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched profile"
        );

        Ok(ProfileSnapshot { profile, timeline })
    }
}
