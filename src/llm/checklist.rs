use async_trait::async_trait;
use serde::Serialize;

use super::prompts::AUDIT_SYSTEM_PROMPT;
use super::{LlmClient, LlmError};
use crate::scoring::ChecklistResult;

/// What the classifier sees of a profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChecklistPayload {
    pub bio: String,
    pub pinned_text: String,
    pub recent_tweets: Vec<String>,
    pub follower_count: u64,
    pub profile_image_url: String,
}

/// Source of the qualitative checklist.
#[async_trait]
pub trait ChecklistProvider: Send + Sync {
    async fn checklist(&self, payload: &ChecklistPayload) -> Result<ChecklistResult, LlmError>;
}

#[async_trait]
impl ChecklistProvider for LlmClient {
    async fn checklist(&self, payload: &ChecklistPayload) -> Result<ChecklistResult, LlmError> {
        let user_prompt = serde_json::to_string(payload)
            .map_err(|e| LlmError::Parse(format!("Failed to serialize payload: {}", e)))?;
        self.chat_json(AUDIT_SYSTEM_PROMPT, user_prompt, 0.0).await
    }
}
