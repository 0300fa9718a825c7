//! Minimal client for an OpenAI-compatible chat completion endpoint, used in
//! JSON mode for the audit checklist and the pro content.

pub mod checklist;
pub mod prompts;

pub use checklist::{ChecklistPayload, ChecklistProvider};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmSettings;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, empty answer)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

impl ChatResponseRaw {
    fn into_content(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::Api("Empty response from model".into()))
    }
}

#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: impl Into<String>, settings: &LlmSettings) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat completion in JSON mode, deserialized into `T`.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
    ) -> Result<T, LlmError> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "LLM API error");
            return Err(LlmError::Api(format!("{}: {}", status, error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        let content = raw.into_content()?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "LLM chat completion"
        );

        parse_json_content(&content)
    }
}

/// Models in JSON mode occasionally wrap the object in a code fence.
fn parse_json_content<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim())
        .map_err(|e| LlmError::Parse(format!("Failed to deserialize response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![Message::system("sys"), Message::user("usr")],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.1-8b-instant");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_empty_choices_is_api_error() {
        let raw: ChatResponseRaw = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(raw.into_content(), Err(LlmError::Api(_))));

        let raw: ChatResponseRaw =
            serde_json::from_value(json!({ "choices": [ { "message": { "content": null } } ] }))
                .unwrap();
        assert!(matches!(raw.into_content(), Err(LlmError::Api(_))));
    }

    #[test]
    fn test_parse_json_content_handles_fences() {
        let plain: serde_json::Value = parse_json_content(r#"{"a": 1}"#).unwrap();
        assert_eq!(plain["a"], 1);

        let fenced: serde_json::Value = parse_json_content("```json\n{\"a\": 2}\n```").unwrap();
        assert_eq!(fenced["a"], 2);

        assert!(matches!(
            parse_json_content::<serde_json::Value>("not json"),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let settings = LlmSettings {
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            ..Default::default()
        };
        let client = LlmClient::new("key", &settings);
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(client.model(), "llama-3.1-8b-instant");
    }
}
