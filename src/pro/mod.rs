pub mod monetization;

pub use monetization::{MonetizationKit, SponsorPackage};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::llm::prompts::pro_fixes_system_prompt;
use crate::llm::{LlmClient, LlmError};

const DEFAULT_HIGHEST_IMPACT_COUNT: u32 = 5;
const DEFAULT_FORMAT_PERCENTAGE: u32 = 70;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BioDraft {
    pub title: String,
    pub content: String,
}

/// Copy and growth fixes for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProFixes {
    pub content_hook: String,
    #[serde(deserialize_with = "lenient_count")]
    pub highest_impact_count: u32,
    pub bio_drafts: Vec<BioDraft>,
    pub content_format: String,
    #[serde(deserialize_with = "lenient_percentage")]
    pub format_percentage: u32,
    pub pinned_tweet_copy: String,
    pub next_tweet_ideas: Vec<String>,
}

impl Default for ProFixes {
    fn default() -> Self {
        Self {
            content_hook: String::new(),
            highest_impact_count: DEFAULT_HIGHEST_IMPACT_COUNT,
            bio_drafts: Vec::new(),
            content_format: String::new(),
            format_percentage: DEFAULT_FORMAT_PERCENTAGE,
            pinned_tweet_copy: String::new(),
            next_tweet_ideas: Vec::new(),
        }
    }
}

fn draft(title: &str, content: &str) -> BioDraft {
    BioDraft {
        title: title.to_string(),
        content: content.to_string(),
    }
}

impl ProFixes {
    /// Static content returned when generation fails.
    pub fn fallback() -> Self {
        Self {
            content_hook: "The 'Foundational Content' Framework".to_string(),
            highest_impact_count: 3,
            bio_drafts: vec![
                draft(
                    "Bio Draft 1 (Fallback)",
                    "Helping creators stop losing followers and start earning with X. Get your free audit now.",
                ),
                draft(
                    "Bio Draft 2 (Fallback)",
                    "I share the exact playbooks I use to grow a product and an audience in public.",
                ),
                draft(
                    "Bio Draft 3 (Fallback)",
                    "Turning X profiles into lead machines. Founder | Read my threads.",
                ),
            ],
            content_format: "Short-form actionable tips (1-2 sentences) with line breaks."
                .to_string(),
            format_percentage: DEFAULT_FORMAT_PERCENTAGE,
            pinned_tweet_copy:
                "Pin your best result here: one number, one lesson, one call to action."
                    .to_string(),
            next_tweet_ideas: vec![
                "Share a tool you can't live without.".to_string(),
                "Ask a contrarian question about your niche.".to_string(),
                "Post one specific business metric.".to_string(),
                "Quote-reply a well-known builder with your take.".to_string(),
                "Write a short tutorial on a problem you solved this week.".to_string(),
            ],
        }
    }
}

/// Models sometimes return numbers as strings. Missing, zero or unreadable
/// values take the default, as do the percentages.
fn lenient_number<'de, D>(deserializer: D, default: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round().min(u32::MAX as f64) as u32)
        .unwrap_or(default))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_number(deserializer, DEFAULT_HIGHEST_IMPACT_COUNT)
}

fn lenient_percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_number(deserializer, DEFAULT_FORMAT_PERCENTAGE).map(|v| v.min(100))
}

/// Inputs for pro content, taken from the cached audit context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProPayload {
    pub bio: String,
    pub pinned_text: String,
    pub has_pinned: bool,
    pub recent_tweets: Vec<String>,
    pub niche: String,
}

#[derive(Serialize)]
struct ProPrompt<'a> {
    bio: &'a str,
    pinned_text: &'a str,
    recent_tweets: &'a [String],
    niche: &'a str,
}

#[async_trait]
pub trait ProFixesGenerator: Send + Sync {
    async fn pro_fixes(&self, payload: &ProPayload) -> Result<ProFixes, LlmError>;
}

#[async_trait]
impl ProFixesGenerator for LlmClient {
    async fn pro_fixes(&self, payload: &ProPayload) -> Result<ProFixes, LlmError> {
        let system_prompt = pro_fixes_system_prompt(&payload.pinned_text, payload.has_pinned);
        let user_prompt = serde_json::to_string(&ProPrompt {
            bio: &payload.bio,
            pinned_text: &payload.pinned_text,
            recent_tweets: &payload.recent_tweets,
            niche: &payload.niche,
        })
        .map_err(|e| LlmError::Parse(format!("Failed to serialize payload: {}", e)))?;

        self.chat_json(system_prompt, user_prompt, 0.1).await
    }
}
