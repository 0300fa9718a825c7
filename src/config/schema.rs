use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::scoring::{validate_scoring, ScoringConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub profile_api: ProfileApiSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

/// Expiry of each cache namespace, as humantime strings ("10m", "1h").
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Finished audit reports (default: 10m)
    #[serde(default = "default_result_ttl")]
    pub result_ttl: String,

    /// Raw profile context kept for pro content (default: 1h)
    #[serde(default = "default_context_ttl")]
    pub context_ttl: String,

    /// Generated pro content (default: 30m)
    #[serde(default = "default_pro_ttl")]
    pub pro_ttl: String,
}

fn default_true() -> bool {
    true
}

fn default_result_ttl() -> String {
    "10m".to_string()
}

fn default_context_ttl() -> String {
    "1h".to_string()
}

fn default_pro_ttl() -> String {
    "30m".to_string()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            result_ttl: default_result_ttl(),
            context_ttl: default_context_ttl(),
            pro_ttl: default_pro_ttl(),
        }
    }
}

/// Parsed cache expiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub result: Duration,
    pub context: Duration,
    pub pro: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            result: Duration::from_secs(10 * 60),
            context: Duration::from_secs(60 * 60),
            pro: Duration::from_secs(30 * 60),
        }
    }
}

impl CacheSettings {
    pub fn ttls(&self) -> Result<CacheTtls, Vec<String>> {
        let mut errors = Vec::new();
        let mut parse = |field: &str, value: &str| match humantime::parse_duration(value) {
            Ok(d) if !d.is_zero() => d,
            Ok(_) => {
                errors.push(format!("cache.{}: must be greater than zero", field));
                Duration::ZERO
            }
            Err(e) => {
                errors.push(format!("cache.{}: invalid duration '{}' - {}", field, value, e));
                Duration::ZERO
            }
        };

        let ttls = CacheTtls {
            result: parse("result_ttl", &self.result_ttl),
            context: parse("context_ttl", &self.context_ttl),
            pro: parse("pro_ttl", &self.pro_ttl),
        };

        if errors.is_empty() {
            Ok(ttls)
        } else {
            Err(errors)
        }
    }
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LlmSettings {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileApiSettings {
    /// RapidAPI host, also sent as `x-rapidapi-host`
    #[serde(default = "default_profile_host")]
    pub host: String,

    /// Recent posts requested per audit
    #[serde(default = "default_tweet_count")]
    pub tweet_count: u32,
}

fn default_profile_host() -> String {
    "twitter241.p.rapidapi.com".to_string()
}

fn default_tweet_count() -> u32 {
    20
}

impl Default for ProfileApiSettings {
    fn default() -> Self {
        Self {
            host: default_profile_host(),
            tweet_count: default_tweet_count(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

impl Config {
    /// Check every section, collecting all problems.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_scoring(&self.scoring) {
            errors.extend(e);
        }
        if let Err(e) = self.cache.ttls() {
            errors.extend(e);
        }
        if self.profile_api.tweet_count == 0 || self.profile_api.tweet_count > 100 {
            errors.push(format!(
                "profile_api.tweet_count: must be between 1 and 100, got {}",
                self.profile_api.tweet_count
            ));
        }
        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr: '{}' is not a socket address",
                self.server.addr
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
