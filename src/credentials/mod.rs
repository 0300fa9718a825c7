use thiserror::Error;

/// Environment variable holding the RapidAPI key for the profile API
pub const ENV_RAPIDAPI_KEY: &str = "RAPIDAPI_KEY";

/// Environment variable holding the key for the chat completion API
pub const ENV_LLM_KEY: &str = "GROQ_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("{0} is not set. Export it in your shell before running.")]
    Missing(&'static str),
}

/// API keys needed for a live audit.
#[derive(Clone)]
pub struct Credentials {
    pub rapidapi_key: String,
    pub llm_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("rapidapi_key", &"<redacted>")
            .field("llm_api_key", &"<redacted>")
            .finish()
    }
}

/// Trimmed value of `var`, or None when unset or blank.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Credentials {
    pub fn from_env() -> Result<Self, CredentialError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialError> {
        let rapidapi_key =
            non_empty(&lookup, ENV_RAPIDAPI_KEY).ok_or(CredentialError::Missing(ENV_RAPIDAPI_KEY))?;
        let llm_api_key =
            non_empty(&lookup, ENV_LLM_KEY).ok_or(CredentialError::Missing(ENV_LLM_KEY))?;
        Ok(Self {
            rapidapi_key,
            llm_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_both_keys_present_and_trimmed() {
        let creds = Credentials::from_lookup(lookup(&[
            (ENV_RAPIDAPI_KEY, "  rapid-123 \n"),
            (ENV_LLM_KEY, "gsk_abc"),
        ]))
        .unwrap();
        assert_eq!(creds.rapidapi_key, "rapid-123");
        assert_eq!(creds.llm_api_key, "gsk_abc");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = Credentials::from_lookup(lookup(&[
            (ENV_RAPIDAPI_KEY, "   "),
            (ENV_LLM_KEY, "gsk_abc"),
        ]))
        .unwrap_err();
        assert_eq!(err, CredentialError::Missing(ENV_RAPIDAPI_KEY));
    }

    #[test]
    fn test_missing_llm_key() {
        let err = Credentials::from_lookup(lookup(&[(ENV_RAPIDAPI_KEY, "rapid")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LLM_KEY));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let creds = Credentials {
            rapidapi_key: "secret-a".to_string(),
            llm_api_key: "secret-b".to_string(),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("secret"));
    }
}
