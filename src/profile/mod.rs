pub mod client;
pub mod extract;
pub mod types;

pub use client::{ProfileClient, ProfileSource};
pub use extract::{avg_engagement_rate, hard_facts, normalize_handle, recent_texts};
pub use types::{Profile, ProfileSnapshot, Timeline, Tweet};

use thiserror::Error;

/// Errors from the profile API.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Handle fails the 1-15 character `[a-z0-9_]` rule
    #[error("Invalid handle '{0}': use 1-15 letters, digits or underscores")]
    InvalidHandle(String),

    /// The upstream lookup returned no user
    #[error("Profile @{0} not found")]
    NotFound(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Profile API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response JSON did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProfileError {
    /// Worth another attempt: network failures, rate limits and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            ProfileError::Network(_) => true,
            ProfileError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProfileError::Network("reset".into()).is_transient());
        assert!(ProfileError::Api { status: 503, message: String::new() }.is_transient());
        assert!(ProfileError::Api { status: 429, message: String::new() }.is_transient());
        assert!(!ProfileError::Api { status: 403, message: String::new() }.is_transient());
        assert!(!ProfileError::NotFound("x".into()).is_transient());
        assert!(!ProfileError::Parse("bad".into()).is_transient());
    }
}
