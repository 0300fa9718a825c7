use serde::{Deserialize, Serialize};

const BASE_VALUE: f64 = 300.0;
const GROWING_VALUE: f64 = 500.0; // above 5k followers
const ESTABLISHED_VALUE: f64 = 800.0; // above 10k followers
const HIGH_ENGAGEMENT_RATE: f64 = 2.5;
const HIGH_ENGAGEMENT_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorPackage {
    pub name: String,
    pub price: String,
    pub description: String,
}

/// Sponsorship pricing derived from reach and engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetizationKit {
    pub projected_sponsor_value: String,
    pub packages: Vec<SponsorPackage>,
    pub pitch_email_snippet: String,
}

fn round_to_fifty(value: f64) -> u64 {
    ((value / 50.0).round() * 50.0) as u64
}

/// Projected price of one sponsored post in USD, before rounding.
pub fn projected_value(followers: u64, engagement_rate: f64) -> f64 {
    let mut value = if followers > 10_000 {
        ESTABLISHED_VALUE
    } else if followers > 5_000 {
        GROWING_VALUE
    } else {
        BASE_VALUE
    };
    if engagement_rate > HIGH_ENGAGEMENT_RATE {
        value *= HIGH_ENGAGEMENT_MULTIPLIER;
    }
    value
}

impl MonetizationKit {
    pub fn build(followers: u64, engagement_rate: f64, niche: &str) -> Self {
        let value = projected_value(followers, engagement_rate);
        let package = |name: &str, multiplier: f64, description: &str| SponsorPackage {
            name: name.to_string(),
            price: format!("${}", round_to_fifty(value * multiplier)),
            description: description.to_string(),
        };

        Self {
            projected_sponsor_value: format!("${} USD", round_to_fifty(value)),
            packages: vec![
                package("Standard Tweet", 0.6, "1 dedicated post"),
                package("Pinned Thread", 1.5, "1 thread (3-5 posts) pinned for 3 days"),
                package("Full Campaign", 3.0, "3 posts and 1 bio mention over 1 week"),
            ],
            pitch_email_snippet: format!(
                "Hi [Brand Contact], I saw your recent launch and noticed a strong fit with my audience ({}, {}% ER). I have a 3-tier package built to drive qualified leads...",
                niche, engagement_rate
            ),
        }
    }
}
