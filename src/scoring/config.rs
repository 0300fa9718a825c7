use serde::{Deserialize, Serialize};

/// Tunable knobs of the scoring engine.
///
/// The rubric itself (weights, leak and tip text) lives in
/// [`RuleTable`](super::RuleTable); this struct holds thresholds, caps and
/// policies. Each field is optional in YAML and falls back to the value in
/// [`ScoringConfig::default`].
///
/// Example YAML:
/// ```yaml
/// scoring:
///   top_tier_followers: 50000
///   mid_tier_followers: 10000
///   visual_threshold: 20
///   authority_cap: 0.5
///   top_tier_ceiling: 99
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Followers needed for the top tier (default: 50000)
    #[serde(default)]
    pub top_tier_followers: Option<u64>,

    /// Followers needed for the mid tier (default: 10000)
    #[serde(default)]
    pub mid_tier_followers: Option<u64>,

    /// Minimum percent of posts with media for the visuals bonus (default: 20)
    #[serde(default)]
    pub visual_threshold: Option<u8>,

    /// Fraction of niche max kept when authority is faked (default: 0.5)
    #[serde(default)]
    pub authority_cap: Option<f64>,

    /// Fraction of content max kept for low-value feeds (default: 0.4)
    #[serde(default)]
    pub value_density_cap: Option<f64>,

    /// Fraction of content max restored for writer archetypes (default: 0.8)
    #[serde(default)]
    pub writer_floor: Option<f64>,

    /// Niche points granted to mid tier and above when authority is unproven (default: 5)
    #[serde(default)]
    pub mid_tier_authority_bonus: Option<u32>,

    /// Points added to the total for top tier (default: 5)
    #[serde(default)]
    pub top_tier_bonus: Option<u32>,

    /// Highest total a top-tier bonus can reach (default: 99)
    #[serde(default)]
    pub top_tier_ceiling: Option<u32>,

    /// Leak list cap (default: 5)
    #[serde(default)]
    pub max_leaks: Option<usize>,

    /// Tip list cap (default: 5)
    #[serde(default)]
    pub max_tips: Option<usize>,

    /// Tips drawn from the growth pool for top tier (default: 3)
    #[serde(default)]
    pub top_tier_tip_samples: Option<usize>,
}

const DEFAULT_TOP_TIER_FOLLOWERS: u64 = 50_000;
const DEFAULT_MID_TIER_FOLLOWERS: u64 = 10_000;
const DEFAULT_VISUAL_THRESHOLD: u8 = 20;
const DEFAULT_AUTHORITY_CAP: f64 = 0.5;
const DEFAULT_VALUE_DENSITY_CAP: f64 = 0.4;
const DEFAULT_WRITER_FLOOR: f64 = 0.8;
const DEFAULT_MID_TIER_AUTHORITY_BONUS: u32 = 5;
const DEFAULT_TOP_TIER_BONUS: u32 = 5;
const DEFAULT_TOP_TIER_CEILING: u32 = 99;
const DEFAULT_MAX_LEAKS: usize = 5;
const DEFAULT_MAX_TIPS: usize = 5;
const DEFAULT_TOP_TIER_TIP_SAMPLES: usize = 3;

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_tier_followers: Some(DEFAULT_TOP_TIER_FOLLOWERS),
            mid_tier_followers: Some(DEFAULT_MID_TIER_FOLLOWERS),
            visual_threshold: Some(DEFAULT_VISUAL_THRESHOLD),
            authority_cap: Some(DEFAULT_AUTHORITY_CAP),
            value_density_cap: Some(DEFAULT_VALUE_DENSITY_CAP),
            writer_floor: Some(DEFAULT_WRITER_FLOOR),
            mid_tier_authority_bonus: Some(DEFAULT_MID_TIER_AUTHORITY_BONUS),
            top_tier_bonus: Some(DEFAULT_TOP_TIER_BONUS),
            top_tier_ceiling: Some(DEFAULT_TOP_TIER_CEILING),
            max_leaks: Some(DEFAULT_MAX_LEAKS),
            max_tips: Some(DEFAULT_MAX_TIPS),
            top_tier_tip_samples: Some(DEFAULT_TOP_TIER_TIP_SAMPLES),
        }
    }
}

/// [`ScoringConfig`] with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub top_tier_followers: u64,
    pub mid_tier_followers: u64,
    pub visual_threshold: u8,
    pub authority_cap: f64,
    pub value_density_cap: f64,
    pub writer_floor: f64,
    pub mid_tier_authority_bonus: u32,
    pub top_tier_bonus: u32,
    pub top_tier_ceiling: u32,
    pub max_leaks: usize,
    pub max_tips: usize,
    pub top_tier_tip_samples: usize,
}

impl ScoringConfig {
    pub fn params(&self) -> ScoringParams {
        ScoringParams {
            top_tier_followers: self.top_tier_followers.unwrap_or(DEFAULT_TOP_TIER_FOLLOWERS),
            mid_tier_followers: self.mid_tier_followers.unwrap_or(DEFAULT_MID_TIER_FOLLOWERS),
            visual_threshold: self.visual_threshold.unwrap_or(DEFAULT_VISUAL_THRESHOLD),
            authority_cap: self.authority_cap.unwrap_or(DEFAULT_AUTHORITY_CAP),
            value_density_cap: self.value_density_cap.unwrap_or(DEFAULT_VALUE_DENSITY_CAP),
            writer_floor: self.writer_floor.unwrap_or(DEFAULT_WRITER_FLOOR),
            mid_tier_authority_bonus: self
                .mid_tier_authority_bonus
                .unwrap_or(DEFAULT_MID_TIER_AUTHORITY_BONUS),
            top_tier_bonus: self.top_tier_bonus.unwrap_or(DEFAULT_TOP_TIER_BONUS),
            top_tier_ceiling: self.top_tier_ceiling.unwrap_or(DEFAULT_TOP_TIER_CEILING),
            max_leaks: self.max_leaks.unwrap_or(DEFAULT_MAX_LEAKS),
            max_tips: self.max_tips.unwrap_or(DEFAULT_MAX_TIPS),
            top_tier_tip_samples: self
                .top_tier_tip_samples
                .unwrap_or(DEFAULT_TOP_TIER_TIP_SAMPLES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.top_tier_followers, Some(50_000));
        assert_eq!(config.mid_tier_followers, Some(10_000));
        assert_eq!(config.visual_threshold, Some(20));
        assert_eq!(config.top_tier_ceiling, Some(99));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
top_tier_followers: 100000
top_tier_ceiling: 100
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.top_tier_followers, Some(100_000));
        assert_eq!(config.top_tier_ceiling, Some(100));
        assert!(config.mid_tier_followers.is_none());

        let params = config.params();
        assert_eq!(params.top_tier_followers, 100_000);
        assert_eq!(params.mid_tier_followers, 10_000);
        assert_eq!(params.top_tier_ceiling, 100);
    }

    #[test]
    fn test_empty_scoring_config_uses_defaults() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.authority_cap.is_none());
        assert_eq!(config.params(), ScoringConfig::default().params());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "base_score: 100\n";
        assert!(serde_saphyr::from_str::<ScoringConfig>(yaml).is_err());
    }
}
