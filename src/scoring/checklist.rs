use serde::{Deserialize, Deserializer, Serialize};

use super::rules::RuleKey;

/// Qualitative yes/no assessment of a profile, as returned by the classifier.
///
/// Every leaf defaults to `false` so a partial answer still deserializes; a
/// missing leaf simply fails its rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistResult {
    #[serde(deserialize_with = "null_as_default")]
    pub niche: NicheChecks,
    #[serde(deserialize_with = "null_as_default")]
    pub content: ContentChecks,
    #[serde(deserialize_with = "null_as_default")]
    pub offer: OfferChecks,
    #[serde(deserialize_with = "null_as_default")]
    pub monetization: MonetizationChecks,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: ChecklistSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicheChecks {
    #[serde(deserialize_with = "lenient_bool")]
    pub defines_target_audience: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub solves_specific_problem: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_authority_numbers: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub no_generic_buzzwords: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub clear_role_title: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub professional_tone: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub consistent_branding: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_actually_authority: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentChecks {
    #[serde(deserialize_with = "lenient_bool")]
    pub consistent_topic: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub uses_hooks: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub uses_line_breaks: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub educational_value: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub engages_questions: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub minimal_hashtags: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub personal_stories: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub no_external_links_in_tweets: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_value_dense: bool,
    /// Text-first writer whose feed is deliberately visual-free.
    #[serde(deserialize_with = "lenient_bool")]
    pub is_writer_archetype: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferChecks {
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_is_high_value: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_relates_to_bio: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_has_social_proof: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub bio_promise_result: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_is_not_just_life_update: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_has_visuals: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonetizationChecks {
    #[serde(deserialize_with = "lenient_bool")]
    pub link_is_lead_magnet: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub pinned_has_cta: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub sells_outcome_not_feature: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub dm_open_signal: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub has_urgency: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub target_audience: String,
    #[serde(deserialize_with = "lenient_string")]
    pub best_tweet_hook: String,
}

impl ChecklistResult {
    /// All-false checklist with empty summary. Scores low but valid.
    pub fn safe_default() -> Self {
        Self::default()
    }

    /// Checklist with every scored leaf set to `value`. Summary stays empty.
    pub fn uniform(value: bool) -> Self {
        Self {
            niche: NicheChecks {
                defines_target_audience: value,
                solves_specific_problem: value,
                has_authority_numbers: value,
                no_generic_buzzwords: value,
                clear_role_title: value,
                professional_tone: value,
                consistent_branding: value,
                is_actually_authority: value,
            },
            content: ContentChecks {
                consistent_topic: value,
                uses_hooks: value,
                uses_line_breaks: value,
                educational_value: value,
                engages_questions: value,
                minimal_hashtags: value,
                personal_stories: value,
                no_external_links_in_tweets: value,
                is_value_dense: value,
                is_writer_archetype: false,
            },
            offer: OfferChecks {
                pinned_is_high_value: value,
                pinned_relates_to_bio: value,
                pinned_has_social_proof: value,
                bio_promise_result: value,
                pinned_is_not_just_life_update: value,
                pinned_has_visuals: value,
            },
            monetization: MonetizationChecks {
                link_is_lead_magnet: value,
                pinned_has_cta: value,
                sells_outcome_not_feature: value,
                dm_open_signal: value,
                has_urgency: value,
            },
            summary: ChecklistSummary::default(),
        }
    }

    /// Answer for one rubric criterion.
    pub fn get(&self, key: RuleKey) -> bool {
        use RuleKey::*;
        match key {
            DefinesTargetAudience => self.niche.defines_target_audience,
            SolvesSpecificProblem => self.niche.solves_specific_problem,
            HasAuthorityNumbers => self.niche.has_authority_numbers,
            NoGenericBuzzwords => self.niche.no_generic_buzzwords,
            ClearRoleTitle => self.niche.clear_role_title,
            ProfessionalTone => self.niche.professional_tone,
            ConsistentBranding => self.niche.consistent_branding,
            IsActuallyAuthority => self.niche.is_actually_authority,
            ConsistentTopic => self.content.consistent_topic,
            UsesHooks => self.content.uses_hooks,
            UsesLineBreaks => self.content.uses_line_breaks,
            EducationalValue => self.content.educational_value,
            EngagesQuestions => self.content.engages_questions,
            MinimalHashtags => self.content.minimal_hashtags,
            PersonalStories => self.content.personal_stories,
            NoExternalLinksInTweets => self.content.no_external_links_in_tweets,
            IsValueDense => self.content.is_value_dense,
            PinnedIsHighValue => self.offer.pinned_is_high_value,
            PinnedRelatesToBio => self.offer.pinned_relates_to_bio,
            PinnedHasSocialProof => self.offer.pinned_has_social_proof,
            BioPromiseResult => self.offer.bio_promise_result,
            PinnedIsNotJustLifeUpdate => self.offer.pinned_is_not_just_life_update,
            PinnedHasVisuals => self.offer.pinned_has_visuals,
            LinkIsLeadMagnet => self.monetization.link_is_lead_magnet,
            PinnedHasCta => self.monetization.pinned_has_cta,
            SellsOutcomeNotFeature => self.monetization.sells_outcome_not_feature,
            DmOpenSignal => self.monetization.dm_open_signal,
            HasUrgency => self.monetization.has_urgency,
        }
    }

    pub fn set(&mut self, key: RuleKey, value: bool) {
        use RuleKey::*;
        let slot = match key {
            DefinesTargetAudience => &mut self.niche.defines_target_audience,
            SolvesSpecificProblem => &mut self.niche.solves_specific_problem,
            HasAuthorityNumbers => &mut self.niche.has_authority_numbers,
            NoGenericBuzzwords => &mut self.niche.no_generic_buzzwords,
            ClearRoleTitle => &mut self.niche.clear_role_title,
            ProfessionalTone => &mut self.niche.professional_tone,
            ConsistentBranding => &mut self.niche.consistent_branding,
            IsActuallyAuthority => &mut self.niche.is_actually_authority,
            ConsistentTopic => &mut self.content.consistent_topic,
            UsesHooks => &mut self.content.uses_hooks,
            UsesLineBreaks => &mut self.content.uses_line_breaks,
            EducationalValue => &mut self.content.educational_value,
            EngagesQuestions => &mut self.content.engages_questions,
            MinimalHashtags => &mut self.content.minimal_hashtags,
            PersonalStories => &mut self.content.personal_stories,
            NoExternalLinksInTweets => &mut self.content.no_external_links_in_tweets,
            IsValueDense => &mut self.content.is_value_dense,
            PinnedIsHighValue => &mut self.offer.pinned_is_high_value,
            PinnedRelatesToBio => &mut self.offer.pinned_relates_to_bio,
            PinnedHasSocialProof => &mut self.offer.pinned_has_social_proof,
            BioPromiseResult => &mut self.offer.bio_promise_result,
            PinnedIsNotJustLifeUpdate => &mut self.offer.pinned_is_not_just_life_update,
            PinnedHasVisuals => &mut self.offer.pinned_has_visuals,
            LinkIsLeadMagnet => &mut self.monetization.link_is_lead_magnet,
            PinnedHasCta => &mut self.monetization.pinned_has_cta,
            SellsOutcomeNotFeature => &mut self.monetization.sells_outcome_not_feature,
            DmOpenSignal => &mut self.monetization.dm_open_signal,
            HasUrgency => &mut self.monetization.has_urgency,
        };
        *slot = value;
    }
}

/// Small models sometimes answer `"true"`, `1` or `null` instead of a JSON
/// boolean. Anything not recognisably true is false.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        serde_json::Value::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
        }
        _ => false,
    })
}

/// Summary text that is `null` or not a string reads as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// A `null` category counts as all-false instead of failing the whole answer.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RuleTable;

    #[test]
    fn test_missing_leaves_default_to_false() {
        let json = r#"{
            "niche": { "clear_role_title": true },
            "summary": { "target_audience": "Founders" }
        }"#;
        let checklist: ChecklistResult = serde_json::from_str(json).unwrap();
        assert!(checklist.niche.clear_role_title);
        assert!(!checklist.niche.defines_target_audience);
        assert!(!checklist.content.uses_hooks);
        assert_eq!(checklist.summary.target_audience, "Founders");
        assert_eq!(checklist.summary.best_tweet_hook, "");
    }

    #[test]
    fn test_empty_object_is_safe_default() {
        let checklist: ChecklistResult = serde_json::from_str("{}").unwrap();
        assert_eq!(checklist, ChecklistResult::safe_default());
    }

    #[test]
    fn test_lenient_bool_values() {
        let json = r#"{ "offer": {
            "pinned_is_high_value": "true",
            "pinned_relates_to_bio": 1,
            "pinned_has_social_proof": "no",
            "bio_promise_result": null,
            "pinned_has_visuals": "YES"
        } }"#;
        let checklist: ChecklistResult = serde_json::from_str(json).unwrap();
        assert!(checklist.offer.pinned_is_high_value);
        assert!(checklist.offer.pinned_relates_to_bio);
        assert!(!checklist.offer.pinned_has_social_proof);
        assert!(!checklist.offer.bio_promise_result);
        assert!(checklist.offer.pinned_has_visuals);
    }

    #[test]
    fn test_null_summary_keeps_answers() {
        let json = r#"{
            "niche": { "clear_role_title": true },
            "summary": { "target_audience": null, "best_tweet_hook": 42 }
        }"#;
        let checklist: ChecklistResult = serde_json::from_str(json).unwrap();
        assert!(checklist.niche.clear_role_title);
        assert_eq!(checklist.summary, ChecklistSummary::default());

        let json = r#"{ "content": { "uses_hooks": true }, "summary": null }"#;
        let checklist: ChecklistResult = serde_json::from_str(json).unwrap();
        assert!(checklist.content.uses_hooks);
        assert_eq!(checklist.summary.target_audience, "");
    }

    #[test]
    fn test_null_category_reads_all_false() {
        let json = r#"{
            "offer": { "pinned_is_high_value": true },
            "monetization": null,
            "summary": { "target_audience": "Founders" }
        }"#;
        let checklist: ChecklistResult = serde_json::from_str(json).unwrap();
        assert!(checklist.offer.pinned_is_high_value);
        assert_eq!(checklist.monetization, MonetizationChecks::default());
        assert_eq!(checklist.summary.target_audience, "Founders");
    }

    #[test]
    fn test_get_covers_every_rule_key() {
        let all_true = ChecklistResult::uniform(true);
        let all_false = ChecklistResult::uniform(false);
        for entry in RuleTable::standard().iter() {
            assert!(all_true.get(entry.key), "{} should read true", entry.key);
            assert!(!all_false.get(entry.key), "{} should read false", entry.key);
        }
    }
}
