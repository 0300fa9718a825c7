use serde::{Deserialize, Serialize};
use std::fmt;

/// Rubric category. Evaluation order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Niche,
    Content,
    Offer,
    Monetization,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Niche,
        Category::Content,
        Category::Offer,
        Category::Monetization,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Niche => "Niche",
            Category::Content => "Content",
            Category::Offer => "Offer",
            Category::Monetization => "Monetization",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of one checklist leaf that the rubric scores.
///
/// Every variant belongs to exactly one category and maps to exactly one
/// boolean on [`ChecklistResult`](super::ChecklistResult), see
/// [`ChecklistResult::get`](super::ChecklistResult::get).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKey {
    // niche
    DefinesTargetAudience,
    SolvesSpecificProblem,
    HasAuthorityNumbers,
    NoGenericBuzzwords,
    ClearRoleTitle,
    ProfessionalTone,
    ConsistentBranding,
    IsActuallyAuthority,
    // content
    ConsistentTopic,
    UsesHooks,
    UsesLineBreaks,
    EducationalValue,
    EngagesQuestions,
    MinimalHashtags,
    PersonalStories,
    NoExternalLinksInTweets,
    IsValueDense,
    // offer
    PinnedIsHighValue,
    PinnedRelatesToBio,
    PinnedHasSocialProof,
    BioPromiseResult,
    PinnedIsNotJustLifeUpdate,
    PinnedHasVisuals,
    // monetization
    LinkIsLeadMagnet,
    PinnedHasCta,
    SellsOutcomeNotFeature,
    DmOpenSignal,
    HasUrgency,
}

impl RuleKey {
    pub fn category(&self) -> Category {
        use RuleKey::*;
        match self {
            DefinesTargetAudience | SolvesSpecificProblem | HasAuthorityNumbers
            | NoGenericBuzzwords | ClearRoleTitle | ProfessionalTone | ConsistentBranding
            | IsActuallyAuthority => Category::Niche,
            ConsistentTopic | UsesHooks | UsesLineBreaks | EducationalValue | EngagesQuestions
            | MinimalHashtags | PersonalStories | NoExternalLinksInTweets | IsValueDense => {
                Category::Content
            }
            PinnedIsHighValue | PinnedRelatesToBio | PinnedHasSocialProof | BioPromiseResult
            | PinnedIsNotJustLifeUpdate | PinnedHasVisuals => Category::Offer,
            LinkIsLeadMagnet | PinnedHasCta | SellsOutcomeNotFeature | DmOpenSignal
            | HasUrgency => Category::Monetization,
        }
    }

    /// Kill-switch keys never add points. They gate the whole category instead.
    pub fn is_kill_switch(&self) -> bool {
        matches!(self, RuleKey::IsActuallyAuthority | RuleKey::IsValueDense)
    }

    /// Name of the checklist leaf, as the classifier returns it.
    pub fn as_str(&self) -> &'static str {
        use RuleKey::*;
        match self {
            DefinesTargetAudience => "defines_target_audience",
            SolvesSpecificProblem => "solves_specific_problem",
            HasAuthorityNumbers => "has_authority_numbers",
            NoGenericBuzzwords => "no_generic_buzzwords",
            ClearRoleTitle => "clear_role_title",
            ProfessionalTone => "professional_tone",
            ConsistentBranding => "consistent_branding",
            IsActuallyAuthority => "is_actually_authority",
            ConsistentTopic => "consistent_topic",
            UsesHooks => "uses_hooks",
            UsesLineBreaks => "uses_line_breaks",
            EducationalValue => "educational_value",
            EngagesQuestions => "engages_questions",
            MinimalHashtags => "minimal_hashtags",
            PersonalStories => "personal_stories",
            NoExternalLinksInTweets => "no_external_links_in_tweets",
            IsValueDense => "is_value_dense",
            PinnedIsHighValue => "pinned_is_high_value",
            PinnedRelatesToBio => "pinned_relates_to_bio",
            PinnedHasSocialProof => "pinned_has_social_proof",
            BioPromiseResult => "bio_promise_result",
            PinnedIsNotJustLifeUpdate => "pinned_is_not_just_life_update",
            PinnedHasVisuals => "pinned_has_visuals",
            LinkIsLeadMagnet => "link_is_lead_magnet",
            PinnedHasCta => "pinned_has_cta",
            SellsOutcomeNotFeature => "sells_outcome_not_feature",
            DmOpenSignal => "dm_open_signal",
            HasUrgency => "has_urgency",
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored criterion. `leak` and `tip` are shown when the criterion fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub key: RuleKey,
    pub weight: u32,
    pub leak: &'static str,
    pub tip: &'static str,
}

const fn rule(key: RuleKey, weight: u32, leak: &'static str, tip: &'static str) -> RuleEntry {
    RuleEntry { key, weight, leak, tip }
}

#[rustfmt::skip]
const NICHE_RULES: &[RuleEntry] = &[
    rule(RuleKey::DefinesTargetAudience, 5, "Audience Invisible: Bio doesn't name WHO you help.", "Add 'for [Target Audience]' to your bio."),
    rule(RuleKey::SolvesSpecificProblem, 5, "Self-Centered Bio: You talk about yourself, not their problems.", "Rewrite Bio: 'I help [Avatar] fix [Problem]'."),
    rule(RuleKey::HasAuthorityNumbers, 5, "Zero Authority: Bio lacks achieved results.", "Show PROOF (Revenue, Users), not just Goals."),
    rule(RuleKey::NoGenericBuzzwords, 3, "Cliché Alert: 'Enthusiast/Lover' is weak.", "Replace fluff with hard skills."),
    rule(RuleKey::ClearRoleTitle, 2, "Mystery Profile: What is your job?", "State your title (e.g. Founder)."),
    rule(RuleKey::ProfessionalTone, 2, "Amateur formatting.", "Clean up bio grammar."),
    rule(RuleKey::ConsistentBranding, 1, "Name mismatch.", "Align Name & Handle."),
    rule(RuleKey::IsActuallyAuthority, 0, "Fake Authority: You are listing goals, not wins.", "Remove 'Road to X' from bio. Put it in a tweet."),
];

#[rustfmt::skip]
const CONTENT_RULES: &[RuleEntry] = &[
    rule(RuleKey::ConsistentTopic, 5, "Content Scatter: Too many topics.", "Focus on ONE niche."),
    rule(RuleKey::UsesHooks, 5, "Weak Openers: Tweets start boringly.", "Start with a conflict/question."),
    rule(RuleKey::UsesLineBreaks, 3, "Wall of Text.", "Use spacing."),
    rule(RuleKey::EducationalValue, 5, "Diary Content: Updates are not value.", "Teach 'How-to', don't just say 'I did this'."),
    rule(RuleKey::EngagesQuestions, 3, "Broadcasting: No engagement.", "End tweets with a question."),
    rule(RuleKey::MinimalHashtags, 2, "Hashtag Spam.", "Max 2 tags."),
    rule(RuleKey::PersonalStories, 3, "Robotic Tone.", "Share personal lessons."),
    rule(RuleKey::NoExternalLinksInTweets, 3, "Reach Killer: Links in main tweets.", "Put links in the replies."),
    rule(RuleKey::IsValueDense, 0, "Low Value Signal: Your tweets are just noise/updates.", "Stop posting updates. Start posting frameworks."),
];

#[rustfmt::skip]
const OFFER_RULES: &[RuleEntry] = &[
    rule(RuleKey::PinnedIsHighValue, 6, "Weak Pinned Tweet: Just an update?", "Pin a Guide/Case Study."),
    rule(RuleKey::PinnedRelatesToBio, 4, "Disconnected Pin.", "Match Pin to Bio."),
    rule(RuleKey::PinnedHasSocialProof, 5, "No Proof in Pin.", "Add screenshots."),
    rule(RuleKey::BioPromiseResult, 4, "Bio promises nothing.", "Promise a specific outcome."),
    rule(RuleKey::PinnedIsNotJustLifeUpdate, 4, "Pinned a Life Update?", "Pin a resource."),
    rule(RuleKey::PinnedHasVisuals, 3, "Text-only Pin.", "Add an image."),
];

#[rustfmt::skip]
const MONETIZATION_RULES: &[RuleEntry] = &[
    rule(RuleKey::LinkIsLeadMagnet, 7, "Funnel Leak: Generic Home/Linktree.", "Link to a Squeeze Page."),
    rule(RuleKey::PinnedHasCta, 4, "No CTA in Pin.", "Add 'DM me' or 'Click below'."),
    rule(RuleKey::SellsOutcomeNotFeature, 3, "Feature Selling.", "Sell the result."),
    rule(RuleKey::DmOpenSignal, 3, "No DM signal.", "Encourage DMs."),
    rule(RuleKey::HasUrgency, 2, "Passive Offer.", "Add urgency."),
];

/// Static rubric, one rule list per category.
///
/// The table is plain data: the engine iterates whatever entries it is given,
/// so criteria can be added or removed here without touching composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    niche: Vec<RuleEntry>,
    content: Vec<RuleEntry>,
    offer: Vec<RuleEntry>,
    monetization: Vec<RuleEntry>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleTable {
    /// The production rubric.
    pub fn standard() -> Self {
        Self {
            niche: NICHE_RULES.to_vec(),
            content: CONTENT_RULES.to_vec(),
            offer: OFFER_RULES.to_vec(),
            monetization: MONETIZATION_RULES.to_vec(),
        }
    }

    /// Build a table from arbitrary entries. Each entry lands in the category
    /// its key belongs to, keeping the given order.
    pub fn from_entries(entries: impl IntoIterator<Item = RuleEntry>) -> Self {
        let mut table = Self {
            niche: Vec::new(),
            content: Vec::new(),
            offer: Vec::new(),
            monetization: Vec::new(),
        };
        for entry in entries {
            match entry.key.category() {
                Category::Niche => table.niche.push(entry),
                Category::Content => table.content.push(entry),
                Category::Offer => table.offer.push(entry),
                Category::Monetization => table.monetization.push(entry),
            }
        }
        table
    }

    pub fn rules(&self, category: Category) -> &[RuleEntry] {
        match category {
            Category::Niche => &self.niche,
            Category::Content => &self.content,
            Category::Offer => &self.offer,
            Category::Monetization => &self.monetization,
        }
    }

    pub fn entry(&self, key: RuleKey) -> Option<&RuleEntry> {
        self.rules(key.category()).iter().find(|e| e.key == key)
    }

    /// Sum of additive weights in a category (kill switches excluded).
    pub fn max_weight(&self, category: Category) -> u32 {
        self.rules(category)
            .iter()
            .filter(|e| !e.key.is_kill_switch())
            .map(|e| e.weight)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        Category::ALL.into_iter().flat_map(move |c| self.rules(c).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_keys_live_in_their_category() {
        let table = RuleTable::standard();
        for category in Category::ALL {
            for entry in table.rules(category) {
                assert_eq!(entry.key.category(), category, "{} misplaced", entry.key);
            }
        }
    }

    #[test]
    fn test_standard_table_weights() {
        let table = RuleTable::standard();
        assert_eq!(table.max_weight(Category::Niche), 23);
        assert_eq!(table.max_weight(Category::Content), 29);
        assert_eq!(table.max_weight(Category::Offer), 26);
        assert_eq!(table.max_weight(Category::Monetization), 19);
    }

    #[test]
    fn test_kill_switches_carry_zero_weight() {
        let table = RuleTable::standard();
        let kill: Vec<_> = table.iter().filter(|e| e.key.is_kill_switch()).collect();
        assert_eq!(kill.len(), 2);
        assert!(kill.iter().all(|e| e.weight == 0));
    }

    #[test]
    fn test_from_entries_routes_by_category() {
        let table = RuleTable::from_entries(vec![
            rule(RuleKey::HasUrgency, 9, "leak", "tip"),
            rule(RuleKey::UsesHooks, 1, "leak", "tip"),
        ]);
        assert_eq!(table.rules(Category::Monetization).len(), 1);
        assert_eq!(table.rules(Category::Content).len(), 1);
        assert!(table.rules(Category::Niche).is_empty());
        assert_eq!(table.max_weight(Category::Monetization), 9);
    }

    #[test]
    fn test_rule_key_serde_name_matches_as_str() {
        let json = serde_json::to_string(&RuleKey::NoExternalLinksInTweets).unwrap();
        assert_eq!(json, "\"no_external_links_in_tweets\"");
    }
}
