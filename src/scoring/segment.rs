use serde::{Deserialize, Serialize};

use super::config::ScoringParams;
use super::rules::RuleKey;

/// Follower-count tier of the audited account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSegment {
    Standard,
    /// Micro-influencer.
    MidTier,
    /// Whale.
    TopTier,
}

/// Rules a top-tier account passes automatically. Reach already proves what
/// these criteria try to detect.
const TOP_TIER_PRIVILEGES: &[RuleKey] = &[
    RuleKey::DefinesTargetAudience,
    RuleKey::ClearRoleTitle,
    RuleKey::ProfessionalTone,
    RuleKey::NoGenericBuzzwords,
    RuleKey::UsesLineBreaks,
    RuleKey::MinimalHashtags,
    RuleKey::EngagesQuestions,
    RuleKey::PinnedHasSocialProof,
    RuleKey::PinnedHasVisuals,
    RuleKey::BioPromiseResult,
    RuleKey::LinkIsLeadMagnet,
    RuleKey::PinnedHasCta,
];

const MID_TIER_PRIVILEGES: &[RuleKey] = &[
    RuleKey::ProfessionalTone,
    RuleKey::UsesLineBreaks,
    RuleKey::MinimalHashtags,
];

impl UserSegment {
    pub fn classify(follower_count: u64, params: &ScoringParams) -> Self {
        if follower_count >= params.top_tier_followers {
            UserSegment::TopTier
        } else if follower_count >= params.mid_tier_followers {
            UserSegment::MidTier
        } else {
            UserSegment::Standard
        }
    }

    /// Rule keys auto-passed for this tier when the checklist says false.
    pub fn privileges(&self) -> &'static [RuleKey] {
        match self {
            UserSegment::TopTier => TOP_TIER_PRIVILEGES,
            UserSegment::MidTier => MID_TIER_PRIVILEGES,
            UserSegment::Standard => &[],
        }
    }

    pub fn is_privileged(&self, key: RuleKey) -> bool {
        self.privileges().contains(&key)
    }

    /// Mid tier or above.
    pub fn is_established(&self) -> bool {
        *self >= UserSegment::MidTier
    }

    pub fn is_top_tier(&self) -> bool {
        *self == UserSegment::TopTier
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserSegment::Standard => "standard",
            UserSegment::MidTier => "micro-influencer",
            UserSegment::TopTier => "whale",
        }
    }
}

/// Curated growth tactics that replace the tip list for top-tier accounts.
pub const TOP_TIER_TIP_POOL: &[&str] = &[
    "Turn your best-performing thread into a paid cohort or workshop.",
    "Launch a newsletter and move your audience onto a channel you own.",
    "Run a quarterly collab with an account in an adjacent niche.",
    "Productize your most-asked question into a low-ticket digital offer.",
    "Hire a ghost-editor and repurpose every viral post into long-form.",
    "Host a monthly Space and clip the best moments into posts.",
    "Package sponsorship slots and sell them a quarter in advance.",
    PLATEAU_TIP,
];

/// Injected when filtering leaves a top-tier account with nothing to fix.
pub const PLATEAU_LEAK: &str = "Growth Plateau: Your reach is saturated inside your current niche.";
pub const PLATEAU_TIP: &str = "Open a second content pillar to reach an adjacent audience.";

/// Lower-cased markers of superficial complaints (bio wording, formatting,
/// visuals). Top-tier accounts never see rule leaks containing them.
pub const SUPERFICIAL_MARKERS: &[&str] = &[
    "bio doesn't",
    "self-centered bio",
    "bio lacks",
    "bio promises",
    "bio grammar",
    "format",
    "visual",
    "text-only",
    "wall of text",
    "hashtag",
    "cliché",
    "name mismatch",
];

/// Lower-cased markers of visual complaints. Writer archetypes never see them.
pub const VISUAL_MARKERS: &[&str] = &["visual", "text-only", "image"];

pub fn matches_any(text: &str, markers: &[&str]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}
