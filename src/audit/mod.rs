//! End-to-end audit: fetch, extract, classify, score, cache.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{context_key, pro_key, report_key, ResultCache};
use crate::config::CacheTtls;
use crate::llm::{ChecklistPayload, ChecklistProvider};
use crate::pro::{MonetizationKit, ProFixes, ProFixesGenerator, ProPayload};
use crate::profile::{
    avg_engagement_rate, hard_facts, normalize_handle, recent_texts, Profile, ProfileError,
    ProfileSource, Tweet,
};
use crate::scoring::{
    calculate_score_detailed, ChecklistResult, HardFacts, RandomSampler, RuleTable,
    ScoringConfig, UserSegment,
};

const RECENT_TWEET_LIMIT: usize = 20;
const TOP_TIER_AUDIENCE: &str = "Everyone";
const UNKNOWN_AUDIENCE: &str = "General Public";

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Context data missing for @{0}. Run audit first.")]
    MissingContext(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyScores {
    pub niche_clarity: u32,
    pub content_strategy: u32,
    pub offer_clarity: u32,
    pub monetization: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub target_audience: String,
    pub avg_engagement_rate: f64,
    pub total_score: u32,
    pub key_scores: KeyScores,
    pub leaks: Vec<String>,
    pub tips: Vec<String>,
    pub segment: UserSegment,
}

/// Finished audit, as cached and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub timestamp: i64, // unix millis
    pub profile: Profile,
    pub is_verified: bool,
    pub pinned_tweet: Option<Tweet>,
    pub tweets: Vec<Tweet>,
    pub analysis: Analysis,
    pub checklist_fallback: bool,
    #[serde(default)]
    pub is_cached: bool,
}

/// Raw inputs kept after an audit so pro content can be generated later
/// without refetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditContext {
    pub profile: Profile,
    pub niche: String,
    pub hard_facts: HardFacts,
    pub pinned_text: String,
    pub recent_tweets: Vec<String>,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProContent {
    pub fixes_growth: ProFixes,
    pub monetization_kit: MonetizationKit,
    #[serde(default)]
    pub is_cached: bool,
}

pub struct Auditor {
    profiles: Arc<dyn ProfileSource>,
    checklist: Arc<dyn ChecklistProvider>,
    pro: Arc<dyn ProFixesGenerator>,
    cache: ResultCache,
    rules: RuleTable,
    scoring: ScoringConfig,
    ttls: CacheTtls,
    seed: Option<u64>,
}

impl Auditor {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        checklist: Arc<dyn ChecklistProvider>,
        pro: Arc<dyn ProFixesGenerator>,
        cache: ResultCache,
    ) -> Self {
        Self {
            profiles,
            checklist,
            pro,
            cache,
            rules: RuleTable::standard(),
            scoring: ScoringConfig::default(),
            ttls: CacheTtls::default(),
            seed: None,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_ttls(mut self, ttls: CacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Fix the top-tier tip sampling, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn sampler(&self) -> RandomSampler {
        match self.seed {
            Some(seed) => RandomSampler::seeded(seed),
            None => RandomSampler::from_entropy(),
        }
    }

    /// Audit a handle. With `fresh`, a cached report is ignored and replaced.
    pub async fn analyze(&self, raw_handle: &str, fresh: bool) -> Result<AuditReport, AuditError> {
        let handle = normalize_handle(raw_handle)?;

        if !fresh {
            if let Some(mut report) = self.cache.get::<AuditReport>(&report_key(&handle)) {
                report.is_cached = true;
                return Ok(report);
            }
        }

        info!(handle = %handle, fresh, "running new audit");
        let snapshot = self.profiles.fetch(&handle).await?;
        let facts = hard_facts(&snapshot);
        let engagement_rate = avg_engagement_rate(&snapshot.timeline.tweets);
        let recent = recent_texts(&snapshot.timeline.tweets, RECENT_TWEET_LIMIT);
        let pinned_text = snapshot
            .timeline
            .pinned
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_default();

        let segment = UserSegment::classify(facts.follower_count, &self.scoring.params());
        let (checklist, checklist_fallback) = if segment.is_top_tier() {
            info!(
                handle = %handle,
                followers = facts.follower_count,
                "top-tier account, skipping checklist"
            );
            let mut checklist = ChecklistResult::safe_default();
            checklist.summary.target_audience = TOP_TIER_AUDIENCE.to_string();
            (checklist, false)
        } else {
            let payload = ChecklistPayload {
                bio: snapshot.profile.description.clone(),
                pinned_text: pinned_text.clone(),
                recent_tweets: recent.clone(),
                follower_count: facts.follower_count,
                profile_image_url: snapshot.profile.profile_image_url.clone(),
            };
            match self.checklist.checklist(&payload).await {
                Ok(checklist) => (checklist, false),
                Err(e) => {
                    warn!(
                        handle = %handle,
                        error = %e,
                        "checklist unavailable, scoring with safe defaults"
                    );
                    (ChecklistResult::safe_default(), true)
                }
            }
        };

        let mut sampler = self.sampler();
        let detail =
            calculate_score_detailed(&checklist, &facts, &self.rules, &self.scoring, &mut sampler);
        let result = detail.result;

        let target_audience = match checklist.summary.target_audience.trim() {
            "" => UNKNOWN_AUDIENCE.to_string(),
            audience => audience.to_string(),
        };

        let report = AuditReport {
            timestamp: Utc::now().timestamp_millis(),
            is_verified: snapshot.profile.is_verified,
            profile: snapshot.profile.clone(),
            pinned_tweet: snapshot.timeline.pinned.clone(),
            tweets: snapshot.timeline.tweets.clone(),
            analysis: Analysis {
                target_audience: target_audience.clone(),
                avg_engagement_rate: engagement_rate,
                total_score: result.total_score,
                key_scores: KeyScores {
                    niche_clarity: result.breakdown.niche,
                    content_strategy: result.breakdown.content,
                    offer_clarity: result.breakdown.offer,
                    monetization: result.breakdown.monetization,
                },
                leaks: result.leaks,
                tips: result.tips,
                segment: detail.segment,
            },
            checklist_fallback,
            is_cached: false,
        };

        let context = AuditContext {
            profile: snapshot.profile,
            niche: target_audience,
            hard_facts: facts,
            pinned_text,
            recent_tweets: recent,
            avg_engagement_rate: engagement_rate,
        };
        self.cache
            .set(&context_key(&handle), &context, self.ttls.context);
        self.cache
            .set(&report_key(&handle), &report, self.ttls.result);

        info!(
            handle = %handle,
            score = report.analysis.total_score,
            segment = detail.segment.label(),
            "audit complete"
        );
        Ok(report)
    }

    /// Pro content for a handle audited earlier (its context must be cached).
    pub async fn generate_pro(&self, raw_handle: &str) -> Result<ProContent, AuditError> {
        let handle = normalize_handle(raw_handle)?;

        if let Some(mut content) = self.cache.get::<ProContent>(&pro_key(&handle)) {
            content.is_cached = true;
            return Ok(content);
        }

        let context = self
            .cache
            .get::<AuditContext>(&context_key(&handle))
            .ok_or_else(|| AuditError::MissingContext(handle.clone()))?;

        info!(handle = %handle, "generating pro content");
        let payload = ProPayload {
            bio: context.profile.description.clone(),
            pinned_text: context.pinned_text.clone(),
            has_pinned: context.hard_facts.has_pinned,
            recent_tweets: context.recent_tweets.clone(),
            niche: context.niche.clone(),
        };
        let fixes_growth = match self.pro.pro_fixes(&payload).await {
            Ok(fixes) => fixes,
            Err(e) => {
                warn!(handle = %handle, error = %e, "pro fixes unavailable, using fallback");
                ProFixes::fallback()
            }
        };

        let content = ProContent {
            fixes_growth,
            monetization_kit: MonetizationKit::build(
                context.profile.followers_count,
                context.avg_engagement_rate,
                &context.niche,
            ),
            is_cached: false,
        };
        self.cache.set(&pro_key(&handle), &content, self.ttls.pro);
        Ok(content)
    }
}
