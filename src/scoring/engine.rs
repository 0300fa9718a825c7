use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use super::checklist::ChecklistResult;
use super::config::{ScoringConfig, ScoringParams};
use super::facts::HardFacts;
use super::rules::{Category, RuleKey, RuleTable};
use super::sampler::TipSampler;
use super::segment::{
    matches_any, UserSegment, PLATEAU_LEAK, PLATEAU_TIP, SUPERFICIAL_MARKERS, TOP_TIER_TIP_POOL,
    VISUAL_MARKERS,
};

const VERIFIED_BONUS: f64 = 5.0;
const VISUALS_BONUS: f64 = 5.0;
const PINNED_BONUS: f64 = 10.0;
const LINK_BONUS: f64 = 5.0;
const DM_BONUS: f64 = 5.0;

const NO_VISUALS_LEAK: &str = "Feed lacks visuals (<20%).";
const NO_VISUALS_TIP: &str = "Attach an image or short clip to at least 1 in 5 posts.";
const NO_PINNED_LEAK: &str = "No Pinned Tweet found.";
const NO_PINNED_TIP: &str = "Pin your best-performing thread.";
const NO_LINK_LEAK: &str = "Missing Bio Link.";
const NO_LINK_TIP: &str = "Add a link to your profile that captures emails.";
const DMS_CLOSED_LEAK: &str = "DMs are closed.";
const DMS_CLOSED_TIP: &str = "Open your DMs so leads can reach you.";

/// Per-category score as an integer percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub niche: u32,
    pub content: u32,
    pub offer: u32,
    pub monetization: u32,
}

impl Breakdown {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Niche => self.niche,
            Category::Content => self.content,
            Category::Offer => self.offer,
            Category::Monetization => self.monetization,
        }
    }

    fn set(&mut self, category: Category, value: u32) {
        match category {
            Category::Niche => self.niche = value,
            Category::Content => self.content = value,
            Category::Offer => self.offer = value,
            Category::Monetization => self.monetization = value,
        }
    }
}

/// Output of one scoring run.
///
/// `breakdown` values are normalized per category and are not expected to
/// average to `total_score`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub total_score: u32,
    pub breakdown: Breakdown,
    pub leaks: Vec<String>,
    pub tips: Vec<String>,
}

/// Raw points of one category before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    pub max_score: f64,
}

impl CategoryScore {
    fn new(category: Category) -> Self {
        Self {
            category,
            score: 0.0,
            max_score: 0.0,
        }
    }

    /// Integer percentage in `0..=100`. A category with no points possible is 0.
    pub fn percent(&self) -> u32 {
        if self.max_score <= 0.0 {
            return 0;
        }
        let pct = (self.score / self.max_score * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }
}

/// One step that moved a category score after the weighted loop.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub category: Category,
    pub label: String,       // e.g. "Fake authority cap"
    pub description: String, // e.g. "capped at 50% of 28"
    pub before: f64,
    pub after: f64,
}

/// Scoring result plus the intermediate state, for verbose output.
#[derive(Debug, Clone)]
pub struct ScoreDetail {
    pub result: ScoringResult,
    pub segment: UserSegment,
    pub categories: Vec<CategoryScore>,
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    KillSwitch,
    Rule,
    HardFact,
}

impl Stage {
    /// Lower is more severe when the list must be cut.
    fn severity(&self) -> u8 {
        match self {
            Stage::KillSwitch => 0,
            Stage::HardFact => 1,
            Stage::Rule => 2,
        }
    }
}

#[derive(Debug, Clone)]
struct Finding {
    stage: Stage,
    weight: u32,
    leak: String,
    tip: String,
}

/// Findings kept per stage, each list already in display order.
#[derive(Debug, Default)]
struct Findings {
    kill_switch: Vec<Finding>,
    rule: Vec<Finding>,
    hard_fact: Vec<Finding>,
}

impl Findings {
    /// Later kill switches are shown ahead of earlier ones.
    fn unshift_kill_switch(&mut self, leak: &str, tip: &str) {
        self.kill_switch.insert(
            0,
            Finding {
                stage: Stage::KillSwitch,
                weight: 0,
                leak: leak.to_string(),
                tip: tip.to_string(),
            },
        );
    }

    fn push_rule(&mut self, weight: u32, leak: &str, tip: &str) {
        self.rule.push(Finding {
            stage: Stage::Rule,
            weight,
            leak: leak.to_string(),
            tip: tip.to_string(),
        });
    }

    fn push_hard_fact(&mut self, leak: &str, tip: &str) {
        self.hard_fact.push(Finding {
            stage: Stage::HardFact,
            weight: 0,
            leak: leak.to_string(),
            tip: tip.to_string(),
        });
    }

    fn retain(&mut self, keep: impl Fn(&Finding) -> bool) {
        self.kill_switch.retain(&keep);
        self.rule.retain(&keep);
        self.hard_fact.retain(&keep);
    }

    fn canonical(&self) -> impl Iterator<Item = &Finding> {
        self.kill_switch
            .iter()
            .chain(self.rule.iter())
            .chain(self.hard_fact.iter())
    }
}

/// De-duplicate `texts` of the findings in canonical order, then cut to `max`.
///
/// When the list is too long, the most severe findings are kept (kill
/// switches, then hard facts, then heavier rules), but the survivors keep
/// their canonical order.
fn select(findings: &Findings, max: usize, text: impl Fn(&Finding) -> &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let unique: Vec<&Finding> = findings
        .canonical()
        .filter(|f| seen.insert(text(f).to_string()))
        .collect();

    let mut keep: Vec<usize> = (0..unique.len()).collect();
    if unique.len() > max {
        keep.sort_by_key(|&i| (unique[i].stage.severity(), Reverse(unique[i].weight), i));
        keep.truncate(max);
        keep.sort_unstable();
    }

    keep.into_iter().map(|i| text(unique[i]).to_string()).collect()
}

fn dedup_truncate(items: Vec<String>, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .take(max)
        .collect()
}

/// Score a profile. Pure apart from the sampler, which is only consulted for
/// top-tier accounts.
pub fn calculate_score(
    checklist: &ChecklistResult,
    facts: &HardFacts,
    rules: &RuleTable,
    config: &ScoringConfig,
    sampler: &mut dyn TipSampler,
) -> ScoringResult {
    calculate_score_detailed(checklist, facts, rules, config, sampler).result
}

pub fn calculate_score_detailed(
    checklist: &ChecklistResult,
    facts: &HardFacts,
    rules: &RuleTable,
    config: &ScoringConfig,
    sampler: &mut dyn TipSampler,
) -> ScoreDetail {
    let params = config.params();
    let facts = facts.clone().normalized();
    let segment = UserSegment::classify(facts.follower_count, &params);
    let is_writer = checklist.content.is_writer_archetype;

    let mut findings = Findings::default();
    let mut adjustments = Vec::new();

    // Weighted rule loop
    let mut cats: Vec<CategoryScore> = Category::ALL
        .into_iter()
        .map(|category| evaluate_rules(category, checklist, rules, segment, &mut findings))
        .collect();
    let [niche, content, offer, money] = cats.as_mut_slice() else {
        unreachable!("Category::ALL has four entries")
    };

    // Hard facts: ground truth, never bypassed by tier privileges
    niche.max_score += VERIFIED_BONUS;
    if facts.is_verified {
        niche.score += VERIFIED_BONUS;
    }

    content.max_score += VISUALS_BONUS;
    if facts.percent_visuals >= params.visual_threshold {
        content.score += VISUALS_BONUS;
    } else if !segment.is_top_tier() && !is_writer {
        findings.push_hard_fact(NO_VISUALS_LEAK, NO_VISUALS_TIP);
    }

    offer.max_score += PINNED_BONUS;
    if facts.has_pinned {
        offer.score += PINNED_BONUS;
    } else {
        findings.push_hard_fact(NO_PINNED_LEAK, NO_PINNED_TIP);
    }

    money.max_score += LINK_BONUS + DM_BONUS;
    if facts.has_link {
        money.score += LINK_BONUS;
    } else {
        findings.push_hard_fact(NO_LINK_LEAK, NO_LINK_TIP);
    }
    if facts.can_dm {
        money.score += DM_BONUS;
    } else {
        findings.push_hard_fact(DMS_CLOSED_LEAK, DMS_CLOSED_TIP);
    }

    // Kill switches
    if !checklist.get(RuleKey::IsActuallyAuthority) {
        let before = niche.score;
        if segment.is_established() {
            niche.score =
                (niche.score + params.mid_tier_authority_bonus as f64).min(niche.max_score);
            adjustments.push(Adjustment {
                category: Category::Niche,
                label: "Established account".to_string(),
                description: format!("+{} benefit of the doubt", params.mid_tier_authority_bonus),
                before,
                after: niche.score,
            });
        } else {
            niche.score = niche.score.min(niche.max_score * params.authority_cap);
            if let Some(entry) = rules.entry(RuleKey::IsActuallyAuthority) {
                findings.unshift_kill_switch(entry.leak, entry.tip);
            }
            adjustments.push(Adjustment {
                category: Category::Niche,
                label: "Fake authority cap".to_string(),
                description: format!(
                    "capped at {:.0}% of {}",
                    params.authority_cap * 100.0,
                    niche.max_score
                ),
                before,
                after: niche.score,
            });
        }
    }

    if !checklist.get(RuleKey::IsValueDense) && !segment.is_top_tier() {
        let before = content.score;
        content.score = content.score.min(content.max_score * params.value_density_cap);
        if let Some(entry) = rules.entry(RuleKey::IsValueDense) {
            findings.unshift_kill_switch(entry.leak, entry.tip);
        }
        adjustments.push(Adjustment {
            category: Category::Content,
            label: "Low value cap".to_string(),
            description: format!(
                "capped at {:.0}% of {}",
                params.value_density_cap * 100.0,
                content.max_score
            ),
            before,
            after: content.score,
        });
    }

    // Segment adjustments
    if is_writer {
        let before = content.score;
        content.score = content.score.max(content.max_score * params.writer_floor);
        findings.retain(|f| {
            !matches_any(&f.leak, VISUAL_MARKERS) && !matches_any(&f.tip, VISUAL_MARKERS)
        });
        adjustments.push(Adjustment {
            category: Category::Content,
            label: "Writer archetype".to_string(),
            description: format!(
                "floor at {:.0}% of {}, visual complaints dropped",
                params.writer_floor * 100.0,
                content.max_score
            ),
            before,
            after: content.score,
        });
    }

    // A missing pinned post invalidates the whole offer evaluation.
    if !facts.has_pinned {
        let before = offer.score;
        offer.score = 0.0;
        adjustments.push(Adjustment {
            category: Category::Offer,
            label: "No pinned post".to_string(),
            description: "offer reset to 0".to_string(),
            before,
            after: 0.0,
        });
    }

    for cat in cats.iter_mut() {
        cat.score = cat.score.clamp(0.0, cat.max_score);
    }

    let mut breakdown = Breakdown::default();
    for cat in &cats {
        breakdown.set(cat.category, cat.percent());
    }

    let total_score = compose_total(&cats, segment, &params);
    let (leaks, tips) = if segment.is_top_tier() {
        // Only rubric leaks can be superficial. Hard facts always stand.
        findings.retain(|f| f.stage != Stage::Rule || !matches_any(&f.leak, SUPERFICIAL_MARKERS));
        top_tier_lists(&findings, &params, sampler)
    } else {
        (
            select(&findings, params.max_leaks, |f| &f.leak),
            select(&findings, params.max_tips, |f| &f.tip),
        )
    };

    ScoreDetail {
        result: ScoringResult {
            total_score,
            breakdown,
            leaks,
            tips,
        },
        segment,
        categories: cats,
        adjustments,
    }
}

fn evaluate_rules(
    category: Category,
    checklist: &ChecklistResult,
    rules: &RuleTable,
    segment: UserSegment,
    findings: &mut Findings,
) -> CategoryScore {
    let mut cat = CategoryScore::new(category);
    for entry in rules.rules(category) {
        if entry.key.is_kill_switch() {
            continue;
        }
        let weight = entry.weight as f64;
        cat.max_score += weight;

        let passed = checklist.get(entry.key) || segment.is_privileged(entry.key);
        if passed {
            cat.score += weight;
        } else {
            findings.push_rule(entry.weight, entry.leak, entry.tip);
        }
    }
    cat
}

fn compose_total(cats: &[CategoryScore], segment: UserSegment, params: &ScoringParams) -> u32 {
    let total_raw: f64 = cats.iter().map(|c| c.score).sum();
    let max_raw: f64 = cats.iter().map(|c| c.max_score).sum();
    let mut total = if max_raw > 0.0 {
        (total_raw / max_raw * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };
    if segment.is_top_tier() {
        total = total
            .saturating_add(params.top_tier_bonus)
            .min(params.top_tier_ceiling.min(100));
    }
    total
}

/// Leaks for a top-tier account (already filtered) and a tip list drawn only
/// from the growth pool.
fn top_tier_lists(
    findings: &Findings,
    params: &ScoringParams,
    sampler: &mut dyn TipSampler,
) -> (Vec<String>, Vec<String>) {
    let mut leaks = select(findings, params.max_leaks, |f| &f.leak);
    let amount = params.top_tier_tip_samples.min(params.max_tips);
    let mut tips = Vec::with_capacity(amount);

    if leaks.is_empty() && params.max_leaks > 0 {
        leaks.push(PLATEAU_LEAK.to_string());
        if amount > 0 {
            tips.push(PLATEAU_TIP.to_string());
        }
    }

    let pool: Vec<&str> = TOP_TIER_TIP_POOL
        .iter()
        .copied()
        .filter(|t| !tips.iter().any(|picked| picked == t))
        .collect();
    let remaining = amount - tips.len();
    for i in sampler.sample_indices(pool.len(), remaining) {
        tips.push(pool[i].to_string());
    }

    (leaks, dedup_truncate(tips, params.max_tips))
}
