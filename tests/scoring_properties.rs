use profile_audit::scoring::segment::{SUPERFICIAL_MARKERS, TOP_TIER_TIP_POOL, VISUAL_MARKERS};
use profile_audit::scoring::{
    calculate_score, ChecklistResult, HardFacts, RandomSampler, RuleKey, RuleTable, ScoringConfig,
    ScoringResult,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const FOLLOWER_SAMPLES: &[u64] = &[
    0, 500, 9_999, 10_000, 25_000, 49_999, 50_000, 60_000, 2_000_000,
];

struct Case {
    checklist: ChecklistResult,
    facts: HardFacts,
}

/// Deterministic pseudo-random inputs spanning every tier.
fn cases(count: usize) -> Vec<Case> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let keys: Vec<RuleKey> = RuleTable::standard().iter().map(|e| e.key).collect();

    (0..count)
        .map(|_| {
            let mut checklist = ChecklistResult::default();
            for key in &keys {
                checklist.set(*key, rng.random_bool(0.5));
            }
            checklist.content.is_writer_archetype = rng.random_bool(0.2);

            let facts = HardFacts {
                has_link: rng.random_bool(0.5),
                has_pinned: rng.random_bool(0.5),
                is_verified: rng.random_bool(0.5),
                percent_visuals: rng.random_range(0..=100),
                can_dm: rng.random_bool(0.5),
                follower_count: FOLLOWER_SAMPLES[rng.random_range(0..FOLLOWER_SAMPLES.len())],
            };
            Case { checklist, facts }
        })
        .collect()
}

fn run(checklist: &ChecklistResult, facts: &HardFacts, seed: u64) -> ScoringResult {
    calculate_score(
        checklist,
        facts,
        &RuleTable::standard(),
        &ScoringConfig::default(),
        &mut RandomSampler::seeded(seed),
    )
}

fn contains_marker(text: &str, markers: &[&str]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

fn assert_unique(items: &[String]) {
    let set: HashSet<&String> = items.iter().collect();
    assert_eq!(set.len(), items.len(), "duplicates in {:?}", items);
}

#[test]
fn test_scores_stay_in_bounds() {
    for case in cases(400) {
        let result = run(&case.checklist, &case.facts, 1);
        assert!(result.total_score <= 100);
        let b = result.breakdown;
        for value in [b.niche, b.content, b.offer, b.monetization] {
            assert!(value <= 100);
        }
    }
}

#[test]
fn test_lists_are_capped_and_unique() {
    for case in cases(400) {
        let result = run(&case.checklist, &case.facts, 2);
        assert!(result.leaks.len() <= 5);
        assert!(result.tips.len() <= 5);
        assert_unique(&result.leaks);
        assert_unique(&result.tips);
    }
}

#[test]
fn test_missing_pinned_resets_offer() {
    for mut case in cases(200) {
        case.facts.has_pinned = false;
        let result = run(&case.checklist, &case.facts, 3);
        assert_eq!(result.breakdown.offer, 0);
    }
}

#[test]
fn test_top_tier_tips_and_leaks() {
    for mut case in cases(200) {
        case.facts.follower_count = case.facts.follower_count.max(50_000);
        let result = run(&case.checklist, &case.facts, 4);

        assert!(result.total_score <= 99);
        assert!(!result.tips.is_empty());
        for tip in &result.tips {
            assert!(TOP_TIER_TIP_POOL.contains(&tip.as_str()), "tip {tip}");
        }
        for leak in &result.leaks {
            assert!(!contains_marker(leak, SUPERFICIAL_MARKERS), "leak {leak}");
        }
    }
}

#[test]
fn test_authority_ceiling_below_mid_tier() {
    for mut case in cases(200) {
        case.facts.follower_count = case.facts.follower_count.min(9_999);
        case.checklist.niche.is_actually_authority = false;
        let result = run(&case.checklist, &case.facts, 5);
        assert!(result.breakdown.niche <= 50, "niche {}", result.breakdown.niche);
    }
}

#[test]
fn test_writer_archetype_never_sees_visual_complaints() {
    for mut case in cases(200) {
        case.checklist.content.is_writer_archetype = true;
        let result = run(&case.checklist, &case.facts, 6);
        for leak in &result.leaks {
            assert!(!contains_marker(leak, VISUAL_MARKERS), "leak {leak}");
        }
        if case.facts.follower_count < 50_000 {
            assert!(result.breakdown.content >= 80);
        }
    }
}

#[test]
fn test_same_inputs_same_result() {
    for case in cases(100) {
        let a = serde_json::to_string(&run(&case.checklist, &case.facts, 42)).unwrap();
        let b = serde_json::to_string(&run(&case.checklist, &case.facts, 42)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_all_false_small_account() {
    let facts = HardFacts {
        follower_count: 500,
        ..Default::default()
    };
    let result = run(&ChecklistResult::uniform(false), &facts, 7);

    assert_eq!(result.breakdown.offer, 0);
    assert!(result.total_score < 20);
    assert!(result.leaks.iter().any(|l| l == "No Pinned Tweet found."));
    assert!(result.leaks.iter().any(|l| l == "Missing Bio Link."));
    assert!(!result.tips.is_empty());
}

#[test]
fn test_all_true_small_account() {
    let facts = HardFacts {
        has_link: true,
        has_pinned: true,
        is_verified: true,
        percent_visuals: 50,
        can_dm: true,
        follower_count: 500,
    };
    let result = run(&ChecklistResult::uniform(true), &facts, 8);

    assert_eq!(result.total_score, 100);
    assert!(result.leaks.is_empty());
    assert!(result.tips.is_empty());
}

#[test]
fn test_all_false_whale() {
    let facts = HardFacts {
        follower_count: 60_000,
        ..Default::default()
    };
    let result = run(&ChecklistResult::uniform(false), &facts, 9);

    // 36 of 127 points -> 28, plus the top-tier bonus
    assert_eq!(result.total_score, 33);
    assert_eq!(result.breakdown.offer, 0);
    assert_eq!(result.tips.len(), 3);
    assert!(result
        .tips
        .iter()
        .all(|t| TOP_TIER_TIP_POOL.contains(&t.as_str())));
    assert!(result.leaks.iter().any(|l| l == "No Pinned Tweet found."));
    assert!(result.leaks.iter().any(|l| l == "Missing Bio Link."));
}
