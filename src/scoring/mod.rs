pub mod checklist;
pub mod config;
pub mod engine;
pub mod facts;
pub mod rules;
pub mod sampler;
pub mod segment;
pub mod validation;

pub use checklist::ChecklistResult;
pub use config::*;
pub use engine::{
    calculate_score, calculate_score_detailed, Adjustment, Breakdown, CategoryScore, ScoreDetail,
    ScoringResult,
};
pub use facts::HardFacts;
pub use rules::{Category, RuleEntry, RuleKey, RuleTable};
pub use sampler::{FirstN, RandomSampler, TipSampler};
pub use segment::UserSegment;
pub use validation::validate_scoring;
