use serde::{Deserialize, Serialize};

/// Objective signals read straight from platform data.
///
/// Callers range-check before scoring: `percent_visuals` is expected in
/// `0..=100`. [`HardFacts::normalized`] clamps it for inputs of unknown origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardFacts {
    pub has_link: bool,
    pub has_pinned: bool,
    pub is_verified: bool,
    pub percent_visuals: u8,
    #[serde(rename = "canDM", alias = "canDm")]
    pub can_dm: bool,
    pub follower_count: u64,
}

impl HardFacts {
    pub fn normalized(mut self) -> Self {
        self.percent_visuals = self.percent_visuals.min(100);
        self
    }
}
