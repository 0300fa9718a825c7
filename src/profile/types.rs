use serde::{Deserialize, Serialize};

/// Account fields read from the user lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub rest_id: String,
    pub screen_name: String, // lower-cased handle as requested
    pub name: String,
    pub description: String,
    pub followers_count: u64,
    pub profile_image_url: String,
    pub is_verified: bool,
    pub can_dm: bool,
    pub bio_urls: Vec<String>, // expanded URLs from the profile url entity
}

/// One post from the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub text: String,
    pub has_media: bool,
    pub favorite_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub bookmark_count: u64,
    pub views: u64,
}

impl Tweet {
    pub fn engagements(&self) -> u64 {
        self.favorite_count + self.reply_count + self.retweet_count + self.bookmark_count
    }

    pub fn is_retweet(&self) -> bool {
        self.text.starts_with("RT @")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub pinned: Option<Tweet>,
    pub tweets: Vec<Tweet>,
}

/// Everything fetched for one handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub profile: Profile,
    pub timeline: Timeline,
}
