use serde_json::Value;

use super::types::{Profile, ProfileSnapshot, Timeline, Tweet};
use super::ProfileError;
use crate::scoring::HardFacts;

const MAX_HANDLE_LEN: usize = 15;

/// Lower-case a handle and check it against the platform's rules.
/// A leading `@` is accepted and dropped.
pub fn normalize_handle(raw: &str) -> Result<String, ProfileError> {
    let handle = raw.trim().trim_start_matches('@').to_lowercase();
    let valid = !handle.is_empty()
        && handle.len() <= MAX_HANDLE_LEN
        && handle
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(handle)
    } else {
        Err(ProfileError::InvalidHandle(raw.trim().to_string()))
    }
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Counts arrive as numbers or numeric strings depending on the field.
fn count_at(value: &Value, pointer: &str) -> Option<u64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the `/user` response.
pub fn parse_user(handle: &str, body: &Value) -> Result<Profile, ProfileError> {
    let user = body
        .pointer("/result/data/user/result")
        .filter(|u| u.is_object())
        .ok_or_else(|| ProfileError::NotFound(handle.to_string()))?;

    let rest_id = str_at(user, "/rest_id")
        .ok_or_else(|| ProfileError::Parse("user result has no rest_id".to_string()))?
        .to_string();

    let name = str_at(user, "/core/name")
        .or_else(|| str_at(user, "/legacy/name"))
        .unwrap_or("Unknown")
        .to_string();

    let profile_image_url = str_at(user, "/avatar/image_url")
        .or_else(|| str_at(user, "/legacy/profile_image_url_https"))
        .unwrap_or_default()
        .to_string();

    let bio_urls = user
        .pointer("/legacy/entities/url/urls")
        .and_then(Value::as_array)
        .map(|urls| {
            urls.iter()
                .filter_map(|u| str_at(u, "/expanded_url").or_else(|| str_at(u, "/url")))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Profile {
        rest_id,
        screen_name: handle.to_string(),
        name,
        description: str_at(user, "/legacy/description")
            .unwrap_or_default()
            .to_string(),
        followers_count: count_at(user, "/legacy/followers_count").unwrap_or(0),
        profile_image_url,
        is_verified: user
            .pointer("/is_blue_verified")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        can_dm: user
            .pointer("/dm_permissions/can_dm")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        bio_urls,
    })
}

/// Parse one `tweet_results.result`. Posts wrapped for visibility keep their
/// payload under `tweet`.
fn parse_tweet(result: &Value) -> Option<Tweet> {
    let inner = if result.get("legacy").is_some() {
        result
    } else {
        result.get("tweet")?
    };
    let legacy = inner.get("legacy")?;

    let has_media = legacy
        .pointer("/entities/media")
        .and_then(Value::as_array)
        .is_some_and(|m| !m.is_empty());

    Some(Tweet {
        text: str_at(legacy, "/full_text").unwrap_or_default().to_string(),
        has_media,
        favorite_count: count_at(legacy, "/favorite_count").unwrap_or(0),
        reply_count: count_at(legacy, "/reply_count").unwrap_or(0),
        retweet_count: count_at(legacy, "/retweet_count").unwrap_or(0),
        bookmark_count: count_at(legacy, "/bookmark_count").unwrap_or(0),
        views: count_at(inner, "/views/count").unwrap_or(0),
    })
}

/// Parse the `/user-tweets` response into the pinned post and regular posts.
pub fn parse_timeline(body: &Value) -> Timeline {
    let mut timeline = Timeline::default();
    let Some(instructions) = body
        .pointer("/result/timeline/instructions")
        .and_then(Value::as_array)
    else {
        return timeline;
    };

    for inst in instructions {
        match str_at(inst, "/type") {
            Some("TimelinePinEntry") => {
                if let Some(result) =
                    inst.pointer("/entry/content/itemContent/tweet_results/result")
                {
                    timeline.pinned = parse_tweet(result);
                }
            }
            Some("TimelineAddEntries") => {
                let entries = inst.get("entries").and_then(Value::as_array);
                for entry in entries.into_iter().flatten() {
                    let item = match entry.pointer("/content/itemContent") {
                        Some(item) if str_at(item, "/itemType") == Some("TimelineTweet") => item,
                        _ => continue,
                    };
                    if let Some(tweet) =
                        item.pointer("/tweet_results/result").and_then(parse_tweet)
                    {
                        timeline.tweets.push(tweet);
                    }
                }
            }
            _ => {}
        }
    }

    timeline
}

/// Share of posts carrying media, rounded to a whole percent. 0 for no posts.
pub fn percent_visuals(tweets: &[Tweet]) -> u8 {
    if tweets.is_empty() {
        return 0;
    }
    let with_media = tweets.iter().filter(|t| t.has_media).count();
    (with_media as f64 / tweets.len() as f64 * 100.0).round() as u8
}

/// Total engagements over total views, as a percentage with two decimals.
/// 0 when nothing has views.
pub fn avg_engagement_rate(tweets: &[Tweet]) -> f64 {
    let views: u64 = tweets.iter().map(|t| t.views).sum();
    if views == 0 {
        return 0.0;
    }
    let engagements: u64 = tweets.iter().map(Tweet::engagements).sum();
    let rate = engagements as f64 / views as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Texts handed to the classifier: retweets removed, at most `limit`.
pub fn recent_texts(tweets: &[Tweet], limit: usize) -> Vec<String> {
    tweets
        .iter()
        .filter(|t| !t.is_retweet())
        .map(|t| t.text.clone())
        .take(limit)
        .collect()
}

pub fn hard_facts(snapshot: &ProfileSnapshot) -> HardFacts {
    let profile = &snapshot.profile;
    HardFacts {
        has_link: !profile.bio_urls.is_empty(),
        has_pinned: snapshot.timeline.pinned.is_some(),
        is_verified: profile.is_verified,
        percent_visuals: percent_visuals(&snapshot.timeline.tweets),
        can_dm: profile.can_dm,
        follower_count: profile.followers_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweet_result(text: &str, media: bool, favs: u64, views: &str) -> Value {
        let mut legacy = json!({
            "full_text": text,
            "favorite_count": favs,
            "reply_count": 1,
            "retweet_count": 0,
            "bookmark_count": 0,
            "entities": {}
        });
        if media {
            legacy["entities"]["media"] = json!([{ "type": "photo" }]);
        }
        json!({ "legacy": legacy, "views": { "count": views } })
    }

    fn timeline_body() -> Value {
        json!({
            "result": { "timeline": { "instructions": [
                { "type": "TimelineClearCache" },
                { "type": "TimelinePinEntry", "entry": { "content": { "itemContent": {
                    "itemType": "TimelineTweet",
                    "tweet_results": { "result": tweet_result("How I grew to 10k", true, 50, "1000") }
                } } } },
                { "type": "TimelineAddEntries", "entries": [
                    { "content": { "itemContent": {
                        "itemType": "TimelineTweet",
                        "tweet_results": { "result": tweet_result("Thread on hooks", true, 9, "200") }
                    } } },
                    { "content": { "itemContent": {
                        "itemType": "TimelineTweet",
                        "tweet_results": { "result": {
                            "__typename": "TweetWithVisibilityResults",
                            "tweet": tweet_result("RT @someone: great post", false, 0, "0")
                        } }
                    } } },
                    { "content": { "entryType": "TimelineTimelineCursor", "value": "abc" } },
                    { "content": { "itemContent": {
                        "itemType": "TimelineTweet",
                        "tweet_results": { "result": tweet_result("Monday update", false, 0, "100") }
                    } } }
                ] }
            ] } }
        })
    }

    #[test]
    fn test_normalize_handle() {
        assert_eq!(normalize_handle("@NaVal").unwrap(), "naval");
        assert_eq!(normalize_handle("  dev_guy_42 ").unwrap(), "dev_guy_42");
        assert!(normalize_handle("").is_err());
        assert!(normalize_handle("has space").is_err());
        assert!(normalize_handle("a_very_long_handle_x").is_err());
        assert!(normalize_handle("x&y=1").is_err());
    }

    #[test]
    fn test_parse_user() {
        let body = json!({ "result": { "data": { "user": { "result": {
            "rest_id": "44196397",
            "is_blue_verified": true,
            "core": { "name": "Jane Builder" },
            "avatar": { "image_url": "https://pbs.example/jane.jpg" },
            "dm_permissions": { "can_dm": true },
            "legacy": {
                "description": "I help founders ship.",
                "followers_count": 12500,
                "entities": { "url": { "urls": [ { "url": "https://t.co/x", "expanded_url": "https://jane.dev" } ] } }
            }
        } } } } });

        let profile = parse_user("jane", &body).unwrap();
        assert_eq!(profile.rest_id, "44196397");
        assert_eq!(profile.name, "Jane Builder");
        assert_eq!(profile.followers_count, 12_500);
        assert!(profile.is_verified);
        assert!(profile.can_dm);
        assert_eq!(profile.bio_urls, vec!["https://jane.dev".to_string()]);
    }

    #[test]
    fn test_parse_user_missing_is_not_found() {
        let body = json!({ "result": { "data": { "user": {} } } });
        assert!(matches!(
            parse_user("ghost", &body),
            Err(ProfileError::NotFound(h)) if h == "ghost"
        ));
    }

    #[test]
    fn test_parse_user_without_rest_id_is_parse_error() {
        let body = json!({ "result": { "data": { "user": { "result": { "legacy": {} } } } } });
        assert!(matches!(parse_user("x", &body), Err(ProfileError::Parse(_))));
    }

    #[test]
    fn test_parse_timeline() {
        let timeline = parse_timeline(&timeline_body());
        assert_eq!(
            timeline.pinned.as_ref().map(|t| t.text.as_str()),
            Some("How I grew to 10k")
        );
        assert_eq!(timeline.tweets.len(), 3);
        assert!(timeline.tweets[1].is_retweet());
    }

    #[test]
    fn test_parse_timeline_empty_body() {
        assert_eq!(parse_timeline(&json!({})), Timeline::default());
    }

    #[test]
    fn test_metrics() {
        let tweets = parse_timeline(&timeline_body()).tweets;
        // 1 of 3 has media
        assert_eq!(percent_visuals(&tweets), 33);
        // (9+1 + 0+1 + 0+1) / 300 * 100 = 4.0
        assert_eq!(avg_engagement_rate(&tweets), 4.0);
        assert_eq!(
            recent_texts(&tweets, 20),
            vec!["Thread on hooks".to_string(), "Monday update".to_string()]
        );
        assert_eq!(recent_texts(&tweets, 1).len(), 1);
    }

    #[test]
    fn test_engagement_rate_rounds_to_two_places() {
        let tweets = vec![Tweet {
            favorite_count: 1,
            views: 3,
            ..Default::default()
        }];
        assert_eq!(avg_engagement_rate(&tweets), 33.33);
        assert_eq!(avg_engagement_rate(&[]), 0.0);
        assert_eq!(percent_visuals(&[]), 0);
    }

    #[test]
    fn test_hard_facts_from_snapshot() {
        let snapshot = ProfileSnapshot {
            profile: Profile {
                followers_count: 900,
                can_dm: true,
                ..Default::default()
            },
            timeline: parse_timeline(&timeline_body()),
        };
        let facts = hard_facts(&snapshot);
        assert!(!facts.has_link);
        assert!(facts.has_pinned);
        assert!(facts.can_dm);
        assert!(!facts.is_verified);
        assert_eq!(facts.percent_visuals, 33);
        assert_eq!(facts.follower_count, 900);
    }
}
