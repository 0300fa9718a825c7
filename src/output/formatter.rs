use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::audit::{AuditReport, ProContent};
use crate::scoring::ScoreDetail;

const PINNED_PREVIEW_CHARS: usize = 80;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a count in compact notation (1.5k, 2.3M, 847)
pub fn format_count(count: u64) -> String {
    let value = count as f64;
    let formatted = if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{}", count)
    };

    // "1.0k" -> "1k"
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

/// Truncate text to `max_chars`, accounting for Unicode
fn truncate_text(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = single_line.chars().collect();
    if chars.len() <= max_chars {
        single_line
    } else if max_chars > 3 {
        format!("{}...", chars[..max_chars - 3].iter().collect::<String>())
    } else {
        chars[..max_chars].iter().collect()
    }
}

/// Score out of 100, green from 80, yellow from 50, red below.
fn paint_score(score: u32, use_colors: bool) -> String {
    let text = format!("{:>3}", score);
    if !use_colors {
        return text;
    }
    if score >= 80 {
        text.green().bold().to_string()
    } else if score >= 50 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn bullet_list(items: &[String], marker: &str, use_colors: bool) -> Vec<String> {
    if items.is_empty() {
        return vec!["  (none)".to_string()];
    }
    items
        .iter()
        .map(|item| {
            if use_colors {
                format!("  {} {}", marker.dimmed(), item)
            } else {
                format!("  {} {}", marker, item)
            }
        })
        .collect()
}

fn audited_ago(timestamp_millis: i64, now: DateTime<Utc>) -> Option<String> {
    let audited = DateTime::<Utc>::from_timestamp_millis(timestamp_millis)?;
    Some(format_age(now - audited))
}

/// Multi-line audit summary for the terminal.
pub fn format_report(report: &AuditReport, use_colors: bool) -> String {
    format_report_at(report, Utc::now(), use_colors)
}

fn format_report_at(report: &AuditReport, now: DateTime<Utc>, use_colors: bool) -> String {
    let profile = &report.profile;
    let analysis = &report.analysis;
    let mut lines = Vec::new();

    let handle = format!("@{}", profile.screen_name);
    let verified = if report.is_verified { " (verified)" } else { "" };
    if use_colors {
        lines.push(format!("{} {}{}", handle.cyan().bold(), profile.name, verified));
    } else {
        lines.push(format!("{} {}{}", handle, profile.name, verified));
    }
    lines.push(format!(
        "  Followers: {} ({})",
        format_count(profile.followers_count),
        analysis.segment.label()
    ));
    lines.push(format!("  Audience: {}", analysis.target_audience));
    lines.push(format!("  Avg engagement: {}%", analysis.avg_engagement_rate));
    match &report.pinned_tweet {
        Some(pinned) => lines.push(format!(
            "  Pinned: {}",
            truncate_text(&pinned.text, PINNED_PREVIEW_CHARS)
        )),
        None => lines.push("  Pinned: (none)".to_string()),
    }
    if report.is_cached {
        let age = audited_ago(report.timestamp, now).unwrap_or_else(|| "?".to_string());
        lines.push(format!("  Cached result, audited {} ago", age));
    }
    if report.checklist_fallback {
        let note = "  Checklist unavailable, scored with safe defaults";
        if use_colors {
            lines.push(note.yellow().to_string());
        } else {
            lines.push(note.to_string());
        }
    }
    lines.push(String::new());

    lines.push(format!(
        "{} {}/100",
        heading("Score", use_colors),
        paint_score(analysis.total_score, use_colors).trim_start()
    ));
    let key = &analysis.key_scores;
    for (label, score) in [
        ("Niche clarity", key.niche_clarity),
        ("Content strategy", key.content_strategy),
        ("Offer clarity", key.offer_clarity),
        ("Monetization", key.monetization),
    ] {
        lines.push(format!("  {:<18}{}", label, paint_score(score, use_colors)));
    }
    lines.push(String::new());

    lines.push(heading("Leaks", use_colors));
    lines.extend(bullet_list(&analysis.leaks, "-", use_colors));
    lines.push(String::new());
    lines.push(heading("Tips", use_colors));
    lines.extend(bullet_list(&analysis.tips, "+", use_colors));

    lines.join("\n")
}

/// Pro fixes and sponsor pricing.
pub fn format_pro(content: &ProContent, use_colors: bool) -> String {
    let fixes = &content.fixes_growth;
    let kit = &content.monetization_kit;
    let mut lines = Vec::new();

    if content.is_cached {
        lines.push("(cached)".to_string());
    }
    lines.push(heading("Growth fixes", use_colors));
    lines.push(format!("  Hook: {}", fixes.content_hook));
    lines.push(format!(
        "  Format: {} ({}% of posts)",
        fixes.content_format, fixes.format_percentage
    ));
    lines.push(format!(
        "  Highest-impact posts per week: {}",
        fixes.highest_impact_count
    ));
    lines.push(String::new());

    lines.push(heading("Bio drafts", use_colors));
    for draft in &fixes.bio_drafts {
        if use_colors {
            lines.push(format!("  {}: {}", draft.title.bold(), draft.content));
        } else {
            lines.push(format!("  {}: {}", draft.title, draft.content));
        }
    }
    lines.push(String::new());

    lines.push(heading("Pinned post", use_colors));
    lines.push(format!("  {}", fixes.pinned_tweet_copy));
    lines.push(String::new());

    lines.push(heading("Next posts", use_colors));
    lines.extend(bullet_list(&fixes.next_tweet_ideas, "+", use_colors));
    lines.push(String::new());

    lines.push(format!(
        "{} {}",
        heading("Sponsor value", use_colors),
        kit.projected_sponsor_value
    ));
    for package in &kit.packages {
        lines.push(format!(
            "  {:<16}{:>7}  {}",
            package.name, package.price, package.description
        ));
    }
    lines.push(String::new());
    lines.push(heading("Pitch", use_colors));
    lines.push(format!("  {}", kit.pitch_email_snippet));

    lines.join("\n")
}

/// Scoring breakdown with raw points and every post-loop adjustment.
pub fn format_score_detail(detail: &ScoreDetail, use_colors: bool) -> String {
    let result = &detail.result;
    let mut lines = vec![format!(
        "{} {}/100 ({})",
        heading("Score", use_colors),
        paint_score(result.total_score, use_colors).trim_start(),
        detail.segment.label()
    )];

    for cat in &detail.categories {
        lines.push(format!(
            "  {:<14}{}  ({:.0}/{:.0})",
            cat.category.label(),
            paint_score(result.breakdown.get(cat.category), use_colors),
            cat.score,
            cat.max_score
        ));
    }

    if !detail.adjustments.is_empty() {
        lines.push(String::new());
        lines.push(heading("Adjustments", use_colors));
        for adj in &detail.adjustments {
            lines.push(format!(
                "  {}: {} ({}, {:.1} -> {:.1})",
                adj.category, adj.label, adj.description, adj.before, adj.after
            ));
        }
    }

    lines.push(String::new());
    lines.push(heading("Leaks", use_colors));
    lines.extend(bullet_list(&result.leaks, "-", use_colors));
    lines.push(String::new());
    lines.push(heading("Tips", use_colors));
    lines.extend(bullet_list(&result.tips, "+", use_colors));

    lines.join("\n")
}
