use super::config::ScoringConfig;

fn check_fraction(errors: &mut Vec<String>, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(0.0..=1.0).contains(&v) {
            errors.push(format!("scoring.{}: must be between 0 and 1, got {}", field, v));
        }
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let params = config.params();

    if params.mid_tier_followers >= params.top_tier_followers {
        errors.push(format!(
            "scoring.mid_tier_followers: must be below top_tier_followers ({} >= {})",
            params.mid_tier_followers, params.top_tier_followers
        ));
    }

    if let Some(threshold) = config.visual_threshold {
        if threshold > 100 {
            errors.push(format!(
                "scoring.visual_threshold: must be a percentage (0-100), got {}",
                threshold
            ));
        }
    }

    check_fraction(&mut errors, "authority_cap", config.authority_cap);
    check_fraction(&mut errors, "value_density_cap", config.value_density_cap);
    check_fraction(&mut errors, "writer_floor", config.writer_floor);

    for (field, bonus) in [
        ("mid_tier_authority_bonus", config.mid_tier_authority_bonus),
        ("top_tier_bonus", config.top_tier_bonus),
    ] {
        if let Some(points) = bonus {
            if points > 100 {
                errors.push(format!("scoring.{}: must not exceed 100, got {}", field, points));
            }
        }
    }

    if let Some(ceiling) = config.top_tier_ceiling {
        if ceiling > 100 {
            errors.push(format!(
                "scoring.top_tier_ceiling: must not exceed 100, got {}",
                ceiling
            ));
        }
    }

    if config.max_leaks == Some(0) {
        errors.push("scoring.max_leaks: must be at least 1".to_string());
    }
    if config.max_tips == Some(0) {
        errors.push("scoring.max_tips: must be at least 1".to_string());
    }
    if params.top_tier_tip_samples > params.max_tips {
        errors.push(format!(
            "scoring.top_tier_tip_samples: cannot exceed max_tips ({} > {})",
            params.top_tier_tip_samples, params.max_tips
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
