// src/matching/scorer.rs
//
// Pure compatibility scoring. No I/O, no state; safe to call concurrently
// and repeatedly with identical inputs.

use crate::models::profile::RoommateProfile;

/// Sub-score weights. Must sum to 1.0.
pub const WEIGHT_BUDGET: f64 = 0.25;
pub const WEIGHT_LIFESTYLE: f64 = 0.35;
pub const WEIGHT_INTERESTS: f64 = 0.20;
pub const WEIGHT_LOCATION: f64 = 0.20;

/// Sub-score when a profile gives us nothing to compare (empty interest or
/// location sets).
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Location sub-score when both sides state preferences but none overlap.
/// Disjoint locations are a soft mismatch, never a hard zero.
pub const DISJOINT_LOCATION_SCORE: f64 = 25.0;

/// Overall compatibility of two profiles, 0-100 rounded to two decimals.
///
/// Weighted sum of four sub-scores: budget overlap (0.25), lifestyle
/// proximity (0.35), shared interests (0.20), location overlap (0.20).
/// Well-formed profiles always produce a value; the result is clamped so a
/// degenerate input can never push a candidate outside [0, 100].
pub fn compatibility(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    let total = budget_score(a, b) * WEIGHT_BUDGET
        + lifestyle_score(a, b) * WEIGHT_LIFESTYLE
        + interest_score(a, b) * WEIGHT_INTERESTS
        + location_score(a, b) * WEIGHT_LOCATION;

    round2(total.clamp(0.0, 100.0))
}

/// Budget overlap relative to the average of the two range widths.
///
/// Two point-ranges (min == max on both sides) have no width to overlap and
/// score 0.
pub fn budget_score(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    let overlap = (a.budget_max.min(b.budget_max) - a.budget_min.max(b.budget_min)).max(0.0);
    let avg_range = ((a.budget_max - a.budget_min) + (b.budget_max - b.budget_min)) / 2.0;

    if avg_range > 0.0 {
        (overlap / avg_range * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Average of five equally weighted components: proximity on the three 1-5
/// scales (each step apart costs 20 points) and exact agreement on the two
/// boolean preferences (all or nothing).
pub fn lifestyle_score(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    let proximity = |x: i32, y: i32| (100 - (x - y).abs() * 20).max(0) as f64;

    let mut score = 0.0;
    score += proximity(a.cleanliness, b.cleanliness);
    score += proximity(a.social_level, b.social_level);
    score += proximity(a.noise_level, b.noise_level);
    score += if a.smoking_ok == b.smoking_ok { 100.0 } else { 0.0 };
    score += if a.pets_ok == b.pets_ok { 100.0 } else { 0.0 };

    score / 5.0
}

/// Jaccard similarity over interest tags; neutral when either side has none.
pub fn interest_score(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    if a.interests.is_empty() || b.interests.is_empty() {
        return NEUTRAL_SCORE;
    }

    let common = a
        .interests
        .iter()
        .filter(|i| b.interests.contains(i))
        .count();
    let union = a.interests.len() + b.interests.len() - common;

    if union > 0 {
        common as f64 / union as f64 * 100.0
    } else {
        0.0
    }
}

/// 100 on any exact location label overlap, soft 25 on disjoint sets,
/// neutral when either side states no preference.
pub fn location_score(a: &RoommateProfile, b: &RoommateProfile) -> f64 {
    if a.preferred_locations.is_empty() || b.preferred_locations.is_empty() {
        return NEUTRAL_SCORE;
    }

    let any_common = a
        .preferred_locations
        .iter()
        .any(|l| b.preferred_locations.contains(l));

    if any_common {
        100.0
    } else {
        DISJOINT_LOCATION_SCORE
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
