//! Per-field confidence scoring.
//!
//! Confidence is seeded by the provenance tier that produced a field and
//! adjusted by completeness signals. It is never derived from content
//! plausibility after the fact, and a field with no value is always 0.0
//! rather than a silently propagated null.

use crate::model::{Confidences, ParsedIngredient, ProvenanceTier};

/// Scalar field (name, serves, time): the tier's base score when the
/// value exists, zero otherwise
pub fn scalar(tier: ProvenanceTier, present: bool) -> f32 {
    if present {
        tier.base_confidence()
    } else {
        0.0
    }
}

/// Ingredient-list confidence: the tier base scaled by how completely the
/// raw lines parsed, averaged with how many parsed entries carry an
/// amount. The scaling keeps the tier ordering intact: identical content
/// through a weaker tier always scores strictly lower.
pub fn ingredients(tier: ProvenanceTier, parsed: &[ParsedIngredient], raw_count: usize) -> f32 {
    let named: Vec<&ParsedIngredient> = parsed.iter().filter(|i| !i.name.is_empty()).collect();
    if named.is_empty() || raw_count == 0 {
        return 0.0;
    }

    let parse_ratio = (named.len() as f32 / raw_count as f32).min(1.0);
    let amount_ratio =
        named.iter().filter(|i| i.amount.is_some()).count() as f32 / named.len() as f32;
    let completeness = (parse_ratio + amount_ratio) / 2.0;

    clamp01(tier.base_confidence() * (0.5 + 0.5 * completeness))
}

/// Direction-list confidence: base score, nudged down when suspiciously
/// few steps survived the junk filter
pub fn directions(tier: ProvenanceTier, count: usize) -> f32 {
    match count {
        0 => 0.0,
        1 => clamp01(tier.base_confidence() * 0.8),
        _ => tier.base_confidence(),
    }
}

/// Assemble the full per-field confidence block for a result
pub fn score_fields(
    tier: ProvenanceTier,
    name_present: bool,
    course_confidence: f32,
    cuisine_present: bool,
    parsed: &[ParsedIngredient],
    raw_count: usize,
    direction_count: usize,
    serves_present: bool,
    time_present: bool,
) -> Confidences {
    Confidences {
        name: scalar(tier, name_present),
        course: clamp01(course_confidence),
        cuisine: if cuisine_present {
            clamp01(course_confidence.min(tier.base_confidence()))
        } else {
            0.0
        },
        ingredients: ingredients(tier, parsed, raw_count),
        directions: directions(tier, direction_count),
        serves: scalar(tier, serves_present),
        time: scalar(tier, time_present),
    }
}

fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
