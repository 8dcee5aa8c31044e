//! Chance and mitigation formulas.
//!
//! Each function is one clamped formula; [`resolve`](super::resolve) rolls
//! against them.

use crate::config::PipelineParams;

/// `clamp(accuracy − max(evasion, min_evasion) + offset, min, max)`
pub fn hit_chance(accuracy: f64, evasion: f64, params: &PipelineParams) -> f64 {
    let chance = accuracy - evasion.max(params.min_evasion) + params.hit_offset;
    clamp_or(chance, params.min_hit_chance, params.max_hit_chance)
}

pub fn block_chance(block_rate: f64, params: &PipelineParams) -> f64 {
    clamp_or(block_rate, 0.0, params.max_block_chance)
}

pub fn crit_chance(crit_rate: f64, weapon_crit_chance: f64, params: &PipelineParams) -> f64 {
    clamp_or(crit_rate + weapon_crit_chance, 0.0, params.max_crit_chance)
}

/// Fraction of damage removed by defense.
///
/// `d' = defense × (1 − pen)`, `ratio = d' / (d' + constant + level × per_level)`
pub fn defense_ratio(
    defense: f64,
    armor_penetration: f64,
    attacker_level: u32,
    params: &PipelineParams,
) -> f64 {
    let penetration = clamp_or(armor_penetration, 0.0, 1.0);
    let effective = (defense * (1.0 - penetration)).max(0.0);
    let denominator =
        effective + params.defense_constant + f64::from(attacker_level) * params.defense_per_level;
    if denominator <= 0.0 {
        return 0.0;
    }
    clamp_or(effective / denominator, 0.0, params.max_defense_reduction)
}

/// Clamps, mapping NaN to the lower bound.
fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
