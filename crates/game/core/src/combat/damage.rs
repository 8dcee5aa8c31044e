//! The damage pipeline.
//!
//! ```text
//!  1  hit roll            (True / guaranteed: always hits)
//!  2  block roll          (skipped for True)
//!  3  base damage         fixed | weapon | half attack unarmed
//!  4  + attack bonus      half attack, 0 for True          ┐
//!  5  × type multiplier                                    │ skipped with
//!  6  × (1 + elemental bonus)                              │ fixed damage
//!  7  crit roll           × (crit damage + weapon mult − 1)┘
//!  8  − defense ratio     (skipped for True)
//!  9  × (1 − category res) × (1 − elemental res)
//! 10  × (1 − block reduction) if blocked
//! 11  × skill multiplier
//! 12  × variance
//! 13  max(1, round(value))
//! ```

use crate::config::PipelineParams;
use crate::env::{RollKind, RollSource};

use super::cache::WeaponProfile;
use super::context::DamageContext;
use super::hit::{block_chance, crit_chance, defense_ratio, hit_chance};
use super::result::DamageResult;
use super::types::DamageCategory;

/// Resolves one damage request.
///
/// Pure given the roll source: the same context and rolls always give the
/// same result. Rolls are drawn only for stages that can happen.
pub fn resolve(
    ctx: &DamageContext<'_>,
    params: &PipelineParams,
    rolls: &mut impl RollSource,
) -> DamageResult {
    let is_true = ctx.category == DamageCategory::True;
    let mut out = DamageResult::neutral();

    // 1. hit
    let always_hits = is_true || ctx.guaranteed_hit || ctx.attacker.is_none();
    if !always_hits {
        let accuracy = ctx.attacker.map_or(0.0, |a| a.cache.accuracy());
        let chance = hit_chance(accuracy, ctx.defender.evasion(), params);
        if rolls.roll(RollKind::Hit) >= chance {
            tracing::trace!(chance, "attack missed");
            return DamageResult::miss(chance);
        }
        out.hit_chance = chance;
    }

    // 2. block
    if ctx.can_block && !is_true {
        out.block_chance = block_chance(ctx.defender.block_rate_for(ctx.category), params);
        out.is_blocked = out.block_chance > 0.0 && rolls.roll(RollKind::Block) < out.block_chance;
    }

    // 3-7. attacker-driven stages
    let mut value = match ctx.fixed_damage {
        Some(fixed) => {
            out.base_damage = sanitize(fixed);
            out.base_damage
        }
        None => match ctx.attacker {
            Some(attacker) => {
                let cache = attacker.cache;
                let weapon = cache.weapon();
                let attack = cache.attack_for(ctx.category);

                out.base_damage = if weapon.armed {
                    weapon.base_damage
                } else {
                    (cache.attack_for(DamageCategory::Physical) * 0.5)
                        .max(WeaponProfile::UNARMED.base_damage)
                };
                out.attack_bonus = attack * 0.5;
                out.type_multiplier = cache.damage_multiplier(ctx.category);
                out.elemental_bonus = cache.elemental_bonus(ctx.element);

                let mut value = sanitize(out.base_damage + out.attack_bonus);
                value = sanitize(value * out.type_multiplier);
                value = sanitize(value * (1.0 + out.elemental_bonus));

                if ctx.can_crit {
                    out.crit_chance = crit_chance(cache.crit_rate(), weapon.crit_chance, params);
                    if out.crit_chance > 0.0 && rolls.roll(RollKind::Crit) < out.crit_chance {
                        out.is_crit = true;
                        out.crit_multiplier =
                            (cache.crit_damage() + weapon.crit_multiplier - 1.0).max(1.0);
                        value = sanitize(value * out.crit_multiplier);
                    }
                }
                value
            }
            None => 0.0,
        },
    };

    // 8. defense
    if !is_true && !ctx.ignore_defense {
        out.defense_ratio = defense_ratio(
            ctx.defender.defense_for(ctx.category),
            ctx.armor_penetration,
            ctx.attacker_level(),
            params,
        );
        value = sanitize(value * (1.0 - out.defense_ratio));
    }

    // 9. resistances
    if !ctx.bypass_elemental_resistance {
        out.category_resistance = ctx.defender.damage_resistance(ctx.category);
        out.elemental_resistance = ctx.defender.elemental_resistance(ctx.element);
        value = sanitize(
            value * (1.0 - out.category_resistance) * (1.0 - out.elemental_resistance),
        );
    }

    // 10. block
    if out.is_blocked {
        out.block_multiplier = 1.0 - params.block_reduction;
        value = sanitize(value * out.block_multiplier);
    }

    // 11. skill multiplier
    out.skill_multiplier = ctx.skill_multiplier;
    value = sanitize(value * ctx.skill_multiplier);

    // 12. variance
    if ctx.variance {
        let span = params.variance_max - params.variance_min;
        out.variance = params.variance_min + rolls.roll(RollKind::Variance) * span;
        value = sanitize(value * out.variance);
    }

    // 13. floor
    out.raw_damage = value;
    out.final_damage = finalize(value);
    out
}

/// Non-finite or negative intermediates collapse to zero.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn finalize(value: f64) -> u32 {
    let rounded = value.round();
    if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        (rounded as u32).max(1)
    }
}
