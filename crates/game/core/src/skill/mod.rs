//! Skill availability and cost rules.
//!
//! [`can_use`] is the single gate the session consults before queueing or
//! executing a skill. Execution itself lives with the session because it
//! touches several combatants, the formation and the roll source at once.

mod block;

pub use block::SkillBlock;

use crate::combatant::Combatant;
use crate::common::{CombatantId, SkillId};
use crate::config::BattleConfig;
use crate::env::{ContentRegistry, HealSpec, SkillCost, SkillDef};
use crate::formation::{Formation, valid_targets};

/// Looks up a skill the caster is allowed to attempt.
pub fn lookup<'r>(
    registry: &'r ContentRegistry,
    caster: &Combatant,
    skill: SkillId,
) -> Result<&'r SkillDef, SkillBlock> {
    if caster.is_downed() {
        return Err(SkillBlock::Downed);
    }
    let def = registry.skill(skill).ok_or(SkillBlock::UnknownSkill(skill))?;
    if !caster.knows_skill(skill) {
        return Err(SkillBlock::NotLearned(skill));
    }
    Ok(def)
}

/// Fraction of a skill's cost waived at `proficiency`.
pub fn proficiency_discount(proficiency: u32, config: &BattleConfig) -> f64 {
    (f64::from(proficiency) * config.proficiency_discount_per_level)
        .clamp(0.0, config.max_proficiency_discount.max(0.0))
}

/// `ceil(cost × (1 − discount))`, never below 0.
pub fn discounted_cost(cost: u32, proficiency: u32, config: &BattleConfig) -> u32 {
    let scaled = f64::from(cost) * (1.0 - proficiency_discount(proficiency, config));
    if scaled.is_finite() && scaled > 0.0 {
        scaled.ceil() as u32
    } else {
        0
    }
}

/// The resource cost `caster` would pay for `skill`, after the discount
/// for the equipped weapon category.
pub fn effective_cost(
    skill: &SkillDef,
    caster: &Combatant,
    config: &BattleConfig,
) -> Option<SkillCost> {
    let category = caster.weapon_category();
    skill.cost.map(|cost| SkillCost {
        resource: cost.resource,
        amount: discounted_cost(cost.amount, caster.proficiency(category), config),
    })
}

/// Validates `skill` for `caster` and returns the targets it may pick from.
///
/// Checks run in a fixed order: weapon category, proficiency, resource,
/// timer, cooldown, targets. The first failure is reported.
pub fn can_use(
    skill: &SkillDef,
    caster: &Combatant,
    formation: &Formation,
    config: &BattleConfig,
    is_downed: impl Fn(CombatantId) -> bool,
) -> Result<Vec<CombatantId>, SkillBlock> {
    if let Some(req) = &skill.weapon_requirement {
        let category = caster.weapon_category();
        if !req.categories.is_empty() && !req.categories.contains(&category) {
            return Err(SkillBlock::WrongWeapon {
                required: req.categories.clone(),
                equipped: category,
            });
        }
        let have = caster.proficiency(category);
        if have < req.min_proficiency {
            return Err(SkillBlock::InsufficientProficiency {
                required: req.min_proficiency,
                have,
            });
        }
    }

    if let Some(cost) = effective_cost(skill, caster, config) {
        let have = caster.resource(cost.resource);
        if have < cost.amount {
            return Err(SkillBlock::InsufficientResource {
                resource: cost.resource,
                required: cost.amount,
                have,
            });
        }
    }

    if caster.timer() < skill.timer_cost {
        return Err(SkillBlock::InsufficientTimer {
            required: skill.timer_cost,
            have: caster.timer(),
        });
    }

    let remaining = caster.cooldown(skill.id);
    if remaining > 0 {
        return Err(SkillBlock::OnCooldown { remaining });
    }

    let targets = valid_targets(
        formation,
        caster.id(),
        skill.target,
        &skill.range,
        config.front_line_depth,
        is_downed,
    );
    if targets.is_empty() {
        return Err(SkillBlock::NoValidTarget);
    }
    Ok(targets)
}

/// `round((base + magic_attack × scaling) × multiplier)`, at least 0.
pub fn heal_amount(spec: &HealSpec, magic_attack: f64) -> u32 {
    let raw = (spec.base + magic_attack * spec.scaling) * spec.multiplier;
    if raw.is_finite() && raw > 0.0 {
        raw.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
