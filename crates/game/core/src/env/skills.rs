//! Skill definitions.

use crate::combat::{DamageCategory, Element, WeaponCategory};
use crate::common::{ResourceKind, SkillId, StatusId};
use crate::formation::{RangePolicy, TargetType};

use super::statuses::StatusCategory;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDef {
    pub id: SkillId,
    pub name: String,
    pub category: SkillCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: Option<SkillCost>,
    /// Timer units the caster must hold and spends on use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timer_cost: f64,
    /// Own turns the skill stays unavailable after use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: RangePolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon_requirement: Option<WeaponRequirement>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary: Vec<SecondaryEffect>,
}

/// What a skill fundamentally does to each target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillCategory {
    /// Damage through the pipeline, then secondary effects.
    Attack(DamageSpec),
    Heal(HealSpec),
    /// Secondary effects only, friendly.
    Buff,
    /// Damage (if any) through the pipeline, then secondary effects.
    Debuff(Option<DamageSpec>),
    /// Secondary effects only, utility.
    Support,
}

impl SkillCategory {
    pub fn damage(&self) -> Option<&DamageSpec> {
        match self {
            Self::Attack(spec) => Some(spec),
            Self::Debuff(spec) => spec.as_ref(),
            Self::Heal(_) | Self::Buff | Self::Support => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageSpec {
    /// `None` uses the equipped weapon's category.
    pub category: Option<DamageCategory>,
    /// `None` uses the equipped weapon's element.
    pub element: Option<Element>,
    pub multiplier: f64,
    pub armor_penetration: f64,
    pub fixed_damage: Option<f64>,
    pub guaranteed_hit: bool,
    pub variance: bool,
    pub can_crit: bool,
    pub can_block: bool,
}

impl Default for DamageSpec {
    fn default() -> Self {
        Self {
            category: None,
            element: None,
            multiplier: 1.0,
            armor_penetration: 0.0,
            fixed_damage: None,
            guaranteed_hit: false,
            variance: true,
            can_crit: true,
            can_block: true,
        }
    }
}

/// `(base + magic_attack × scaling) × multiplier`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealSpec {
    pub base: f64,
    pub scaling: f64,
    pub multiplier: f64,
}

impl Default for HealSpec {
    fn default() -> Self {
        Self {
            base: 0.0,
            scaling: 1.0,
            multiplier: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCost {
    pub resource: ResourceKind,
    pub amount: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponRequirement {
    /// Accepted categories of the equipped weapon (bare hands are Blunt).
    pub categories: Vec<WeaponCategory>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_proficiency: u32,
}

/// Extra effects applied after a skill's main effect on each target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecondaryEffect {
    ApplyStatus {
        status: StatusId,
        chance: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        on_caster: bool,
    },
    /// Heals the caster for a share of the damage dealt.
    Lifesteal { ratio: f64 },
    RestoreResource { resource: ResourceKind, amount: u32 },
    Cleanse { category: StatusCategory },
    AddStress { amount: u32 },
}
