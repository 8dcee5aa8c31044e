//! Read-only battle content and randomness.
//!
//! Definitions (items, skills, status effects, roster templates) are plain
//! data collected in a [`ContentRegistry`]. The engine borrows the registry
//! for the lifetime of a session and never mutates it.
mod items;
mod registry;
mod rng;
mod roster;
mod skills;
mod statuses;

pub use items::{
    AccessoryDef, ArmorDef, ArmorSlot, ConsumableDef, ConsumableEffect, EquipSlot, ItemDef,
    WeaponDef, WeaponPrefix,
};
pub use registry::ContentRegistry;
pub use rng::{
    ConstantRolls, PcgRng, RngOracle, RollKind, RollSource, ScriptedRolls, SeededRolls,
    compute_seed,
};
pub use roster::{BattleRoster, CombatantTemplate};
pub use skills::{
    DamageSpec, HealSpec, SecondaryEffect, SkillCategory, SkillCost, SkillDef, WeaponRequirement,
};
pub use statuses::{PeriodicEffect, StatusCategory, StatusEffectDef, StatusFlags};
