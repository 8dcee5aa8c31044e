//! Deterministic Active Time Battle rules.
//!
//! `atb-core` defines the canonical combat model (attributes, damage,
//! formation, statuses, skills, scheduler) as pure, tick-driven APIs with no
//! I/O. All battle state mutation flows through [`engine::BattleSession`];
//! content crates feed it a read-only [`env::ContentRegistry`].
pub mod combat;
pub mod combatant;
pub mod common;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod formation;
pub mod skill;
pub mod stats;
pub mod status;

pub use combat::{
    Attacker, CombatAttributeCache, DamageCategory, DamageContext, DamageResult, Element,
    WeaponCategory, resolve,
};
pub use combatant::{Combatant, CombatantSnapshot, Loadout, Resources, StatusSnapshot};
pub use common::{CombatantId, Controller, ItemId, ResourceKind, Side, SkillId, StatusId, Tick};
pub use config::{BattleConfig, EscapeParams, PipelineParams};
pub use engine::{
    ActionRejected, BattleAction, BattleEvent, BattleSession, BattleState, DamageSource,
    SetupError, SkipReason,
};
pub use env::{
    BattleRoster, CombatantTemplate, ContentRegistry, ItemDef, RollKind, RollSource, SeededRolls,
    SkillDef, StatusEffectDef,
};
pub use error::{BattleError, ErrorContext, ErrorSeverity};
pub use formation::{Formation, FormationError, Position, RangePolicy, TargetType};
pub use skill::SkillBlock;
pub use stats::{AttributeModifier, AttributeStore, BaseStats, ModifierOp, ModifierSource, StatKind};
pub use status::{StatusEffects, StatusInstance};
