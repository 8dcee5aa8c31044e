//! Attribute system.
//!
//! # Architecture
//!
//! ```text
//! [ BaseStats (CON STR PER REA WIS LUK) + level ]
//!      ↓  base-attribute ledgers
//! [ Effective base attributes ]
//!      ↓  formulas.rs
//! [ Derived stat bases ]
//!      ↓  derived-stat ledgers
//! [ Final stat values ]  (memoized, dirty-mask gated)
//! ```
//!
//! Both layers share one ledger type; a modifier on Constitution and a
//! modifier on MaxHealth travel through the same `add_modifier` call.
//!
//! ## Ledger formula
//!
//! `(base + Σflat) × (1 + Σpercent_add) × Π(1 + percent_mult)`

pub mod base;
pub mod formulas;
pub mod kind;
pub mod modifier;
pub mod store;

pub use base::BaseStats;
pub use kind::{StatKind, StatMask};
pub use modifier::{
    AttributeModifier, ModifierLedger, ModifierOp, ModifierSource, StatModifierTemplate,
};
pub use store::AttributeStore;
