//! Item definitions.
//!
//! Items are a closed set of kinds; each kind carries its own data and the
//! engine matches on them exhaustively.

use crate::combat::{DamageCategory, Element, WeaponCategory};
use crate::common::{ItemId, ResourceKind, StatusId};
use crate::formation::TargetType;
use crate::stats::StatModifierTemplate;

use super::statuses::StatusCategory;

/// Any item the registry knows about.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemDef {
    Weapon(WeaponDef),
    Armor(ArmorDef),
    Accessory(AccessoryDef),
    Consumable(ConsumableDef),
}

impl ItemDef {
    pub fn id(&self) -> ItemId {
        match self {
            Self::Weapon(d) => d.id,
            Self::Armor(d) => d.id,
            Self::Accessory(d) => d.id,
            Self::Consumable(d) => d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Weapon(d) => &d.name,
            Self::Armor(d) => &d.name,
            Self::Accessory(d) => &d.name,
            Self::Consumable(d) => &d.name,
        }
    }

    /// Stat modifiers installed while equipped. Consumables have none.
    pub fn modifiers(&self) -> &[StatModifierTemplate] {
        match self {
            Self::Weapon(d) => &d.modifiers,
            Self::Armor(d) => &d.modifiers,
            Self::Accessory(d) => &d.modifiers,
            Self::Consumable(_) => &[],
        }
    }

    pub fn is_equippable(&self) -> bool {
        !matches!(self, Self::Consumable(_))
    }
}

/// Rolled weapon prefix ("Sharp", "Heavy"), fed in by the crafting layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponPrefix {
    pub flat_damage: f64,
    /// 0.1 = +10%.
    pub damage_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponDef {
    pub id: ItemId,
    pub name: String,
    pub category: WeaponCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_category: DamageCategory,
    pub base_damage: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: Option<WeaponPrefix>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_crit_multiplier"))]
    pub crit_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifierTemplate>,
}

#[cfg(feature = "serde")]
fn default_crit_multiplier() -> f64 {
    1.0
}

impl WeaponDef {
    /// `(base + prefix_flat) × (1 + prefix_percent)`
    pub fn final_damage(&self) -> f64 {
        let prefix = self.prefix.unwrap_or_default();
        (self.base_damage + prefix.flat_damage) * (1.0 + prefix.damage_percent)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArmorSlot {
    Head,
    Body,
    Hands,
    Feet,
}

impl ArmorSlot {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Where an equipped item sits on a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipSlot {
    Weapon,
    Armor(ArmorSlot),
    /// Accessory index, `0..MAX_ACCESSORIES`.
    Accessory(usize),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorDef {
    pub id: ItemId,
    pub name: String,
    pub slot: ArmorSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifierTemplate>,
    /// Damage-category resistances (0.1 = 10% less damage).
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<(DamageCategory, f64)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elemental_resistances: Vec<(Element, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessoryDef {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifierTemplate>,
    /// Outgoing damage multipliers per category (0.1 = ×1.1).
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_multipliers: Vec<(DamageCategory, f64)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elemental_bonuses: Vec<(Element, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumableDef {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_consumable_target"))]
    pub target: TargetType,
    pub effect: ConsumableEffect,
}

#[cfg(feature = "serde")]
fn default_consumable_target() -> TargetType {
    TargetType::SingleAlly
}

/// What a consumable does to each target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsumableEffect {
    Heal { amount: u32 },
    RestoreResource { resource: ResourceKind, amount: u32 },
    ApplyStatus { status: StatusId },
    RelieveStress { amount: u32 },
    Cleanse { category: StatusCategory },
    /// Brings a downed target back with a fraction of max health.
    Revive { health_fraction: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_applies_flat_then_percent() {
        let weapon = WeaponDef {
            id: ItemId(1),
            name: "Sharp Sword".into(),
            category: WeaponCategory::Sword,
            element: Element::None,
            damage_category: DamageCategory::Physical,
            base_damage: 20.0,
            prefix: Some(WeaponPrefix {
                flat_damage: 5.0,
                damage_percent: 0.2,
            }),
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            modifiers: Vec::new(),
        };
        assert_eq!(weapon.final_damage(), 30.0);
        assert_eq!(ItemDef::Weapon(weapon).name(), "Sharp Sword");
    }
}
