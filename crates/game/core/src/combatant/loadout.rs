//! Equipment slots and the equip/unequip contract.

use arrayvec::ArrayVec;
use strum::EnumCount;

use crate::common::ItemId;
use crate::config::BattleConfig;
use crate::env::{AccessoryDef, ArmorDef, ArmorSlot, EquipSlot, ItemDef, WeaponDef};
use crate::stats::ModifierSource;

use super::Combatant;

/// Items currently worn. Definitions are owned copies, so the combatant can
/// refresh its cache without a registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loadout {
    weapon: Option<WeaponDef>,
    armor: [Option<ArmorDef>; ArmorSlot::COUNT],
    accessories: ArrayVec<AccessoryDef, { BattleConfig::MAX_ACCESSORIES }>,
}

impl Loadout {
    pub fn weapon(&self) -> Option<&WeaponDef> {
        self.weapon.as_ref()
    }

    pub fn armor(&self, slot: ArmorSlot) -> Option<&ArmorDef> {
        self.armor[slot.index()].as_ref()
    }

    pub fn accessories(&self) -> &[AccessoryDef] {
        &self.accessories
    }

    /// Ids of every equipped item, weapon first.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.weapon
            .iter()
            .map(|w| w.id)
            .chain(self.armor.iter().flatten().map(|a| a.id))
            .chain(self.accessories.iter().map(|a| a.id))
            .collect()
    }
}

impl Combatant {
    /// Equips `item`, replacing whatever held its slot.
    ///
    /// Returns false for consumables, for an accessory already worn, and when
    /// every accessory slot is taken.
    pub fn equip(&mut self, item: &ItemDef) -> bool {
        match item {
            ItemDef::Consumable(_) => return false,
            ItemDef::Weapon(def) => {
                self.unequip(EquipSlot::Weapon);
                self.loadout.weapon = Some(def.clone());
            }
            ItemDef::Armor(def) => {
                self.unequip(EquipSlot::Armor(def.slot));
                self.loadout.armor[def.slot.index()] = Some(def.clone());
            }
            ItemDef::Accessory(def) => {
                if self.loadout.accessories.iter().any(|a| a.id == def.id) {
                    return false;
                }
                if self.loadout.accessories.try_push(def.clone()).is_err() {
                    tracing::debug!(combatant = %self.id, item = %def.id, "no free accessory slot");
                    return false;
                }
            }
        }
        self.install_item(item);
        true
    }

    /// Removes the item in `slot` and everything it contributed.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemDef> {
        let removed = match slot {
            EquipSlot::Weapon => self.loadout.weapon.take().map(ItemDef::Weapon),
            EquipSlot::Armor(armor) => self.loadout.armor[armor.index()]
                .take()
                .map(ItemDef::Armor),
            EquipSlot::Accessory(idx) => (idx < self.loadout.accessories.len())
                .then(|| ItemDef::Accessory(self.loadout.accessories.remove(idx))),
        }?;

        let source = ModifierSource::Equipment(removed.id());
        self.attributes.remove_modifiers_from_source(source);
        self.cache.remove_contributions_from(source);
        self.cache.mark_dirty();
        self.clamp_resources();
        Some(removed)
    }

    fn install_item(&mut self, item: &ItemDef) {
        let source = ModifierSource::Equipment(item.id());
        for template in item.modifiers() {
            self.attributes.add_modifier(template.instantiate(source, 1.0));
        }

        match item {
            ItemDef::Armor(def) => {
                for &(category, value) in &def.resistances {
                    self.cache.add_damage_resistance(source, category, value);
                }
                for &(element, value) in &def.elemental_resistances {
                    self.cache.add_elemental_resistance(source, element, value);
                }
            }
            ItemDef::Accessory(def) => {
                for &(category, value) in &def.damage_multipliers {
                    self.cache.add_damage_multiplier(source, category, value);
                }
                for &(element, value) in &def.elemental_bonuses {
                    self.cache.add_elemental_damage_bonus(source, element, value);
                }
            }
            ItemDef::Weapon(_) | ItemDef::Consumable(_) => {}
        }

        self.cache.mark_dirty();
        self.clamp_resources();
    }
}
