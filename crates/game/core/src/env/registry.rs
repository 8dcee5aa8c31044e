//! Read-only definition arena passed to every battle session.

use std::collections::BTreeMap;

use crate::common::{ItemId, SkillId, StatusId};

use super::{ItemDef, SkillDef, StatusEffectDef};

/// Immutable lookup of item, skill and status definitions by id.
///
/// Built once by the content layer and borrowed by sessions; nothing in the
/// engine mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentRegistry {
    items: BTreeMap<ItemId, ItemDef>,
    skills: BTreeMap<SkillId, SkillDef>,
    statuses: BTreeMap<StatusId, StatusEffectDef>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item, returning the definition it replaced.
    pub fn insert_item(&mut self, def: ItemDef) -> Option<ItemDef> {
        self.items.insert(def.id(), def)
    }

    pub fn insert_skill(&mut self, def: SkillDef) -> Option<SkillDef> {
        self.skills.insert(def.id, def)
    }

    pub fn insert_status(&mut self, def: StatusEffectDef) -> Option<StatusEffectDef> {
        self.statuses.insert(def.id, def)
    }

    pub fn with_item(mut self, def: ItemDef) -> Self {
        self.insert_item(def);
        self
    }

    pub fn with_skill(mut self, def: SkillDef) -> Self {
        self.insert_skill(def);
        self
    }

    pub fn with_status(mut self, def: StatusEffectDef) -> Self {
        self.insert_status(def);
        self
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    pub fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }

    pub fn status(&self, id: StatusId) -> Option<&StatusEffectDef> {
        self.statuses.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDef> {
        self.skills.values()
    }

    pub fn statuses(&self) -> impl Iterator<Item = &StatusEffectDef> {
        self.statuses.values()
    }
}
