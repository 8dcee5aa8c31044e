use arrayvec::ArrayVec;

use crate::common::{CombatantId, StatusId};
use crate::config::BattleConfig;
use crate::env::{PeriodicEffect, StatusCategory, StatusEffectDef, StatusFlags};
use crate::stats::{AttributeModifier, AttributeStore, ModifierSource};

/// One active status on one combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusInstance {
    pub status: StatusId,
    pub source: Option<CombatantId>,
    pub category: StatusCategory,
    pub flags: StatusFlags,
    pub remaining_ms: u64,
    pub stacks: u32,
    pub tick_interval_ms: u64,
    /// Milliseconds accumulated toward the next periodic tick.
    pub tick_elapsed_ms: u64,
    pub periodic: Option<PeriodicEffect>,
    applied: Vec<AttributeModifier>,
}

impl StatusInstance {
    fn new(def: &StatusEffectDef, source: Option<CombatantId>) -> Self {
        Self {
            status: def.id,
            source,
            category: def.category,
            flags: def.flags,
            remaining_ms: def.duration_ms,
            stacks: 1,
            tick_interval_ms: def.tick_interval_ms,
            tick_elapsed_ms: 0,
            periodic: def.periodic,
            applied: Vec::new(),
        }
    }

    /// Modifiers this instance currently has installed.
    pub fn applied_modifiers(&self) -> &[AttributeModifier] {
        &self.applied
    }

    fn install(&mut self, def: &StatusEffectDef, store: &mut AttributeStore) {
        let source = ModifierSource::Status(self.status);
        for template in &def.modifiers {
            let modifier = template.instantiate(source, f64::from(self.stacks));
            store.add_modifier(modifier);
            self.applied.push(modifier);
        }
    }

    fn uninstall(&mut self, store: &mut AttributeStore) {
        for modifier in self.applied.drain(..) {
            store.remove_modifier(&modifier);
        }
    }
}

/// What [`StatusEffects::apply`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplication {
    Applied,
    /// Stack count grew (and duration refreshed if configured).
    Stacked { stacks: u32 },
    /// Already at max stacks; duration refreshed.
    Refreshed,
    /// Already at max stacks and not refreshable.
    Unchanged,
    /// No free status slot.
    Rejected,
}

impl StatusApplication {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged | Self::Rejected)
    }
}

/// A periodic effect that fired during [`StatusEffects::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicTick {
    pub status: StatusId,
    pub source: Option<CombatantId>,
    pub category: StatusCategory,
    pub effect: PeriodicEffect,
    pub stacks: u32,
    pub ignores_defense: bool,
}

impl PeriodicTick {
    /// `value × stacks`, or `value × max_health × stacks` for percentage effects.
    pub fn magnitude(&self, max_health: f64) -> f64 {
        let per_stack = if self.effect.is_percentage {
            self.effect.value_per_tick * max_health
        } else {
            self.effect.value_per_tick
        };
        per_stack * f64::from(self.stacks)
    }
}

/// Result of advancing a combatant's statuses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusAdvance {
    pub ticks: Vec<PeriodicTick>,
    pub expired: Vec<StatusId>,
}

/// Active statuses of one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusEffects {
    active: ArrayVec<StatusInstance, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.active.iter()
    }

    pub fn get(&self, status: StatusId) -> Option<&StatusInstance> {
        self.active.iter().find(|i| i.status == status)
    }

    pub fn contains(&self, status: StatusId) -> bool {
        self.get(status).is_some()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// True if any active status blocks turns.
    pub fn prevents_action(&self) -> bool {
        self.active
            .iter()
            .any(|i| i.flags.contains(StatusFlags::PREVENTS_ACTION))
    }

    /// Applies or re-applies `def`.
    ///
    /// Re-application grows stacks up to the cap when stackable and resets
    /// the duration when `refresh_on_reapply`; modifiers are re-derived for
    /// the new stack count.
    pub fn apply(
        &mut self,
        def: &StatusEffectDef,
        source: Option<CombatantId>,
        store: &mut AttributeStore,
    ) -> StatusApplication {
        if let Some(instance) = self.active.iter_mut().find(|i| i.status == def.id) {
            let cap = def.stack_cap();
            let stacked = instance.stacks < cap;
            if !stacked && !def.refresh_on_reapply {
                return StatusApplication::Unchanged;
            }

            if def.refresh_on_reapply {
                instance.remaining_ms = def.duration_ms;
            }
            if source.is_some() {
                instance.source = source;
            }
            if stacked {
                instance.stacks += 1;
                instance.uninstall(store);
                instance.install(def, store);
                return StatusApplication::Stacked {
                    stacks: instance.stacks,
                };
            }
            return StatusApplication::Refreshed;
        }

        if self.active.is_full() {
            tracing::warn!(status = %def.id, "status capacity reached, application dropped");
            return StatusApplication::Rejected;
        }

        let mut instance = StatusInstance::new(def, source);
        instance.install(def, store);
        self.active.push(instance);
        StatusApplication::Applied
    }

    /// Removes one status and its modifiers. Returns true if it was active.
    pub fn remove(&mut self, status: StatusId, store: &mut AttributeStore) -> bool {
        match self.active.iter().position(|i| i.status == status) {
            Some(idx) => {
                let mut instance = self.active.remove(idx);
                instance.uninstall(store);
                true
            }
            None => false,
        }
    }

    /// Removes every status of `category`. Returns the removed ids.
    pub fn remove_category(
        &mut self,
        category: StatusCategory,
        store: &mut AttributeStore,
    ) -> Vec<StatusId> {
        let ids: Vec<_> = self
            .active
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.status)
            .collect();
        for id in &ids {
            self.remove(*id, store);
        }
        ids
    }

    /// Removes everything. Returns the removed ids.
    pub fn clear(&mut self, store: &mut AttributeStore) -> Vec<StatusId> {
        let ids: Vec<_> = self.active.iter().map(|i| i.status).collect();
        for mut instance in self.active.drain(..) {
            instance.uninstall(store);
        }
        ids
    }

    /// Advances every instance by `dt_ms`.
    ///
    /// Periodic ticks that fall due within the step are reported before the
    /// instance expires, so a duration that is a multiple of the interval
    /// ticks exactly `duration / interval` times.
    pub fn advance(&mut self, dt_ms: u64, store: &mut AttributeStore) -> StatusAdvance {
        let mut out = StatusAdvance::default();

        for instance in self.active.iter_mut() {
            let step = dt_ms.min(instance.remaining_ms);

            if let (Some(effect), true) = (instance.periodic, instance.tick_interval_ms > 0) {
                instance.tick_elapsed_ms += step;
                while instance.tick_elapsed_ms >= instance.tick_interval_ms {
                    instance.tick_elapsed_ms -= instance.tick_interval_ms;
                    out.ticks.push(PeriodicTick {
                        status: instance.status,
                        source: instance.source,
                        category: instance.category,
                        effect,
                        stacks: instance.stacks,
                        ignores_defense: instance.flags.contains(StatusFlags::IGNORES_DEFENSE),
                    });
                }
            }

            instance.remaining_ms -= step;
            if instance.remaining_ms == 0 {
                out.expired.push(instance.status);
            }
        }

        for id in &out.expired {
            self.remove(*id, store);
        }
        out
    }

    /// Rebuilds an instance from persisted fields, installing its modifiers.
    pub(crate) fn restore(
        &mut self,
        def: &StatusEffectDef,
        remaining_ms: u64,
        stacks: u32,
        tick_elapsed_ms: u64,
        store: &mut AttributeStore,
    ) -> bool {
        if self.active.is_full() || self.contains(def.id) {
            return false;
        }
        let mut instance = StatusInstance::new(def, None);
        instance.remaining_ms = remaining_ms;
        instance.stacks = stacks.clamp(1, def.stack_cap());
        instance.tick_elapsed_ms = tick_elapsed_ms;
        instance.install(def, store);
        self.active.push(instance);
        true
    }
}
