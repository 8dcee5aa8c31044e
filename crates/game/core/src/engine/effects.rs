//! Applying outcomes to combatants.
//!
//! Every health change goes through [`BattleSession::apply_damage_result`],
//! [`BattleSession::heal_target`] or [`BattleSession::revive_target`], which
//! emit events, handle downing and check for the end of the battle.

use crate::combat::{Attacker, DamageContext, DamageResult, resolve};
use crate::combatant::Combatant;
use crate::common::{CombatantId, ResourceKind, Side, SkillId};
use crate::env::{
    ConsumableEffect, DamageSpec, RollKind, RollSource, SecondaryEffect, SeededRolls,
    StatusEffectDef,
};
use crate::status::{PeriodicTick, StatusApplication, StatusCategory};

use super::events::{BattleEvent, DamageSource};
use super::BattleSession;

impl BattleSession<'_> {
    pub(super) fn weapon_attack(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        rolls: &mut SeededRolls,
    ) -> Option<u32> {
        let result = {
            let attacker = self.combatants.get(&actor)?;
            let defender = self.combatants.get(&target)?;
            let ctx = DamageContext::weapon_attack(
                Attacker::new(attacker.cache(), attacker.level()),
                defender.cache(),
            );
            resolve(&ctx, &self.config.pipeline, rolls)
        };
        self.apply_damage_result(Some(actor), target, &result, DamageSource::Attack)
    }

    /// Resolves one skill hit. Returns `None` on a miss.
    pub(super) fn skill_damage(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        spec: &DamageSpec,
        skill: SkillId,
        rolls: &mut SeededRolls,
    ) -> Option<u32> {
        let result = {
            let attacker = self.combatants.get(&actor)?;
            let defender = self.combatants.get(&target)?;
            let weapon = attacker.cache().weapon();
            let mut ctx = DamageContext::weapon_attack(
                Attacker::new(attacker.cache(), attacker.level()),
                defender.cache(),
            )
            .with_category(spec.category.unwrap_or(weapon.damage_category))
            .with_element(spec.element.unwrap_or(weapon.element))
            .with_skill_multiplier(spec.multiplier)
            .with_armor_penetration(spec.armor_penetration)
            .with_guaranteed_hit(spec.guaranteed_hit)
            .with_variance(spec.variance)
            .with_can_crit(spec.can_crit)
            .with_can_block(spec.can_block);
            if let Some(fixed) = spec.fixed_damage {
                ctx = ctx.with_fixed_damage(fixed);
            }
            resolve(&ctx, &self.config.pipeline, rolls)
        };
        self.apply_damage_result(Some(actor), target, &result, DamageSource::Skill(skill))
    }

    /// One periodic damage tick through the pipeline.
    pub(super) fn status_damage(&mut self, holder: CombatantId, tick: &PeriodicTick) {
        let mut rolls = SeededRolls::new(self.seed, self.tick.0, Some(holder));
        let result = {
            let Some(defender) = self.combatants.get(&holder) else {
                return;
            };
            let amount = tick.magnitude(f64::from(defender.max_health()));
            let attacker = tick
                .source
                .and_then(|id| self.combatants.get(&id))
                .map(|c| Attacker::new(c.cache(), c.level()));
            let ctx = DamageContext::periodic(
                defender.cache(),
                tick.effect.damage_category,
                tick.effect.element,
                amount,
            )
            .with_attacker(attacker)
            .with_ignore_defense(tick.ignores_defense);
            resolve(&ctx, &self.config.pipeline, &mut rolls)
        };
        self.apply_damage_result(
            tick.source,
            holder,
            &result,
            DamageSource::Status(tick.status),
        );
    }

    /// Applies a resolved hit. Returns the health actually lost, or `None`
    /// on a miss.
    pub(super) fn apply_damage_result(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        result: &DamageResult,
        cause: DamageSource,
    ) -> Option<u32> {
        if result.is_miss {
            tracing::debug!(source = ?source, target = %target, chance = result.hit_chance, "missed");
            self.emit(BattleEvent::Missed { source, target });
            return None;
        }

        let crit_stress = self.config.stress_on_crit_taken;
        let combatant = self.combatants.get_mut(&target)?;
        let dealt = combatant.take_damage(result.final_damage);
        let downed = combatant.is_downed();
        let stress = (result.is_crit && !downed).then(|| {
            combatant.add_stress(crit_stress);
            combatant.stress()
        });

        tracing::debug!(
            source = ?source,
            target = %target,
            damage = dealt,
            crit = result.is_crit,
            blocked = result.is_blocked,
            "damage dealt"
        );
        self.emit(BattleEvent::DamageDealt {
            source,
            target,
            amount: dealt,
            is_crit: result.is_crit,
            is_blocked: result.is_blocked,
            cause,
        });
        if let Some(stress) = stress {
            self.emit(BattleEvent::StressChanged { target, stress });
        }

        if downed && dealt > 0 {
            self.handle_downed(target);
        }
        Some(dealt)
    }

    fn handle_downed(&mut self, target: CombatantId) {
        let ally_stress = self.config.stress_on_ally_downed;
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return;
        };
        let side = combatant.side();
        let cleared = combatant.clear_statuses();
        combatant.end_defend();
        combatant.set_timer(0.0);

        tracing::info!(target = %target, side = %side, "combatant downed");
        for status in cleared {
            self.emit(BattleEvent::StatusRemoved { target, status });
        }
        self.emit(BattleEvent::Downed { target });

        let mut stressed = Vec::new();
        for ally in self
            .combatants
            .values_mut()
            .filter(|c| c.side() == side && c.is_alive())
        {
            ally.add_stress(ally_stress);
            stressed.push((ally.id(), ally.stress()));
        }
        for (ally, stress) in stressed {
            self.emit(BattleEvent::StressChanged {
                target: ally,
                stress,
            });
        }

        self.repack_formation(side);
        self.check_outcome();
    }

    /// Moves live members of `side` ahead of downed ones.
    fn repack_formation(&mut self, side: Side) {
        let combatants = &self.combatants;
        let moves = self.formation.shift_forward(side, |id| {
            combatants.get(&id).is_some_and(Combatant::is_alive)
        });
        if !moves.is_empty() {
            self.emit(BattleEvent::FormationShifted { side, moves });
        }
    }

    /// Heals a live target. Emits nothing when nothing was restored.
    pub(super) fn heal_target(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        amount: u32,
    ) -> u32 {
        let healed = self
            .combatants
            .get_mut(&target)
            .map_or(0, |c| c.heal(amount));
        if healed > 0 {
            tracing::debug!(source = ?source, target = %target, amount = healed, "healed");
            self.emit(BattleEvent::Healed {
                source,
                target,
                amount: healed,
            });
        }
        healed
    }

    /// Brings a downed target back. No effect on the living.
    pub(super) fn revive_target(&mut self, target: CombatantId, health: u32) {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return;
        };
        if !combatant.revive(health) {
            return;
        }
        let health = combatant.health();
        let side = combatant.side();
        tracing::info!(target = %target, health, "combatant revived");
        self.emit(BattleEvent::Revived { target, health });
        self.repack_formation(side);
    }

    pub(super) fn apply_status_to(
        &mut self,
        source: Option<CombatantId>,
        target: CombatantId,
        def: &StatusEffectDef,
    ) {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return;
        };
        if combatant.is_downed() {
            return;
        }
        let outcome = combatant.apply_status(def, source);
        let stacks = combatant
            .statuses()
            .get(def.id)
            .map_or(0, |instance| instance.stacks);
        if outcome == StatusApplication::Rejected {
            return;
        }
        tracing::debug!(target = %target, status = %def.id, outcome = ?outcome, "status applied");
        self.emit(BattleEvent::StatusApplied {
            target,
            status: def.id,
            stacks,
        });
    }

    fn cleanse_target(&mut self, target: CombatantId, category: StatusCategory) {
        let removed = self
            .combatants
            .get_mut(&target)
            .map(|c| c.cleanse(category))
            .unwrap_or_default();
        for status in removed {
            self.emit(BattleEvent::StatusRemoved { target, status });
        }
    }

    fn restore_resource(&mut self, target: CombatantId, resource: ResourceKind, amount: u32) {
        if resource == ResourceKind::Health {
            self.heal_target(None, target, amount);
            return;
        }
        let restored = self
            .combatants
            .get_mut(&target)
            .filter(|c| c.is_alive())
            .map_or(0, |c| c.restore(resource, amount));
        if restored > 0 {
            self.emit(BattleEvent::ResourceRestored {
                target,
                resource,
                amount: restored,
            });
        }
    }

    fn change_stress(&mut self, target: CombatantId, add: u32, relieve: u32) {
        let Some(combatant) = self.combatants.get_mut(&target) else {
            return;
        };
        let before = combatant.stress();
        combatant.add_stress(add);
        combatant.relieve_stress(relieve);
        let stress = combatant.stress();
        if stress != before {
            self.emit(BattleEvent::StressChanged { target, stress });
        }
    }

    pub(super) fn apply_secondary(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        effect: &SecondaryEffect,
        dealt: u32,
        rolls: &mut SeededRolls,
    ) {
        match *effect {
            SecondaryEffect::ApplyStatus {
                status,
                chance,
                on_caster,
            } => {
                let registry = self.registry;
                let Some(def) = registry.status(status) else {
                    tracing::warn!(status = %status, "unknown status in skill data");
                    return;
                };
                if chance < 1.0 && rolls.roll(RollKind::StatusChance) >= chance {
                    return;
                }
                let recipient = if on_caster { actor } else { target };
                self.apply_status_to(Some(actor), recipient, def);
            }
            SecondaryEffect::Lifesteal { ratio } => {
                let amount = f64::from(dealt) * ratio;
                if amount.is_finite() && amount > 0.0 {
                    self.heal_target(Some(actor), actor, amount.round() as u32);
                }
            }
            SecondaryEffect::RestoreResource { resource, amount } => {
                self.restore_resource(target, resource, amount);
            }
            SecondaryEffect::Cleanse { category } => self.cleanse_target(target, category),
            SecondaryEffect::AddStress { amount } => self.change_stress(target, amount, 0),
        }
    }

    pub(super) fn apply_consumable(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        effect: &ConsumableEffect,
    ) {
        match *effect {
            ConsumableEffect::Heal { amount } => {
                self.heal_target(Some(actor), target, amount);
            }
            ConsumableEffect::RestoreResource { resource, amount } => {
                self.restore_resource(target, resource, amount);
            }
            ConsumableEffect::ApplyStatus { status } => match self.registry().status(status) {
                Some(def) => self.apply_status_to(Some(actor), target, def),
                None => tracing::warn!(status = %status, "unknown status in item data"),
            },
            ConsumableEffect::RelieveStress { amount } => self.change_stress(target, 0, amount),
            ConsumableEffect::Cleanse { category } => self.cleanse_target(target, category),
            ConsumableEffect::Revive { health_fraction } => {
                let Some(max) = self.combatant(target).map(Combatant::max_health) else {
                    return;
                };
                let health = (f64::from(max) * health_fraction).ceil();
                let health = if health.is_finite() { health.max(1.0) as u32 } else { 1 };
                self.revive_target(target, health);
            }
        }
    }
}
