use crate::combatant::Combatant;
use crate::common::{CombatantId, Controller};
use crate::config::BattleConfig;
use crate::status::{PeriodicTick, StatusCategory};

use super::events::{BattleEvent, SkipReason};
use super::state::BattleState;
use super::BattleSession;

/// Multiplier on timer gain from stress and fatigue.
pub(crate) fn timer_penalty(combatant: &Combatant, config: &BattleConfig) -> f64 {
    let mut penalty = 1.0;
    if combatant.stress() >= config.stress_threshold {
        penalty *= config.stress_timer_penalty;
    }
    if combatant.fatigue() >= config.fatigue_threshold {
        penalty *= config.fatigue_timer_penalty;
    }
    penalty
}

/// Timer units gained in one tick.
pub(crate) fn timer_gain(combatant: &Combatant, config: &BattleConfig) -> f64 {
    let gain = combatant.speed()
        * config.tick_seconds()
        * config.atb_rate
        * timer_penalty(combatant, config);
    if gain.is_finite() { gain.max(0.0) } else { 0.0 }
}

impl BattleSession<'_> {
    /// One `Running` tick: all timers, then all statuses, then at most one
    /// turn is granted.
    pub(super) fn run_tick(&mut self) {
        self.tick = self.tick.next();
        self.clock_ms += self.config.tick_ms;

        let tick = self.tick;
        for combatant in self.combatants.values_mut().filter(|c| c.is_alive()) {
            combatant.refresh_cache(tick);
            let gain = timer_gain(combatant, &self.config);
            combatant.set_timer(combatant.timer() + gain);
            tracing::trace!(
                combatant = %combatant.id(),
                timer = combatant.timer(),
                gain,
                "timer advanced"
            );
        }

        self.advance_statuses();
        if self.state.is_finished() {
            return;
        }

        self.grant_next_turn();
    }

    fn advance_statuses(&mut self) {
        let dt = self.config.tick_ms;
        let holders: Vec<CombatantId> = self
            .combatants
            .values()
            .filter(|c| c.is_alive() && !c.statuses().is_empty())
            .map(Combatant::id)
            .collect();

        for holder in holders {
            let Some(combatant) = self.combatants.get_mut(&holder) else {
                continue;
            };
            let advance = combatant.advance_statuses(dt);

            for tick in advance.ticks {
                self.apply_periodic(holder, &tick);
                if self.state.is_finished() {
                    return;
                }
            }
            for status in advance.expired {
                tracing::debug!(combatant = %holder, status = %status, "status expired");
                self.emit(BattleEvent::StatusRemoved {
                    target: holder,
                    status,
                });
            }
        }
    }

    fn apply_periodic(&mut self, holder: CombatantId, tick: &PeriodicTick) {
        if self.is_downed(holder) {
            return;
        }
        self.emit(BattleEvent::StatusTicked {
            target: holder,
            status: tick.status,
        });
        match tick.category {
            StatusCategory::Debuff => self.status_damage(holder, tick),
            StatusCategory::Buff => {
                let max_health = self.combatant(holder).map_or(0, Combatant::max_health);
                let amount = tick.magnitude(f64::from(max_health));
                let amount = if amount.is_finite() { amount.max(0.0).round() as u32 } else { 0 };
                self.heal_target(tick.source, holder, amount);
            }
        }
    }

    /// Ready combatants in turn order.
    pub(super) fn ready_combatants(&self) -> Vec<CombatantId> {
        let mut ready: Vec<CombatantId> = self
            .combatants
            .values()
            .filter(|c| c.is_alive() && c.is_ready())
            .map(Combatant::id)
            .collect();
        ready.sort_by_key(|id| self.turn_key(*id));
        ready
    }

    fn grant_next_turn(&mut self) {
        for actor in self.ready_combatants() {
            let prevented = self
                .combatant(actor)
                .is_some_and(Combatant::is_action_prevented);
            if !prevented {
                self.start_turn(actor);
                return;
            }

            tracing::debug!(actor = %actor, "turn skipped, action prevented");
            if let Some(c) = self.combatants.get_mut(&actor) {
                c.end_defend();
                c.set_timer(0.0);
            }
            self.emit(BattleEvent::TurnSkipped {
                actor,
                reason: SkipReason::ActionPrevented,
            });
        }
    }

    fn start_turn(&mut self, actor: CombatantId) {
        let Some(combatant) = self.combatants.get_mut(&actor) else {
            return;
        };
        combatant.end_defend();
        let controller = combatant.controller();

        self.pending = None;
        self.ai_countdown_ms = match controller {
            Controller::Ai => self.config.ai_reaction_delay_ms,
            Controller::Player => 0,
        };

        tracing::debug!(actor = %actor, tick = %self.tick, controller = ?controller, "turn started");
        self.emit(BattleEvent::TurnStarted {
            actor,
            tick: self.tick,
        });
        self.set_state(BattleState::ActionSelect { actor });
    }

    /// One `ActionSelect` tick. Time stays frozen; only a queued action or
    /// the AI reaction countdown moves the session.
    pub(super) fn select_tick(&mut self, actor: CombatantId) {
        if let Some(action) = self.pending.take() {
            self.execute_turn(actor, action);
            return;
        }

        let is_ai = self
            .combatant(actor)
            .is_some_and(|c| c.controller() == Controller::Ai);
        if !is_ai {
            return;
        }

        self.ai_countdown_ms = self.ai_countdown_ms.saturating_sub(self.config.tick_ms);
        if self.ai_countdown_ms == 0 {
            let action = self.choose_ai_action(actor);
            tracing::debug!(actor = %actor, action = ?action, "ai committed");
            self.pending = Some(action);
        }
    }

    /// Ends `actor`'s turn: cooldowns, timer reset, fatigue.
    pub(super) fn finish_turn(&mut self, actor: CombatantId, reset_to: f64) {
        let fatigue = self.config.fatigue_per_turn;
        if let Some(c) = self.combatants.get_mut(&actor) {
            c.tick_cooldowns();
            c.set_timer(reset_to);
            c.add_fatigue(fatigue);
        }
        self.emit(BattleEvent::TurnEnded { actor });
        self.set_state(BattleState::Running);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Side, Tick};
    use crate::stats::{AttributeStore, BaseStats};

    fn combatant(reaction: f64) -> Combatant {
        let base = BaseStats::new(10.0, 10.0, 10.0, reaction, 10.0, 10.0);
        let mut c = Combatant::new(
            CombatantId(1),
            "Runner",
            Side::Ally,
            AttributeStore::new(base, 1),
            &BattleConfig::default(),
        );
        c.refresh_cache(Tick(0));
        c
    }

    #[test]
    fn gain_scales_with_speed_and_tick_length() {
        let config = BattleConfig::default();
        let c = combatant(10.0);
        // 70 speed × 0.05 s × 0.5
        assert!((timer_gain(&c, &config) - 1.75).abs() < 1e-9);

        let slow_ticks = config.clone().with_tick_ms(100);
        assert!((timer_gain(&c, &slow_ticks) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn stress_and_fatigue_penalties_multiply() {
        let config = BattleConfig::default();
        let mut c = combatant(10.0);
        c.add_stress(80);
        assert!((timer_penalty(&c, &config) - 0.8).abs() < 1e-12);
        c.add_fatigue(90);
        assert!((timer_penalty(&c, &config) - 0.72).abs() < 1e-12);
    }
}
