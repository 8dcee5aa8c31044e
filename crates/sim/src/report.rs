//! Battle log and summary output.

use atb_core::{BattleEvent, BattleSession, BattleState, CombatantId, DamageSource, Side};

fn name(session: &BattleSession<'_>, id: CombatantId) -> String {
    session
        .combatant(id)
        .map_or_else(|| id.to_string(), |c| c.name().to_string())
}

/// Writes one event to the log with combatant names resolved.
pub fn log_event(session: &BattleSession<'_>, event: &BattleEvent) {
    let tick = session.current_tick().0;
    match *event {
        BattleEvent::StateChanged { from, to } => {
            tracing::debug!(tick, ?from, ?to, "state");
        }
        BattleEvent::TurnStarted { actor, .. } => {
            tracing::debug!(tick, actor = %name(session, actor), "turn");
        }
        BattleEvent::TurnSkipped { actor, reason } => {
            tracing::info!(tick, actor = %name(session, actor), ?reason, "turn skipped");
        }
        BattleEvent::ActionExecuted { actor, action } => {
            tracing::info!(tick, actor = %name(session, actor), ?action, "action");
        }
        BattleEvent::TurnEnded { .. } => {}
        BattleEvent::Missed { source, target } => {
            let source = source.map(|id| name(session, id));
            tracing::info!(tick, ?source, target = %name(session, target), "miss");
        }
        BattleEvent::DamageDealt {
            source,
            target,
            amount,
            is_crit,
            is_blocked,
            cause,
        } => {
            let cause = match cause {
                DamageSource::Attack => "attack".to_string(),
                DamageSource::Skill(skill) => session
                    .registry()
                    .skill(skill)
                    .map_or_else(|| skill.to_string(), |s| s.name.clone()),
                DamageSource::Status(status) => session
                    .registry()
                    .status(status)
                    .map_or_else(|| status.to_string(), |s| s.name.clone()),
            };
            let source = source.map(|id| name(session, id));
            tracing::info!(
                tick,
                ?source,
                target = %name(session, target),
                amount,
                crit = is_crit,
                blocked = is_blocked,
                %cause,
                "damage"
            );
        }
        BattleEvent::Healed { target, amount, .. } => {
            tracing::info!(tick, target = %name(session, target), amount, "healed");
        }
        BattleEvent::Revived { target, health } => {
            tracing::info!(tick, target = %name(session, target), health, "revived");
        }
        BattleEvent::ResourceRestored {
            target,
            resource,
            amount,
        } => {
            tracing::debug!(tick, target = %name(session, target), ?resource, amount, "restored");
        }
        BattleEvent::StatusApplied {
            target,
            status,
            stacks,
        } => {
            tracing::info!(tick, target = %name(session, target), %status, stacks, "status applied");
        }
        BattleEvent::StatusRemoved { target, status } => {
            tracing::debug!(tick, target = %name(session, target), %status, "status removed");
        }
        BattleEvent::StatusTicked { .. } => {}
        BattleEvent::StressChanged { target, stress } => {
            tracing::debug!(tick, target = %name(session, target), stress, "stress");
        }
        BattleEvent::ItemUsed { actor, item } => {
            tracing::info!(tick, actor = %name(session, actor), %item, "item used");
        }
        BattleEvent::Downed { target } => {
            tracing::info!(tick, target = %name(session, target), "downed");
        }
        BattleEvent::FormationShifted { side, ref moves } => {
            tracing::debug!(tick, %side, moved = moves.len(), "formation shifted");
        }
        BattleEvent::EscapeAttempted {
            actor,
            chance,
            success,
        } => {
            tracing::info!(tick, actor = %name(session, actor), chance, success, "escape");
        }
    }
}

/// End-of-battle result.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub outcome: BattleState,
    pub ticks: u64,
    pub clock_ms: u64,
    /// `(name, side, health, max_health)` in id order.
    pub combatants: Vec<(String, Side, u32, u32)>,
}

impl Summary {
    pub fn of(session: &BattleSession<'_>) -> Self {
        Self {
            outcome: session.state(),
            ticks: session.current_tick().0,
            clock_ms: session.clock_ms(),
            combatants: session
                .combatants()
                .map(|c| (c.name().to_string(), c.side(), c.health(), c.max_health()))
                .collect(),
        }
    }

    pub fn print(&self) {
        println!(
            "outcome: {:?} after {} ticks ({:.1} s)",
            self.outcome,
            self.ticks,
            self.clock_ms as f64 / 1000.0
        );
        for (name, side, health, max) in &self.combatants {
            let mark = if *health == 0 { " (down)" } else { "" };
            println!("  [{side}] {name:<16} {health:>4}/{max}{mark}");
        }
    }
}
