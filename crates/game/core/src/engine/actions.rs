//! Action intake and execution.

use crate::combat::DamageCategory;
use crate::combatant::Combatant;
use crate::common::{CombatantId, ItemId, Side, SkillId};
use crate::env::{
    ConsumableDef, ItemDef, RollKind, RollSource, SeededRolls, SkillCategory, SkillDef,
};
use crate::error::{BattleError, ErrorSeverity};
use crate::formation::TargetType;
use crate::skill::{self, SkillBlock};

use super::events::BattleEvent;
use super::state::BattleState;
use super::BattleSession;

/// What a combatant does with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    /// Basic weapon attack on one live enemy.
    Attack { target: CombatantId },
    /// `target` is required for single-target skills and ignored otherwise.
    Skill {
        skill: SkillId,
        target: Option<CombatantId>,
    },
    UseItem {
        item: ItemId,
        target: Option<CombatantId>,
    },
    Defend,
    Escape,
}

/// Why an action was refused at submission.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionRejected {
    #[error("no turn is waiting for input")]
    NoTurn,

    #[error("it is {current}'s turn, not {actor}'s")]
    NotActorsTurn {
        actor: CombatantId,
        current: CombatantId,
    },

    #[error("an action is already queued")]
    AlreadyQueued,

    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("{0} is not a valid target")]
    InvalidTarget(CombatantId),

    #[error("this action needs a target")]
    MissingTarget,

    #[error(transparent)]
    Skill(#[from] SkillBlock),

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("{0} cannot be used in battle")]
    NotConsumable(ItemId),

    #[error("no {0} left")]
    OutOfItem(ItemId),
}

impl BattleError for ActionRejected {
    fn severity(&self) -> ErrorSeverity {
        use ActionRejected::*;
        match self {
            NoTurn | NotActorsTurn { .. } | AlreadyQueued => ErrorSeverity::Recoverable,
            UnknownCombatant(_) | UnknownItem(_) => ErrorSeverity::Validation,
            InvalidTarget(_) | MissingTarget | NotConsumable(_) => ErrorSeverity::Validation,
            OutOfItem(_) => ErrorSeverity::Recoverable,
            Skill(block) => block.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionRejected::*;
        match self {
            NoTurn => "ACTION_NO_TURN",
            NotActorsTurn { .. } => "ACTION_NOT_ACTORS_TURN",
            AlreadyQueued => "ACTION_ALREADY_QUEUED",
            UnknownCombatant(_) => "ACTION_UNKNOWN_COMBATANT",
            InvalidTarget(_) => "ACTION_INVALID_TARGET",
            MissingTarget => "ACTION_MISSING_TARGET",
            Skill(block) => block.error_code(),
            UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            NotConsumable(_) => "ACTION_NOT_CONSUMABLE",
            OutOfItem(_) => "ACTION_OUT_OF_ITEM",
        }
    }
}

/// A validated action with its targets resolved.
enum Plan<'r> {
    Attack(CombatantId),
    Skill(&'r SkillDef, Vec<CombatantId>),
    Item(&'r ConsumableDef, Vec<CombatantId>),
    Defend,
    Escape,
}

impl<'a> BattleSession<'a> {
    /// Queues `action` for the combatant holding the turn.
    ///
    /// The action is validated now and executes on the next tick. Escape is
    /// only accepted here, while a turn is open.
    pub fn submit_action(
        &mut self,
        actor: CombatantId,
        action: BattleAction,
    ) -> Result<(), ActionRejected> {
        let BattleState::ActionSelect { actor: current } = self.state else {
            return Err(ActionRejected::NoTurn);
        };
        if actor != current {
            return Err(ActionRejected::NotActorsTurn { actor, current });
        }
        if self.pending.is_some() {
            return Err(ActionRejected::AlreadyQueued);
        }

        self.plan(actor, &action)?;
        tracing::debug!(actor = %actor, action = ?action, "action queued");
        self.pending = Some(action);
        Ok(())
    }

    /// Takes back a queued action before it executes.
    pub fn withdraw_action(&mut self, actor: CombatantId) -> Option<BattleAction> {
        match self.state {
            BattleState::ActionSelect { actor: current } if current == actor => {
                let withdrawn = self.pending.take();
                if withdrawn.is_some() {
                    tracing::debug!(actor = %actor, "action withdrawn");
                }
                withdrawn
            }
            _ => None,
        }
    }

    /// Checks `action` against the current session and resolves its targets.
    fn plan(
        &self,
        actor: CombatantId,
        action: &BattleAction,
    ) -> Result<Plan<'a>, ActionRejected> {
        let registry = self.registry;
        let caster = self
            .combatants
            .get(&actor)
            .ok_or(ActionRejected::UnknownCombatant(actor))?;
        if caster.is_downed() {
            return Err(SkillBlock::Downed.into());
        }

        match *action {
            BattleAction::Attack { target } => {
                if self.valid_targets(actor, TargetType::SingleEnemy).contains(&target) {
                    Ok(Plan::Attack(target))
                } else {
                    Err(ActionRejected::InvalidTarget(target))
                }
            }
            BattleAction::Skill { skill, target } => {
                let def = skill::lookup(registry, caster, skill)?;
                let candidates =
                    skill::can_use(def, caster, &self.formation, &self.config, |id| {
                        self.is_downed(id)
                    })?;
                let targets = pick_targets(actor, def.target, candidates, target)?;
                Ok(Plan::Skill(def, targets))
            }
            BattleAction::UseItem { item, target } => {
                let def = match registry.item(item) {
                    Some(ItemDef::Consumable(def)) => def,
                    Some(_) => return Err(ActionRejected::NotConsumable(item)),
                    None => return Err(ActionRejected::UnknownItem(item)),
                };
                if caster.item_count(item) == 0 {
                    return Err(ActionRejected::OutOfItem(item));
                }
                let candidates = self.valid_targets(actor, def.target);
                let targets = pick_targets(actor, def.target, candidates, target)?;
                Ok(Plan::Item(def, targets))
            }
            BattleAction::Defend => Ok(Plan::Defend),
            BattleAction::Escape => Ok(Plan::Escape),
        }
    }

    /// Runs `action` to completion and closes the turn.
    pub(super) fn execute_turn(&mut self, actor: CombatantId, action: BattleAction) {
        self.set_state(BattleState::Executing { actor });
        self.nonce += 1;
        self.refresh_all();

        let plan = match self.plan(actor, &action) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(
                    actor = %actor,
                    action = ?action,
                    error = %err,
                    "queued action no longer valid, turn lost"
                );
                self.finish_turn(actor, 0.0);
                return;
            }
        };

        let mut rolls = SeededRolls::new(self.seed, self.nonce, Some(actor));
        let mut reset_to = 0.0;
        let mut used_skill = None;

        match plan {
            Plan::Attack(target) => {
                tracing::debug!(actor = %actor, target = %target, "attack");
                self.weapon_attack(actor, target, &mut rolls);
            }
            Plan::Skill(def, targets) => {
                tracing::debug!(actor = %actor, skill = %def.id, targets = targets.len(), "skill");
                self.perform_skill(actor, def, &targets, &mut rolls);
                used_skill = Some(def);
            }
            Plan::Item(def, targets) => {
                tracing::debug!(actor = %actor, item = %def.id, "item");
                self.perform_item(actor, def, &targets);
            }
            Plan::Defend => {
                let bonus = self.config.defend_defense_bonus;
                if let Some(c) = self.combatants.get_mut(&actor) {
                    c.begin_defend(bonus);
                }
                reset_to = self.config.timer_threshold * self.config.defend_timer_fraction;
            }
            Plan::Escape => self.attempt_escape(actor, &mut rolls),
        }

        self.emit(BattleEvent::ActionExecuted { actor, action });
        if self.state.is_finished() {
            return;
        }

        self.finish_turn(actor, reset_to);
        if let (Some(def), Some(c)) = (used_skill, self.combatants.get_mut(&actor)) {
            c.set_cooldown(def.id, def.cooldown_turns);
        }
    }

    fn refresh_all(&mut self) {
        let tick = self.tick;
        for combatant in self.combatants.values_mut() {
            combatant.refresh_cache(tick);
        }
    }

    fn perform_skill(
        &mut self,
        actor: CombatantId,
        def: &SkillDef,
        targets: &[CombatantId],
        rolls: &mut SeededRolls,
    ) {
        if let Some(c) = self.combatants.get_mut(&actor) {
            if let Some(cost) = skill::effective_cost(def, c, &self.config) {
                c.spend(cost.resource, cost.amount);
            }
            c.set_timer(c.timer() - def.timer_cost);
        }

        for &target in targets {
            if self.state.is_finished() {
                break;
            }

            let dealt = match &def.category {
                SkillCategory::Attack(spec) | SkillCategory::Debuff(Some(spec)) => {
                    match self.skill_damage(actor, target, spec, def.id, rolls) {
                        Some(dealt) => dealt,
                        // A miss carries no secondary effects.
                        None => continue,
                    }
                }
                SkillCategory::Heal(spec) => {
                    let magic_attack = self
                        .combatant(actor)
                        .map_or(0.0, |c| c.cache().attack_for(DamageCategory::Magic));
                    let amount = skill::heal_amount(spec, magic_attack);
                    if def.target == TargetType::DownedAlly {
                        self.revive_target(target, amount);
                    } else {
                        self.heal_target(Some(actor), target, amount);
                    }
                    0
                }
                SkillCategory::Buff | SkillCategory::Support | SkillCategory::Debuff(None) => 0,
            };
            if self.state.is_finished() {
                break;
            }

            for effect in &def.secondary {
                self.apply_secondary(actor, target, effect, dealt, rolls);
            }
        }
    }

    fn perform_item(&mut self, actor: CombatantId, def: &ConsumableDef, targets: &[CombatantId]) {
        let consumed = self
            .combatants
            .get_mut(&actor)
            .is_some_and(|c| c.consume_item(def.id));
        if !consumed {
            return;
        }
        self.emit(BattleEvent::ItemUsed {
            actor,
            item: def.id,
        });
        for &target in targets {
            self.apply_consumable(actor, target, &def.effect);
        }
    }

    fn attempt_escape(&mut self, actor: CombatantId, rolls: &mut SeededRolls) {
        let Some(side) = self.combatant(actor).map(Combatant::side) else {
            return;
        };
        let chance = self.escape_chance(side);
        let success = rolls.roll(RollKind::Escape) < chance;
        tracing::info!(actor = %actor, chance, success, "escape attempted");
        self.emit(BattleEvent::EscapeAttempted {
            actor,
            chance,
            success,
        });
        if success {
            self.pending = None;
            self.set_state(BattleState::escaped_by(side));
        }
    }

    /// `clamp(base + (avg_speed_mine − avg_speed_theirs) × per_speed, min, max)`
    pub fn escape_chance(&self, side: Side) -> f64 {
        let avg_speed = |side| {
            let speeds: Vec<f64> = self
                .members(side)
                .filter(|c| c.is_alive())
                .map(Combatant::speed)
                .collect();
            if speeds.is_empty() {
                0.0
            } else {
                speeds.iter().sum::<f64>() / speeds.len() as f64
            }
        };
        let params = self.config.escape;
        let chance = params.base + (avg_speed(side) - avg_speed(side.opposite())) * params.per_speed;
        if chance.is_finite() {
            chance.clamp(params.min, params.max)
        } else {
            params.min
        }
    }
}

/// Narrows the candidate list to what the action actually hits.
fn pick_targets(
    actor: CombatantId,
    target_type: TargetType,
    candidates: Vec<CombatantId>,
    requested: Option<CombatantId>,
) -> Result<Vec<CombatantId>, ActionRejected> {
    if target_type.is_area() {
        return Ok(candidates);
    }
    if target_type == TargetType::SelfOnly {
        return Ok(vec![actor]);
    }
    let target = requested.ok_or(ActionRejected::MissingTarget)?;
    if candidates.contains(&target) {
        Ok(vec![target])
    } else {
        Err(ActionRejected::InvalidTarget(target))
    }
}
