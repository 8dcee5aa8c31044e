use crate::common::CombatantId;
use crate::env::{RollKind, RollSource, SeededRolls};
use crate::formation::TargetType;

use super::actions::BattleAction;
use super::BattleSession;

impl BattleSession<'_> {
    /// The built-in policy: a basic attack on a uniformly random live enemy.
    ///
    /// Falls back to Defend when no enemy can be targeted.
    pub(super) fn choose_ai_action(&self, actor: CombatantId) -> BattleAction {
        let targets = self.valid_targets(actor, TargetType::SingleEnemy);
        if targets.is_empty() {
            return BattleAction::Defend;
        }
        let mut rolls = SeededRolls::new(self.seed, self.tick.0, Some(actor));
        let target = targets[rolls.pick(RollKind::TargetSelect, targets.len())];
        BattleAction::Attack { target }
    }
}
