//! Cross-file reference checks.
//!
//! The engine tolerates dangling ids (it logs and skips them), so these
//! checks report rather than fail; the caller decides what is fatal.

use atb_core::env::{ConsumableEffect, SecondaryEffect};
use atb_core::{BattleRoster, ContentRegistry, ItemDef, ItemId, StatusId};

/// Lists every id referenced by `registry` (and `roster`, when given) that
/// does not resolve, or resolves to the wrong kind of definition.
pub fn check_references(registry: &ContentRegistry, roster: Option<&BattleRoster>) -> Vec<String> {
    let mut problems = Vec::new();
    let mut need_status = |status: StatusId, owner: String| {
        if registry.status(status).is_none() {
            problems.push(format!("{owner} applies unknown {status}"));
        }
    };

    for skill in registry.skills() {
        for effect in &skill.secondary {
            if let SecondaryEffect::ApplyStatus { status, .. } = *effect {
                need_status(status, format!("{} ({})", skill.id, skill.name));
            }
        }
    }
    for item in registry.items() {
        if let ItemDef::Consumable(def) = item
            && let ConsumableEffect::ApplyStatus { status } = def.effect
        {
            need_status(status, format!("{} ({})", def.id, def.name));
        }
    }

    let Some(roster) = roster else {
        return problems;
    };

    let item_kind = |id: ItemId| registry.item(id);
    for template in roster.allies.iter().chain(&roster.enemies) {
        let who = &template.name;

        if let Some(weapon) = template.weapon {
            match item_kind(weapon) {
                Some(ItemDef::Weapon(_)) => {}
                Some(_) => problems.push(format!("{who}: {weapon} is not a weapon")),
                None => problems.push(format!("{who}: unknown weapon {weapon}")),
            }
        }
        for &armor in &template.armor {
            match item_kind(armor) {
                Some(ItemDef::Armor(_)) => {}
                Some(_) => problems.push(format!("{who}: {armor} is not armor")),
                None => problems.push(format!("{who}: unknown armor {armor}")),
            }
        }
        for &accessory in &template.accessories {
            match item_kind(accessory) {
                Some(ItemDef::Accessory(_)) => {}
                Some(_) => problems.push(format!("{who}: {accessory} is not an accessory")),
                None => problems.push(format!("{who}: unknown accessory {accessory}")),
            }
        }
        for &(item, _) in &template.items {
            match item_kind(item) {
                Some(ItemDef::Consumable(_)) => {}
                Some(_) => problems.push(format!("{who}: {item} is not a consumable")),
                None => problems.push(format!("{who}: unknown item {item}")),
            }
        }
        for &skill in &template.skills {
            if registry.skill(skill).is_none() {
                problems.push(format!("{who}: unknown {skill}"));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use atb_core::env::{ConsumableDef, SkillCategory};
    use atb_core::{CombatantTemplate, RangePolicy, SkillDef, SkillId, TargetType};

    fn registry() -> ContentRegistry {
        ContentRegistry::new()
            .with_item(ItemDef::Consumable(ConsumableDef {
                id: ItemId(1),
                name: "Tainted Flask".into(),
                target: TargetType::SingleEnemy,
                effect: ConsumableEffect::ApplyStatus {
                    status: StatusId(9),
                },
            }))
            .with_skill(SkillDef {
                id: SkillId(1),
                name: "Hex".into(),
                category: SkillCategory::Support,
                cost: None,
                timer_cost: 0.0,
                cooldown_turns: 0,
                target: TargetType::SingleEnemy,
                range: RangePolicy::All,
                weapon_requirement: None,
                secondary: vec![SecondaryEffect::ApplyStatus {
                    status: StatusId(8),
                    chance: 1.0,
                    on_caster: false,
                }],
            })
    }

    #[test]
    fn dangling_status_ids_are_reported() {
        let problems = check_references(&registry(), None);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("status:8")));
        assert!(problems.iter().any(|p| p.contains("status:9")));
    }

    #[test]
    fn roster_items_must_match_their_slot() {
        let roster = BattleRoster::new(
            vec![
                CombatantTemplate::new("Hero")
                    .with_weapon(ItemId(1))
                    .with_skill(SkillId(1))
                    .with_item(ItemId(1), 2),
            ],
            vec![CombatantTemplate::new("Slime").with_skill(SkillId(4))],
        );
        let problems = check_references(&registry(), Some(&roster));

        assert!(problems.contains(&"Hero: item:1 is not a weapon".to_string()));
        assert!(problems.contains(&"Slime: unknown skill:4".to_string()));
        assert_eq!(problems.len(), 4);
    }
}
