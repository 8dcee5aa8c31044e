use atb_core::env::{
    ConsumableDef, ConsumableEffect, DamageSpec, HealSpec, PeriodicEffect, SecondaryEffect,
    SkillCategory, StatusCategory, StatusFlags,
};
use atb_core::formation::SlotMove;
use atb_core::status::StatusApplication;
use atb_core::{
    ActionRejected, BaseStats, BattleAction, BattleConfig, BattleEvent, BattleSession,
    BattleState, CombatantId, CombatantTemplate, ContentRegistry, Controller, DamageCategory,
    DamageSource, Element, EscapeParams, ItemDef, ItemId, RangePolicy, Side, SkillBlock, SkillDef,
    SkillId, SkipReason, StatKind, StatusEffectDef, StatusId, TargetType,
};
use proptest::prelude::*;

const POISON: StatusId = StatusId(1);
const STUN: StatusId = StatusId(2);
const FOCUS: StatusId = StatusId(3);
const EXECUTE: SkillId = SkillId(1);
const MEND: SkillId = SkillId(2);
const LEECH: SkillId = SkillId(3);
const SURE_HEX: SkillId = SkillId(4);
const IDLE_HEX: SkillId = SkillId(5);
const CYCLONE: SkillId = SkillId(6);
const STRIKE: SkillId = SkillId(7);
const PHOENIX_DOWN: ItemId = ItemId(10);

/// True damage that ignores every roll.
fn fixed(amount: f64) -> DamageSpec {
    DamageSpec {
        category: Some(DamageCategory::True),
        fixed_damage: Some(amount),
        guaranteed_hit: true,
        variance: false,
        can_crit: false,
        can_block: false,
        ..DamageSpec::default()
    }
}

fn skill(
    id: SkillId,
    name: &str,
    category: SkillCategory,
    target: TargetType,
    secondary: Vec<SecondaryEffect>,
) -> SkillDef {
    SkillDef {
        id,
        name: name.into(),
        category,
        cost: None,
        timer_cost: 0.0,
        cooldown_turns: 0,
        target,
        range: RangePolicy::All,
        weapon_requirement: None,
        secondary,
    }
}

fn plain_status(
    id: StatusId,
    name: &str,
    category: StatusCategory,
    flags: StatusFlags,
) -> StatusEffectDef {
    StatusEffectDef {
        id,
        name: name.into(),
        category,
        duration_ms: 10_000,
        tick_interval_ms: 1_000,
        max_stacks: 5,
        stackable: true,
        refresh_on_reapply: true,
        flags,
        periodic: None,
        modifiers: Vec::new(),
    }
}

fn registry() -> ContentRegistry {
    let hex = |id: SkillId, name: &str, chance: f64| {
        skill(
            id,
            name,
            SkillCategory::Debuff(None),
            TargetType::SingleEnemy,
            vec![SecondaryEffect::ApplyStatus {
                status: POISON,
                chance,
                on_caster: false,
            }],
        )
    };

    ContentRegistry::new()
        .with_status(plain_status(
            STUN,
            "Stun",
            StatusCategory::Debuff,
            StatusFlags::PREVENTS_ACTION,
        ))
        .with_status(plain_status(FOCUS, "Focus", StatusCategory::Buff, StatusFlags::empty()))
        .with_skill(skill(
            MEND,
            "Mend",
            SkillCategory::Heal(HealSpec {
                base: 30.0,
                scaling: 0.0,
                multiplier: 1.0,
            }),
            TargetType::SingleAlly,
            Vec::new(),
        ))
        .with_skill(skill(
            LEECH,
            "Leech",
            SkillCategory::Attack(fixed(40.0)),
            TargetType::SingleEnemy,
            vec![SecondaryEffect::Lifesteal { ratio: 0.5 }],
        ))
        .with_skill(hex(SURE_HEX, "Sure Hex", 1.0))
        .with_skill(hex(IDLE_HEX, "Idle Hex", 0.0))
        .with_skill(skill(
            CYCLONE,
            "Cyclone",
            SkillCategory::Attack(fixed(10_000.0)),
            TargetType::AllEnemies,
            vec![SecondaryEffect::ApplyStatus {
                status: FOCUS,
                chance: 1.0,
                on_caster: true,
            }],
        ))
        .with_skill(SkillDef {
            cooldown_turns: 1,
            ..skill(
                STRIKE,
                "Strike",
                SkillCategory::Attack(fixed(1.0)),
                TargetType::SingleEnemy,
                Vec::new(),
            )
        })
        .with_status(StatusEffectDef {
            id: POISON,
            name: "Poison".into(),
            category: StatusCategory::Debuff,
            duration_ms: 10_000,
            tick_interval_ms: 1_000,
            max_stacks: 2,
            stackable: true,
            refresh_on_reapply: true,
            flags: StatusFlags::empty(),
            periodic: Some(PeriodicEffect {
                value_per_tick: 10.0,
                is_percentage: false,
                damage_category: DamageCategory::True,
                element: Element::None,
            }),
            modifiers: Vec::new(),
        })
        .with_skill(SkillDef {
            id: EXECUTE,
            name: "Execute".into(),
            category: SkillCategory::Attack(DamageSpec {
                category: Some(DamageCategory::True),
                fixed_damage: Some(10_000.0),
                guaranteed_hit: true,
                variance: false,
                can_crit: false,
                can_block: false,
                ..DamageSpec::default()
            }),
            cost: None,
            timer_cost: 0.0,
            cooldown_turns: 0,
            target: TargetType::SingleEnemy,
            range: RangePolicy::All,
            weapon_requirement: None,
            secondary: Vec::new(),
        })
        .with_item(ItemDef::Consumable(ConsumableDef {
            id: PHOENIX_DOWN,
            name: "Phoenix Down".into(),
            target: TargetType::DownedAlly,
            effect: ConsumableEffect::Revive {
                health_fraction: 0.5,
            },
        }))
}

fn player(name: &str) -> CombatantTemplate {
    CombatantTemplate::new(name).with_controller(Controller::Player)
}

fn quick(name: &str) -> CombatantTemplate {
    CombatantTemplate::new(name).with_base(BaseStats::new(10.0, 10.0, 10.0, 20.0, 10.0, 10.0))
}

/// Runs until a player-controlled combatant holds the turn.
fn await_turn(session: &mut BattleSession<'_>) -> CombatantId {
    session.run(10_000);
    session.awaiting_player().expect("a player turn")
}

/// Runs to `actor`'s next turn; everyone else defends.
fn turn_of(session: &mut BattleSession<'_>, actor: CombatantId) {
    loop {
        let current = await_turn(session);
        if current == actor {
            return;
        }
        session.submit_action(current, BattleAction::Defend).unwrap();
    }
}

fn duel<'r>(
    registry: &'r ContentRegistry,
    config: BattleConfig,
    hero: CombatantTemplate,
    foe: CombatantTemplate,
) -> (BattleSession<'r>, CombatantId, CombatantId) {
    let mut session = BattleSession::new(registry, config, 7);
    let hero = session.add_combatant(Side::Ally, &hero).unwrap();
    let foe = session.add_combatant(Side::Enemy, &foe).unwrap();
    session.start().unwrap();
    (session, hero, foe)
}

#[test]
fn battle_ends_when_the_last_enemy_falls() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero").with_skill(EXECUTE),
        player("Foe"),
    );

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: EXECUTE,
                target: Some(foe),
            },
        )
        .unwrap();
    assert_eq!(session.tick(), BattleState::Victory);

    let tick = session.current_tick();
    let clock = session.clock_ms();
    let timers: Vec<f64> = session.combatants().map(|c| c.timer()).collect();
    for _ in 0..5 {
        assert_eq!(session.tick(), BattleState::Victory);
    }
    assert_eq!(session.current_tick(), tick);
    assert_eq!(session.clock_ms(), clock);
    let after: Vec<f64> = session.combatants().map(|c| c.timer()).collect();
    assert_eq!(after, timers);

    let events = session.drain_events();
    assert!(events.contains(&BattleEvent::Downed { target: foe }));
    assert!(!events.contains(&BattleEvent::TurnEnded { actor: hero }));
    assert_eq!(
        session.submit_action(hero, BattleAction::Defend),
        Err(ActionRejected::NoTurn)
    );
}

#[test]
fn stacked_poison_ticks_exactly_ten_times() {
    let registry = registry();
    let (mut session, hero, _foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero"),
        player("Foe"),
    );
    let poison = registry.status(POISON).unwrap();
    let holder = session.combatant_mut(hero).unwrap();
    assert_eq!(holder.apply_status(poison, None), StatusApplication::Applied);
    assert_eq!(
        holder.apply_status(poison, None),
        StatusApplication::Stacked { stacks: 2 }
    );

    while session.clock_ms() < 12_000 {
        if let Some(actor) = session.awaiting_player() {
            session.submit_action(actor, BattleAction::Defend).unwrap();
        }
        session.tick();
    }

    let events = session.drain_events();
    let ticks: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::DamageDealt {
                target,
                amount,
                cause: DamageSource::Status(POISON),
                ..
            } if *target == hero => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![20; 10]);
    assert!(events.contains(&BattleEvent::StatusRemoved {
        target: hero,
        status: POISON,
    }));

    let hero = session.combatant(hero).unwrap();
    assert!(!hero.has_status(POISON));
    assert_eq!(hero.health(), 50);
}

#[test]
fn defend_halves_the_reset_and_lasts_until_the_next_turn() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero"),
        player("Foe"),
    );

    assert_eq!(await_turn(&mut session), hero);
    let before = session.combatant(hero).unwrap().stat(StatKind::PhysicalDefense);
    session.submit_action(hero, BattleAction::Defend).unwrap();
    session.tick();

    let defender = session.combatant(hero).unwrap();
    assert!(defender.is_defending());
    assert_eq!(defender.timer(), 50.0);
    assert!(defender.stat(StatKind::PhysicalDefense) > before);

    loop {
        let actor = await_turn(&mut session);
        if actor == hero {
            break;
        }
        assert_eq!(actor, foe);
        session.submit_action(foe, BattleAction::Defend).unwrap();
    }
    assert!(!session.combatant(hero).unwrap().is_defending());
}

#[test]
fn certain_escape_ends_the_battle() {
    let registry = registry();
    let mut config = BattleConfig::default();
    config.escape = EscapeParams {
        base: 1.0,
        per_speed: 0.0,
        min: 1.0,
        max: 1.0,
    };
    let (mut session, hero, _foe) = duel(&registry, config, player("Hero"), player("Foe"));

    assert_eq!(await_turn(&mut session), hero);
    session.submit_action(hero, BattleAction::Escape).unwrap();
    assert_eq!(session.tick(), BattleState::Escaped);
    assert!(session.events().contains(&BattleEvent::EscapeAttempted {
        actor: hero,
        chance: 1.0,
        success: true,
    }));
}

#[test]
fn failed_escape_costs_the_turn() {
    let registry = registry();
    let mut config = BattleConfig::default();
    config.escape = EscapeParams {
        base: 0.0,
        per_speed: 0.0,
        min: 0.0,
        max: 0.0,
    };
    let (mut session, hero, _foe) = duel(&registry, config, player("Hero"), player("Foe"));

    assert_eq!(session.escape_chance(Side::Ally), 0.0);
    assert_eq!(await_turn(&mut session), hero);
    session.submit_action(hero, BattleAction::Escape).unwrap();
    assert_eq!(session.tick(), BattleState::Running);
    assert_eq!(session.combatant(hero).unwrap().timer(), 0.0);
    assert!(session.events().contains(&BattleEvent::TurnEnded { actor: hero }));
}

#[test]
fn enemy_escape_counts_as_victory() {
    let registry = registry();
    let mut config = BattleConfig::default();
    config.escape = EscapeParams {
        base: 1.0,
        per_speed: 0.0,
        min: 1.0,
        max: 1.0,
    };
    let (mut session, _hero, foe) = duel(
        &registry,
        config,
        player("Hero"),
        quick("Foe").with_controller(Controller::Player),
    );

    assert_eq!(await_turn(&mut session), foe);
    session.submit_action(foe, BattleAction::Escape).unwrap();
    assert_eq!(session.tick(), BattleState::Victory);
}

#[test]
fn submissions_are_checked_against_the_open_turn() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 3);
    let hero = session.add_combatant(Side::Ally, &player("Hero")).unwrap();
    let foe = session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    assert_eq!(
        session.submit_action(hero, BattleAction::Defend),
        Err(ActionRejected::NoTurn)
    );
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    assert_eq!(
        session.submit_action(foe, BattleAction::Defend),
        Err(ActionRejected::NotActorsTurn {
            actor: foe,
            current: hero,
        })
    );
    assert_eq!(
        session.submit_action(hero, BattleAction::Attack { target: hero }),
        Err(ActionRejected::InvalidTarget(hero))
    );
    assert_eq!(
        session.submit_action(
            hero,
            BattleAction::Skill {
                skill: SkillId(99),
                target: Some(foe),
            }
        ),
        Err(ActionRejected::Skill(SkillBlock::UnknownSkill(SkillId(99))))
    );
    assert_eq!(
        session.submit_action(
            hero,
            BattleAction::Skill {
                skill: EXECUTE,
                target: Some(foe),
            }
        ),
        Err(ActionRejected::Skill(SkillBlock::NotLearned(EXECUTE)))
    );
    assert_eq!(
        session.submit_action(
            hero,
            BattleAction::UseItem {
                item: PHOENIX_DOWN,
                target: Some(hero),
            }
        ),
        Err(ActionRejected::OutOfItem(PHOENIX_DOWN))
    );

    session.submit_action(hero, BattleAction::Defend).unwrap();
    assert_eq!(
        session.submit_action(hero, BattleAction::Defend),
        Err(ActionRejected::AlreadyQueued)
    );
    assert_eq!(session.awaiting_player(), None);

    assert_eq!(session.withdraw_action(hero), Some(BattleAction::Defend));
    assert_eq!(session.pending_action(), None);
    assert_eq!(session.awaiting_player(), Some(hero));

    // Nothing queued: time stays frozen.
    let clock = session.clock_ms();
    session.tick();
    assert_eq!(session.clock_ms(), clock);
    assert_eq!(session.state(), BattleState::ActionSelect { actor: hero });
}

#[test]
fn ai_commits_after_the_reaction_delay() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero"),
        quick("Foe"),
    );

    while session.state() != (BattleState::ActionSelect { actor: foe }) {
        session.tick();
    }
    let clock = session.clock_ms();

    // 500 ms at 50 ms per tick
    for _ in 0..9 {
        session.tick();
        assert_eq!(session.pending_action(), None);
        assert_eq!(session.state(), BattleState::ActionSelect { actor: foe });
    }
    session.tick();
    assert_eq!(
        session.pending_action(),
        Some(&BattleAction::Attack { target: hero })
    );

    assert_eq!(session.tick(), BattleState::Running);
    assert_eq!(session.clock_ms(), clock);
    assert!(session.events().contains(&BattleEvent::ActionExecuted {
        actor: foe,
        action: BattleAction::Attack { target: hero },
    }));
}

#[test]
fn downed_front_liner_yields_the_slot() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 11);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_skill(EXECUTE))
        .unwrap();
    let front = session.add_combatant(Side::Enemy, &player("Front")).unwrap();
    let back = session.add_combatant(Side::Enemy, &player("Back")).unwrap();
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: EXECUTE,
                target: Some(front),
            },
        )
        .unwrap();
    assert_eq!(session.tick(), BattleState::Running);

    assert_eq!(session.formation().get_at(Side::Enemy, 0), Some(back));
    assert_eq!(session.formation().get_at(Side::Enemy, 1), Some(front));
    let shifted = session.events().iter().any(|event| match event {
        BattleEvent::FormationShifted { side, moves } => {
            *side == Side::Enemy
                && moves.contains(&SlotMove {
                    combatant: back,
                    from: 1,
                    to: 0,
                })
        }
        _ => false,
    });
    assert!(shifted);

    assert_eq!(session.combatant(back).unwrap().stress(), 15);
    assert_eq!(session.valid_targets(hero, TargetType::SingleEnemy), vec![back]);
}

#[test]
fn revive_item_brings_back_a_downed_ally() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 5);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_item(PHOENIX_DOWN, 1))
        .unwrap();
    let buddy = session.add_combatant(Side::Ally, &player("Buddy")).unwrap();
    session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    session.combatant_mut(buddy).unwrap().set_health(0);
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    assert_eq!(session.valid_targets(hero, TargetType::DownedAlly), vec![buddy]);
    session
        .submit_action(
            hero,
            BattleAction::UseItem {
                item: PHOENIX_DOWN,
                target: Some(buddy),
            },
        )
        .unwrap();
    session.tick();

    assert_eq!(session.combatant(buddy).unwrap().health(), 125);
    assert_eq!(session.combatant(hero).unwrap().item_count(PHOENIX_DOWN), 0);
    assert!(session.events().contains(&BattleEvent::Revived {
        target: buddy,
        health: 125,
    }));
}

#[test]
fn revived_ally_moves_ahead_of_the_downed() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 5);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_item(PHOENIX_DOWN, 1))
        .unwrap();
    let fallen = session.add_combatant(Side::Ally, &player("Fallen")).unwrap();
    let medic = session.add_combatant(Side::Ally, &player("Medic")).unwrap();
    session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    for id in [fallen, medic] {
        session.combatant_mut(id).unwrap().set_health(0);
    }
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::UseItem {
                item: PHOENIX_DOWN,
                target: Some(medic),
            },
        )
        .unwrap();
    session.tick();

    assert!(session.combatant(medic).unwrap().is_alive());
    assert_eq!(session.formation().get_at(Side::Ally, 1), Some(medic));
    assert_eq!(session.formation().get_at(Side::Ally, 2), Some(fallen));
    let shifted = session.events().iter().any(|event| match event {
        BattleEvent::FormationShifted { side, moves } => {
            *side == Side::Ally
                && moves.contains(&SlotMove {
                    combatant: medic,
                    from: 2,
                    to: 1,
                })
        }
        _ => false,
    });
    assert!(shifted);
}

#[test]
fn heal_skill_restores_an_ally() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 9);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_skill(MEND))
        .unwrap();
    let buddy = session.add_combatant(Side::Ally, &player("Buddy")).unwrap();
    session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    session.combatant_mut(buddy).unwrap().set_health(100);
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: MEND,
                target: Some(buddy),
            },
        )
        .unwrap();
    session.tick();

    assert_eq!(session.combatant(buddy).unwrap().health(), 130);
    assert!(session.events().contains(&BattleEvent::Healed {
        source: Some(hero),
        target: buddy,
        amount: 30,
    }));
}

#[test]
fn lifesteal_heals_the_caster_for_a_share_of_the_damage() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero").with_skill(LEECH),
        player("Foe"),
    );
    session.combatant_mut(hero).unwrap().set_health(100);

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: LEECH,
                target: Some(foe),
            },
        )
        .unwrap();
    session.tick();

    assert_eq!(session.combatant(foe).unwrap().health(), 210);
    assert_eq!(session.combatant(hero).unwrap().health(), 120);
    assert!(session.events().contains(&BattleEvent::Healed {
        source: Some(hero),
        target: hero,
        amount: 20,
    }));
}

#[test]
fn status_chance_gates_application() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero").with_skill(SURE_HEX).with_skill(IDLE_HEX),
        player("Foe"),
    );

    turn_of(&mut session, hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: IDLE_HEX,
                target: Some(foe),
            },
        )
        .unwrap();
    session.tick();
    assert!(!session.combatant(foe).unwrap().has_status(POISON));
    assert!(
        !session
            .drain_events()
            .iter()
            .any(|e| matches!(e, BattleEvent::StatusApplied { .. }))
    );

    turn_of(&mut session, hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: SURE_HEX,
                target: Some(foe),
            },
        )
        .unwrap();
    session.tick();
    assert!(session.combatant(foe).unwrap().has_status(POISON));
    assert!(session.events().contains(&BattleEvent::StatusApplied {
        target: foe,
        status: POISON,
        stacks: 1,
    }));
}

#[test]
fn area_skill_stops_once_the_battle_is_won() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 13);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_skill(CYCLONE))
        .unwrap();
    let foes: Vec<CombatantId> = ["Left", "Middle", "Right"]
        .into_iter()
        .map(|name| session.add_combatant(Side::Enemy, &player(name)).unwrap())
        .collect();
    session.start().unwrap();

    assert_eq!(await_turn(&mut session), hero);
    session
        .submit_action(
            hero,
            BattleAction::Skill {
                skill: CYCLONE,
                target: None,
            },
        )
        .unwrap();
    assert_eq!(session.tick(), BattleState::Victory);

    for foe in &foes {
        assert!(session.combatant(*foe).unwrap().is_downed());
    }
    // Focus follows every hit except the one that ended the battle.
    let focus = session.combatant(hero).unwrap().statuses().get(FOCUS).unwrap();
    assert_eq!(focus.stacks, 2);
    let applied = session
        .events()
        .iter()
        .filter(|e| matches!(e, BattleEvent::StatusApplied { status: FOCUS, .. }))
        .count();
    assert_eq!(applied, 2);
    assert!(!session.events().contains(&BattleEvent::TurnEnded { actor: hero }));
}

#[test]
fn cooldown_holds_for_one_own_turn() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero").with_skill(STRIKE),
        player("Foe"),
    );
    let strike = BattleAction::Skill {
        skill: STRIKE,
        target: Some(foe),
    };

    turn_of(&mut session, hero);
    session.submit_action(hero, strike).unwrap();

    turn_of(&mut session, hero);
    assert_eq!(session.combatant(hero).unwrap().cooldown(STRIKE), 1);
    assert_eq!(
        session.submit_action(hero, strike),
        Err(ActionRejected::Skill(SkillBlock::OnCooldown { remaining: 1 }))
    );
    session.submit_action(hero, BattleAction::Defend).unwrap();

    turn_of(&mut session, hero);
    assert_eq!(session.combatant(hero).unwrap().cooldown(STRIKE), 0);
    session.submit_action(hero, strike).unwrap();
    session.tick();
    assert_eq!(session.combatant(foe).unwrap().health(), 248);
}

#[test]
fn stunned_combatant_loses_its_turn() {
    let registry = registry();
    let (mut session, hero, foe) = duel(
        &registry,
        BattleConfig::default(),
        player("Hero"),
        quick("Foe").with_controller(Controller::Player),
    );
    let stun = registry.status(STUN).unwrap();
    session.combatant_mut(foe).unwrap().apply_status(stun, None);

    assert_eq!(await_turn(&mut session), hero);
    let events = session.drain_events();
    assert!(events.contains(&BattleEvent::TurnSkipped {
        actor: foe,
        reason: SkipReason::ActionPrevented,
    }));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BattleEvent::TurnStarted { actor, .. } if *actor == foe))
    );
}

#[test]
fn ties_go_to_the_front_slot_then_the_ally_side() {
    let registry = registry();

    let mut session = BattleSession::new(&registry, BattleConfig::default(), 1);
    let hero = session
        .add_combatant(Side::Ally, &player("Hero").with_slot(1))
        .unwrap();
    let foe = session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    session.start().unwrap();
    assert_eq!(session.atb_order(), vec![foe, hero]);
    assert_eq!(await_turn(&mut session), foe);

    // Same slot: the ally side wins even with the higher id.
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 1);
    let foe = session.add_combatant(Side::Enemy, &player("Foe")).unwrap();
    let hero = session.add_combatant(Side::Ally, &player("Hero")).unwrap();
    session.start().unwrap();
    assert!(foe < hero);
    assert_eq!(await_turn(&mut session), hero);
}

#[test]
fn atb_order_lists_the_fullest_timer_first() {
    let registry = registry();
    let mut session = BattleSession::new(&registry, BattleConfig::default(), 2);
    let hero = session.add_combatant(Side::Ally, &player("Hero")).unwrap();
    let foe = session.add_combatant(Side::Enemy, &quick("Foe")).unwrap();
    let sloth = session
        .add_combatant(
            Side::Enemy,
            &CombatantTemplate::new("Sloth")
                .with_base(BaseStats::new(10.0, 10.0, 10.0, 0.0, 10.0, 10.0)),
        )
        .unwrap();
    session.start().unwrap();
    assert_eq!(session.atb_order(), vec![hero, foe, sloth]);

    // 20 ticks: speeds 90, 70 and 50 give timers 45, 35 and 25.
    for _ in 0..20 {
        assert_eq!(session.tick(), BattleState::Running);
    }
    assert_eq!(session.atb_order(), vec![foe, hero, sloth]);

    session.combatant_mut(sloth).unwrap().set_health(0);
    assert_eq!(session.atb_order(), vec![foe, hero]);
}

fn ai_battle(registry: &ContentRegistry, seed: u64) -> (BattleState, Vec<BattleEvent>) {
    let mut session = BattleSession::new(registry, BattleConfig::default(), seed);
    for side in Side::BOTH {
        for name in ["Vanguard", "Rearguard"] {
            session.add_combatant(side, &CombatantTemplate::new(name)).unwrap();
        }
    }
    session.start().unwrap();
    let state = session.run(200_000);
    (state, session.drain_events())
}

#[test]
fn ai_battle_runs_to_an_outcome() {
    let registry = registry();
    let (state, events) = ai_battle(&registry, 42);
    assert!(matches!(state, BattleState::Victory | BattleState::Defeat));
    assert!(events.iter().any(|e| matches!(e, BattleEvent::Downed { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn same_seed_replays_the_same_battle(seed in any::<u64>()) {
        let registry = registry();
        let first = ai_battle(&registry, seed);
        let second = ai_battle(&registry, seed);
        prop_assert!(first.0.is_finished());
        prop_assert_eq!(first, second);
    }
}
