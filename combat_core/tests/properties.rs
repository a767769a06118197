//! Property-based tests for tags, buffs and the damage formulas

use combat_core::prelude::*;
use proptest::prelude::*;
use rand::rngs::mock::StepRng;
use std::collections::BTreeSet;
use std::rc::Rc;

fn never_crit() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn timed(name: &str, stable: bool, modifiers: &[Modifier]) -> Rc<dyn Buff> {
    let mut set = ModifierSet::new(name, stable);
    set.modifiers.extend_from_slice(modifiers);
    Rc::new(TimedBuff::new(set, 10.0))
}

/// Spawn an attacker and a target, hand `buffs` to the attacker, return the hit
fn hit_with(buffs: &[Rc<dyn Buff>], defense: i32) -> (CombatResult, StatBlock) {
    let mut arena = Arena::with_rng(never_crit());
    let hero = arena.spawn("hero", Faction::Player, StatBlock::new(100, 20, 0));
    let dummy = arena.spawn("dummy", Faction::Hostile, StatBlock::new(10_000, 1, defense));
    for buff in buffs {
        arena.register_buff(hero, buff.clone(), BuffArgs::default());
    }
    let snapshot = arena.snapshot(hero).unwrap();
    let result = arena.give_damage(hero, dummy, 1.0, TagSet::of(&[Tag::Melee, Tag::Fire]));
    (result, snapshot)
}

proptest! {
    /// A set contains exactly the tags added to it, iterated in enum order
    #[test]
    fn prop_tagset_membership(indices in proptest::collection::vec(0usize..Tag::COUNT, 0..24)) {
        let expected: BTreeSet<usize> = indices.iter().copied().collect();
        let set: TagSet = indices.iter().map(|i| Tag::ALL[*i]).collect();

        prop_assert_eq!(set.len(), expected.len());
        for tag in Tag::ALL {
            prop_assert_eq!(set.contains(tag), expected.contains(&tag.index()));
        }
        let order: Vec<usize> = set.iter().map(Tag::index).collect();
        prop_assert_eq!(order, expected.into_iter().collect::<Vec<_>>());
    }

    /// Removing a tag only ever clears that tag
    #[test]
    fn prop_tagset_remove(indices in proptest::collection::vec(0usize..Tag::COUNT, 1..12), pick in 0usize..Tag::COUNT) {
        let mut set: TagSet = indices.iter().map(|i| Tag::ALL[*i]).collect();
        let before = set;
        set.remove(Tag::ALL[pick]);

        prop_assert!(!set.contains(Tag::ALL[pick]));
        for tag in Tag::ALL {
            if tag != Tag::ALL[pick] {
                prop_assert_eq!(set.contains(tag), before.contains(tag));
            }
        }
    }

    /// Volatile buffs give the same result whatever order they were registered in
    #[test]
    fn prop_volatile_order_irrelevant(
        flat in -5i32..20,
        up in 0.0f32..100.0,
        factor in 0.5f32..3.0,
        add in 0i32..10,
    ) {
        let a = [Modifier::AttackFlat { amount: flat }, Modifier::DamageUp { tag: Tag::Fire, percent: up }];
        let b = [Modifier::DamageMultiplier { tag: Tag::Melee, factor }, Modifier::DamageAddFlat { tag: Tag::All, amount: add }];

        let (forward, _) = hit_with(&[timed("a", false, &a), timed("b", false, &b)], 50);
        let (backward, _) = hit_with(&[timed("b", false, &b), timed("a", false, &a)], 50);
        prop_assert_eq!(forward.raw_damage, backward.raw_damage);
        prop_assert_eq!(forward.actual_damage, backward.actual_damage);
    }

    /// Stable and volatile versions of one buff are indistinguishable in combat
    #[test]
    fn prop_stable_matches_volatile(
        flat in -5i32..30,
        percent in -50.0f32..100.0,
        add in 0i32..10,
        defense in 0i32..400,
    ) {
        let mods = [
            Modifier::AttackFlat { amount: flat },
            Modifier::AttackPercent { percent },
            Modifier::DamageAddFlat { tag: Tag::Fire, amount: add },
        ];
        let (stable, stable_snap) = hit_with(&[timed("x", true, &mods)], defense);
        let (volatile, volatile_snap) = hit_with(&[timed("x", false, &mods)], defense);

        prop_assert_eq!(stable_snap.derived_attack(), volatile_snap.derived_attack());
        prop_assert_eq!(stable.raw_damage, volatile.raw_damage);
        prop_assert_eq!(stable.actual_damage, volatile.actual_damage);
    }

    /// Registering then removing a stable buff restores the live block
    #[test]
    fn prop_stable_remove_restores(
        flat in -50i32..50,
        percent in -90i32..200,
        defense in -20i32..20,
        stacks in 1u32..6,
    ) {
        let mut arena = Arena::with_rng(never_crit());
        let hero = arena.spawn("hero", Faction::Player, StatBlock::new(100, 20, 10));
        let set = ModifierSet::new("surge", true)
            .with(Modifier::AttackFlat { amount: flat })
            .with(Modifier::AttackPercent { percent: percent as f32 })
            .with(Modifier::DefenseFlat { amount: defense });
        let surge = Rc::new(SharedStackBuff::new(set, 5, 10.0));

        for _ in 0..stacks {
            arena.register_buff(hero, surge.clone(), BuffArgs::default());
        }
        prop_assert!(arena.remove_buff(hero, "surge"));

        let stats = arena.stats(hero).unwrap();
        prop_assert_eq!(stats.derived_attack(), 20);
        prop_assert_eq!(stats.derived_defense(), 10);
    }

    /// Stack counts never exceed their cap
    #[test]
    fn prop_stack_caps(cap in 1u32..8, registrations in 1u32..20) {
        let mut arena = Arena::with_rng(never_crit());
        let hero = arena.spawn("hero", Faction::Player, StatBlock::default());
        let shared = Rc::new(SharedStackBuff::new(ModifierSet::new("shared", true), cap, 5.0));
        let independent = Rc::new(IndependentStackBuff::new(ModifierSet::new("independent", false), cap as usize, 5.0));

        for _ in 0..registrations {
            arena.register_buff(hero, shared.clone(), BuffArgs::default());
            arena.register_buff(hero, independent.clone(), BuffArgs::default());
        }
        prop_assert_eq!(shared.stack_count(hero), registrations.min(cap));
        prop_assert_eq!(independent.stack_count(hero), registrations.min(cap));
    }

    /// Non-negative defense never increases damage
    #[test]
    fn prop_mitigation_bounded(raw in 0i32..100_000, defense in 0i32..10_000) {
        let block = StatBlock::new(100, 1, defense);
        let taken = block.compute_incoming_damage(&TagSet::none(), raw);
        prop_assert!(taken >= 0);
        prop_assert!(taken <= raw);
    }
}
