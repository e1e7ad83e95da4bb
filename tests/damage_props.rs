//! Property tests for the damage pipeline.

use golf_rpg::cards::{ActorDefinition, ActorStats, Catalog, Element, Rank, TypeChart};
use golf_rpg::core::{Actor, ActorDefId, EngineConfig, IdAllocator};
use golf_rpg::effects::{apply_damage_to_actor, hit_chance, resolve_packet_total, DamagePacket};
use proptest::prelude::*;

fn actor(hp: u32, armor: u32, super_armor: u32) -> Actor {
    let def = ActorDefinition::new(ActorDefId(1), "Dummy", Rank::ACE).with_stats(ActorStats {
        hp_max: hp,
        ..ActorStats::default()
    });
    let mut actor = Actor::spawn(&def, &Catalog::new(), &mut IdAllocator::new());
    actor.armor = armor;
    actor.super_armor = super_armor;
    actor
}

fn element() -> impl Strategy<Value = Element> {
    prop::sample::select(Element::ALL.to_vec())
}

#[test]
fn test_super_armor_soaks_whole_hit() {
    let mut target = actor(10, 3, 5);
    let outcome = apply_damage_to_actor(&mut target, 6);

    assert_eq!((target.hp, target.armor, target.super_armor), (10, 3, 0));
    assert_eq!(outcome.absorbed_by_super_armor, 5);
    assert_eq!(outcome.hp_lost, 0);
}

proptest! {
    #[test]
    fn packet_total_grows_with_multiplier(
        amount in 0u32..200,
        attacker in element(),
        defender in element(),
        low in 0.0f32..3.0,
        bump in 0.0f32..2.0,
    ) {
        prop_assume!(attacker != Element::Neutral);
        let packet = DamagePacket::single(amount, Some(attacker));
        let weak = TypeChart::neutral().with(attacker, defender, low);
        let strong = TypeChart::neutral().with(attacker, defender, low + bump);

        prop_assert!(
            resolve_packet_total(&packet, defender, &weak) <= resolve_packet_total(&packet, defender, &strong)
        );
    }

    #[test]
    fn negative_normal_floors_at_zero(normal in -500i32..0, defender in element()) {
        let packet = DamagePacket {
            normal,
            ..DamagePacket::default()
        };
        prop_assert_eq!(resolve_packet_total(&packet, defender, &TypeChart::neutral()), 0);
    }

    #[test]
    fn hit_chance_stays_in_band(accuracy in any::<u32>(), evasion in any::<u32>()) {
        let config = EngineConfig::default();
        let chance = hit_chance(accuracy, evasion, &config);
        prop_assert!((5..=95).contains(&chance));
    }

    #[test]
    fn super_armor_protects_hp_and_armor(
        hp in 1u32..100,
        armor in 0u32..20,
        super_armor in 1u32..20,
        amount in 0u32..100,
    ) {
        let mut target = actor(hp, armor, super_armor);
        apply_damage_to_actor(&mut target, amount);

        prop_assert_eq!(target.hp, hp);
        prop_assert_eq!(target.armor, armor);
    }

    #[test]
    fn hp_loss_never_exceeds_the_hit(hp in 1u32..100, armor in 0u32..20, amount in 0u32..300) {
        let mut target = actor(hp, armor, 0);
        let outcome = apply_damage_to_actor(&mut target, amount);

        prop_assert!(outcome.hp_lost <= amount);
        prop_assert_eq!(target.hp, hp - outcome.hp_lost);
        prop_assert_eq!(outcome.hp_lost + outcome.absorbed_by_armor + outcome.blocked_by_defense, amount.min(hp + armor));
    }
}
