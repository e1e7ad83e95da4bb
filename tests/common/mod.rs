//! Shared fixtures for integration tests.

#![allow(dead_code)]

use golf_rpg::cards::{
    ActorDefinition, ActorStats, BiomeDefinition, Card, Catalog, Cooldown, Element, OrimDefinition, Rank,
};
use golf_rpg::core::{ActorDefId, BiomeId, EngineConfig, OrimId};
use golf_rpg::effects::{DotKind, Effect, TargetSelector};
use golf_rpg::triggers::{Comparison, LeafKind, TriggerLeaf};

pub const HERO: ActorDefId = ActorDefId(1);
pub const OGRE: ActorDefId = ActorDefId(2);

pub const MEND: OrimId = OrimId(1);
pub const RECALL: OrimId = OrimId(2);
pub const EMBER: OrimId = OrimId(3);
pub const SECOND_WIND: OrimId = OrimId(4);

/// Combat biome with no enemies.
pub const QUIET: BiomeId = BiomeId(1);
/// Combat biome with one ogre.
pub const LAIR: BiomeId = BiomeId(2);

pub fn card(rank: u8) -> Card {
    Card::new(Rank::new(rank).unwrap_or(Rank::ACE), Element::Neutral)
}

/// A tableau whose top is `ranks[0]`, then `ranks[1]`, and so on.
pub fn run(ranks: &[u8]) -> Vec<Card> {
    ranks.iter().rev().map(|&r| card(r)).collect()
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let layer = catalog.fallback_mut();

    layer.register_orim(
        OrimDefinition::new(MEND, "Mend").with_effect(Effect::heal(5).targeting(TargetSelector::SelfActor)),
    );
    layer.register_orim(
        OrimDefinition::new(RECALL, "Recall")
            .with_effect(Effect::armor(1))
            .with_cooldown(Cooldown::Combo(2)),
    );
    layer.register_orim(
        OrimDefinition::new(EMBER, "Ember")
            .with_effect(Effect::dot(2, 3, DotKind::Burn))
            .with_cooldown(Cooldown::Seconds(60)),
    );
    layer.register_orim(
        OrimDefinition::new(SECOND_WIND, "Second Wind")
            .with_effect(Effect::heal(1))
            .with_trigger(
                TriggerLeaf::new(LeafKind::InactivitySeconds)
                    .compare(Comparison::Ge, 5.0)
                    .into(),
            ),
    );

    layer.register_actor(
        ActorDefinition::new(HERO, "Hero", Rank::new(5).unwrap_or(Rank::ACE))
            .with_stats(ActorStats {
                hp_max: 10,
                power_max: 3,
                accuracy: 100,
                ..ActorStats::default()
            })
            .with_ability(MEND)
            .with_ability(RECALL)
            .with_ability(EMBER)
            .with_ability(SECOND_WIND)
            .with_rewind(),
    );
    layer.register_actor(ActorDefinition::new(OGRE, "Ogre", Rank::KING).with_stats(ActorStats {
        hp_max: 50,
        ..ActorStats::default()
    }));

    layer.register_biome(
        BiomeDefinition::new(QUIET, "Quiet Clearing")
            .combat(0)
            .with_layout(vec![run(&[6, 7, 8, 9, 10]), run(&[2])]),
    );
    layer.register_biome(
        BiomeDefinition::new(LAIR, "Ogre Lair")
            .combat(1)
            .with_enemy(OGRE, 1.0)
            .with_layout(vec![run(&[6, 7, 8]), run(&[4])])
            .with_reward(Element::Fire, 3),
    );
    catalog
}

/// Default rules with every roll landing.
pub fn sure_hits() -> EngineConfig {
    EngineConfig::default().with_hit_chance(100, 100)
}
