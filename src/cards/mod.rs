//! Card system: card values, orims, ability decks, and the content catalog.
//!
//! ## Key Types
//!
//! - `Card`: Immutable card value (rank, element, optional ability data)
//! - `OrimDefinition` / `OrimInstance`: Ability catalog entry vs. slot binding
//! - `AbilityDeck` / `DeckCard`: Per-actor deck with discard/cooldown state
//! - `Catalog`: Layered read-only definitions plus the type chart

pub mod card;
pub mod catalog;
pub mod deck;
pub mod orim;

pub use card::{Card, Element, Rank, Reward, RewardSource, RANK_COUNT};
pub use catalog::{
    ActorDefinition, ActorStats, BiomeDefinition, BiomeKind, BiomeReward, Catalog, CatalogLayer,
    EnemySpawn, RelicBehavior, RelicDefinition, TypeChart,
};
pub use deck::{build_deck, random_card, random_deck, AbilityDeck, DeckCard, DiscardMark};
pub use orim::{Cooldown, OrimDefinition, OrimInstance, RawOrimDefinition, Rarity, Timing};
