//! Combat participants.
//!
//! Every party member, roster entry and enemy is an [`Actor`] stored in the
//! session's actor map. Actors are never removed mid-fight; a knocked-out
//! actor simply has zero hp and is skipped by targeting and legality.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{ActorDefId, ActorId, IdAllocator};
use crate::cards::{AbilityDeck, ActorDefinition, Card, Catalog, DeckCard, Element, OrimInstance, Rank};

/// Runtime actor state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub definition: ActorDefId,

    // === Vitals ===
    pub hp: u32,
    pub hp_max: u32,
    pub armor: u32,
    pub super_armor: u32,

    // === Combat stats ===
    pub defense: u32,
    pub evasion: u32,
    pub accuracy: u32,

    // === Resources ===
    pub power: u32,
    pub power_max: u32,
    pub energy: u32,
    pub stamina: u32,
    pub stamina_max: u32,

    pub element: Element,
    pub seed_rank: Rank,
    pub slots: SmallVec<[OrimInstance; 2]>,
    pub deck: AbilityDeck,
    pub has_rewind: bool,

    /// Total hp lost over the actor's lifetime.
    pub damage_taken: u32,
}

impl Actor {
    /// Spawn an actor from its definition.
    ///
    /// Deck cards are built from the catalog's orim definitions; an orim the
    /// catalog does not know becomes a zero-cost placeholder slot.
    pub fn spawn(def: &ActorDefinition, catalog: &Catalog, ids: &mut IdAllocator) -> Self {
        let stats = def.stats;

        let mut deck = AbilityDeck::new();
        for &orim in &def.ability_deck {
            let id = ids.deck_card();
            let card = match catalog.orim(orim) {
                Some(orim_def) => DeckCard::from_definition(id, orim_def),
                None => {
                    tracing::debug!(%orim, actor = %def.id, "unknown orim in ability deck");
                    DeckCard::placeholder(id, orim)
                }
            };
            deck.push(card);
        }

        let slots = def
            .slotted
            .iter()
            .enumerate()
            .map(|(slot, &orim)| OrimInstance::new(ids.orim_instance(), orim, slot as u8))
            .collect();

        Self {
            id: ids.actor(),
            definition: def.id,
            hp: stats.hp_max,
            hp_max: stats.hp_max,
            armor: stats.armor,
            super_armor: stats.super_armor,
            defense: stats.defense,
            evasion: stats.evasion,
            accuracy: stats.accuracy,
            power: stats.power_max,
            power_max: stats.power_max,
            energy: stats.energy,
            stamina: stats.stamina_max,
            stamina_max: stats.stamina_max,
            element: def.element,
            seed_rank: def.seed_rank,
            slots,
            deck,
            has_rewind: def.has_rewind,
            damage_taken: 0,
        }
    }

    /// Is the actor knocked out?
    #[must_use]
    pub fn is_knocked_out(&self) -> bool {
        self.hp == 0
    }

    /// Is the actor still standing?
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current hp as a percentage of max, 0..=100.
    #[must_use]
    pub fn hp_percent(&self) -> f64 {
        if self.hp_max == 0 {
            return 0.0;
        }
        f64::from(self.hp) * 100.0 / f64::from(self.hp_max)
    }

    /// Restore hp, clamped to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.hp_max);
        self.hp - before
    }

    /// Spend power. Returns `false` and spends nothing if short.
    pub fn spend_power(&mut self, amount: u32) -> bool {
        if self.power < amount {
            return false;
        }
        self.power -= amount;
        true
    }

    /// Refill power to max.
    pub fn refill_power(&mut self) {
        self.power = self.power_max;
    }

    /// Full restore at a rest stop.
    pub fn rest(&mut self) {
        self.hp = self.hp_max;
        self.stamina = self.stamina_max;
        self.power = self.power_max;
    }

    /// The card that seeds this actor's foundation.
    #[must_use]
    pub fn seed_card(&self) -> Card {
        Card::new(self.seed_rank, self.element).with_actor(self.id)
    }
}
