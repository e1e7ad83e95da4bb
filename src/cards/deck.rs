//! Deck construction and per-actor ability-deck state.
//!
//! ## Play decks
//!
//! [`build_deck`] creates the ordered source a biome deals tableaus and
//! stock from; [`random_deck`] draws ranks and elements independently for
//! biomes flagged as random. Both go through the seeded [`GameRng`] so deals
//! are reproducible.
//!
//! ## Ability decks
//!
//! Every actor owns an [`AbilityDeck`]: one [`DeckCard`] per ability slot,
//! each tracking its cost, cooldown policy and discard mark. The hand is
//! never stored; it is recomputed from the deck on demand.

use serde::{Deserialize, Serialize};

use super::card::{Card, Element, Rank, RANK_COUNT};
use super::orim::{Cooldown, OrimDefinition};
use crate::core::ids::{DeckCardId, OrimId};
use crate::core::rng::GameRng;

/// Build `copies` runs of A..K for every element, then shuffle.
///
/// ```
/// use golf_rpg::cards::{build_deck, Element};
/// use golf_rpg::core::GameRng;
///
/// let mut rng = GameRng::new(1);
/// let deck = build_deck(&[Element::Fire, Element::Water], 1, &mut rng);
/// assert_eq!(deck.len(), 26);
/// ```
pub fn build_deck(elements: &[Element], copies: usize, rng: &mut GameRng) -> Vec<Card> {
    let elements: &[Element] = if elements.is_empty() {
        &[Element::Neutral]
    } else {
        elements
    };

    let mut deck = Vec::with_capacity(elements.len() * RANK_COUNT as usize * copies);
    for _ in 0..copies {
        for &element in elements {
            for value in 1..=RANK_COUNT {
                if let Some(rank) = Rank::new(value) {
                    deck.push(Card::new(rank, element));
                }
            }
        }
    }

    rng.shuffle(&mut deck);
    deck
}

/// Draw `count` cards with independently random rank and element.
pub fn random_deck(elements: &[Element], count: usize, rng: &mut GameRng) -> Vec<Card> {
    (0..count).map(|_| random_card(elements, rng)).collect()
}

/// Draw a single random card.
pub fn random_card(elements: &[Element], rng: &mut GameRng) -> Card {
    let rank = Rank::wrapping(rng.below(u32::from(RANK_COUNT)));
    let element = rng.choose(elements).copied().unwrap_or_default();
    Card::new(rank, element)
}

/// Marks a deck card as sitting in the discard pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscardMark {
    /// Wall-clock time of the discard.
    pub at_ms: u64,
    /// Owner's combo right after the discarding play.
    ///
    /// Signed because round resets rebase it below zero to keep progress.
    pub combo_at_discard: i64,
}

/// One ability slot in an actor's deck.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckCard {
    pub id: DeckCardId,
    pub orim: OrimId,
    pub cost: u32,
    pub cooldown: Cooldown,
    pub discard: Option<DiscardMark>,
    /// How many times the card has come back from the discard pile.
    pub returns: u32,
}

impl DeckCard {
    /// Create a deck card from an orim definition.
    #[must_use]
    pub fn from_definition(id: DeckCardId, def: &OrimDefinition) -> Self {
        Self {
            id,
            orim: def.id,
            cost: def.cost,
            cooldown: def.cooldown,
            discard: None,
            returns: 0,
        }
    }

    /// Create a zero-cost, no-cooldown deck card for an orim the catalog
    /// does not know.
    #[must_use]
    pub fn placeholder(id: DeckCardId, orim: OrimId) -> Self {
        Self {
            id,
            orim,
            cost: 0,
            cooldown: Cooldown::None,
            discard: None,
            returns: 0,
        }
    }

    /// Is the card in the discard pile?
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.discard.is_some()
    }

    /// Has the cooldown of a discarded card elapsed?
    ///
    /// Always `false` for cards that are not discarded.
    #[must_use]
    pub fn cooldown_elapsed(&self, combo: u32, now_ms: u64) -> bool {
        let Some(mark) = self.discard else {
            return false;
        };

        match self.cooldown {
            Cooldown::None => true,
            Cooldown::Combo(needed) => i64::from(combo) - mark.combo_at_discard >= i64::from(needed),
            Cooldown::Seconds(secs) => {
                now_ms.saturating_sub(mark.at_ms) >= u64::from(secs) * 1_000
            }
        }
    }
}

/// Per-actor ability deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityDeck {
    cards: Vec<DeckCard>,
}

impl AbilityDeck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card.
    pub fn push(&mut self, card: DeckCard) {
        self.cards.push(card);
    }

    /// Iterate over all cards.
    pub fn iter(&self) -> impl Iterator<Item = &DeckCard> {
        self.cards.iter()
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, id: DeckCardId) -> Option<&DeckCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the deck empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards currently in the discard pile.
    #[must_use]
    pub fn discarded_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_discarded()).count()
    }

    /// Cards not in the discard pile.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cards.len() - self.discarded_count()
    }

    /// Put a card in the discard pile.
    ///
    /// Returns `false` if the card does not exist.
    pub fn mark_discarded(&mut self, id: DeckCardId, now_ms: u64, combo: u32) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(card) => {
                card.discard = Some(DiscardMark {
                    at_ms: now_ms,
                    combo_at_discard: i64::from(combo),
                });
                true
            }
            None => false,
        }
    }

    /// Return every discarded card whose cooldown has elapsed.
    ///
    /// Returns the ids that came back.
    pub fn return_ready(&mut self, combo: u32, now_ms: u64) -> Vec<DeckCardId> {
        let mut returned = Vec::new();
        for card in &mut self.cards {
            if card.cooldown_elapsed(combo, now_ms) {
                card.discard = None;
                card.returns += 1;
                returned.push(card.id);
            }
        }
        returned
    }

    /// Shift combo-based discard marks down by the combo being reset, so
    /// progress toward return survives the reset.
    pub fn rebase_combo(&mut self, previous_combo: u32) {
        for card in &mut self.cards {
            if let (Some(mark), Cooldown::Combo(_)) = (card.discard.as_mut(), card.cooldown) {
                mark.combo_at_discard -= i64::from(previous_combo);
            }
        }
    }
}
