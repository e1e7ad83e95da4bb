//! Card values: rank, element and the optional ability data a card carries.
//!
//! Cards are immutable values. Moving a card between piles copies it; a
//! card played from a deck slot is rebuilt from the slot every time the
//! hand is synthesized.
//!
//! ## Ranks
//!
//! Ranks run Ace (1) to King (13). Rank 0 is reserved as the wild sentinel:
//! a wild card may land anywhere, and anything may land on a wild top.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ids::{ActorId, DeckCardId, OrimId, OrimInstanceId};

/// Number of ordinary ranks.
pub const RANK_COUNT: u8 = 13;

/// Card rank, 1..=13, or the wild sentinel 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    /// The wild sentinel.
    pub const WILD: Rank = Rank(0);
    /// Ace.
    pub const ACE: Rank = Rank(1);
    /// King.
    pub const KING: Rank = Rank(RANK_COUNT);

    /// Create an ordinary rank. Returns `None` outside 1..=13.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= RANK_COUNT {
            Some(Rank(value))
        } else {
            None
        }
    }

    /// Create a rank, wrapping any value into 1..=13.
    #[must_use]
    pub const fn wrapping(value: u32) -> Self {
        Rank((value % RANK_COUNT as u32) as u8 + 1)
    }

    /// Raw value (0 for wild).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Is this the wild sentinel?
    #[must_use]
    pub const fn is_wild(self) -> bool {
        self.0 == 0
    }

    /// Steps from `self` up to `other` modulo 13 (0..13).
    ///
    /// `None` if either rank is wild.
    #[must_use]
    pub fn steps_up_to(self, other: Rank) -> Option<u8> {
        if self.is_wild() || other.is_wild() {
            return None;
        }
        Some((other.0 + RANK_COUNT - self.0) % RANK_COUNT)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "*"),
            1 => write!(f, "A"),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            n => write!(f, "{}", n),
        }
    }
}

/// Elemental affinity of cards, actors and damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Water,
    Earth,
    Air,
    Fire,
    Light,
    Dark,
    #[default]
    Neutral,
}

impl Element {
    /// Number of elements.
    pub const COUNT: usize = 7;

    /// Every element, in chart order.
    pub const ALL: [Element; Element::COUNT] = [
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Fire,
        Element::Light,
        Element::Dark,
        Element::Neutral,
    ];

    /// Row/column in the type chart.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Is this the neutral element?
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Element::Neutral)
    }
}

/// Where a reward came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardSource {
    /// A reward-bearing card was played.
    Card,
    /// A biome was cleared (static layout emptied or all enemies down).
    BiomeClear,
}

/// A reward queued for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    pub element: Element,
    pub amount: u32,
    pub source: RewardSource,
}

/// A card.
///
/// ## Example
///
/// ```
/// use golf_rpg::cards::{Card, Element, Rank};
/// use golf_rpg::core::OrimId;
///
/// let plain = Card::new(Rank::new(7).unwrap(), Element::Fire);
/// assert!(!plain.bypasses_ordering());
///
/// let ability = Card::new(Rank::WILD, Element::Water).with_ability(OrimId::new(3));
/// assert!(ability.bypasses_ordering());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub element: Element,

    /// Actor this card belongs to (seeded foundation cards, deck cards).
    pub actor: Option<ActorId>,

    /// Ability this card activates when played.
    pub ability: Option<OrimId>,

    /// Deck slot this card was synthesized from.
    pub deck_card: Option<DeckCardId>,

    /// Orim instances socketed into this card.
    #[serde(default)]
    pub slots: SmallVec<[OrimInstanceId; 2]>,

    /// The card's ability only ever targets its owner.
    #[serde(default)]
    pub self_target_only: bool,

    /// Playing this card grants a reward of this element.
    pub reward_element: Option<Element>,
}

impl Card {
    /// Create a plain card.
    #[must_use]
    pub fn new(rank: Rank, element: Element) -> Self {
        Self {
            rank,
            element,
            actor: None,
            ability: None,
            deck_card: None,
            slots: SmallVec::new(),
            self_target_only: false,
            reward_element: None,
        }
    }

    /// Create a wild card.
    #[must_use]
    pub fn wild() -> Self {
        Self::new(Rank::WILD, Element::Neutral)
    }

    /// Set the owning actor.
    #[must_use]
    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attach an ability.
    #[must_use]
    pub fn with_ability(mut self, ability: OrimId) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Mark as synthesized from a deck slot.
    #[must_use]
    pub fn with_deck_card(mut self, deck_card: DeckCardId) -> Self {
        self.deck_card = Some(deck_card);
        self
    }

    /// Socket an orim instance.
    #[must_use]
    pub fn with_slot(mut self, instance: OrimInstanceId) -> Self {
        self.slots.push(instance);
        self
    }

    /// Mark the ability as self-target-only.
    #[must_use]
    pub fn self_targeting(mut self) -> Self {
        self.self_target_only = true;
        self
    }

    /// Attach a reward element.
    #[must_use]
    pub fn with_reward(mut self, element: Element) -> Self {
        self.reward_element = Some(element);
        self
    }

    /// Is this a wild card?
    #[must_use]
    pub fn is_wild(&self) -> bool {
        self.rank.is_wild()
    }

    /// Ability drops ignore rank ordering entirely.
    #[must_use]
    pub fn bypasses_ordering(&self) -> bool {
        self.ability.is_some() || self.deck_card.is_some() || self.self_target_only
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.rank, self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_bounds() {
        assert_eq!(Rank::new(0), None);
        assert_eq!(Rank::new(1), Some(Rank::ACE));
        assert_eq!(Rank::new(13), Some(Rank::KING));
        assert_eq!(Rank::new(14), None);
    }

    #[test]
    fn test_rank_wrapping() {
        assert_eq!(Rank::wrapping(0), Rank::ACE);
        assert_eq!(Rank::wrapping(12), Rank::KING);
        assert_eq!(Rank::wrapping(13), Rank::ACE);
    }

    #[test]
    fn test_steps_up_to() {
        assert_eq!(Rank::KING.steps_up_to(Rank::ACE), Some(1));
        assert_eq!(Rank::ACE.steps_up_to(Rank::KING), Some(12));
        assert_eq!(Rank::WILD.steps_up_to(Rank::ACE), None);
    }

    #[test]
    fn test_rank_display() {
        assert_eq!(Rank::ACE.to_string(), "A");
        assert_eq!(Rank::new(10).unwrap().to_string(), "10");
        assert_eq!(Rank::WILD.to_string(), "*");
    }

    #[test]
    fn test_element_index_matches_all() {
        for (i, element) in Element::ALL.iter().enumerate() {
            assert_eq!(element.index(), i);
        }
        assert!(Element::default().is_neutral());
    }

    #[test]
    fn test_bypass_flags() {
        let base = Card::new(Rank::ACE, Element::Earth);
        assert!(!base.bypasses_ordering());
        assert!(base.clone().with_deck_card(DeckCardId(1)).bypasses_ordering());
        assert!(base.clone().self_targeting().bypasses_ordering());
        assert!(!base.with_reward(Element::Fire).bypasses_ordering());
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::new(Rank::KING, Element::Dark)
            .with_actor(ActorId(2))
            .with_slot(OrimInstanceId(5));

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
