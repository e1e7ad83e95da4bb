//! Ordered card piles.
//!
//! Foundations, tableaus and stock piles are all a [`Pile`]: an ordered
//! `im::Vector` of cards whose last element is the top. Only the top card of
//! a pile is ever playable.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::ids::ActorId;

/// Ordered card sequence; the last card is the top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pile {
    cards: Vector<Card>,
}

impl Pile {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top card, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// Card directly beneath the top.
    #[must_use]
    pub fn below_top(&self) -> Option<&Card> {
        let len = self.cards.len();
        if len < 2 {
            return None;
        }
        self.cards.get(len - 2)
    }

    /// Bottom card, if any.
    #[must_use]
    pub fn bottom(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Put a card on top.
    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Put a card at the bottom.
    pub fn push_bottom(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Take the top card.
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Take the top card and slide `replacement` in beneath whatever is
    /// left, keeping the pile's depth for infinite tableaus.
    pub fn pop_with_backfill(&mut self, replacement: Card) -> Option<Card> {
        let top = self.cards.pop_back()?;
        self.cards.push_front(replacement);
        Some(top)
    }

    /// Remove every card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Bottom-to-top iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

impl FromIterator<Card> for Pile {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

/// A foundation: a pile tied to one combat participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Foundation {
    pub pile: Pile,
    /// Actor whose avatar this foundation is. `None` in plain solitaire.
    pub actor: Option<ActorId>,
}

impl Foundation {
    /// Create a foundation seeded with its first card.
    #[must_use]
    pub fn seeded(actor: Option<ActorId>, origin: Card) -> Self {
        let mut pile = Pile::new();
        pile.push(origin);
        Self { pile, actor }
    }

    /// Top card, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.pile.top()
    }

    /// The first card placed on the foundation.
    #[must_use]
    pub fn origin(&self) -> Option<&Card> {
        self.pile.bottom()
    }

    /// Was the origin card wild?
    #[must_use]
    pub fn has_wild_origin(&self) -> bool {
        self.origin().is_some_and(Card::is_wild)
    }

    /// Drop everything above the origin card.
    pub fn reset_to_origin(&mut self) {
        let origin = self.origin().cloned();
        self.pile.clear();
        if let Some(card) = origin {
            self.pile.push(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Element, Rank};

    fn card(rank: u8) -> Card {
        Card::new(Rank::new(rank).unwrap(), Element::Neutral)
    }

    #[test]
    fn test_top_and_below() {
        let pile: Pile = [card(1), card(2), card(3)].into_iter().collect();

        assert_eq!(pile.top(), Some(&card(3)));
        assert_eq!(pile.below_top(), Some(&card(2)));
        assert_eq!(pile.bottom(), Some(&card(1)));
    }

    #[test]
    fn test_pop_with_backfill_keeps_depth() {
        let mut pile: Pile = [card(1), card(2)].into_iter().collect();

        let taken = pile.pop_with_backfill(card(9));
        assert_eq!(taken, Some(card(2)));
        assert_eq!(pile.len(), 2);
        assert_eq!(pile.top(), Some(&card(1)));
        assert_eq!(pile.bottom(), Some(&card(9)));
    }

    #[test]
    fn test_pop_empty() {
        let mut pile = Pile::new();
        assert!(pile.pop().is_none());
        assert!(pile.pop_with_backfill(card(1)).is_none());
        assert!(pile.is_empty());
    }

    #[test]
    fn test_foundation_reset() {
        let mut foundation = Foundation::seeded(Some(ActorId(1)), card(5));
        foundation.pile.push(card(6));
        foundation.pile.push(card(7));

        foundation.reset_to_origin();

        assert_eq!(foundation.pile.len(), 1);
        assert_eq!(foundation.top(), Some(&card(5)));
        assert_eq!(foundation.actor, Some(ActorId(1)));
    }

    #[test]
    fn test_wild_origin() {
        let wild = Foundation::seeded(None, Card::wild());
        assert!(wild.has_wild_origin());

        let plain = Foundation::seeded(None, card(4));
        assert!(!plain.has_wild_origin());
        assert!(!Foundation::default().has_wild_origin());
    }
}
