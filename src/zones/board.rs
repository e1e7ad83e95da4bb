//! The card table: per-side foundations, tableaus, stock and transient hand.
//!
//! A [`Board`] exists only while a session is playing or inside a biome.
//! Each side owns a [`Lane`]; the enemy lane stays empty outside combat.
//!
//! Dealing is driven by a [`DealSpec`] kept on the board, so round resets
//! in infinite-combat mode can re-deal without consulting the catalog.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::pile::{Foundation, Pile};
use crate::cards::{build_deck, random_card, random_deck, BiomeDefinition, Card, Element, Rank, RANK_COUNT};
use crate::core::error::Rejection;
use crate::core::ids::TransientId;
use crate::core::rng::GameRng;
use crate::core::side::{Side, SideMap};
use crate::rules::RuleEffect;

/// How tableaus and stock are dealt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealSpec {
    pub tableau_count: usize,
    pub tableau_depth: usize,
    pub stock_size: usize,
    pub elements: Vec<Element>,
    /// Deal independent random cards instead of shuffled runs.
    pub random: bool,
    /// Backfill tableaus beneath their top when a card is taken.
    pub infinite: bool,
    /// Dealt cards of this rank carry a reward of their element.
    pub reward_rank: Option<Rank>,
    /// Fixed layout, bottom card first. Overrides the shape fields.
    pub layout: Vec<Vec<Card>>,
}

impl Default for DealSpec {
    fn default() -> Self {
        Self {
            tableau_count: 7,
            tableau_depth: 5,
            stock_size: 0,
            elements: Vec::new(),
            random: false,
            infinite: false,
            reward_rank: None,
            layout: Vec::new(),
        }
    }
}

impl DealSpec {
    /// Deal shape of a biome.
    #[must_use]
    pub fn from_biome(biome: &BiomeDefinition) -> Self {
        Self {
            tableau_count: biome.tableau_count,
            tableau_depth: biome.tableau_depth,
            stock_size: biome.stock_size,
            elements: biome.elements.clone(),
            random: biome.random,
            infinite: biome.infinite,
            reward_rank: biome.reward_rank,
            layout: biome.layout.clone(),
        }
    }

    /// Set the tableau shape.
    #[must_use]
    pub fn with_tableaus(mut self, count: usize, depth: usize) -> Self {
        self.tableau_count = count;
        self.tableau_depth = depth;
        self
    }

    /// Set the stock size.
    #[must_use]
    pub fn with_stock(mut self, size: usize) -> Self {
        self.stock_size = size;
        self
    }

    /// Use a fixed layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Vec<Vec<Card>>) -> Self {
        self.layout = layout;
        self
    }

    /// Enable backfill.
    #[must_use]
    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    /// Deal tableaus and stock.
    pub fn deal(&self, rng: &mut GameRng) -> (Vector<Pile>, Pile) {
        if !self.layout.is_empty() {
            let tableaus: Vector<Pile> = self
                .layout
                .iter()
                .map(|pile| pile.iter().cloned().collect())
                .collect();
            return (tableaus, Pile::new());
        }

        let needed = self.tableau_count * self.tableau_depth + self.stock_size;
        let mut cards = if self.random {
            random_deck(&self.elements, needed, rng)
        } else {
            let per_copy = self.elements.len().max(1) * RANK_COUNT as usize;
            let copies = needed.div_ceil(per_copy).max(1);
            build_deck(&self.elements, copies, rng)
        };
        cards.truncate(needed);

        if let Some(rank) = self.reward_rank {
            for card in cards.iter_mut().filter(|c| c.rank == rank) {
                card.reward_element = Some(card.element);
            }
        }

        let mut cards = cards.into_iter();
        let tableaus: Vector<Pile> = (0..self.tableau_count)
            .map(|_| cards.by_ref().take(self.tableau_depth).collect::<Pile>())
            .collect();
        let stock: Pile = cards.collect();
        (tableaus, stock)
    }
}

/// A runtime-only hand card not backed by a deck slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransientCard {
    pub id: TransientId,
    pub card: Card,
}

/// One side of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane {
    pub foundations: Vector<Foundation>,
    pub tableaus: Vector<Pile>,
    pub stock: Pile,
    /// Deterministic backfill order, consumed front first.
    pub backfill: Vector<Card>,
    /// Transient hand cards.
    pub hand: Vector<TransientCard>,
    /// Ordering effects active until the round ends.
    pub rules: Vector<RuleEffect>,
}

impl Lane {
    /// Foundation at `index`.
    pub fn foundation(&self, side: Side, index: usize) -> Result<&Foundation, Rejection> {
        self.foundations
            .get(index)
            .ok_or(Rejection::NoSuchFoundation { side, index })
    }

    /// Top card of tableau `index`.
    pub fn tableau_top(&self, side: Side, index: usize) -> Result<&Card, Rejection> {
        self.tableaus
            .get(index)
            .ok_or(Rejection::NoSuchTableau { side, index })?
            .top()
            .ok_or(Rejection::EmptyPile("tableau"))
    }

    /// Every card a golf move could come from: tableau tops, stock top and
    /// transient hand cards.
    pub fn playable_sources(&self) -> impl Iterator<Item = &Card> {
        self.tableaus
            .iter()
            .filter_map(Pile::top)
            .chain(self.stock.top())
            .chain(self.hand.iter().map(|t| &t.card))
    }

    /// Are all tableaus and the stock empty?
    #[must_use]
    pub fn is_emptied(&self) -> bool {
        self.stock.is_empty() && self.tableaus.iter().all(Pile::is_empty)
    }
}

/// The whole table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub lanes: SideMap<Lane>,
    pub deal: DealSpec,
    /// Clear rewards were already granted.
    pub cleared: bool,
}

impl Board {
    /// Deal a board with the given player foundations.
    pub fn new(deal: DealSpec, foundations: Vector<Foundation>, backfill: &[Card], rng: &mut GameRng) -> Self {
        let (tableaus, stock) = deal.deal(rng);
        let player = Lane {
            foundations,
            tableaus,
            stock,
            backfill: backfill.iter().cloned().collect(),
            hand: Vector::new(),
            rules: Vector::new(),
        };
        Self {
            lanes: SideMap::new(|side| match side {
                Side::Player => player.clone(),
                Side::Enemy => Lane::default(),
            }),
            deal,
            cleared: false,
        }
    }

    /// Deal the enemy lane.
    pub fn deal_enemy_lane(&mut self, foundations: Vector<Foundation>, backfill: &[Card], rng: &mut GameRng) {
        let (tableaus, stock) = self.deal.deal(rng);
        self.lanes[Side::Enemy] = Lane {
            foundations,
            tableaus,
            stock,
            backfill: backfill.iter().cloned().collect(),
            hand: Vector::new(),
            rules: Vector::new(),
        };
    }

    #[must_use]
    pub fn lane(&self, side: Side) -> &Lane {
        &self.lanes[side]
    }

    pub fn lane_mut(&mut self, side: Side) -> &mut Lane {
        &mut self.lanes[side]
    }

    /// Take the top card of a tableau.
    ///
    /// In infinite mode a replacement slides in beneath, from the lane's
    /// backfill queue first and the RNG once the queue is spent.
    pub fn take_from_tableau(&mut self, side: Side, index: usize, rng: &mut GameRng) -> Result<Card, Rejection> {
        let infinite = self.deal.infinite;
        let elements = self.deal.elements.clone();
        let lane = &mut self.lanes[side];

        let replacement = if infinite {
            Some(
                lane.backfill
                    .pop_front()
                    .unwrap_or_else(|| random_card(&elements, rng)),
            )
        } else {
            None
        };

        let tableau = lane
            .tableaus
            .get_mut(index)
            .ok_or(Rejection::NoSuchTableau { side, index })?;

        let taken = match replacement {
            Some(card) => tableau.pop_with_backfill(card),
            None => tableau.pop(),
        };
        taken.ok_or(Rejection::EmptyPile("tableau"))
    }

    /// Take the top card of a side's stock.
    pub fn take_from_stock(&mut self, side: Side) -> Result<Card, Rejection> {
        self.lanes[side].stock.pop().ok_or(Rejection::EmptyPile("stock"))
    }

    /// Remove a transient card from a side's hand.
    pub fn take_transient(&mut self, side: Side, id: TransientId) -> Result<Card, Rejection> {
        let hand = &mut self.lanes[side].hand;
        let pos = hand
            .iter()
            .position(|t| t.id == id)
            .ok_or(Rejection::TransientNotInHand(id))?;
        Ok(hand.remove(pos).card)
    }

    /// Re-deal a side's tableaus, keeping its stock.
    pub fn redeal_tableaus(&mut self, side: Side, rng: &mut GameRng) {
        let (tableaus, _) = self.deal.deal(rng);
        self.lanes[side].tableaus = tableaus;
    }

    /// Reset every foundation on a side to its origin card.
    pub fn reset_foundations(&mut self, side: Side) {
        for foundation in self.lanes[side].foundations.iter_mut() {
            foundation.reset_to_origin();
        }
    }
}
