//! Hand synthesis.
//!
//! The hand is never stored. Every call rebuilds it from the side's transient
//! cards plus, in combat, one card per deck slot that is out of the discard
//! pile, affordable and whose trigger currently holds.

use serde::Serialize;

use super::Engine;
use crate::cards::{Card, Rank};
use crate::combat::CombatState;
use crate::core::actor::Actor;
use crate::core::command::HandCardRef;
use crate::core::error::Rejection;
use crate::core::ids::{ActorId, DeckCardId};
use crate::core::side::Side;
use crate::core::state::GameState;
use crate::rules::has_golf_move;
use crate::triggers::{Subject, TriggerContext};

/// A card currently offered to a side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandCard {
    pub source: HandCardRef,
    pub card: Card,
    /// Power the play costs. Zero for transient cards.
    pub cost: u32,
}

impl Engine<'_> {
    /// Everything `side` may play from hand at `now_ms`.
    #[must_use]
    pub fn hand(&self, state: &GameState, side: Side, now_ms: u64) -> Vec<HandCard> {
        let mut hand = Vec::new();

        if state.phase.combat().is_some() {
            for actor_id in state.side_actors(side) {
                let Some(actor) = state.actor(actor_id) else {
                    continue;
                };
                for deck_card in actor.deck.iter() {
                    if let Ok(card) = self.offer(state, side, actor_id, deck_card.id, now_ms) {
                        hand.push(card);
                    }
                }
            }
        }

        if let Some(board) = state.phase.board() {
            hand.extend(board.lane(side).hand.iter().map(|t| HandCard {
                source: HandCardRef::Transient(t.id),
                card: t.card.clone(),
                cost: 0,
            }));
        }
        hand
    }

    /// Synthesize one deck card, or say why it is not in hand.
    pub(super) fn offer(
        &self,
        state: &GameState,
        side: Side,
        actor_id: ActorId,
        card_id: DeckCardId,
        now_ms: u64,
    ) -> Result<HandCard, Rejection> {
        let combat = state.phase.combat().ok_or(Rejection::NotInCombat)?;
        let not_in_hand = Rejection::DeckCardNotInHand(card_id);

        if !state.side_actors(side).contains(&actor_id) {
            return Err(not_in_hand);
        }
        let actor = state
            .actor(actor_id)
            .filter(|a| a.is_alive())
            .ok_or_else(|| not_in_hand.clone())?;
        let deck_card = actor
            .deck
            .get(card_id)
            .filter(|c| !c.is_discarded())
            .ok_or_else(|| not_in_hand.clone())?;
        let def = self.catalog.orim(deck_card.orim);
        let trigger = def.and_then(|d| d.trigger.as_ref());
        if trigger.is_some_and(|t| !t.passes_return_gate(deck_card.returns > 0)) {
            return Err(not_in_hand);
        }

        if actor.power < deck_card.cost {
            return Err(Rejection::InsufficientPower {
                need: deck_card.cost,
                have: actor.power,
            });
        }

        if let Some(trigger) = trigger {
            let ctx = self.trigger_context(state, combat, side, actor, now_ms);
            if !ctx.evaluate(trigger) {
                return Err(not_in_hand);
            }
        }

        let mut card = Card::new(def.map_or(Rank::WILD, |d| d.rank), actor.element)
            .with_actor(actor_id)
            .with_ability(deck_card.orim)
            .with_deck_card(card_id);
        if def.is_some_and(|d| d.self_target_only) {
            card = card.self_targeting();
        }

        Ok(HandCard {
            source: HandCardRef::Deck {
                actor: actor_id,
                card: card_id,
            },
            card,
            cost: deck_card.cost,
        })
    }

    fn trigger_context<'s>(
        &self,
        state: &'s GameState,
        combat: &'s CombatState,
        side: Side,
        actor: &'s Actor,
        now_ms: u64,
    ) -> TriggerContext<'s> {
        let own = state.side_actors(side);
        let subject = Subject {
            actor,
            combo: combat.combos.actor_combo(actor.id),
            party_combo: combat.combos.party_combo(own.iter().copied()),
            no_legal_moves: !self.golf_move_available(state, side),
        };

        let rivals = state.side_actors(side.opponent());
        let rival_combo = combat.combos.party_combo(rivals.iter().copied());
        let rivals_stuck = !self.golf_move_available(state, side.opponent());
        let opponents = rivals
            .iter()
            .filter_map(|&id| state.actor(id))
            .map(|rival| Subject {
                actor: rival,
                combo: combat.combos.actor_combo(rival.id),
                party_combo: rival_combo,
                no_legal_moves: rivals_stuck,
            })
            .collect();

        TriggerContext {
            subject,
            opponents,
            inactivity_ms: combat.inactivity_ms(now_ms),
        }
    }

    /// Does `side` have a golf move onto a foundation whose actor is
    /// standing? Deck cards are not counted.
    pub(super) fn golf_move_available(&self, state: &GameState, side: Side) -> bool {
        state.phase.board().is_some_and(|board| {
            has_golf_move(board.lane(side), self.config.legality_mode, |f| {
                f.actor
                    .map_or(true, |id| state.actor(id).is_some_and(Actor::is_alive))
            })
        })
    }

    /// Can `side` do anything at all from its own lane and hand?
    pub(super) fn has_any_play(&self, state: &GameState, side: Side, now_ms: u64) -> bool {
        self.golf_move_available(state, side) || !self.hand(state, side, now_ms).is_empty()
    }
}
