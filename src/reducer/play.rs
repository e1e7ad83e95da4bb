//! Card plays: tableau, stock and hand onto a foundation.

use super::{Engine, Outcome};
use crate::cards::{Card, Reward, RewardSource};
use crate::combat::relic;
use crate::core::actor::Actor;
use crate::core::command::{Command, HandCardRef};
use crate::core::diagnostics::StatLedger;
use crate::core::error::Rejection;
use crate::core::ids::{ActorId, DeckCardId};
use crate::core::side::Side;
use crate::core::state::GameState;
use crate::effects::{DamagePacket, EffectSource, Scene};
use crate::rules::{can_play_on, RuleEffect};

/// Where a played card comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CardSource {
    Tableau(usize),
    Stock,
    Hand(HandCardRef),
}

impl CardSource {
    fn into_command(self, side: Side, foundation: usize) -> Command {
        match self {
            CardSource::Tableau(tableau) => Command::PlayFromTableau {
                side,
                tableau,
                foundation,
            },
            CardSource::Stock => Command::PlayFromStock { side, foundation },
            CardSource::Hand(card) => Command::PlayFromHand { side, card, foundation },
        }
    }
}

/// A validated play, ready to apply.
#[derive(Clone, Debug)]
struct StagedPlay {
    card: Card,
    /// Actor owning the target foundation.
    actor: Option<ActorId>,
    /// Deck slot and power cost, for deck-card plays.
    deck: Option<(ActorId, DeckCardId, u32)>,
}

impl Engine<'_> {
    /// Check a play without touching anything.
    fn stage_play(
        &self,
        state: &GameState,
        side: Side,
        source: CardSource,
        foundation_index: usize,
        now_ms: u64,
    ) -> Result<StagedPlay, Rejection> {
        let board = state.phase.board().ok_or(Rejection::NoBoard(state.phase.name()))?;
        if let Some(combat) = state.phase.combat() {
            if combat.turn.active != side {
                return Err(Rejection::WrongSide {
                    active: combat.turn.active,
                    attempted: side,
                });
            }
        }

        let lane = board.lane(side);
        let foundation = lane.foundation(side, foundation_index)?;
        if let Some(actor) = foundation.actor {
            if state.actor(actor).map_or(true, Actor::is_knocked_out) {
                return Err(Rejection::ActorKnockedOut { actor });
            }
        }

        let (card, deck) = match source {
            CardSource::Tableau(index) => (lane.tableau_top(side, index)?.clone(), None),
            CardSource::Stock => (lane.stock.top().ok_or(Rejection::EmptyPile("stock"))?.clone(), None),
            CardSource::Hand(HandCardRef::Transient(id)) => {
                let held = lane
                    .hand
                    .iter()
                    .find(|t| t.id == id)
                    .ok_or(Rejection::TransientNotInHand(id))?;
                (held.card.clone(), None)
            }
            CardSource::Hand(HandCardRef::Deck { actor, card }) => {
                let offered = self.offer(state, side, actor, card, now_ms)?;
                // Deck cards only land on their owner's foundation.
                if foundation.actor != Some(actor) {
                    return Err(Rejection::IllegalPlay);
                }
                (offered.card, Some((actor, card, offered.cost)))
            }
        };

        let rules: Vec<RuleEffect> = lane.rules.iter().copied().collect();
        if !can_play_on(&card, foundation, &rules, self.config.legality_mode) {
            return Err(Rejection::IllegalPlay);
        }

        Ok(StagedPlay {
            card,
            actor: foundation.actor,
            deck,
        })
    }

    pub(super) fn play(
        &self,
        next: &mut GameState,
        side: Side,
        source: CardSource,
        foundation: usize,
        now_ms: u64,
        ledger: &mut StatLedger,
    ) -> Result<Outcome, Rejection> {
        let staged = self.stage_play(next, side, source, foundation, now_ms)?;

        next.snapshot = Some(Box::new(next.capture()));
        for (_, cooldown) in next.core.rewind_cooldowns.iter_mut() {
            *cooldown = (*cooldown - 1).max(0);
        }

        {
            let GameState { core, phase, .. } = &mut *next;
            let phase_name = phase.name();
            let (board, mut combat) = phase.parts_mut();
            let board = board.ok_or(Rejection::NoBoard(phase_name))?;

            match source {
                CardSource::Tableau(index) => {
                    board.take_from_tableau(side, index, &mut core.rng)?;
                }
                CardSource::Stock => {
                    board.take_from_stock(side)?;
                }
                CardSource::Hand(HandCardRef::Transient(id)) => {
                    board.take_transient(side, id)?;
                }
                CardSource::Hand(HandCardRef::Deck { .. }) => {
                    if let Some((actor, _, cost)) = staged.deck {
                        if let Some(actor) = core.actors.get_mut(&actor) {
                            actor.spend_power(cost);
                        }
                    }
                }
            }

            if let Some(target) = board.lane_mut(side).foundations.get_mut(foundation) {
                target.pile.push(staged.card.clone());
            }

            if let Some(combat) = combat.as_deref_mut() {
                combat.turn.activate(now_ms);
                combat.turn.plays_this_round += 1;
                let combo = combat.combos.record_play(side, foundation, staged.actor);
                core.flow.longest_combo = core.flow.longest_combo.max(combat.combos.longest());
                if let Some((actor, card, _)) = staged.deck {
                    if let Some(actor) = core.actors.get_mut(&actor) {
                        actor.deck.mark_discarded(card, now_ms, combo);
                    }
                }
            }

            if let Some(actor) = staged.actor {
                let mut scene = Scene {
                    core: &mut *core,
                    board: &mut *board,
                    combat: combat.as_deref_mut(),
                    ledger: &mut *ledger,
                    catalog: self.catalog,
                    config: self.config,
                    now_ms,
                };
                self.resolve_card(&mut scene, &staged.card, side, actor, foundation);
            }

            if let Some(element) = staged.card.reward_element {
                core.grant_reward(Reward {
                    element,
                    amount: 1,
                    source: RewardSource::Card,
                });
            }

            if let Some(combat) = combat {
                combat.turn.add_time(relic::move_timer_bonus(&core.relics, self.catalog));
                combat.last_play_ms = Some(now_ms);
            }
            core.flow.moves += 1;
        }

        tracing::debug!(%side, ?source, foundation, card = %staged.card, "card played");

        self.return_deck_cards(next, now_ms);
        self.check_rest_wildcards(next, now_ms);
        self.check_biome_clear(next);
        Ok(Outcome::Changed)
    }

    /// Ability cards resolve their orim. Plain cards hit the facing enemy
    /// in combat.
    fn resolve_card(&self, scene: &mut Scene<'_>, card: &Card, side: Side, actor: ActorId, foundation: usize) {
        let mut source = EffectSource {
            side,
            actor,
            foundation,
            deck_card: card.deck_card,
            self_target_only: card.self_target_only,
        };

        match card.ability {
            Some(orim) => match self.catalog.orim(orim) {
                Some(def) => {
                    source.self_target_only |= def.self_target_only;
                    let report = scene.resolve(&source, &def.effects);
                    tracing::debug!(%orim, ?report, "ability resolved");
                }
                None => tracing::debug!(%orim, "played card names an unknown orim"),
            },
            None if scene.combat.is_some() => {
                let element = (!card.element.is_neutral()).then_some(card.element);
                let packet = DamagePacket::single(self.config.base_card_damage, element);
                if scene.strike_facing(&source, &packet).is_none() {
                    tracing::debug!(%side, foundation, "no enemy standing to strike");
                }
            }
            None => {}
        }
    }

    /// Every play `side` can make right now.
    ///
    /// Empty when the session has no board, or when another side holds the
    /// turn in combat.
    #[must_use]
    pub fn legal_plays(&self, state: &GameState, side: Side, now_ms: u64) -> Vec<Command> {
        let mut plays = Vec::new();
        let Some(board) = state.phase.board() else {
            return plays;
        };
        if state.active_side().is_some_and(|active| active != side) {
            return plays;
        }

        let lane = board.lane(side);
        let mut sources: Vec<CardSource> = (0..lane.tableaus.len()).map(CardSource::Tableau).collect();
        sources.push(CardSource::Stock);
        sources.extend(
            self.hand(state, side, now_ms)
                .into_iter()
                .map(|held| CardSource::Hand(held.source)),
        );

        for source in sources {
            for foundation in 0..lane.foundations.len() {
                if self.stage_play(state, side, source, foundation, now_ms).is_ok() {
                    plays.push(source.into_command(side, foundation));
                }
            }
        }
        plays
    }

    /// Is there any legal play for `side`?
    #[must_use]
    pub fn has_legal_move(&self, state: &GameState, side: Side, now_ms: u64) -> bool {
        !self.legal_plays(state, side, now_ms).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{
        ActorDefinition, ActorStats, BiomeDefinition, Catalog, Cooldown, Element, OrimDefinition, Rank,
    };
    use crate::core::config::EngineConfig;
    use crate::core::ids::{ActorDefId, BiomeId, OrimId};
    use crate::core::state::Phase;
    use crate::effects::Effect;
    use crate::zones::DealSpec;

    fn card(rank: u8) -> Card {
        Card::new(Rank::new(rank).unwrap(), Element::Neutral)
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let layer = catalog.fallback_mut();
        layer.register_orim(
            OrimDefinition::new(OrimId(1), "Mend")
                .with_effect(Effect::heal(4))
                .with_cost(1)
                .with_cooldown(Cooldown::Combo(2)),
        );
        layer.register_actor(
            ActorDefinition::new(ActorDefId(1), "Hero", Rank::new(5).unwrap())
                .with_stats(ActorStats {
                    hp_max: 10,
                    power_max: 2,
                    accuracy: 1_000,
                    ..ActorStats::default()
                })
                .with_ability(OrimId(1)),
        );
        layer.register_actor(ActorDefinition::new(ActorDefId(2), "Slime", Rank::KING).with_stats(ActorStats {
            hp_max: 3,
            ..ActorStats::default()
        }));
        layer.register_biome(
            BiomeDefinition::new(BiomeId(1), "Bog")
                .combat(1)
                .with_enemy(ActorDefId(2), 1.0)
                .with_layout(vec![vec![card(9), card(6)], vec![card(2)]]),
        );
        catalog
    }

    fn combat_state(engine: &Engine<'_>) -> GameState {
        let state = engine.new_session(&[ActorDefId(1)], 11);
        engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap()
    }

    #[test]
    fn test_tableau_play_moves_card_and_strikes() {
        let catalog = catalog();
        let config = EngineConfig::default().with_infinite_combat(false).with_hit_chance(100, 100);
        let engine = Engine::new(&catalog, &config);
        let state = combat_state(&engine);
        let enemy = state.side_actors(Side::Enemy)[0];

        let play = Command::PlayFromTableau {
            side: Side::Player,
            tableau: 0,
            foundation: 0,
        };
        let next = engine.apply(&state, play, 100).unwrap();

        let lane = next.phase.board().unwrap().lane(Side::Player);
        assert_eq!(lane.foundations[0].top().unwrap().rank, Rank::new(6).unwrap());
        assert_eq!(lane.tableaus[0].len(), 1);
        assert!(next.actor(enemy).unwrap().hp < 3);
        assert!(next.snapshot.is_some());
        assert_eq!(next.core.flow.moves, 1);

        let combat = next.phase.combat().unwrap();
        assert!(combat.turn.timer_active);
        assert_eq!(combat.combos.foundation_combo(Side::Player, 0), 1);
        assert_eq!(next.core.history.len(), 2);
    }

    #[test]
    fn test_rejected_play_leaves_state_alone() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = combat_state(&engine);

        let play = Command::PlayFromTableau {
            side: Side::Player,
            tableau: 1,
            foundation: 0,
        };
        assert_eq!(engine.apply(&state, play, 10), Err(Rejection::IllegalPlay));

        let wrong = Command::PlayFromTableau {
            side: Side::Enemy,
            tableau: 0,
            foundation: 0,
        };
        assert!(matches!(
            engine.apply(&state, wrong, 10),
            Err(Rejection::WrongSide { .. })
        ));
    }

    #[test]
    fn test_deck_card_spends_power_and_discards() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let mut state = combat_state(&engine);
        let hero = state.core.party[0];
        if let Some(actor) = state.core.actors.get_mut(&hero) {
            actor.hp = 5;
        }
        let deck_card = state.actor(hero).unwrap().deck.iter().next().unwrap().id;

        let play = Command::PlayFromHand {
            side: Side::Player,
            card: HandCardRef::Deck { actor: hero, card: deck_card },
            foundation: 0,
        };
        let next = engine.apply(&state, play, 50).unwrap();

        let actor = next.actor(hero).unwrap();
        assert_eq!(actor.hp, 9);
        assert_eq!(actor.power, 1);
        assert!(actor.deck.get(deck_card).unwrap().is_discarded());
        assert_eq!(
            engine.apply(&next, play, 60),
            Err(Rejection::DeckCardNotInHand(deck_card))
        );
    }

    #[test]
    fn test_legal_plays_match_apply() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = combat_state(&engine);

        let plays = engine.legal_plays(&state, Side::Player, 0);
        assert!(!plays.is_empty());
        for play in &plays {
            assert!(engine.apply(&state, *play, 0).is_ok(), "{play:?} should apply");
        }
        assert!(engine.legal_plays(&state, Side::Enemy, 0).is_empty());
    }

    #[test]
    fn test_plain_session_play() {
        let catalog = catalog();
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 2);
        let deal = DealSpec::default().with_layout(vec![vec![card(4).with_reward(Element::Water)]]);
        let state = engine.start_playing(&state, deal).unwrap();

        let play = Command::PlayFromTableau {
            side: Side::Player,
            tableau: 0,
            foundation: 0,
        };
        let next = engine.apply(&state, play, 0).unwrap();
        assert!(matches!(next.phase, Phase::Playing(_)));
        assert_eq!(next.core.rewards.len(), 1);
        assert_eq!(next.core.rewards[0].element, Element::Water);
    }
}
