//! Turn flow: starting, advancing and ending turns, and the round boundary.

use super::{Engine, Outcome};
use crate::cards::Timing;
use crate::combat::relic;
use crate::core::diagnostics::{Stat, StatLedger};
use crate::core::error::Rejection;
use crate::core::ids::ActorId;
use crate::core::side::Side;
use crate::core::state::GameState;
use crate::effects::{EffectSource, Scene};

impl Engine<'_> {
    pub(super) fn start_turn(&self, next: &mut GameState, now_ms: u64) -> Result<Outcome, Rejection> {
        let combat = next.phase.combat_mut().ok_or(Rejection::NotInCombat)?;
        if combat.turn.timer_active {
            return Ok(Outcome::Unchanged);
        }
        combat.turn.activate(now_ms);
        Ok(Outcome::Changed)
    }

    pub(super) fn advance_turn(
        &self,
        next: &mut GameState,
        now_ms: u64,
        ledger: &mut StatLedger,
    ) -> Result<Outcome, Rejection> {
        if next.phase.combat().is_none() {
            return Err(Rejection::NotInCombat);
        }
        self.advance(next, now_ms, ledger);
        Ok(Outcome::Changed)
    }

    /// End the round early. A round nobody has touched is left alone.
    pub(super) fn end_turn(
        &self,
        next: &mut GameState,
        now_ms: u64,
        ledger: &mut StatLedger,
    ) -> Result<Outcome, Rejection> {
        let combat = next.phase.combat().ok_or(Rejection::NotInCombat)?;
        if combat.turn.is_fresh() && combat.combos.is_fresh() {
            return Ok(Outcome::Unchanged);
        }

        if combat.turn.active == Side::Player {
            let leftover = combat.turn.remaining_ms;
            let armor = relic::bank_time_as_armor(&mut next.core.relics, self.catalog, leftover);
            if armor > 0 {
                let party: Vec<ActorId> = next.core.party.iter().copied().collect();
                for id in party {
                    if let Some(actor) = next.core.actors.get_mut(&id).filter(|a| a.is_alive()) {
                        actor.armor += armor;
                        ledger.grant(id, Stat::Armor, armor);
                    }
                }
                tracing::debug!(leftover, armor, "banked turn time as armor");
            }
            next.core.flow.turns_ended_early += 1;
        }

        self.end_round(next, now_ms, ledger);
        Ok(Outcome::Changed)
    }

    /// Hand the turn to the enemy side, or close the round when the enemy
    /// side already had it or does not exist.
    pub(super) fn advance(&self, state: &mut GameState, now_ms: u64, ledger: &mut StatLedger) {
        let Some(combat) = state.phase.combat_mut() else {
            return;
        };
        if combat.turn.active == Side::Player && combat.has_enemies() {
            combat.turn.switch_to(Side::Enemy, self.config, now_ms);
            tracing::debug!(turn = combat.turn.turn_number, "enemy turn");
        } else {
            self.end_round(state, now_ms, ledger);
        }
    }

    /// The countdown ran out for the active side.
    pub(super) fn timeout(&self, state: &mut GameState, now_ms: u64, ledger: &mut StatLedger) {
        if let Some(combat) = state.phase.combat_mut() {
            combat.turn.timeouts += 1;
            tracing::debug!(side = %combat.turn.active, "turn timed out");
        }
        state.core.flow.timeouts += 1;
        self.advance(state, now_ms, ledger);
    }

    /// Close the round: reset combos and rule effects, re-deal in infinite
    /// mode, refill power, then resolve round-end orims.
    pub(super) fn end_round(&self, state: &mut GameState, now_ms: u64, ledger: &mut StatLedger) {
        let GameState { core, phase, .. } = state;
        let (Some(board), Some(combat)) = phase.parts_mut() else {
            return;
        };

        for (actor, combo) in combat.combos.reset() {
            if let Some(actor) = core.actors.get_mut(&actor) {
                actor.deck.rebase_combo(combo);
            }
        }
        for side in Side::ALL {
            board.lane_mut(side).rules.clear();
        }

        if self.config.infinite_combat {
            for side in Side::ALL {
                if board.lane(side).foundations.is_empty() {
                    continue;
                }
                board.reset_foundations(side);
                board.redeal_tableaus(side, &mut core.rng);
            }
        }

        let rosters = [
            (Side::Player, core.party.clone()),
            (Side::Enemy, combat.enemies.clone()),
        ];
        for (_, ids) in &rosters {
            for id in ids {
                if let Some(actor) = core.actors.get_mut(id) {
                    actor.refill_power();
                }
            }
        }
        combat.turn.next_round(self.config);
        tracing::debug!(turn = combat.turn.turn_number, "round ended");

        let mut scene = Scene {
            core,
            board,
            combat: Some(combat),
            ledger,
            catalog: self.catalog,
            config: self.config,
            now_ms,
        };
        for (side, ids) in rosters {
            for (foundation, id) in ids.iter().copied().enumerate() {
                let orims: Vec<_> = match scene.core.actors.get(&id) {
                    Some(actor) if actor.is_alive() => actor.slots.iter().map(|s| s.definition).collect(),
                    _ => continue,
                };
                for orim in orims {
                    let Some(def) = self.catalog.orim(orim) else {
                        tracing::debug!(%orim, "unknown slotted orim skipped");
                        continue;
                    };
                    if def.timing != Timing::OnRoundEnd {
                        continue;
                    }
                    let source = EffectSource {
                        side,
                        actor: id,
                        foundation,
                        deck_card: None,
                        self_target_only: def.self_target_only,
                    };
                    scene.resolve(&source, &def.effects);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{
        ActorDefinition, ActorStats, BiomeDefinition, Card, Catalog, Element, OrimDefinition, Rank, RelicBehavior,
        RelicDefinition,
    };
    use crate::combat::RelicInstance;
    use crate::core::command::Command;
    use crate::core::config::EngineConfig;
    use crate::core::ids::{ActorDefId, BiomeId, OrimId, RelicId};
    use crate::effects::Effect;

    fn card(rank: u8) -> Card {
        Card::new(Rank::new(rank).unwrap(), Element::Neutral)
    }

    fn catalog(enemies: usize) -> Catalog {
        let mut catalog = Catalog::new();
        let layer = catalog.fallback_mut();
        layer.register_orim(
            OrimDefinition::new(OrimId(1), "Regrowth")
                .with_effect(Effect::heal(1))
                .with_timing(Timing::OnRoundEnd),
        );
        layer.register_actor(
            ActorDefinition::new(ActorDefId(1), "Druid", Rank::new(5).unwrap())
                .with_stats(ActorStats {
                    hp_max: 10,
                    power_max: 2,
                    ..ActorStats::default()
                })
                .with_slotted(OrimId(1)),
        );
        layer.register_actor(ActorDefinition::new(ActorDefId(2), "Rat", Rank::KING).with_stats(ActorStats {
            hp_max: 50,
            ..ActorStats::default()
        }));
        layer.register_relic(RelicDefinition::new(
            RelicId(1),
            "Hourglass",
            RelicBehavior::BankedTimeArmor { ms_per_armor: 10_000 },
        ));
        layer.register_biome(
            BiomeDefinition::new(BiomeId(1), "Den")
                .combat(enemies)
                .with_enemy(ActorDefId(2), 1.0)
                .with_layout(vec![vec![card(2), card(6)], vec![card(3), card(7)]]),
        );
        catalog
    }

    const PLAY: Command = Command::PlayFromTableau {
        side: Side::Player,
        tableau: 0,
        foundation: 0,
    };

    #[test]
    fn test_end_turn_is_idempotent() {
        let catalog = catalog(1);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 4);
        let state = engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap();
        let played = engine.apply(&state, PLAY, 10).unwrap();
        let hero = played.core.party[0];
        assert_eq!(played.phase.combat().unwrap().combos.actor_combo(hero), 1);

        let ended = engine.apply(&played, Command::EndTurn, 20).unwrap();
        let combat = ended.phase.combat().unwrap();
        assert!(combat.combos.is_fresh());
        assert_eq!(combat.turn.turn_number, 2);
        assert_eq!(ended.core.flow.turns_ended_early, 1);

        let again = engine.apply(&ended, Command::EndTurn, 30).unwrap();
        assert_eq!(again, ended);
    }

    #[test]
    fn test_round_end_refills_and_redeals() {
        let catalog = catalog(1);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 4);
        let mut state = engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap();
        let hero = state.core.party[0];
        if let Some(actor) = state.core.actors.get_mut(&hero) {
            actor.power = 0;
            actor.hp = 5;
        }

        let played = engine.apply(&state, PLAY, 10).unwrap();
        let ended = engine.apply(&played, Command::EndTurn, 20).unwrap();

        let actor = ended.actor(hero).unwrap();
        assert_eq!(actor.power, 2);
        assert_eq!(actor.hp, 6);

        let lane = ended.phase.board().unwrap().lane(Side::Player);
        assert_eq!(lane.foundations[0].pile.len(), 1);
        assert_eq!(lane.tableaus[0].top(), Some(&card(6)));
    }

    #[test]
    fn test_advance_hands_turn_to_enemy_then_ends_round() {
        let catalog = catalog(1);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 4);
        let state = engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap();

        let enemy_turn = engine.apply(&state, Command::AdvanceTurn, 5).unwrap();
        let turn = &enemy_turn.phase.combat().unwrap().turn;
        assert_eq!(turn.active, Side::Enemy);
        assert_eq!(turn.remaining_ms, config.enemy_turn_ms);

        let next_round = engine.apply(&enemy_turn, Command::AdvanceTurn, 6).unwrap();
        let turn = &next_round.phase.combat().unwrap().turn;
        assert_eq!(turn.active, Side::Player);
        assert_eq!(turn.turn_number, 2);
    }

    #[test]
    fn test_empty_enemy_side_skips_enemy_turn() {
        let catalog = catalog(0);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 4);
        let state = engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap();

        let next = engine.apply(&state, Command::AdvanceTurn, 5).unwrap();
        let turn = &next.phase.combat().unwrap().turn;
        assert_eq!(turn.active, Side::Player);
        assert_eq!(turn.turn_number, 2);
    }

    #[test]
    fn test_banked_time_becomes_armor() {
        let catalog = catalog(1);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine
            .new_session(&[ActorDefId(1)], 4)
            .with_relic(RelicInstance::new(RelicId(1)));
        let state = engine.apply(&state, Command::EnterBiome(BiomeId(1)), 0).unwrap();
        let hero = state.core.party[0];

        let played = engine.apply(&state, PLAY, 0).unwrap();
        let ended = engine.apply(&played, Command::EndTurn, 0).unwrap();

        assert_eq!(ended.actor(hero).unwrap().armor, 3);
        assert_eq!(ended.core.relics[0].runtime.banked_ms, 30_000);
    }

    #[test]
    fn test_turn_commands_need_combat() {
        let catalog = catalog(1);
        let config = EngineConfig::default();
        let engine = Engine::new(&catalog, &config);
        let state = engine.new_session(&[ActorDefId(1)], 4);

        for command in [Command::StartTurn, Command::AdvanceTurn, Command::EndTurn] {
            assert_eq!(engine.apply(&state, command, 0), Err(Rejection::NotInCombat));
        }
    }
}
