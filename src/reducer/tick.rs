//! Time-driven state and the housekeeping that follows every step.

use super::{Engine, Outcome};
use crate::cards::{Card, Reward, RewardSource};
use crate::combat::{relic, tick_dots};
use crate::core::actor::Actor;
use crate::core::diagnostics::{Diagnostic, StatLedger};
use crate::core::ids::ActorId;
use crate::core::side::Side;
use crate::core::state::{GameState, Phase};
use crate::zones::TransientCard;

impl Engine<'_> {
    /// Advance debuffs, damage over time and the countdown to `now_ms`.
    pub(super) fn tick(&self, next: &mut GameState, now_ms: u64, ledger: &mut StatLedger) -> Outcome {
        if let Some(last_ms) = next.core.clock_ms.filter(|&last| now_ms < last) {
            self.diagnostics.report(Diagnostic::TimeWentBackwards { last_ms, now_ms });
            return Outcome::Unchanged;
        }

        let mut timed_out = false;
        {
            let GameState { core, phase, .. } = &mut *next;
            if let Some(combat) = phase.combat_mut() {
                combat.expire_debuffs(now_ms);
                tick_dots(
                    &mut combat.dots,
                    &mut core.actors,
                    now_ms,
                    self.config,
                    &mut core.combat_rng,
                );
                let frozen = relic::timer_frozen(&core.relics, self.catalog, combat.has_enemies());
                let drain = combat.drain_pct(combat.turn.active, now_ms);
                timed_out = combat
                    .turn
                    .countdown(now_ms, drain, frozen, self.config.flow_mode);
            }
        }

        if timed_out {
            self.timeout(next, now_ms, ledger);
        }

        self.return_deck_cards(next, now_ms);
        self.check_rest_wildcards(next, now_ms);
        self.check_biome_clear(next);
        Outcome::Changed
    }

    // === Housekeeping ===

    /// Bring back every discarded deck card whose cooldown has run out.
    pub(super) fn return_deck_cards(&self, state: &mut GameState, now_ms: u64) {
        let GameState { core, phase, .. } = state;
        let Some(combat) = phase.combat() else {
            return;
        };

        let ids: Vec<ActorId> = core.party.iter().chain(combat.enemies.iter()).copied().collect();
        for id in ids {
            let combo = combat.combos.actor_combo(id);
            if let Some(actor) = core.actors.get_mut(&id) {
                let returned = actor.deck.return_ready(combo, now_ms);
                if !returned.is_empty() {
                    tracing::debug!(actor = %id, ?returned, "deck cards returned to hand");
                }
            }
        }
    }

    /// Hand out rest wildcards when the player is stuck with no enemies
    /// around.
    pub(super) fn check_rest_wildcards(&self, state: &mut GameState, now_ms: u64) {
        if state.phase.board().is_none() || state.phase.combat().is_some_and(|c| c.has_enemies()) {
            return;
        }
        let Some(index) = relic::rest_wildcards_ready(&state.core.relics, self.catalog, state.core.rest_count) else {
            return;
        };
        if self.has_any_play(state, Side::Player, now_ms) {
            return;
        }

        let GameState { core, phase, .. } = state;
        let Some(board) = phase.board_mut() else {
            return;
        };
        let lane = board.lane_mut(Side::Player);
        for _ in 0..lane.foundations.len() {
            lane.hand.push_back(TransientCard {
                id: core.ids.transient(),
                card: Card::wild(),
            });
        }
        relic::mark_used(&mut core.relics, index, core.rest_count);
        tracing::debug!(count = lane.foundations.len(), rest = core.rest_count, "rest wildcards granted");
    }

    /// Grant clear rewards once the biome is beaten.
    pub(super) fn check_biome_clear(&self, state: &mut GameState) {
        let GameState { core, phase, .. } = state;
        let cleared = match &*phase {
            Phase::StaticBiome { board, .. } => !board.cleared && board.lane(Side::Player).is_emptied(),
            Phase::CombatBiome { board, combat, .. } => {
                !board.cleared
                    && combat.has_enemies()
                    && combat
                        .enemies
                        .iter()
                        .all(|id| core.actors.get(id).map_or(true, Actor::is_knocked_out))
            }
            Phase::Garden | Phase::Playing(_) => false,
        };
        if !cleared {
            return;
        }

        let Some(biome) = phase.biome() else {
            return;
        };
        if let Some(board) = phase.board_mut() {
            board.cleared = true;
        }
        match self.catalog.biome(biome) {
            Some(def) => {
                for reward in &def.rewards {
                    core.grant_reward(Reward {
                        element: reward.element,
                        amount: reward.amount,
                        source: RewardSource::BiomeClear,
                    });
                }
                tracing::debug!(%biome, rewards = def.rewards.len(), "biome cleared");
            }
            None => tracing::debug!(%biome, "cleared biome missing from catalog"),
        }
    }
}
