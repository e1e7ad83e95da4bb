//! Session lifecycle: party creation, plain play, biomes and rests.

use im::Vector;

use super::{Engine, Outcome};
use crate::cards::Reward;
use crate::combat::CombatState;
use crate::core::actor::Actor;
use crate::core::error::Rejection;
use crate::core::ids::{ActorDefId, ActorId, BiomeId};
use crate::core::state::{CoreState, GameState, Phase};
use crate::zones::{Board, DealSpec, Foundation};

fn party_foundations(core: &CoreState) -> Vector<Foundation> {
    core.party_actors()
        .map(|actor| Foundation::seeded(Some(actor.id), actor.seed_card()))
        .collect()
}

impl Engine<'_> {
    /// A garden session with one party member per known definition.
    #[must_use]
    pub fn new_session(&self, party: &[ActorDefId], seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        for &def_id in party {
            let Some(def) = self.catalog.actor(def_id) else {
                tracing::debug!(actor = %def_id, "unknown party member skipped");
                continue;
            };
            let actor = Actor::spawn(def, self.catalog, &mut state.core.ids);
            state.core.party.push_back(actor.id);
            state.core.actors.insert(actor.id, actor);
        }
        tracing::debug!(seed, party = state.core.party.len(), "session created");
        state
    }

    /// Leave the garden for a plain solitaire board with no biome.
    pub fn start_playing(&self, state: &GameState, deal: DealSpec) -> Result<GameState, Rejection> {
        if state.phase != Phase::Garden {
            return Err(Rejection::NotInGarden(state.phase.name()));
        }
        let mut next = state.clone();
        let foundations = party_foundations(&next.core);
        let board = Board::new(deal, foundations, &[], &mut next.core.rng);
        next.phase = Phase::Playing(board);
        next.snapshot = None;
        Ok(next)
    }

    /// Hand every queued reward to the caller.
    #[must_use]
    pub fn drain_rewards(&self, state: &GameState) -> (GameState, Vec<Reward>) {
        let mut next = state.clone();
        let rewards: Vec<Reward> = std::mem::take(&mut next.core.rewards).into_iter().collect();
        (next, rewards)
    }

    pub(super) fn rest(&self, next: &mut GameState) -> Result<Outcome, Rejection> {
        if next.phase != Phase::Garden {
            return Err(Rejection::NotInGarden(next.phase.name()));
        }
        let party: Vec<ActorId> = next.core.party.iter().copied().collect();
        for id in party {
            if let Some(actor) = next.core.actors.get_mut(&id) {
                actor.rest();
            }
        }
        next.core.rest_count += 1;
        next.snapshot = None;
        tracing::debug!(rest_count = next.core.rest_count, "party rested");
        Ok(Outcome::Changed)
    }

    pub(super) fn enter_biome(&self, next: &mut GameState, biome: BiomeId, now_ms: u64) -> Result<Outcome, Rejection> {
        match &next.phase {
            Phase::Garden => {}
            Phase::StaticBiome { .. } | Phase::CombatBiome { .. } => return Err(Rejection::AlreadyInBiome),
            Phase::Playing(_) => return Err(Rejection::NotInGarden(next.phase.name())),
        }
        let def = self.catalog.biome(biome).ok_or(Rejection::UnknownBiome(biome))?;

        let core = &mut next.core;
        let foundations = party_foundations(core);
        let party_size = foundations.len();
        let mut board = Board::new(DealSpec::from_biome(def), foundations, &def.backfill, &mut core.rng);

        if !def.is_combat() {
            next.phase = Phase::StaticBiome { biome, board };
            next.snapshot = None;
            tracing::debug!(%biome, "entered static biome");
            return Ok(Outcome::Changed);
        }

        let weights: Vec<f32> = def.enemies.iter().map(|e| e.weight).collect();
        let mut enemies = Vector::new();
        for _ in 0..def.enemy_count {
            let Some(spawn) = core.rng.choose_weighted(&weights).and_then(|i| def.enemies.get(i)) else {
                tracing::debug!(%biome, "biome has no spawnable enemies");
                break;
            };
            let Some(enemy_def) = self.catalog.actor(spawn.actor) else {
                tracing::debug!(%biome, actor = %spawn.actor, "unknown enemy skipped");
                continue;
            };
            let mut enemy = Actor::spawn(enemy_def, self.catalog, &mut core.ids);
            enemy.hp_max += def.difficulty;
            enemy.hp = enemy.hp_max;
            enemies.push_back(enemy.id);
            core.actors.insert(enemy.id, enemy);
        }

        if !enemies.is_empty() {
            let enemy_foundations: Vector<Foundation> = enemies
                .iter()
                .filter_map(|id| core.actors.get(id))
                .map(|enemy| Foundation::seeded(Some(enemy.id), enemy.seed_card()))
                .collect();
            board.deal_enemy_lane(enemy_foundations, &def.backfill, &mut core.rng);
        }

        let mut combat = CombatState::new(enemies, party_size, self.config);
        combat.last_play_ms = Some(now_ms);
        tracing::debug!(%biome, enemies = combat.enemies.len(), "entered combat biome");

        next.phase = Phase::CombatBiome { biome, board, combat };
        next.snapshot = None;
        Ok(Outcome::Changed)
    }

    pub(super) fn exit_biome(&self, next: &mut GameState) -> Result<Outcome, Rejection> {
        if next.phase.board().is_none() {
            return Err(Rejection::NoBoard(next.phase.name()));
        }
        if let Some(combat) = next.phase.combat() {
            for id in combat.enemies.iter() {
                next.core.actors.remove(id);
                next.core.rewind_cooldowns.remove(id);
            }
        }
        next.phase = Phase::Garden;
        next.snapshot = None;
        tracing::debug!("returned to garden");
        Ok(Outcome::Changed)
    }
}
