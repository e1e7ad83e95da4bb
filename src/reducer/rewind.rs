//! Single-depth rewind.
//!
//! Every play stores the state it started from. Rewinding restores that
//! state and drops the snapshot, so two rewinds in a row never reach
//! further back than one play.

use super::{Engine, Outcome};
use crate::combat::relic;
use crate::core::error::Rejection;
use crate::core::ids::ActorId;
use crate::core::state::GameState;

/// What pays for a rewind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RewindGate {
    /// A party member's rewind ability, which then cools down.
    Ability(ActorId),
    /// A once-per-rest relic, by index.
    Relic(usize),
}

impl Engine<'_> {
    pub(super) fn rewind(&self, next: &mut GameState) -> Result<Outcome, Rejection> {
        if next.snapshot.is_none() {
            return Err(Rejection::NothingToRewind);
        }
        let gate = self.rewind_gate(next).ok_or(Rejection::RewindUnavailable)?;
        let snapshot = next.snapshot.take().ok_or(Rejection::NothingToRewind)?;
        next.restore(*snapshot);

        match gate {
            RewindGate::Ability(actor) => {
                next.core.rewind_cooldowns.insert(actor, self.config.rewind_cooldown);
                tracing::debug!(%actor, cooldown = self.config.rewind_cooldown, "rewound with ability");
            }
            RewindGate::Relic(index) => {
                let rest_count = next.core.rest_count;
                relic::mark_used(&mut next.core.relics, index, rest_count);
                tracing::debug!(index, rest_count, "rewound with relic");
            }
        }
        Ok(Outcome::Changed)
    }

    fn rewind_gate(&self, state: &GameState) -> Option<RewindGate> {
        let ability = state.core.party_actors().find(|actor| {
            actor.has_rewind && state.core.rewind_cooldowns.get(&actor.id).copied().unwrap_or(0) <= 0
        });
        ability
            .map(|actor| RewindGate::Ability(actor.id))
            .or_else(|| {
                relic::rewind_relic_ready(&state.core.relics, self.catalog, state.core.rest_count).map(RewindGate::Relic)
            })
    }

    /// Would a rewind succeed right now?
    #[must_use]
    pub fn can_rewind(&self, state: &GameState) -> bool {
        state.snapshot.is_some() && self.rewind_gate(state).is_some()
    }
}
