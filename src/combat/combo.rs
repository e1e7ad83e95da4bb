//! Combo counters.
//!
//! Every successful play in the combat lane increments two counters: one
//! for the foundation it landed on and one for the foundation's actor.
//! Party combo is the sum over a side's actors. Counters only go up until
//! the round ends, when [`ComboTracker::reset`] zeroes all of them.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::ids::ActorId;
use crate::core::side::{Side, SideMap};

/// Per-foundation and per-actor combo counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTracker {
    foundation: SideMap<Vector<u32>>,
    actor: ImHashMap<ActorId, u32>,
    /// Highest single-actor combo seen this session.
    longest: u32,
}

impl ComboTracker {
    /// Create a tracker with `player` and `enemy` foundation slots.
    #[must_use]
    pub fn new(player: usize, enemy: usize) -> Self {
        Self {
            foundation: SideMap::new(|side| {
                let n = match side {
                    Side::Player => player,
                    Side::Enemy => enemy,
                };
                std::iter::repeat(0).take(n).collect()
            }),
            actor: ImHashMap::new(),
            longest: 0,
        }
    }

    /// Count a play onto `foundation` by `actor`. Returns the actor's new
    /// combo.
    pub fn record_play(&mut self, side: Side, foundation: usize, actor: Option<ActorId>) -> u32 {
        let slots = &mut self.foundation[side];
        while slots.len() <= foundation {
            slots.push_back(0);
        }
        if let Some(count) = slots.get_mut(foundation) {
            *count += 1;
        }

        let Some(actor) = actor else {
            return 0;
        };
        let combo = self.actor.entry(actor).or_insert(0);
        *combo += 1;
        let combo = *combo;
        self.longest = self.longest.max(combo);
        combo
    }

    /// Combo of one foundation.
    #[must_use]
    pub fn foundation_combo(&self, side: Side, foundation: usize) -> u32 {
        self.foundation[side].get(foundation).copied().unwrap_or(0)
    }

    /// Combo of one actor.
    #[must_use]
    pub fn actor_combo(&self, actor: ActorId) -> u32 {
        self.actor.get(&actor).copied().unwrap_or(0)
    }

    /// Sum of the combos of `actors`.
    #[must_use]
    pub fn party_combo(&self, actors: impl IntoIterator<Item = ActorId>) -> u32 {
        actors.into_iter().map(|id| self.actor_combo(id)).sum()
    }

    /// Highest actor combo reached.
    #[must_use]
    pub fn longest(&self) -> u32 {
        self.longest
    }

    /// Has anything been counted since the last reset?
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.actor.values().all(|&c| c == 0)
            && self.foundation.iter().all(|(_, slots)| slots.iter().all(|&c| c == 0))
    }

    /// Zero every counter. Returns the actor combos that were cleared so
    /// callers can rebase anything measured against them.
    pub fn reset(&mut self) -> Vec<(ActorId, u32)> {
        for (_, slots) in self.foundation.iter_mut() {
            for count in slots.iter_mut() {
                *count = 0;
            }
        }
        let mut cleared: Vec<(ActorId, u32)> = self
            .actor
            .iter()
            .filter(|&(_, &c)| c > 0)
            .map(|(&id, &c)| (id, c))
            .collect();
        cleared.sort_unstable();
        self.actor = ImHashMap::new();
        cleared
    }
}
