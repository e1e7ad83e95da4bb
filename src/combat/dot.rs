//! Damage over time.
//!
//! Each [`DotEntry`] ticks on its own schedule. A tick rolls to hit with no
//! graze band, lands through defense and armor (never super-armor), and
//! advances the schedule by one interval. A host that ticks late catches up
//! every missed tick, bounded by the entry's remaining count.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::actor::Actor;
use crate::core::config::EngineConfig;
use crate::core::ids::{ActorId, DotId};
use crate::core::rng::GameRng;
use crate::effects::damage::{apply_tick_damage, roll_hit_no_graze, DamageOutcome};
use crate::effects::DotKind;

/// A scheduled damage-over-time effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotEntry {
    pub id: DotId,
    pub target: ActorId,
    pub damage_per_tick: u32,
    pub remaining_ticks: u32,
    pub initial_ticks: u32,
    pub next_tick_at: u64,
    pub interval_ms: u64,
    pub kind: DotKind,
    /// Accuracy of the actor that applied it, used for every tick's roll.
    pub source_accuracy: u32,
}

impl DotEntry {
    /// Has every tick fired?
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_ticks == 0
    }
}

/// One resolved tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotTick {
    pub dot: DotId,
    pub target: ActorId,
    pub hit: bool,
    pub outcome: DamageOutcome,
}

/// Fire every due tick at `now_ms`, then prune exhausted entries and
/// entries whose target is gone or knocked out.
pub fn tick_dots(
    dots: &mut Vector<DotEntry>,
    actors: &mut ImHashMap<ActorId, Actor>,
    now_ms: u64,
    config: &EngineConfig,
    rng: &mut GameRng,
) -> Vec<DotTick> {
    let mut fired = Vec::new();

    for entry in dots.iter_mut() {
        while entry.remaining_ticks > 0 && now_ms >= entry.next_tick_at {
            let Some(target) = actors.get_mut(&entry.target) else {
                entry.remaining_ticks = 0;
                break;
            };
            if target.is_knocked_out() {
                entry.remaining_ticks = 0;
                break;
            }

            let hit = roll_hit_no_graze(entry.source_accuracy, target.evasion, config, rng);
            let outcome = if hit {
                apply_tick_damage(target, entry.damage_per_tick)
            } else {
                DamageOutcome::default()
            };

            entry.remaining_ticks -= 1;
            entry.next_tick_at += entry.interval_ms.max(1);
            fired.push(DotTick {
                dot: entry.id,
                target: entry.target,
                hit,
                outcome,
            });
        }
    }

    dots.retain(|entry| !entry.is_exhausted());

    if !fired.is_empty() {
        tracing::debug!(ticks = fired.len(), remaining = dots.len(), "dots ticked");
    }
    fired
}
