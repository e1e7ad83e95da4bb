//! Combat bookkeeping: combos, damage over time, turns and relics.
//!
//! ## Key Types
//!
//! - `CombatState`: Everything that exists only while a combat biome is live
//! - `ComboTracker`: Per-foundation and per-actor combo counters
//! - `DotEntry`: Scheduled damage over time
//! - `TurnState`: Active side and countdown
//! - `RelicInstance`: Equipped relic with runtime counters

pub mod combo;
pub mod dot;
pub mod relic;
pub mod turn;

pub use combo::ComboTracker;
pub use dot::{tick_dots, DotEntry, DotTick};
pub use relic::{RelicInstance, RelicRuntimeEntry};
pub use turn::{FlowStats, TurnState};

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::ids::{ActorId, DeckCardId};
use crate::core::side::{Side, SideMap};
use crate::effects::EffectKind;

/// A slow window on one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimedDebuff {
    pub until_ms: u64,
    /// Extra countdown drain in percent.
    pub factor_pct: u32,
}

/// A stat grant that is undone when its deck card is played again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpiringBuff {
    pub source: DeckCardId,
    pub target: ActorId,
    pub kind: EffectKind,
    pub amount: u32,
}

/// State that exists only inside a combat biome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// Enemy actors in foundation order. May be empty.
    pub enemies: Vector<ActorId>,
    pub turn: TurnState,
    pub combos: ComboTracker,
    pub dots: Vector<DotEntry>,
    pub debuffs: SideMap<Option<TimedDebuff>>,
    pub buffs: Vector<ExpiringBuff>,
    /// Time of the last successful play.
    pub last_play_ms: Option<u64>,
}

impl CombatState {
    /// Fresh combat against `enemies`.
    #[must_use]
    pub fn new(enemies: Vector<ActorId>, party_size: usize, config: &EngineConfig) -> Self {
        let enemy_count = enemies.len();
        Self {
            enemies,
            turn: TurnState::new(config),
            combos: ComboTracker::new(party_size, enemy_count),
            dots: Vector::new(),
            debuffs: SideMap::default(),
            buffs: Vector::new(),
            last_play_ms: None,
        }
    }

    /// Does an enemy side exist?
    #[must_use]
    pub fn has_enemies(&self) -> bool {
        !self.enemies.is_empty()
    }

    /// Countdown drain for `side` at `now_ms`, in percent of real time.
    #[must_use]
    pub fn drain_pct(&self, side: Side, now_ms: u64) -> u32 {
        match self.debuffs[side] {
            Some(debuff) if now_ms < debuff.until_ms => 100 + debuff.factor_pct,
            _ => 100,
        }
    }

    /// Drop debuffs that ran out by `now_ms`.
    pub fn expire_debuffs(&mut self, now_ms: u64) {
        for (_, slot) in self.debuffs.iter_mut() {
            if slot.is_some_and(|d| now_ms >= d.until_ms) {
                *slot = None;
            }
        }
    }

    /// Apply a slow to `side`, keeping the stronger and longer of the two.
    pub fn apply_slow(&mut self, side: Side, debuff: TimedDebuff) {
        let slot = &mut self.debuffs[side];
        *slot = Some(match *slot {
            Some(old) => TimedDebuff {
                until_ms: old.until_ms.max(debuff.until_ms),
                factor_pct: old.factor_pct.max(debuff.factor_pct),
            },
            None => debuff,
        });
    }

    /// Inactivity since the last play, or since the turn's countdown
    /// started when nothing was played yet. Zero before either.
    #[must_use]
    pub fn inactivity_ms(&self, now_ms: u64) -> u64 {
        self.last_play_ms
            .or(self.turn.activated_ms)
            .map_or(0, |since| now_ms.saturating_sub(since))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_window() {
        let mut combat = CombatState::new(Vector::unit(ActorId(2)), 1, &EngineConfig::default());
        combat.apply_slow(
            Side::Enemy,
            TimedDebuff {
                until_ms: 5_000,
                factor_pct: 50,
            },
        );

        assert_eq!(combat.drain_pct(Side::Enemy, 4_999), 150);
        assert_eq!(combat.drain_pct(Side::Player, 4_999), 100);
        assert_eq!(combat.drain_pct(Side::Enemy, 5_000), 100);

        combat.expire_debuffs(4_000);
        assert!(combat.debuffs[Side::Enemy].is_some());
        combat.expire_debuffs(5_000);
        assert!(combat.debuffs[Side::Enemy].is_none());
    }

    #[test]
    fn test_slow_merges() {
        let mut combat = CombatState::new(Vector::new(), 1, &EngineConfig::default());
        combat.apply_slow(Side::Enemy, TimedDebuff { until_ms: 9_000, factor_pct: 20 });
        combat.apply_slow(Side::Enemy, TimedDebuff { until_ms: 3_000, factor_pct: 80 });

        assert_eq!(
            combat.debuffs[Side::Enemy],
            Some(TimedDebuff { until_ms: 9_000, factor_pct: 80 })
        );
        assert!(!combat.has_enemies());
    }

    #[test]
    fn test_inactivity() {
        let mut combat = CombatState::new(Vector::new(), 1, &EngineConfig::default());
        assert_eq!(combat.inactivity_ms(3_000), 0);

        combat.turn.activate(1_000);
        assert_eq!(combat.inactivity_ms(3_000), 2_000);

        combat.last_play_ms = Some(2_500);
        assert_eq!(combat.inactivity_ms(3_000), 500);
    }
}
