//! Relic instances and their narrow hooks.
//!
//! A relic's behavior lives in its catalog definition; the instance only
//! carries enablement, level and runtime counters. Each helper below
//! answers one question for one event, consulting every enabled relic.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Catalog, RelicBehavior};
use crate::core::ids::RelicId;

/// Counters a relic accumulates while equipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelicRuntimeEntry {
    /// Total ms banked over the session.
    pub banked_ms: u64,
    /// Banked ms not yet converted to armor.
    pub armor_remainder_ms: u64,
    /// Rest count at the last once-per-rest use.
    pub last_used_rest: Option<u32>,
    pub activations: u32,
}

/// An equipped relic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelicInstance {
    pub relic: RelicId,
    pub enabled: bool,
    pub level: u32,
    #[serde(default)]
    pub runtime: RelicRuntimeEntry,
}

impl RelicInstance {
    /// An enabled level-1 relic.
    #[must_use]
    pub fn new(relic: RelicId) -> Self {
        Self {
            relic,
            enabled: true,
            level: 1,
            runtime: RelicRuntimeEntry::default(),
        }
    }

    /// Disable the relic.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Has this relic been used since `rest_count` was reached?
    #[must_use]
    pub fn used_this_rest(&self, rest_count: u32) -> bool {
        self.runtime.last_used_rest == Some(rest_count)
    }
}

fn behaviors<'a>(
    relics: &'a Vector<RelicInstance>,
    catalog: &'a Catalog,
) -> impl Iterator<Item = (usize, RelicBehavior)> + 'a {
    relics.iter().enumerate().filter(|(_, r)| r.enabled).filter_map(|(i, r)| match catalog.relic(r.relic) {
        Some(def) => Some((i, def.behavior)),
        None => {
            tracing::debug!(relic = %r.relic, "unknown relic ignored");
            None
        }
    })
}

/// Convert leftover turn time into party armor.
///
/// Returns the armor to grant to each party member.
pub fn bank_time_as_armor(relics: &mut Vector<RelicInstance>, catalog: &Catalog, leftover_ms: u64) -> u32 {
    let hits: Vec<(usize, u64)> = behaviors(relics, catalog)
        .filter_map(|(i, b)| match b {
            RelicBehavior::BankedTimeArmor { ms_per_armor } if ms_per_armor > 0 => Some((i, ms_per_armor)),
            _ => None,
        })
        .collect();

    let mut armor = 0;
    for (i, ms_per_armor) in hits {
        let Some(relic) = relics.get_mut(i) else {
            continue;
        };
        let runtime = &mut relic.runtime;
        runtime.banked_ms += leftover_ms;
        let pool = runtime.armor_remainder_ms + leftover_ms;
        let gained = pool / ms_per_armor;
        runtime.armor_remainder_ms = pool % ms_per_armor;
        if gained > 0 {
            runtime.activations += 1;
        }
        armor += u32::try_from(gained).unwrap_or(u32::MAX);
    }
    armor
}

/// Flat countdown bonus for a valid play.
#[must_use]
pub fn move_timer_bonus(relics: &Vector<RelicInstance>, catalog: &Catalog) -> u64 {
    behaviors(relics, catalog)
        .map(|(_, b)| match b {
            RelicBehavior::MoveTimerBonus { bonus_ms } => bonus_ms,
            _ => 0,
        })
        .sum()
}

/// Is the countdown exempt? Only with an empty enemy side.
#[must_use]
pub fn timer_frozen(relics: &Vector<RelicInstance>, catalog: &Catalog, enemies_present: bool) -> bool {
    !enemies_present && behaviors(relics, catalog).any(|(_, b)| b == RelicBehavior::TimerFreeze)
}

/// Index of a rest-wildcards relic that may fire at `rest_count`.
#[must_use]
pub fn rest_wildcards_ready(relics: &Vector<RelicInstance>, catalog: &Catalog, rest_count: u32) -> Option<usize> {
    if rest_count == 0 {
        return None;
    }
    behaviors(relics, catalog)
        .find(|&(i, b)| b == RelicBehavior::RestWildcards && !relics[i].used_this_rest(rest_count))
        .map(|(i, _)| i)
}

/// Index of a rewind relic still unused since the last rest.
#[must_use]
pub fn rewind_relic_ready(relics: &Vector<RelicInstance>, catalog: &Catalog, rest_count: u32) -> Option<usize> {
    behaviors(relics, catalog)
        .find(|&(i, b)| b == RelicBehavior::RewindOncePerRest && !relics[i].used_this_rest(rest_count))
        .map(|(i, _)| i)
}

/// Stamp a relic as used at `rest_count`.
pub fn mark_used(relics: &mut Vector<RelicInstance>, index: usize, rest_count: u32) {
    if let Some(relic) = relics.get_mut(index) {
        relic.runtime.last_used_rest = Some(rest_count);
        relic.runtime.activations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::RelicDefinition;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let layer = catalog.fallback_mut();
        layer.register_relic(RelicDefinition::new(
            RelicId(1),
            "Hourglass",
            RelicBehavior::BankedTimeArmor { ms_per_armor: 1_000 },
        ));
        layer.register_relic(RelicDefinition::new(
            RelicId(2),
            "Metronome",
            RelicBehavior::MoveTimerBonus { bonus_ms: 500 },
        ));
        layer.register_relic(RelicDefinition::new(RelicId(3), "Spool", RelicBehavior::RewindOncePerRest));
        layer.register_relic(RelicDefinition::new(RelicId(4), "Stillness", RelicBehavior::TimerFreeze));
        layer.register_relic(RelicDefinition::new(RelicId(5), "Joker", RelicBehavior::RestWildcards));
        catalog
    }

    #[test]
    fn test_banked_armor_carries_remainder() {
        let catalog = catalog();
        let mut relics = Vector::unit(RelicInstance::new(RelicId(1)));

        assert_eq!(bank_time_as_armor(&mut relics, &catalog, 2_600), 2);
        assert_eq!(relics[0].runtime.armor_remainder_ms, 600);
        assert_eq!(bank_time_as_armor(&mut relics, &catalog, 500), 1);
        assert_eq!(relics[0].runtime.armor_remainder_ms, 100);
        assert_eq!(relics[0].runtime.banked_ms, 3_100);
    }

    #[test]
    fn test_disabled_and_unknown_relics_do_nothing() {
        let catalog = catalog();
        let relics: Vector<RelicInstance> = vec![
            RelicInstance::new(RelicId(2)).disabled(),
            RelicInstance::new(RelicId(99)),
        ]
        .into_iter()
        .collect();
        assert_eq!(move_timer_bonus(&relics, &catalog), 0);
    }

    #[test]
    fn test_move_bonus_sums() {
        let catalog = catalog();
        let relics: Vector<RelicInstance> =
            vec![RelicInstance::new(RelicId(2)), RelicInstance::new(RelicId(2))].into_iter().collect();
        assert_eq!(move_timer_bonus(&relics, &catalog), 1_000);
    }

    #[test]
    fn test_timer_freeze_needs_empty_enemy_side() {
        let catalog = catalog();
        let relics = Vector::unit(RelicInstance::new(RelicId(4)));
        assert!(timer_frozen(&relics, &catalog, false));
        assert!(!timer_frozen(&relics, &catalog, true));
    }

    #[test]
    fn test_rewind_once_per_rest() {
        let catalog = catalog();
        let mut relics = Vector::unit(RelicInstance::new(RelicId(3)));

        assert_eq!(rewind_relic_ready(&relics, &catalog, 0), Some(0));
        mark_used(&mut relics, 0, 0);
        assert_eq!(rewind_relic_ready(&relics, &catalog, 0), None);
        assert_eq!(rewind_relic_ready(&relics, &catalog, 1), Some(0));
    }

    #[test]
    fn test_rest_wildcards_need_a_rest() {
        let catalog = catalog();
        let mut relics = Vector::unit(RelicInstance::new(RelicId(5)));

        assert_eq!(rest_wildcards_ready(&relics, &catalog, 0), None);
        assert_eq!(rest_wildcards_ready(&relics, &catalog, 1), Some(0));
        mark_used(&mut relics, 0, 1);
        assert_eq!(rest_wildcards_ready(&relics, &catalog, 1), None);
    }
}
