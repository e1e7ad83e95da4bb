//! Damage resolution.
//!
//! Damage flows through four stages:
//!
//! 1. [`build_damage_packet`] splits effects into a flat `normal` component
//!    and per-element buckets.
//! 2. [`resolve_packet_total`] applies the type chart and floors the sum.
//! 3. [`roll_hit`] decides hit, graze or miss from accuracy and evasion.
//! 4. [`apply_damage_to_actor`] absorbs through defense, super-armor and
//!    armor before touching hp.
//!
//! Packets are transient: built, resolved and dropped within one command.

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use crate::cards::{Element, TypeChart};
use crate::core::actor::Actor;
use crate::core::config::EngineConfig;
use crate::core::rng::GameRng;

/// Flat plus per-element damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePacket {
    pub normal: i32,
    pub elemental: [u32; Element::COUNT],
}

impl DamagePacket {
    /// A packet with a single component.
    #[must_use]
    pub fn single(amount: u32, element: Option<Element>) -> Self {
        let mut packet = Self::default();
        packet.add(amount, element);
        packet
    }

    /// Add damage to the right bucket. Neutral goes to `normal`.
    ///
    /// Both buckets saturate.
    pub fn add(&mut self, amount: u32, element: Option<Element>) {
        match element {
            Some(e) if !e.is_neutral() => {
                let bucket = &mut self.elemental[e.index()];
                *bucket = bucket.saturating_add(amount);
            }
            _ => {
                let amount = i32::try_from(amount).unwrap_or(i32::MAX);
                self.normal = self.normal.saturating_add(amount);
            }
        }
    }

    /// Is there anything to deal?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normal <= 0 && self.elemental.iter().all(|&d| d == 0)
    }
}

/// Sum the damage effects in `effects` on top of `base` flat damage.
#[must_use]
pub fn build_damage_packet(base: i32, effects: &[Effect]) -> DamagePacket {
    let mut packet = DamagePacket {
        normal: base,
        ..DamagePacket::default()
    };
    for effect in effects.iter().filter(|e| e.kind.is_damage()) {
        packet.add(effect.magnitude, effect.element);
    }
    packet
}

/// Total damage against a target of `target_element`, floored, never
/// negative.
#[must_use]
pub fn resolve_packet_total(packet: &DamagePacket, target_element: Element, chart: &TypeChart) -> u32 {
    let elemental: f64 = Element::ALL
        .iter()
        .map(|&e| f64::from(packet.elemental[e.index()]) * f64::from(chart.multiplier(e, target_element)))
        .sum();
    let total = f64::from(packet.normal) + elemental;
    if total <= 0.0 {
        0
    } else {
        total.floor() as u32
    }
}

/// Hit chance in percent, clamped to the configured band.
#[must_use]
pub fn hit_chance(accuracy: u32, evasion: u32, config: &EngineConfig) -> u32 {
    let raw = i64::from(accuracy) - i64::from(evasion);
    raw.clamp(i64::from(config.min_hit_chance), i64::from(config.max_hit_chance)) as u32
}

/// Outcome of a hit roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitRoll {
    Hit,
    /// Partial hit; `pct` of full damage lands.
    Graze { pct: u32 },
    Miss,
}

impl HitRoll {
    /// Classify a percentile `roll` against `chance` with a graze band of
    /// `graze_window` points above it.
    #[must_use]
    pub fn from_roll(roll: u32, chance: u32, graze_window: u32) -> Self {
        if roll < chance {
            HitRoll::Hit
        } else if roll < chance + graze_window {
            let depth = roll - chance;
            HitRoll::Graze {
                pct: (graze_window - depth) * 100 / graze_window,
            }
        } else {
            HitRoll::Miss
        }
    }

    /// Damage that lands for a given full amount. Grazes deal at least 1.
    #[must_use]
    pub fn scale(self, damage: u32) -> u32 {
        match self {
            HitRoll::Hit => damage,
            HitRoll::Graze { pct } if damage > 0 => (damage * pct / 100).max(1),
            HitRoll::Graze { .. } | HitRoll::Miss => 0,
        }
    }
}

/// Roll to hit with the graze band.
pub fn roll_hit(accuracy: u32, evasion: u32, config: &EngineConfig, rng: &mut GameRng) -> HitRoll {
    let chance = hit_chance(accuracy, evasion, config);
    HitRoll::from_roll(rng.roll_percent(), chance, config.graze_window)
}

/// Roll to hit without a graze band, as damage-over-time ticks do.
pub fn roll_hit_no_graze(accuracy: u32, evasion: u32, config: &EngineConfig, rng: &mut GameRng) -> bool {
    rng.roll_percent() < hit_chance(accuracy, evasion, config)
}

/// What happened to an actor when damage was applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub blocked_by_defense: u32,
    pub absorbed_by_super_armor: u32,
    pub absorbed_by_armor: u32,
    pub hp_lost: u32,
}

/// Apply `amount` to `actor`.
///
/// Defense subtracts first. Super-armor, when present, soaks the rest and
/// discards any overflow. Otherwise armor absorbs up to its value and the
/// remainder hits hp, which clamps at zero.
pub fn apply_damage_to_actor(actor: &mut Actor, amount: u32) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        blocked_by_defense: amount.min(actor.defense),
        ..DamageOutcome::default()
    };
    let remaining = amount - outcome.blocked_by_defense;
    if remaining == 0 {
        return outcome;
    }

    if actor.super_armor > 0 {
        let soaked = remaining.min(actor.super_armor);
        actor.super_armor -= soaked;
        outcome.absorbed_by_super_armor = soaked;
        return outcome;
    }

    apply_to_armor_and_hp(actor, remaining, &mut outcome);
    outcome
}

/// Apply `amount` through defense and armor only, skipping super-armor.
///
/// Damage-over-time ticks use this route.
pub fn apply_tick_damage(actor: &mut Actor, amount: u32) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        blocked_by_defense: amount.min(actor.defense),
        ..DamageOutcome::default()
    };
    let remaining = amount - outcome.blocked_by_defense;
    apply_to_armor_and_hp(actor, remaining, &mut outcome);
    outcome
}

fn apply_to_armor_and_hp(actor: &mut Actor, amount: u32, outcome: &mut DamageOutcome) {
    let absorbed = amount.min(actor.armor);
    actor.armor -= absorbed;
    outcome.absorbed_by_armor = absorbed;

    let hp_lost = (amount - absorbed).min(actor.hp);
    actor.hp -= hp_lost;
    actor.damage_taken += hp_lost;
    outcome.hp_lost = hp_lost;
}
