//! Effect definitions.
//!
//! Effects are declarative instructions attached to orims. Each one names
//! a kind, a target selector and a magnitude; the resolver gives them
//! meaning against live state.
//!
//! ## Kinds
//!
//! - **Damage**: goes through hit roll, type chart, defense and armor
//! - **Armor / SuperArmor / Defense / Evasion**: stat grants
//! - **Healing**: restores hp up to max
//! - **Draw / Redeal**: board manipulation on the owner's side
//! - **DamageOverTime / Slow**: scheduled damage and a countdown debuff
//! - **Ordering**: restricts rank direction on the owner's side
//!
//! Stat grants flagged `expires_on_replay` are reverted the next time the
//! same deck card is played.

use serde::{Deserialize, Serialize};

use crate::cards::Element;
use crate::rules::RuleEffect;

/// Flavor of a damage-over-time entry. Cosmetic to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DotKind {
    #[default]
    Burn,
    Poison,
    Bleed,
}

/// What an effect does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Damage,
    Armor,
    SuperArmor,
    Defense,
    Evasion,
    Healing,
    /// Move `magnitude` cards from the stock into the transient hand.
    Draw,
    /// Re-deal the owner side's tableaus.
    Redeal,
    /// Schedule `ticks` hits of `magnitude` each.
    DamageOverTime {
        ticks: u32,
        interval_ms: Option<u64>,
        kind: DotKind,
    },
    /// Drain the opposing side's countdown faster.
    Slow {
        duration_ms: Option<u64>,
        /// Extra drain in percent; 50 means 1.5× speed.
        factor_pct: u32,
    },
    /// Add an ordering rule to the owner's side until the round ends.
    Ordering(RuleEffect),
}

impl EffectKind {
    /// Does this kind deal damage through the damage pipeline?
    #[must_use]
    pub fn is_damage(self) -> bool {
        matches!(self, EffectKind::Damage)
    }
}

/// Who an effect lands on, relative to its source actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelector {
    /// The source actor.
    #[default]
    SelfActor,
    /// The most wounded living ally.
    Ally,
    /// Every living ally, the source included.
    AllAllies,
    /// The facing enemy, or the first living one.
    Enemy,
    /// Every living enemy.
    AllEnemies,
    /// Every living actor on both sides.
    Anyone,
}

/// A single declarative effect.
///
/// ## Example
///
/// ```
/// use golf_rpg::cards::Element;
/// use golf_rpg::effects::{Effect, EffectKind, TargetSelector};
///
/// let bolt = Effect::damage(4).with_element(Element::Air);
/// assert_eq!(bolt.kind, EffectKind::Damage);
/// assert_eq!(bolt.target, TargetSelector::Enemy);
///
/// let ward = Effect::armor(2).expiring();
/// assert!(ward.expires_on_replay);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    #[serde(default)]
    pub target: TargetSelector,
    #[serde(default)]
    pub magnitude: u32,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub expires_on_replay: bool,
}

impl Effect {
    /// Create an effect.
    #[must_use]
    pub const fn new(kind: EffectKind, target: TargetSelector, magnitude: u32) -> Self {
        Self {
            kind,
            target,
            magnitude,
            element: None,
            expires_on_replay: false,
        }
    }

    /// Damage the facing enemy.
    #[must_use]
    pub const fn damage(amount: u32) -> Self {
        Self::new(EffectKind::Damage, TargetSelector::Enemy, amount)
    }

    /// Heal the source actor.
    #[must_use]
    pub const fn heal(amount: u32) -> Self {
        Self::new(EffectKind::Healing, TargetSelector::SelfActor, amount)
    }

    /// Grant armor to the source actor.
    #[must_use]
    pub const fn armor(amount: u32) -> Self {
        Self::new(EffectKind::Armor, TargetSelector::SelfActor, amount)
    }

    /// Grant super-armor to the source actor.
    #[must_use]
    pub const fn super_armor(amount: u32) -> Self {
        Self::new(EffectKind::SuperArmor, TargetSelector::SelfActor, amount)
    }

    /// Draw from the stock.
    #[must_use]
    pub const fn draw(count: u32) -> Self {
        Self::new(EffectKind::Draw, TargetSelector::SelfActor, count)
    }

    /// Schedule damage over time on the facing enemy.
    #[must_use]
    pub const fn dot(per_tick: u32, ticks: u32, kind: DotKind) -> Self {
        Self::new(
            EffectKind::DamageOverTime {
                ticks,
                interval_ms: None,
                kind,
            },
            TargetSelector::Enemy,
            per_tick,
        )
    }

    /// Slow the opposing side's countdown.
    #[must_use]
    pub const fn slow(factor_pct: u32) -> Self {
        Self::new(
            EffectKind::Slow {
                duration_ms: None,
                factor_pct,
            },
            TargetSelector::Enemy,
            0,
        )
    }

    /// Restrict rank direction on the owner's side.
    #[must_use]
    pub const fn ordering(rule: RuleEffect) -> Self {
        Self::new(EffectKind::Ordering(rule), TargetSelector::SelfActor, 0)
    }

    /// Change the target selector.
    #[must_use]
    pub const fn targeting(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    /// Give the effect an element.
    #[must_use]
    pub const fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Revert this grant when the source card is replayed.
    #[must_use]
    pub const fn expiring(mut self) -> Self {
        self.expires_on_replay = true;
        self
    }
}
