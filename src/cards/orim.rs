//! Orim definitions and instances.
//!
//! An orim is an equippable ability or modifier. `OrimDefinition` is the
//! read-only catalog entry (effects, trigger, timing, rarity, cost);
//! `OrimInstance` is a runtime handle binding a definition to a slot.
//! Many instances may share one definition.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Rank;
use crate::core::ids::{OrimId, OrimInstanceId};
use crate::effects::Effect;
use crate::triggers::{RawTrigger, TriggerCompileError, TriggerNode};

/// How rare an orim is. Informational for the content layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// When an orim's effects resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timing {
    /// When its card is played onto a foundation.
    #[default]
    OnPlay,
    /// At every round boundary, for orims socketed into an actor slot.
    OnRoundEnd,
}

/// How long a discarded deck card stays out of hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cooldown {
    /// Returns on the next hand synthesis.
    #[default]
    None,
    /// Returns once the owner's combo has grown by this much since discard.
    Combo(u32),
    /// Returns once this many seconds of wall-clock time have passed.
    Seconds(u32),
}

/// Static orim definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrimDefinition {
    pub id: OrimId,
    pub name: String,
    pub effects: SmallVec<[Effect; 2]>,
    /// Activation gate; `None` means always available.
    pub trigger: Option<TriggerNode>,
    pub timing: Timing,
    pub rarity: Rarity,
    /// Power spent when the card is played.
    pub cost: u32,
    pub cooldown: Cooldown,
    /// Rank printed on cards synthesized from this orim.
    pub rank: Rank,
    pub self_target_only: bool,
}

impl OrimDefinition {
    /// Create a definition with no effects.
    pub fn new(id: OrimId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            effects: SmallVec::new(),
            trigger: None,
            timing: Timing::default(),
            rarity: Rarity::default(),
            cost: 0,
            cooldown: Cooldown::default(),
            rank: Rank::WILD,
            self_target_only: false,
        }
    }

    /// Add an effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the activation trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerNode) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the timing.
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Set the power cost.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the discard cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Cooldown) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Only ever target the owner.
    #[must_use]
    pub fn self_targeting(mut self) -> Self {
        self.self_target_only = true;
        self
    }
}

/// Authoring form of an orim definition.
///
/// Identical to [`OrimDefinition`] except that the trigger is still the
/// loosely-typed [`RawTrigger`]. Converting compiles the trigger once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawOrimDefinition {
    pub id: OrimId,
    pub name: String,
    #[serde(default)]
    pub effects: SmallVec<[Effect; 2]>,
    #[serde(default)]
    pub trigger: Option<RawTrigger>,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub cooldown: Cooldown,
    #[serde(default = "wild_rank")]
    pub rank: Rank,
    #[serde(default)]
    pub self_target_only: bool,
}

fn wild_rank() -> Rank {
    Rank::WILD
}

impl TryFrom<RawOrimDefinition> for OrimDefinition {
    type Error = TriggerCompileError;

    fn try_from(raw: RawOrimDefinition) -> Result<Self, Self::Error> {
        let trigger = raw.trigger.as_ref().map(TriggerNode::compile).transpose()?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            effects: raw.effects,
            trigger,
            timing: raw.timing,
            rarity: raw.rarity,
            cost: raw.cost,
            cooldown: raw.cooldown,
            rank: raw.rank,
            self_target_only: raw.self_target_only,
        })
    }
}

/// A runtime binding of an orim definition to an actor or card slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrimInstance {
    pub id: OrimInstanceId,
    pub definition: OrimId,
    pub slot: u8,
}

impl OrimInstance {
    /// Bind a definition to a slot.
    #[must_use]
    pub const fn new(id: OrimInstanceId, definition: OrimId, slot: u8) -> Self {
        Self {
            id,
            definition,
            slot,
        }
    }
}
