//! Error types.
//!
//! Nothing in the engine is fatal. Illegal commands come back as a
//! [`Rejection`] and the caller keeps the snapshot it already had;
//! invariant problems go to the diagnostics sink instead of an error.

use super::ids::{ActorId, BiomeId, DeckCardId, TransientId};
use super::side::Side;

/// Why a command was refused.
///
/// A rejection never mutates anything: the input snapshot is still valid
/// and the caller may issue a different command.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("command requires a board, but the session is in the {0} phase")]
    NoBoard(&'static str),

    #[error("command requires a combat biome")]
    NotInCombat,

    #[error("it is the {active} side's turn, not the {attempted} side's")]
    WrongSide { active: Side, attempted: Side },

    #[error("no foundation at index {index} on the {side} side")]
    NoSuchFoundation { side: Side, index: usize },

    #[error("no tableau at index {index} on the {side} side")]
    NoSuchTableau { side: Side, index: usize },

    #[error("the {0} pile is empty")]
    EmptyPile(&'static str),

    #[error("deck card {0} is not in hand")]
    DeckCardNotInHand(DeckCardId),

    #[error("transient card {0} is not in hand")]
    TransientNotInHand(TransientId),

    #[error("card does not follow the foundation top")]
    IllegalPlay,

    #[error("{actor} is knocked out")]
    ActorKnockedOut { actor: ActorId },

    #[error("not enough power: need {need}, have {have}")]
    InsufficientPower { need: u32, have: u32 },

    #[error("there is no snapshot to rewind to")]
    NothingToRewind,

    #[error("no rewind ability or relic is ready")]
    RewindUnavailable,

    #[error("unknown biome {0}")]
    UnknownBiome(BiomeId),

    #[error("already inside a biome")]
    AlreadyInBiome,

    #[error("command requires the garden, but the session is in the {0} phase")]
    NotInGarden(&'static str),
}

/// Configuration values the engine cannot run with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("turn durations must be non-zero")]
    ZeroTurnDuration,

    #[error("hit chance clamp [{min}, {max}] is not a sub-range of [0, 100]")]
    InvalidHitClamp { min: u32, max: u32 },

    #[error("DOT interval must be non-zero")]
    ZeroDotInterval,
}
