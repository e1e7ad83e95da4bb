//! Commands: every state transition the engine accepts.
//!
//! A command is a plain value. The engine applies it to a snapshot and
//! returns either the next snapshot or a [`Rejection`](super::Rejection).
//! Successful commands are appended to the session history as a
//! [`CommandRecord`].

use serde::{Deserialize, Serialize};

use super::ids::{ActorId, BiomeId, DeckCardId, TransientId};
use super::side::Side;

/// A card in a side's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandCardRef {
    /// A card synthesized from an actor's ability deck.
    Deck { actor: ActorId, card: DeckCardId },
    /// A runtime-only card (draws, relic wildcards).
    Transient(TransientId),
}

/// A complete engine command.
///
/// ## Example
///
/// ```
/// use golf_rpg::core::{Command, Side};
///
/// let play = Command::PlayFromTableau { side: Side::Player, tableau: 2, foundation: 0 };
/// assert!(play.is_play());
/// assert_eq!(play.name(), "play_from_tableau");
/// assert_eq!(play.side(), Some(Side::Player));
///
/// assert!(!Command::EndTurn.is_play());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move a tableau top onto a foundation.
    PlayFromTableau {
        side: Side,
        tableau: usize,
        foundation: usize,
    },
    /// Play a hand card onto a foundation.
    PlayFromHand {
        side: Side,
        card: HandCardRef,
        foundation: usize,
    },
    /// Move the stock top onto a foundation.
    PlayFromStock { side: Side, foundation: usize },
    /// Start the countdown without playing.
    StartTurn,
    /// Hand the turn to the next side, or end the round.
    AdvanceTurn,
    /// End the round early.
    EndTurn,
    /// Advance time-driven state to the supplied timestamp.
    Tick,
    /// Restore the snapshot taken before the latest play.
    Rewind,
    /// Rest in the garden.
    Rest,
    EnterBiome(BiomeId),
    ExitBiome,
}

impl Command {
    /// Stable name for logs and diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Command::PlayFromTableau { .. } => "play_from_tableau",
            Command::PlayFromHand { .. } => "play_from_hand",
            Command::PlayFromStock { .. } => "play_from_stock",
            Command::StartTurn => "start_turn",
            Command::AdvanceTurn => "advance_turn",
            Command::EndTurn => "end_turn",
            Command::Tick => "tick",
            Command::Rewind => "rewind",
            Command::Rest => "rest",
            Command::EnterBiome(_) => "enter_biome",
            Command::ExitBiome => "exit_biome",
        }
    }

    /// The side a play command acts for.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        match self {
            Command::PlayFromTableau { side, .. }
            | Command::PlayFromHand { side, .. }
            | Command::PlayFromStock { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// Does this command place a card?
    #[must_use]
    pub const fn is_play(&self) -> bool {
        self.side().is_some()
    }

    /// Is the post-command stat audit skipped? Rewind, rest and biome
    /// entry legitimately raise stats wholesale.
    #[must_use]
    pub const fn skips_stat_audit(&self) -> bool {
        matches!(self, Command::Rewind | Command::Rest | Command::EnterBiome(_))
    }
}

/// A recorded command with metadata for flow telemetry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The side that was active, or the acting side for plays.
    pub side: Side,

    pub command: Command,

    /// Turn number when the command was applied (0 outside combat).
    pub turn: u32,

    /// Session-wide sequence number.
    pub sequence: u64,

    /// Host timestamp the command was applied at.
    pub at_ms: u64,
}

impl CommandRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(side: Side, command: Command, turn: u32, sequence: u64, at_ms: u64) -> Self {
        Self {
            side,
            command,
            turn,
            sequence,
            at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_side() {
        let hand = Command::PlayFromHand {
            side: Side::Enemy,
            card: HandCardRef::Transient(TransientId(1)),
            foundation: 0,
        };
        assert_eq!(hand.side(), Some(Side::Enemy));
        assert_eq!(Command::Rest.side(), None);
        assert_eq!(Command::EnterBiome(BiomeId(1)).side(), None);
    }

    #[test]
    fn test_stat_audit_exemptions() {
        assert!(Command::Rewind.skips_stat_audit());
        assert!(Command::Rest.skips_stat_audit());
        assert!(Command::EnterBiome(BiomeId(3)).skips_stat_audit());
        assert!(!Command::Tick.skips_stat_audit());
        assert!(!Command::PlayFromStock { side: Side::Player, foundation: 0 }.skips_stat_audit());
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::PlayFromHand {
            side: Side::Player,
            card: HandCardRef::Deck {
                actor: ActorId(1),
                card: DeckCardId(4),
            },
            foundation: 1,
        };
        let json = serde_json::to_string(&command).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, back);
    }

    #[test]
    fn test_record() {
        let record = CommandRecord::new(Side::Player, Command::EndTurn, 3, 17, 9_000);
        assert_eq!(record.turn, 3);
        assert_eq!(record.sequence, 17);
        assert_eq!(record.command.name(), "end_turn");
    }
}
