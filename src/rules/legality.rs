//! Card-ordering legality.
//!
//! A golf move places a card on a foundation whose top is exactly one rank
//! away, wrapping Ace↔King, regardless of element. Variants layered on top:
//!
//! - **Ordering effects** restrict or flip the allowed direction.
//! - **Wildcard mode** accepts anything on a foundation whose origin card
//!   was wild.
//! - **Wild cards** (rank sentinel 0) are always legal, and anything may
//!   land on a wild top.
//! - **Bypass cards** (ability, deck-card or self-target-only) are drops,
//!   not golf moves, and ignore ordering entirely.
//!
//! ## Example
//!
//! ```
//! use golf_rpg::cards::{Card, Element, Rank};
//! use golf_rpg::rules::{can_play, RuleEffect};
//!
//! let king = Card::new(Rank::KING, Element::Fire);
//! let ace = Card::new(Rank::ACE, Element::Water);
//! let queen = Card::new(Rank::new(12).unwrap(), Element::Air);
//!
//! assert!(can_play(&ace, Some(&king), &[]));
//! assert!(can_play(&queen, Some(&king), &[]));
//! assert!(!can_play(&queen, Some(&king), &[RuleEffect::AscendingOnly]));
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::config::LegalityMode;
use crate::zones::{Foundation, Lane};

/// A rule modifier active on one side of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleEffect {
    /// Only top + 1 is legal.
    AscendingOnly,
    /// Only top − 1 is legal.
    DescendingOnly,
    /// Flip whichever direction the other effects demand.
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Either,
    Up,
    Down,
}

fn allowed_direction(effects: &[RuleEffect]) -> Direction {
    effects.iter().fold(Direction::Either, |dir, effect| match effect {
        RuleEffect::AscendingOnly => Direction::Up,
        RuleEffect::DescendingOnly => Direction::Down,
        RuleEffect::Reverse => match dir {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Either => Direction::Either,
        },
    })
}

/// Plain legality of `candidate` on a foundation topped by `top`.
#[must_use]
pub fn can_play(candidate: &Card, top: Option<&Card>, effects: &[RuleEffect]) -> bool {
    if candidate.bypasses_ordering() {
        return true;
    }
    let Some(top) = top else {
        return false;
    };
    if candidate.is_wild() || top.is_wild() {
        return true;
    }

    match (top.rank.steps_up_to(candidate.rank), allowed_direction(effects)) {
        (Some(1), Direction::Either | Direction::Up) => true,
        (Some(12), Direction::Either | Direction::Down) => true,
        _ => false,
    }
}

/// Legality of `candidate` on `foundation` under the configured variant.
#[must_use]
pub fn can_play_on(
    candidate: &Card,
    foundation: &Foundation,
    effects: &[RuleEffect],
    mode: LegalityMode,
) -> bool {
    if mode == LegalityMode::Wildcard
        && foundation.has_wild_origin()
        && foundation.top().is_some()
    {
        return true;
    }
    can_play(candidate, foundation.top(), effects)
}

/// Does any golf source in `lane` fit any foundation accepted by `usable`?
///
/// Sources are tableau tops, the stock top and transient hand cards. Deck
/// cards are not considered. The lane's own ordering effects apply.
pub fn has_golf_move(lane: &Lane, mode: LegalityMode, usable: impl Fn(&Foundation) -> bool) -> bool {
    let effects: Vec<RuleEffect> = lane.rules.iter().copied().collect();
    let foundations: Vec<&Foundation> = lane.foundations.iter().filter(|f| usable(f)).collect();
    lane.playable_sources().any(|card| {
        foundations
            .iter()
            .any(|f| can_play_on(card, f, &effects, mode))
    })
}
