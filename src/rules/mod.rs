//! Legality rules for placing cards on foundations.
//!
//! Every play command asks these functions before touching state; a `false`
//! answer becomes `Rejection::IllegalPlay`.

pub mod legality;

pub use legality::{can_play, can_play_on, has_golf_move, RuleEffect};
