//! Card locations: piles and the board that arranges them.
//!
//! ## Key Types
//!
//! - `Pile`: Ordered card sequence (top = last)
//! - `Foundation`: Pile tied to a combat participant
//! - `Lane`: One side's foundations, tableaus, stock and transient hand
//! - `Board`: Both lanes plus the deal shape used to (re)deal them

pub mod board;
pub mod pile;

pub use board::{Board, DealSpec, Lane, TransientCard};
pub use pile::{Foundation, Pile};
