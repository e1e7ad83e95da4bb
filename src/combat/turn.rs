//! Turn and countdown state.
//!
//! ## States
//!
//! - `Player` active: the party plays; advancing hands over to the enemy
//!   side when one exists, otherwise ends the round.
//! - `Enemy` active: advancing ends the round.
//!
//! The countdown is armed but inactive at the start of every round and
//! activates on the first interaction. Only the active side's countdown
//! runs, so at most one timer is ever live.

use serde::{Deserialize, Serialize};

use crate::core::config::{EngineConfig, FlowMode};
use crate::core::side::Side;

/// Turn/side controller state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    pub active: Side,
    /// Starts at 1; bumps at every round end.
    pub turn_number: u32,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub timer_active: bool,
    /// When the active side's countdown started.
    pub activated_ms: Option<u64>,
    pub last_tick_ms: Option<u64>,
    /// Timeouts this combat.
    pub timeouts: u32,
    /// Plays since the round began.
    pub plays_this_round: u32,
}

impl TurnState {
    /// Player active, turn 1, timer armed but not running.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            active: Side::Player,
            turn_number: 1,
            remaining_ms: config.player_turn_ms,
            duration_ms: config.player_turn_ms,
            timer_active: false,
            activated_ms: None,
            last_tick_ms: None,
            timeouts: 0,
            plays_this_round: 0,
        }
    }

    /// Start the countdown if it is not running yet.
    pub fn activate(&mut self, now_ms: u64) {
        if !self.timer_active {
            self.timer_active = true;
            self.activated_ms = Some(now_ms);
            self.last_tick_ms = Some(now_ms);
        }
    }

    /// Run the countdown up to `now_ms`.
    ///
    /// `drain_pct` scales elapsed time (100 is real time). A frozen timer
    /// still moves its reference point forward but loses nothing. Returns
    /// `true` when the countdown reached zero under pressure flow.
    pub fn countdown(&mut self, now_ms: u64, drain_pct: u32, frozen: bool, flow: FlowMode) -> bool {
        if !self.timer_active || flow == FlowMode::Relaxed {
            return false;
        }
        let last = self.last_tick_ms.unwrap_or(now_ms);
        self.last_tick_ms = Some(now_ms);
        if frozen {
            return false;
        }

        let elapsed = now_ms.saturating_sub(last);
        let drained = elapsed.saturating_mul(u64::from(drain_pct)) / 100;
        self.remaining_ms = self.remaining_ms.saturating_sub(drained);
        self.remaining_ms == 0
    }

    /// Add time to the running countdown.
    pub fn add_time(&mut self, ms: u64) {
        self.remaining_ms = self.remaining_ms.saturating_add(ms);
    }

    /// Hand the turn to `side` with a fresh, running countdown.
    pub fn switch_to(&mut self, side: Side, config: &EngineConfig, now_ms: u64) {
        self.active = side;
        self.duration_ms = config.turn_ms(side);
        self.remaining_ms = self.duration_ms;
        self.timer_active = true;
        self.activated_ms = Some(now_ms);
        self.last_tick_ms = Some(now_ms);
    }

    /// Begin the next round: player active, timer armed but inactive.
    pub fn next_round(&mut self, config: &EngineConfig) {
        self.turn_number += 1;
        self.active = Side::Player;
        self.duration_ms = config.player_turn_ms;
        self.remaining_ms = self.duration_ms;
        self.timer_active = false;
        self.activated_ms = None;
        self.last_tick_ms = None;
        self.plays_this_round = 0;
    }

    /// Nothing happened since the round began.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.active == Side::Player && !self.timer_active && self.plays_this_round == 0
    }
}

/// Session-wide flow telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowStats {
    pub moves: u32,
    pub timeouts: u32,
    pub turns_ended_early: u32,
    pub longest_combo: u32,
}
