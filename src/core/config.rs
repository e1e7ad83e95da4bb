//! Engine configuration.
//!
//! Hosts configure the engine at startup with an [`EngineConfig`]. It holds
//! tuning values only: rules structure (tableau layout, enemy rosters,
//! ability definitions) comes from the content catalog.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// How the turn countdown behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowMode {
    /// No countdown pressure; turns only change on explicit commands.
    Relaxed,
    /// Countdown runs while a side is active and forces an advance at zero.
    #[default]
    TurnBasedPressure,
}

/// Which legality variant plain golf moves use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalityMode {
    /// Strict ±1 rank adjacency.
    #[default]
    Plain,
    /// Adjacency, plus anything goes on a wild-origin foundation.
    Wildcard,
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use golf_rpg::core::{EngineConfig, FlowMode};
///
/// let config = EngineConfig::default()
///     .with_player_turn_ms(20_000)
///     .with_flow_mode(FlowMode::Relaxed);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.player_turn_ms, 20_000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Countdown length of a player turn.
    pub player_turn_ms: u64,

    /// Countdown length of an enemy turn.
    pub enemy_turn_ms: u64,

    /// Countdown behavior.
    pub flow_mode: FlowMode,

    /// Legality variant for golf moves.
    pub legality_mode: LegalityMode,

    /// Reset foundations and tableaus at every round boundary.
    pub infinite_combat: bool,

    /// Flat damage of a plain (non-ability) card landing in the combat lane.
    pub base_card_damage: u32,

    /// Lower clamp of the hit chance, in percent.
    pub min_hit_chance: u32,

    /// Upper clamp of the hit chance, in percent.
    pub max_hit_chance: u32,

    /// Width of the graze band above the hit chance, in percent.
    pub graze_window: u32,

    /// Plays an actor's rewind ability needs before it can be used again.
    pub rewind_cooldown: i32,

    /// Default interval between DOT ticks when an effect does not set one.
    pub dot_interval_ms: u64,

    /// Default duration of a slow debuff when an effect does not set one.
    pub slow_duration_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_turn_ms: 30_000,
            enemy_turn_ms: 10_000,
            flow_mode: FlowMode::default(),
            legality_mode: LegalityMode::default(),
            infinite_combat: true,
            base_card_damage: 1,
            min_hit_chance: 5,
            max_hit_chance: 95,
            graze_window: 20,
            rewind_cooldown: 3,
            dot_interval_ms: 1_000,
            slow_duration_ms: 5_000,
        }
    }
}

impl EngineConfig {
    /// Set the player turn countdown.
    #[must_use]
    pub fn with_player_turn_ms(mut self, ms: u64) -> Self {
        self.player_turn_ms = ms;
        self
    }

    /// Set the enemy turn countdown.
    #[must_use]
    pub fn with_enemy_turn_ms(mut self, ms: u64) -> Self {
        self.enemy_turn_ms = ms;
        self
    }

    /// Set the flow mode.
    #[must_use]
    pub fn with_flow_mode(mut self, mode: FlowMode) -> Self {
        self.flow_mode = mode;
        self
    }

    /// Set the legality variant.
    #[must_use]
    pub fn with_legality_mode(mut self, mode: LegalityMode) -> Self {
        self.legality_mode = mode;
        self
    }

    /// Enable or disable round-boundary resets.
    #[must_use]
    pub fn with_infinite_combat(mut self, enabled: bool) -> Self {
        self.infinite_combat = enabled;
        self
    }

    /// Set the flat damage of plain cards.
    #[must_use]
    pub fn with_base_card_damage(mut self, damage: u32) -> Self {
        self.base_card_damage = damage;
        self
    }

    /// Set the hit chance band, in percent.
    #[must_use]
    pub fn with_hit_chance(mut self, min: u32, max: u32) -> Self {
        self.min_hit_chance = min;
        self.max_hit_chance = max;
        self
    }

    /// Set the rewind ability cooldown.
    #[must_use]
    pub fn with_rewind_cooldown(mut self, plays: i32) -> Self {
        self.rewind_cooldown = plays;
        self
    }

    /// Countdown length for a side's turn.
    #[must_use]
    pub fn turn_ms(&self, side: super::Side) -> u64 {
        match side {
            super::Side::Player => self.player_turn_ms,
            super::Side::Enemy => self.enemy_turn_ms,
        }
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_turn_ms == 0 || self.enemy_turn_ms == 0 {
            return Err(ConfigError::ZeroTurnDuration);
        }
        if self.min_hit_chance > self.max_hit_chance || self.max_hit_chance > 100 {
            return Err(ConfigError::InvalidHitClamp {
                min: self.min_hit_chance,
                max: self.max_hit_chance,
            });
        }
        if self.dot_interval_ms == 0 {
            return Err(ConfigError::ZeroDotInterval);
        }
        Ok(())
    }
}
