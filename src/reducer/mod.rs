//! Command reducer.
//!
//! The [`Engine`] turns `(state, command, now)` into the next state or a
//! [`Rejection`]. It never mutates its input: every command works on a
//! copy-on-write clone, so a rejected command leaves nothing behind and the
//! caller keeps the snapshot it already had.
//!
//! ## Flow of a command
//!
//! 1. Clone the input state (cheap: `im` collections share structure).
//! 2. Run the handler; any validation failure returns early.
//! 3. Audit protected stats against the grants the handler recorded.
//! 4. Append a [`CommandRecord`] to the history.
//!
//! ## Example
//!
//! ```
//! use golf_rpg::cards::{ActorDefinition, Catalog, Rank};
//! use golf_rpg::core::{ActorDefId, Command, EngineConfig};
//! use golf_rpg::reducer::Engine;
//! use golf_rpg::zones::DealSpec;
//!
//! let mut catalog = Catalog::new();
//! catalog
//!     .fallback_mut()
//!     .register_actor(ActorDefinition::new(ActorDefId::new(1), "Wren", Rank::ACE));
//! let config = EngineConfig::default();
//! let engine = Engine::new(&catalog, &config);
//!
//! let state = engine.new_session(&[ActorDefId::new(1)], 7);
//! let state = engine.start_playing(&state, DealSpec::default()).unwrap();
//!
//! // Resting is only possible in the garden.
//! assert!(engine.apply(&state, Command::Rest, 0).is_err());
//! ```

pub mod hand;
mod play;
mod rewind;
mod session;
mod tick;
mod turn;

pub use hand::HandCard;

use crate::cards::Catalog;
use crate::core::command::{Command, CommandRecord};
use crate::core::config::EngineConfig;
use crate::core::diagnostics::{DiagnosticsSink, StatLedger, TracingSink};
use crate::core::error::{ConfigError, Rejection};
use crate::core::state::GameState;

use play::CardSource;

static TRACING_SINK: TracingSink = TracingSink;

/// Whether a handler changed the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Changed,
    /// The command was accepted but had nothing to do. The input state is
    /// returned as-is and nothing is recorded.
    Unchanged,
}

/// The state-transition engine.
///
/// Holds only borrowed, read-only collaborators, so one engine can serve
/// any number of sessions.
#[derive(Clone, Copy)]
pub struct Engine<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
    diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> Engine<'a> {
    /// Create an engine that reports diagnostics through `tracing`.
    #[must_use]
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            config,
            diagnostics: &TRACING_SINK,
        }
    }

    /// Create an engine after validating the configuration.
    pub fn try_new(catalog: &'a Catalog, config: &'a EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(catalog, config))
    }

    /// Report diagnostics to `sink` instead.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticsSink) -> Self {
        self.diagnostics = sink;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Apply a command at host time `now_ms`.
    pub fn apply(&self, state: &GameState, command: Command, now_ms: u64) -> Result<GameState, Rejection> {
        let mut next = state.clone();
        let mut ledger = StatLedger::new();

        let outcome = match command {
            Command::PlayFromTableau {
                side,
                tableau,
                foundation,
            } => self.play(&mut next, side, CardSource::Tableau(tableau), foundation, now_ms, &mut ledger)?,
            Command::PlayFromHand { side, card, foundation } => {
                self.play(&mut next, side, CardSource::Hand(card), foundation, now_ms, &mut ledger)?
            }
            Command::PlayFromStock { side, foundation } => {
                self.play(&mut next, side, CardSource::Stock, foundation, now_ms, &mut ledger)?
            }
            Command::StartTurn => self.start_turn(&mut next, now_ms)?,
            Command::AdvanceTurn => self.advance_turn(&mut next, now_ms, &mut ledger)?,
            Command::EndTurn => self.end_turn(&mut next, now_ms, &mut ledger)?,
            Command::Tick => self.tick(&mut next, now_ms, &mut ledger),
            Command::Rewind => self.rewind(&mut next)?,
            Command::Rest => self.rest(&mut next)?,
            Command::EnterBiome(biome) => self.enter_biome(&mut next, biome, now_ms)?,
            Command::ExitBiome => self.exit_biome(&mut next)?,
        };

        if outcome == Outcome::Unchanged {
            tracing::debug!(command = command.name(), now_ms, "command had no effect");
            return Ok(state.clone());
        }

        if !command.skips_stat_audit() {
            ledger.check(&state.core.actors, &next.core.actors, command.name(), self.diagnostics);
        }
        self.record(&mut next, command, now_ms);
        tracing::debug!(command = command.name(), now_ms, phase = next.phase.name(), "command applied");
        Ok(next)
    }

    fn record(&self, state: &mut GameState, command: Command, now_ms: u64) {
        state.core.clock_ms = Some(state.core.clock_ms.map_or(now_ms, |c| c.max(now_ms)));
        if command == Command::Tick {
            return;
        }

        let side = command.side().or(state.active_side()).unwrap_or_default();
        let turn = state.turn_number();
        let sequence = state.core.next_sequence();
        state
            .core
            .history
            .push_back(CommandRecord::new(side, command, turn, sequence, now_ms));
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
