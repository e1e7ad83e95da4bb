//! # golf-rpg
//!
//! Turn-resolution and combat core for a solitaire/RPG card game.
//!
//! Players clear golf-solitaire tableaus by placing cards one rank above or
//! below a foundation top. Each foundation belongs to a party member, and in
//! combat biomes every play is also an attack, heal or buff.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `Engine::apply(state, command, now)` returns the
//!    next state or a `Rejection`. The input is never touched, so a refused
//!    command costs the host nothing.
//!
//! 2. **Host-Supplied Time**: The engine never reads a clock. Countdowns,
//!    damage over time and cooldowns advance only through the timestamps
//!    the host passes in.
//!
//! 3. **Data-Driven Content**: Actors, orims, relics and biomes are catalog
//!    entries. Behavior lives in the resolver, not in the content.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` makes the
//!   copy-on-write reducer and the rewind snapshot cheap.
//!
//! - **Deterministic RNG**: Separate ChaCha streams for deals and hit rolls,
//!   both derived from the session seed.
//!
//! - **Diagnostics, Not Panics**: Invariant problems are reported to a
//!   `DiagnosticsSink` and the command still succeeds.
//!
//! ## Modules
//!
//! - `core`: Ids, sides, actors, state, commands, RNG, configuration, errors
//! - `cards`: Card values, orims, ability decks and the catalog
//! - `zones`: Piles, foundations, lanes and the board
//! - `rules`: Golf legality
//! - `effects`: Effect definitions, damage pipeline, targeting, resolution
//! - `triggers`: Trigger conditions and their evaluation
//! - `combat`: Combos, turn timer, damage over time, relics
//! - `reducer`: The `Engine` that applies commands

pub mod cards;
pub mod combat;
pub mod core;
pub mod effects;
pub mod reducer;
pub mod rules;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Actor, ActorDefId, ActorId, BiomeId, Command, CommandRecord, DeckCardId, Diagnostic, DiagnosticsSink,
    EngineConfig, FlowMode, GameRng, GameState, HandCardRef, LegalityMode, OrimId, Phase, Rejection, RelicId,
    Side, SideMap, TransientId,
};

pub use crate::cards::{
    ActorDefinition, ActorStats, BiomeDefinition, Card, Catalog, Cooldown, Element, OrimDefinition, Rank,
    RelicBehavior, RelicDefinition, Reward, RewardSource, Timing,
};

pub use crate::zones::{Board, DealSpec, Foundation, Lane, Pile};

pub use crate::rules::{can_play, can_play_on, RuleEffect};

pub use crate::effects::{DamagePacket, DotKind, Effect, EffectKind, HitRoll, TargetSelector};

pub use crate::triggers::{TriggerContext, TriggerNode};

pub use crate::combat::{CombatState, RelicInstance, TurnState};

pub use crate::reducer::{Engine, HandCard};
