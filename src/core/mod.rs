//! Core engine types: ids, sides, actors, state, commands, RNG, configuration.
//!
//! This module holds the building blocks every other module shares. Hosts
//! tune the engine through `EngineConfig`; rules content comes from the
//! catalog in `cards`.

pub mod actor;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod rng;
pub mod side;
pub mod state;

pub use actor::Actor;
pub use command::{Command, CommandRecord, HandCardRef};
pub use config::{EngineConfig, FlowMode, LegalityMode};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticsSink, Stat, StatLedger, TracingSink};
pub use error::{ConfigError, Rejection};
pub use ids::{
    ActorDefId, ActorId, BiomeId, DeckCardId, DotId, IdAllocator, OrimId, OrimInstanceId, RelicId,
    TransientId,
};
pub use rng::{GameRng, GameRngState, Stream};
pub use side::{Side, SideMap};
pub use state::{CoreState, GameState, Phase, Snapshot};
