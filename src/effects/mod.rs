//! Effect system for abilities and card plays.
//!
//! - `Effect`: Declarative instruction (kind, target selector, magnitude)
//! - `damage`: Packet building, type chart, hit roll and absorption
//! - `targeting`: Selector → concrete actor ids
//! - `Scene`: Applies effect batches to the state a command is building
//!
//! ## Design
//!
//! Effects carry no behavior of their own. Everything they mean is decided
//! by the resolver against live state, so content can be authored as plain
//! data and the catalog stays read-only.

pub mod damage;
mod effect;
mod resolver;
mod targeting;

pub use damage::{
    apply_damage_to_actor, apply_tick_damage, build_damage_packet, hit_chance, resolve_packet_total, roll_hit,
    roll_hit_no_graze, DamageOutcome, DamagePacket, HitRoll,
};
pub use effect::{DotKind, Effect, EffectKind, TargetSelector};
pub use resolver::{EffectSource, ResolutionReport, Scene};
pub use targeting::{facing_enemy, select_targets, Rosters, Targets};
